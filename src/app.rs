use anyhow::{bail, Context, Result};
use aquarium::config::{load_settings, save_settings_atomic, settings_path, Settings};
use aquarium::{Aquarium, DrawCall, ItemKind, RecordingSurface};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Upper bound on frames a single `step` may run.
const MAX_FRAMES: u64 = 10_000_000;

#[derive(Parser, Debug)]
#[command(
    name = "aquarium",
    version,
    about = "Edit and animate .aqua aquarium scenes from the command line"
)]
struct Cli {
    /// Settings file (JSON). Defaults to the per-user config location.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an empty scene.
    New { file: PathBuf },
    /// Add an item. It lands at (200, 200) unless --at is given.
    #[command(allow_negative_numbers = true)]
    Add {
        file: PathBuf,
        /// beta, dova, chest or castle.
        kind: ItemKind,
        #[arg(long, num_args = 2, value_names = ["X", "Y"])]
        at: Option<Vec<f64>>,
    },
    /// Grab the topmost item under (X, Y), bring it to the front and drop it at (TO_X, TO_Y).
    #[command(allow_negative_numbers = true)]
    Drag {
        file: PathBuf,
        x: f64,
        y: f64,
        to_x: f64,
        to_y: f64,
    },
    /// Advance the animation by whole frames.
    Step {
        file: PathBuf,
        #[arg(long, default_value_t = 1.0)]
        seconds: f64,
    },
    /// Print the items in draw order.
    List {
        file: PathBuf,
        /// Also print what a renderer would be asked to draw.
        #[arg(long)]
        draw_calls: bool,
    },
    /// Write the settings currently in effect to the settings file.
    Settings {
        /// Replace an existing settings file.
        #[arg(long)]
        force: bool,
    },
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings_file = cli.settings.clone().or_else(settings_path);
    let settings = settings_file
        .as_deref()
        .map(load_settings)
        .unwrap_or_default();

    match cli.command {
        Command::New { file } => {
            let aq = new_aquarium(&settings);
            save(&aq, &file)?;
        }
        Command::Add { file, kind, at } => {
            let mut aq = open(&settings, &file)?;
            let id = aq.spawn(kind);
            if let Some(at) = at {
                aq.set_location(id, at[0], at[1]);
            }
            save(&aq, &file)?;
            println!("added {kind} {id}");
        }
        Command::Drag {
            file,
            x,
            y,
            to_x,
            to_y,
        } => {
            let mut aq = open(&settings, &file)?;
            let Some(id) = aq.hit_test(x, y) else {
                bail!("nothing to grab at ({x}, {y})");
            };
            aq.move_item_to_end(id);
            aq.set_location(id, to_x, to_y);
            save(&aq, &file)?;
            println!("moved {id} to ({to_x}, {to_y})");
        }
        Command::Step { file, seconds } => {
            let mut aq = open(&settings, &file)?;
            let frames = advance(&mut aq, seconds, settings.frame_ms)?;
            save(&aq, &file)?;
            info!(frames, seconds, "scene advanced");
        }
        Command::List { file, draw_calls } => {
            let aq = open(&settings, &file)?;
            println!("{} ({} items)", aq.caption(), aq.len());
            for item in aq.items() {
                let p = item.position();
                let sprite = &item.sprite().path;
                match item.velocity() {
                    Some(v) => println!(
                        "{} {} [{sprite}] at ({}, {}) speed ({}, {}){}",
                        item.id(),
                        item.kind(),
                        p.x,
                        p.y,
                        v.x,
                        v.y,
                        if item.mirror() { " mirrored" } else { "" }
                    ),
                    None => println!(
                        "{} {} [{sprite}] at ({}, {})",
                        item.id(),
                        item.kind(),
                        p.x,
                        p.y
                    ),
                }
            }
            if draw_calls {
                let mut surface = RecordingSurface::new();
                aq.draw(&mut surface);
                for call in &surface.calls {
                    print_call(call);
                }
            }
        }
        Command::Settings { force } => {
            let Some(path) = settings_file else {
                bail!("no settings location available; pass --settings");
            };
            if write_settings(&path, &settings, force)? {
                println!("wrote {}", path.display());
            } else {
                bail!("{} already exists (use --force to replace it)", path.display());
            }
        }
    }
    Ok(())
}

/// Saves `settings` to `path` unless a file is already there and `force` is off.
/// Returns whether anything was written.
fn write_settings(path: &Path, settings: &Settings, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    save_settings_atomic(path, settings)
        .with_context(|| format!("write to {} failed", path.display()))?;
    Ok(true)
}

fn new_aquarium(settings: &Settings) -> Aquarium {
    let assets = settings.assets.clone();
    let mut aq = match settings.seed {
        Some(seed) => Aquarium::with_seed(assets, seed),
        None => Aquarium::new(assets),
    };
    aq.set_caption(settings.caption.clone());
    aq
}

fn open(settings: &Settings, file: &Path) -> Result<Aquarium> {
    let mut aq = new_aquarium(settings);
    aq.load(file)
        .with_context(|| format!("unable to load aquarium file {}", file.display()))?;
    Ok(aq)
}

fn save(aq: &Aquarium, file: &Path) -> Result<()> {
    aq.save(file)
        .with_context(|| format!("write to {} failed", file.display()))
}

/// Runs fixed-size frames covering `seconds`; the last frame may be shorter.
fn advance(aq: &mut Aquarium, seconds: f64, frame_ms: u64) -> Result<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        bail!("--seconds must be a finite, non-negative number (got {seconds})");
    }
    let frame = Duration::from_millis(frame_ms.max(1)).as_secs_f64();
    let needed = (seconds / frame).ceil();
    if needed > MAX_FRAMES as f64 {
        bail!("{seconds}s at {frame_ms}ms per frame needs {needed} frames, over the {MAX_FRAMES} limit");
    }
    let mut remaining = seconds;
    let mut frames = 0;
    while remaining > 0.0 {
        let dt = remaining.min(frame);
        aq.update(dt);
        remaining -= dt;
        frames += 1;
    }
    Ok(frames)
}

fn print_call(call: &DrawCall) {
    match call {
        DrawCall::Image {
            path,
            x,
            y,
            mirrored,
        } => println!(
            "image {path} at ({x}, {y}){}",
            if *mirrored { " mirrored" } else { "" }
        ),
        DrawCall::Text { text, x, y, style } => {
            println!("text {text:?} at ({x}, {y}) size {}", style.size)
        }
    }
}
