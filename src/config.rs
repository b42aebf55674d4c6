use crate::aquarium::DEFAULT_CAPTION;
use crate::error::SceneError;
use crate::sprite::Assets;
use crate::storage::write_atomic;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed generator seed; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Animation step used when advancing a scene.
    pub frame_ms: u64,
    pub caption: String,
    pub assets: Assets,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            frame_ms: 30,
            caption: DEFAULT_CAPTION.to_string(),
            assets: Assets::default(),
        }
    }
}

/// Per-user location of `settings.json`.
pub fn settings_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "aquarium", "Aquarium")?;
    Some(proj.config_dir().join("settings.json"))
}

/// Missing or unreadable settings fall back to the defaults.
pub fn load_settings(path: &Path) -> Settings {
    if let Ok(s) = fs::read_to_string(path) {
        if let Ok(v) = serde_json::from_str::<Settings>(&s) {
            return v;
        }
        tracing::warn!(path = %path.display(), "ignoring malformed settings file");
    }
    Settings::default()
}

pub fn save_settings_atomic(path: &Path, s: &Settings) -> Result<(), SceneError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok();
    }
    let data = serde_json::to_vec_pretty(s)?;
    write_atomic(path, &data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_keep_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "seed": 42 }"#).unwrap();
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.frame_ms, 30);
        assert_eq!(s.assets, Assets::default());
    }

    #[test]
    fn settings_survive_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut s = Settings::default();
        s.seed = Some(7);
        s.assets.beta.width = 64.0;
        save_settings_atomic(&path, &s).unwrap();
        assert_eq!(load_settings(&path), s);
    }

    #[test]
    fn garbage_settings_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings(&path), Settings::default());
        assert_eq!(load_settings(&dir.path().join("absent.json")), Settings::default());
    }
}
