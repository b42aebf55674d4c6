mod app;

use anyhow::Result;

fn main() -> Result<()> {
    init_tracing();
    app::run()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
