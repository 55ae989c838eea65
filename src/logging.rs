use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{prelude::*, EnvFilter};

/// Env var read for the log filter, e.g. `TRADLE_LOG=tradle=debug`
pub const LOG_ENV: &str = "TRADLE_LOG";
const DEFAULT_FILTER: &str = "tradle=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to `path`; stdout belongs to the terminal UI
pub fn init_tracing(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(env_filter())
        .try_init();

    Ok(())
}
