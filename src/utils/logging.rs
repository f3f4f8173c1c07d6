use std::fs::{self, File, OpenOptions};
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::error::{Context, Result};

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialise `env_logger` from `RUST_LOG` (default `info`).
///
/// With `log_file` set, records are appended to that file instead of stderr so they
/// do not draw over the terminal UI.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_LOG_FILTER));
    if let Some(path) = log_file {
        let file = open_log_file(path)?;
        builder.target(Target::Pipe(Box::new(file)));
        builder.write_style(env_logger::WriteStyle::Never);
    }
    builder
        .try_init()
        .context("failed to initialise logger")?;
    Ok(())
}

pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    Ok(file)
}
