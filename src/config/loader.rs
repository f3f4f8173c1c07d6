use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Context, Result};

use super::{validator, Config};

impl Config {
    /// Load the dashboard configuration, falling back to built-in defaults when no file exists.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        for candidate in search_paths(path) {
            if !candidate.is_file() {
                debug!("No config at {}", candidate.display());
                continue;
            }

            let config = Self::from_file(&candidate)?;
            info!("Loaded configuration from {}", candidate.display());
            return Ok(config);
        }

        info!(
            "No configuration file found for {}; using defaults",
            path.display()
        );
        Ok(Config::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
            .map_err(Into::into)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        validator::validate_config(&config)?;
        Ok(config)
    }
}

fn search_paths(path: &Path) -> Vec<PathBuf> {
    let mut paths = vec![path.to_path_buf()];
    if path.is_absolute() {
        return paths;
    }

    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(dir.join(path));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(path));
    }

    paths.dedup();
    paths
}
