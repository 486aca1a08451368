use crate::domain::models::Settings;
use std::path::{Path, PathBuf};

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/intake/config.toml"))
}

/// Reads settings from `path` (or the default location). A missing file yields defaults.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Ok(p) => p,
            Err(_) => return Ok(Settings::default()),
        },
    };
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Settings::default());
    }
    let raw = std::fs::read_to_string(&path)?;
    let settings = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(settings)
}
