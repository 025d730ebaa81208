use std::fs;
use std::path::{Path, PathBuf};

use engine_logging::engine_info;
use serde::Deserialize;
use thiserror::Error;
use wager_engine::ScrollSettings;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Contents of the optional RON settings file; every key may be omitted.
///
/// ```ron
/// (
///     scroll: (step_delay_ms: 750, max_stable_attempts: 4),
///     output_dir: Some("exports"),
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub scroll: ScrollSettings,
    pub output_dir: Option<PathBuf>,
}

/// Reads `path`, falling back to defaults when no file is given or it does
/// not exist.
pub fn load(path: Option<&Path>) -> Result<AppSettings, SettingsError> {
    let Some(path) = path else {
        return Ok(AppSettings::default());
    };
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            engine_info!("No settings at {:?}; using defaults", path);
            return Ok(AppSettings::default());
        }
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let settings = ron::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    engine_info!("Loaded settings from {:?}", path);
    Ok(settings)
}
