use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::models::Settings;

const ENV_CONFIG: &str = "NOVADESK_CONFIG";
const ENV_MODEL_DIR: &str = "NOVADESK_MODEL_DIR";
const ENV_LEXICAL: &str = "NOVADESK_LEXICAL";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Per-user data directory (`%LOCALAPPDATA%\NovaDesk` or `$XDG_DATA_HOME/novadesk`).
pub fn data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        if let Some(local) = env_value("LOCALAPPDATA") {
            return PathBuf::from(local).join("NovaDesk");
        }
    }
    if let Some(xdg) = env_value("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("novadesk");
    }
    match env_value("HOME").or_else(|| env_value("USERPROFILE")) {
        Some(home) => PathBuf::from(home).join(".local").join("share").join("novadesk"),
        None => PathBuf::from(".novadesk"),
    }
}

/// Explicit path wins, then `NOVADESK_CONFIG`, then `settings.json` in the data dir.
pub fn settings_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| env_value(ENV_CONFIG).map(PathBuf::from))
        .unwrap_or_else(|| data_dir().join("settings.json"))
}

/// Missing file means defaults; an unreadable or malformed one is an error.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let mut settings = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str::<Settings>(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        log::debug!("No settings at {}, using defaults", path.display());
        Settings::default()
    };
    apply_env_defaults(&mut settings);
    Ok(settings)
}

pub fn apply_env_defaults(settings: &mut Settings) {
    if let Some(dir) = env_value(ENV_MODEL_DIR) {
        settings.model.dir = PathBuf::from(dir);
    }
    if let Some(flag) = env_value(ENV_LEXICAL) {
        settings.model.lexical = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes" | "on");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = load_settings(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings.launcher.confidence_threshold, 0.35);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_settings(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn explicit_settings_path_wins() {
        let path = PathBuf::from("/tmp/custom.json");
        assert_eq!(settings_path(Some(&path)), path);
    }
}
