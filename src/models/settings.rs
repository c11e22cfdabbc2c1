use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub version: String,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub launcher: LauncherSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            model: ModelSettings::default(),
            launcher: LauncherSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_model_dir")]
    pub dir: PathBuf,
    /// Skip the ONNX model and embed with the knowledge-base vocabulary.
    #[serde(default)]
    pub lexical: bool,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_model_repo")]
    pub repo: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
            lexical: false,
            max_tokens: default_max_tokens(),
            repo: default_model_repo(),
        }
    }
}

fn default_model_dir() -> PathBuf {
    crate::utils::config::data_dir().join("model_cache")
}

fn default_max_tokens() -> usize {
    256
}

fn default_model_repo() -> String {
    "Xenova/all-MiniLM-L6-v2".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherSettings {
    /// Minimum confidence before the host executes an intent directly.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// Replaces the built-in intent registry when set.
    #[serde(default)]
    pub knowledge_base: Option<PathBuf>,
    #[serde(default)]
    pub extra_shortcut_dirs: Vec<PathBuf>,
    /// Additional well-known command names mapped to executable tokens.
    #[serde(default)]
    pub extra_commands: BTreeMap<String, String>,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            knowledge_base: None,
            extra_shortcut_dirs: vec![],
            extra_commands: BTreeMap::new(),
        }
    }
}

fn default_confidence_threshold() -> f32 {
    0.35
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{"version": "1.0.0", "launcher": {"confidence_threshold": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(settings.launcher.confidence_threshold, 0.5);
        assert!(settings.launcher.knowledge_base.is_none());
        assert!(!settings.model.lexical);
        assert_eq!(settings.model.max_tokens, 256);
    }

    #[test]
    fn extra_commands_deserialize_as_map() {
        let settings: Settings = serde_json::from_str(
            r#"{"version": "1.0.0", "launcher": {"extra_commands": {"paint": "mspaint.exe"}}}"#,
        )
        .unwrap();
        assert_eq!(
            settings.launcher.extra_commands.get("paint").map(String::as_str),
            Some("mspaint.exe")
        );
    }
}
