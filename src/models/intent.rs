use serde::{Deserialize, Serialize};

/// One entry of the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub id: String,
    pub triggers: Vec<String>,
    pub action: ActionKind,
    #[serde(default)]
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    OpenPriorityApp,
    SystemUri,
    KeyPress,
    WinApi,
    GenericSearch,
    FileSearch,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::OpenPriorityApp => "open_priority_app",
            ActionKind::SystemUri => "system_uri",
            ActionKind::KeyPress => "key_press",
            ActionKind::WinApi => "win_api",
            ActionKind::GenericSearch => "generic_search",
            ActionKind::FileSearch => "file_search",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent_id: String,
    pub confidence: f32,
    pub entity: String,
    /// The utterance after spelling correction.
    pub corrected: String,
}
