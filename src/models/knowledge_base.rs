use std::collections::HashMap;
use std::path::Path;

use super::{ActionKind, IntentRecord};
use crate::error::KnowledgeBaseError;

/// Ordered, read-only intent registry.
///
/// Iteration order is part of the contract: the classifier breaks score ties
/// in favour of whichever prototype it saw first, so intents listed earlier
/// win over later ones with an identical trigger.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    intents: Vec<IntentRecord>,
    by_id: HashMap<String, usize>,
}

impl KnowledgeBase {
    pub fn new(intents: Vec<IntentRecord>) -> Result<Self, KnowledgeBaseError> {
        if intents.is_empty() {
            return Err(KnowledgeBaseError::Empty);
        }

        let mut by_id = HashMap::with_capacity(intents.len());
        for (idx, intent) in intents.iter().enumerate() {
            if intent.triggers.iter().all(|t| t.trim().is_empty()) {
                return Err(KnowledgeBaseError::NoTriggers(intent.id.clone()));
            }
            if by_id.insert(intent.id.clone(), idx).is_some() {
                return Err(KnowledgeBaseError::DuplicateIntent(intent.id.clone()));
            }
        }

        Ok(Self { intents, by_id })
    }

    /// Reads a JSON array of intent records, replacing the built-in registry.
    pub fn load_file(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let content = std::fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let intents: Vec<IntentRecord> =
            serde_json::from_str(&content).map_err(|source| KnowledgeBaseError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded {} intents from {}", intents.len(), path.display());
        Self::new(intents)
    }

    pub fn get(&self, intent_id: &str) -> Option<&IntentRecord> {
        self.by_id.get(intent_id).map(|&idx| &self.intents[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntentRecord> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        let intents = get_default_intents();
        let by_id = intents
            .iter()
            .enumerate()
            .map(|(idx, intent)| (intent.id.clone(), idx))
            .collect();
        Self { intents, by_id }
    }
}

fn intent(id: &str, triggers: &[&str], action: ActionKind, targets: &[&str]) -> IntentRecord {
    IntentRecord {
        id: id.to_string(),
        triggers: triggers.iter().map(|t| t.to_string()).collect(),
        action,
        targets: targets.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn get_default_intents() -> Vec<IntentRecord> {
    vec![
        // Applications
        intent(
            "APP_BROWSER",
            &["open browser", "start internet", "launch chrome", "go online", "open web"],
            ActionKind::OpenPriorityApp,
            &["chrome", "msedge", "firefox", "brave", "opera"],
        ),
        intent(
            "APP_MUSIC",
            &["open music", "play tunes", "start spotify", "launch apple music", "play music"],
            ActionKind::OpenPriorityApp,
            &["spotify", "music", "itunes", "aimp", "vlc"],
        ),
        intent(
            "APP_CODE",
            &["open code", "start coding", "launch vscode", "open editor", "start ide"],
            ActionKind::OpenPriorityApp,
            &["code", "visual studio", "sublime", "notepad++", "pycharm", "cursor"],
        ),
        intent(
            "APP_TERMINAL",
            &["open terminal", "start cmd", "open powershell", "command prompt", "run cli"],
            ActionKind::OpenPriorityApp,
            &["alacritty", "windowsterminal", "powershell", "cmd", "git bash"],
        ),
        intent(
            "APP_SETTINGS",
            &["open settings", "change preferences", "system config", "control panel"],
            ActionKind::SystemUri,
            &["ms-settings:", "control"],
        ),
        intent(
            "APP_FILES",
            &["open files", "file explorer", "show documents", "my computer", "explore"],
            ActionKind::SystemUri,
            &["explorer"],
        ),
        intent(
            "APP_CALC",
            &["open calculator", "calc", "do math"],
            ActionKind::OpenPriorityApp,
            &["calculator", "calc"],
        ),
        // System control
        intent(
            "SYS_VOLUME_UP",
            &["volume up", "louder", "increase sound", "turn up"],
            ActionKind::KeyPress,
            &["volume_up"],
        ),
        intent(
            "SYS_VOLUME_DOWN",
            &["volume down", "quieter", "lower sound", "turn down"],
            ActionKind::KeyPress,
            &["volume_down"],
        ),
        intent(
            "SYS_MUTE",
            &["mute", "silence", "shut up", "no sound"],
            ActionKind::KeyPress,
            &["volume_mute"],
        ),
        intent(
            "SYS_LOCK",
            &["lock pc", "lock screen", "secure computer", "away"],
            ActionKind::WinApi,
            &["lock_workstation"],
        ),
        intent(
            "SYS_SHUTDOWN",
            &["shutdown", "turn off computer", "power off"],
            ActionKind::WinApi,
            &["shutdown"],
        ),
        // Generic fallbacks
        intent(
            "GENERIC_OPEN",
            &["open", "launch", "start", "run"],
            ActionKind::GenericSearch,
            &[],
        ),
        intent(
            "GENERIC_SEARCH",
            &["find", "search for", "where is", "locate"],
            ActionKind::FileSearch,
            &[],
        ),
    ]
}
