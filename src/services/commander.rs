use std::collections::HashSet;
use std::sync::Arc;

use super::app_indexer::AppIndex;
use super::launcher::{Launcher, MediaKey};
use crate::models::{ActionKind, Candidate, IntentRecord, KnowledgeBase};

/// Routes a classified intent to its action.
///
/// Every path returns a status message: OS failures are logged and folded
/// into the text, never propagated.
pub struct Commander {
    knowledge_base: Arc<KnowledgeBase>,
    apps: Arc<AppIndex>,
    launcher: Arc<dyn Launcher>,
}

impl Commander {
    pub fn new(knowledge_base: Arc<KnowledgeBase>, apps: Arc<AppIndex>, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            knowledge_base,
            apps,
            launcher,
        }
    }

    pub fn apps(&self) -> &AppIndex {
        &self.apps
    }

    /// Ranked launch options for the disambiguation menu. Never launches.
    pub fn resolve_candidates(&self, intent_id: &str, entity: &str) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        if let Some(intent) = self.knowledge_base.get(intent_id) {
            if intent.action == ActionKind::OpenPriorityApp {
                let mut seen = HashSet::new();
                for target in &intent.targets {
                    if let Some((key, path)) = self.apps.resolve_entry(target) {
                        if seen.insert(path.clone()) {
                            candidates.push(Candidate::app(display_name(&key), path));
                        }
                    }
                }
            }
        }

        if candidates.is_empty() && !entity.trim().is_empty() {
            if let Some((key, path)) = self.apps.resolve_entry(entity) {
                candidates.push(Candidate::app(display_name(&key), path));
            }
        }

        log::debug!("{} candidates for {} / {:?}", candidates.len(), intent_id, entity);
        candidates
    }

    pub fn execute(&self, intent_id: &str, entity: &str) -> String {
        log::info!("Commander received: {} -> {:?}", intent_id, entity);

        let Some(intent) = self.knowledge_base.get(intent_id) else {
            log::warn!("Unknown intent {}", intent_id);
            return format!("Unknown intent: {}", intent_id);
        };

        match intent.action {
            ActionKind::OpenPriorityApp => self.open_priority_app(intent),
            ActionKind::SystemUri => self.open_system_uri(intent),
            ActionKind::KeyPress => self.press_key(intent),
            ActionKind::WinApi => self.call_system(intent),
            ActionKind::GenericSearch => self.open_generic(entity),
            ActionKind::FileSearch => self.search_file(entity),
        }
    }

    /// Launch a candidate the user picked from the menu.
    pub fn open_candidate(&self, candidate: &Candidate) -> String {
        match self.launcher.launch(&candidate.path) {
            Ok(()) => format!("Launching {}...", candidate.name),
            Err(e) => {
                log::warn!("Failed to launch {}: {}", candidate.path, e);
                format!("Could not launch {}: {}", candidate.name, e)
            }
        }
    }

    fn open_priority_app(&self, intent: &IntentRecord) -> String {
        for target in &intent.targets {
            let Some((key, path)) = self.apps.resolve_entry(target) else {
                log::debug!("{} not installed, trying next", target);
                continue;
            };
            match self.launcher.launch(&path) {
                Ok(()) => return format!("Launching {}...", display_name(&key)),
                Err(e) => log::warn!("Failed to launch {} ({}): {}", target, path, e),
            }
        }

        match intent.targets.first() {
            Some(primary) => format!("Could not find application: {}", primary),
            None => format!("No applications configured for {}", intent.id),
        }
    }

    fn open_system_uri(&self, intent: &IntentRecord) -> String {
        for uri in &intent.targets {
            match self.launcher.open_uri(uri) {
                Ok(()) => return format!("Opened {}", uri),
                Err(e) => log::warn!("Failed to open {}: {}", uri, e),
            }
        }

        match intent.targets.first() {
            Some(uri) => format!("Failed to open {}", uri),
            None => format!("No system URI configured for {}", intent.id),
        }
    }

    fn press_key(&self, intent: &IntentRecord) -> String {
        let Some(id) = intent.targets.first() else {
            return format!("No key configured for {}", intent.id);
        };
        let Some(key) = MediaKey::from_identifier(id) else {
            return format!("Unrecognized key: {}", id);
        };

        match self.launcher.send_media_key(key) {
            Ok(()) => format!("Executed {}", key.identifier()),
            Err(e) => {
                log::warn!("Media key {} failed: {}", key.identifier(), e);
                format!("Failed to execute {}: {}", key.identifier(), e)
            }
        }
    }

    fn call_system(&self, intent: &IntentRecord) -> String {
        let call = intent.targets.first().map(|s| s.trim().to_lowercase()).unwrap_or_default();

        match call.as_str() {
            "lock_workstation" => match self.launcher.lock_workstation() {
                Ok(()) => "PC Locked.".to_string(),
                Err(e) => {
                    log::warn!("Lock failed: {}", e);
                    format!("Failed to lock the workstation: {}", e)
                }
            },
            "shutdown" => "Shutdown command recognized (simulated for safety).".to_string(),
            other => format!("Unrecognized system call: {}", other),
        }
    }

    fn open_generic(&self, entity: &str) -> String {
        let entity = entity.trim();
        if entity.is_empty() {
            return "Nothing to open.".to_string();
        }

        if let Some((key, path)) = self.apps.resolve_entry(entity) {
            match self.launcher.launch(&path) {
                Ok(()) => return format!("Launching {}...", display_name(&key)),
                Err(e) => log::warn!("Failed to launch {} ({}): {}", entity, path, e),
            }
        }

        // Unknown text may still be something the shell understands.
        match self.launcher.launch(entity) {
            Ok(()) => format!("Launching {}...", entity),
            Err(e) => {
                log::debug!("Raw open of {:?} failed: {}", entity, e);
                format!("Could not find application: {}", entity)
            }
        }
    }

    fn search_file(&self, entity: &str) -> String {
        format!("File search for '{}' is not supported yet.", entity.trim())
    }
}

/// "visual studio code" -> "Visual Studio Code"
fn display_name(key: &str) -> String {
    key.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_title_cases_keys() {
        assert_eq!(display_name("visual studio code"), "Visual Studio Code");
        assert_eq!(display_name("spotify"), "Spotify");
        assert_eq!(display_name(""), "");
    }
}
