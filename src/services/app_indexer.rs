//! Installed-application index with tiered fuzzy lookup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use walkdir::WalkDir;

use crate::models::LauncherSettings;
use crate::utils::fuzzy::{best_match, normalized_levenshtein};

/// Minimum normalized Levenshtein similarity for the fuzzy tier.
pub const FUZZY_CUTOFF: f64 = 0.6;

const MAX_SCAN_DEPTH: usize = 6;

pub type AppMap = HashMap<String, String>;

/// Source of (key, launch target) pairs.
pub trait AppDiscovery: Send + Sync {
    fn discover(&self) -> AppMap;
}

/// Scans OS shortcut folders and seeds well-known system commands.
#[derive(Debug, Clone)]
pub struct ShortcutScanner {
    roots: Vec<PathBuf>,
    extensions: Vec<&'static str>,
    commands: Vec<(String, String)>,
}

impl ShortcutScanner {
    /// Platform shortcut folders plus `extra_roots`.
    pub fn system(extra_roots: &[PathBuf], extra_commands: &[(String, String)]) -> Self {
        let mut roots = default_roots();
        roots.extend(extra_roots.iter().cloned());

        let mut commands: Vec<(String, String)> = well_known_commands()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        commands.extend(extra_commands.iter().cloned());

        Self {
            roots,
            extensions: default_extensions(),
            commands,
        }
    }

    pub fn from_settings(settings: &LauncherSettings) -> Self {
        let extra_commands: Vec<(String, String)> = settings
            .extra_commands
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self::system(&settings.extra_shortcut_dirs, &extra_commands)
    }

    pub fn new(roots: Vec<PathBuf>, extensions: Vec<&'static str>, commands: Vec<(String, String)>) -> Self {
        Self {
            roots,
            extensions,
            commands,
        }
    }

    fn has_shortcut_extension(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext {
            Some(ext) => self.extensions.iter().any(|allowed| *allowed == ext),
            None => false,
        }
    }
}

impl AppDiscovery for ShortcutScanner {
    fn discover(&self) -> AppMap {
        let mut apps = AppMap::new();

        for (name, command) in &self.commands {
            apps.insert(name.to_lowercase(), command.clone());
        }

        for root in &self.roots {
            if !root.is_dir() {
                log::debug!("Skipping missing shortcut folder {}", root.display());
                continue;
            }

            let before = apps.len();
            for entry in WalkDir::new(root)
                .max_depth(MAX_SCAN_DEPTH)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !entry.file_type().is_file() || !self.has_shortcut_extension(path) {
                    continue;
                }
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                // last write wins on duplicate names
                apps.insert(stem.to_lowercase(), path.to_string_lossy().to_string());
            }
            log::debug!("Indexed {} new apps under {}", apps.len().saturating_sub(before), root.display());
        }

        apps
    }
}

fn well_known_commands() -> &'static [(&'static str, &'static str)] {
    &[
        ("calc", "calc.exe"),
        ("calculator", "calc.exe"),
        ("notepad", "notepad.exe"),
        ("cmd", "cmd.exe"),
        ("powershell", "powershell.exe"),
        ("explorer", "explorer.exe"),
        ("control", "control.exe"),
        ("taskmgr", "taskmgr.exe"),
        ("mspaint", "mspaint.exe"),
    ]
}

fn default_extensions() -> Vec<&'static str> {
    if cfg!(target_os = "windows") {
        vec!["lnk", "url", "appref-ms", "exe"]
    } else {
        vec!["desktop"]
    }
}

fn default_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    let env_dir = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty()).map(PathBuf::from);

    if cfg!(target_os = "windows") {
        let start_menu = ["Microsoft", "Windows", "Start Menu", "Programs"];
        if let Some(program_data) = env_dir("ProgramData") {
            roots.push(start_menu.iter().fold(program_data, |p, c| p.join(c)));
        }
        if let Some(app_data) = env_dir("APPDATA") {
            roots.push(start_menu.iter().fold(app_data, |p, c| p.join(c)));
        }
        if let Some(profile) = env_dir("USERPROFILE") {
            roots.push(profile.join("Desktop"));
        }
    } else {
        roots.push(PathBuf::from("/usr/share/applications"));
        roots.push(PathBuf::from("/usr/local/share/applications"));
        roots.push(PathBuf::from("/var/lib/flatpak/exports/share/applications"));
        match env_dir("XDG_DATA_HOME") {
            Some(data) => roots.push(data.join("applications")),
            None => {
                if let Some(home) = env_dir("HOME") {
                    roots.push(home.join(".local").join("share").join("applications"));
                }
            }
        }
    }

    roots
}

/// Name → launch target index.
///
/// The map is replaced wholesale on [`AppIndex::rebuild`]; readers clone the
/// `Arc` and never observe a half-built index.
pub struct AppIndex {
    discovery: Box<dyn AppDiscovery>,
    apps: RwLock<Arc<AppMap>>,
}

impl AppIndex {
    pub fn build(discovery: Box<dyn AppDiscovery>) -> Self {
        let apps = discovery.discover();
        log::info!("Application index built with {} entries", apps.len());
        Self {
            discovery,
            apps: RwLock::new(Arc::new(apps)),
        }
    }

    /// Rescans and swaps in the new map. Returns the new entry count.
    pub fn rebuild(&self) -> usize {
        let fresh = Arc::new(self.discovery.discover());
        let count = fresh.len();
        match self.apps.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
        log::info!("Application index rebuilt with {} entries", count);
        count
    }

    fn snapshot(&self) -> Arc<AppMap> {
        match self.apps.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Exact key, then shortest key containing the query, then the closest
    /// key by edit distance.
    pub fn resolve(&self, query: &str) -> Option<String> {
        self.resolve_entry(query).map(|(_, path)| path)
    }

    /// Like [`AppIndex::resolve`] but also returns the matched key.
    pub fn resolve_entry(&self, query: &str) -> Option<(String, String)> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        let apps = self.snapshot();

        if let Some(path) = apps.get(&query) {
            return Some((query, path.clone()));
        }

        let shortest = apps
            .keys()
            .filter(|key| key.contains(&query))
            .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        if let Some(key) = shortest {
            return Some((key.clone(), apps[key].clone()));
        }

        let mut keys: Vec<&str> = apps.keys().map(String::as_str).collect();
        keys.sort_unstable();
        best_match(&query, keys, FUZZY_CUTOFF, normalized_levenshtein)
            .map(|key| (key.to_string(), apps[key].clone()))
    }

    /// Sorted copy of the index.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .snapshot()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

/// Fixed in-memory index source.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    apps: AppMap,
}

impl StaticDiscovery {
    pub fn new<I, K, V>(apps: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            apps: apps.into_iter().map(|(k, v)| (k.into().to_lowercase(), v.into())).collect(),
        }
    }
}

impl AppDiscovery for StaticDiscovery {
    fn discover(&self) -> AppMap {
        self.apps.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn index(apps: &[(&str, &str)]) -> AppIndex {
        AppIndex::build(Box::new(StaticDiscovery::new(apps.iter().copied())))
    }

    #[test]
    fn exact_key_beats_substring() {
        let idx = index(&[("chrome beta", "beta.lnk"), ("chrome", "chrome.lnk")]);
        assert_eq!(idx.resolve("chrome").as_deref(), Some("chrome.lnk"));
    }

    #[test]
    fn substring_prefers_shortest_key() {
        let idx = index(&[("wordpad", "wordpad.lnk"), ("word", "word.lnk"), ("microsoft word 2016", "w16.lnk")]);
        assert_eq!(idx.resolve("wor").as_deref(), Some("word.lnk"));
        assert_eq!(idx.resolve("word").as_deref(), Some("word.lnk"));
    }

    #[test]
    fn substring_ties_break_alphabetically() {
        let idx = index(&[("vlc b", "b.lnk"), ("vlc a", "a.lnk")]);
        assert_eq!(idx.resolve("vlc").as_deref(), Some("a.lnk"));
    }

    #[test]
    fn fuzzy_tier_tolerates_typos() {
        let idx = index(&[("spotify", "spotify.lnk"), ("steam", "steam.lnk")]);
        assert_eq!(idx.resolve("spotfy").as_deref(), Some("spotify.lnk"));
        assert_eq!(idx.resolve("qqqqqq"), None);
    }

    #[test]
    fn query_is_normalized() {
        let idx = index(&[("Visual Studio Code", "code.lnk")]);
        assert_eq!(idx.resolve("  VISUAL studio code ").as_deref(), Some("code.lnk"));
        assert_eq!(idx.resolve("   "), None);
    }

    #[test]
    fn resolve_entry_reports_matched_key() {
        let idx = index(&[("spotify", "spotify.lnk")]);
        assert_eq!(
            idx.resolve_entry("spot"),
            Some(("spotify".to_string(), "spotify.lnk".to_string()))
        );
    }

    struct CountingDiscovery {
        calls: Arc<AtomicUsize>,
    }

    impl AppDiscovery for CountingDiscovery {
        fn discover(&self) -> AppMap {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let mut apps = AppMap::new();
            apps.insert(format!("app{}", n), format!("app{}.lnk", n));
            apps
        }
    }

    #[test]
    fn rebuild_swaps_the_whole_map() {
        let calls = Arc::new(AtomicUsize::new(0));
        let idx = AppIndex::build(Box::new(CountingDiscovery { calls: calls.clone() }));
        let before = idx.snapshot();
        assert!(idx.resolve("app0").is_some());

        assert_eq!(idx.rebuild(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(idx.resolve("app1").as_deref(), Some("app1.lnk"));
        assert!(!idx.entries().iter().any(|(k, _)| k == "app0"));
        // a reader holding the old snapshot still sees the old map intact
        assert_eq!(before.get("app0").map(String::as_str), Some("app0.lnk"));
    }

    #[test]
    fn scanner_indexes_shortcuts_and_skips_missing_roots() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("Games");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("Spotify.lnk"), b"").unwrap();
        std::fs::write(nested.join("Steam.LNK"), b"").unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"").unwrap();

        let scanner = ShortcutScanner::new(
            vec![dir.path().join("does-not-exist"), dir.path().to_path_buf()],
            vec!["lnk"],
            vec![("calc".to_string(), "calc.exe".to_string())],
        );
        let apps = scanner.discover();

        assert_eq!(apps.get("calc").map(String::as_str), Some("calc.exe"));
        assert!(apps.get("spotify").unwrap().ends_with("Spotify.lnk"));
        assert!(apps.get("steam").unwrap().ends_with("Steam.LNK"));
        assert!(!apps.contains_key("readme"));
    }

    #[test]
    fn scanned_shortcuts_override_seeded_commands() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("Calc.lnk"), b"").unwrap();
        let scanner = ShortcutScanner::new(
            vec![dir.path().to_path_buf()],
            vec!["lnk"],
            vec![("calc".to_string(), "calc.exe".to_string())],
        );
        assert!(scanner.discover()["calc"].ends_with("Calc.lnk"));
    }
}
