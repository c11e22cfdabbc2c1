use novadesk::models::Settings;
use novadesk::services::{AppIndex, ShortcutScanner};

pub fn build_index(settings: &Settings) -> AppIndex {
    AppIndex::build(Box::new(ShortcutScanner::from_settings(&settings.launcher)))
}

/// Print the application index, optionally narrowed to keys containing `filter`.
pub fn list_apps(index: &AppIndex, filter: Option<&str>) {
    let filter = filter.map(|f| f.trim().to_lowercase());
    let entries: Vec<(String, String)> = index
        .entries()
        .into_iter()
        .filter(|(key, _)| filter.as_deref().map_or(true, |f| key.contains(f)))
        .collect();

    for (key, path) in &entries {
        println!("{:<40} {}", key, path);
    }
    println!("{} of {} applications", entries.len(), index.len());

    if let Some(query) = filter.as_deref() {
        match index.resolve(query) {
            Some(path) => println!("Best match for '{}': {}", query, path),
            None => println!("No match for '{}'", query),
        }
    }
}
