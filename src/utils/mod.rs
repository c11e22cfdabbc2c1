pub mod config;
pub mod fuzzy;
#[cfg(target_os = "windows")]
pub mod windows;
