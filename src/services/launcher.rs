//! OS launch boundary.
//!
//! The commander only ever talks to [`Launcher`]; [`SystemLauncher`] is the
//! real desktop implementation and tests substitute a recording fake.

use crate::error::LaunchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKey {
    VolumeUp,
    VolumeDown,
    VolumeMute,
}

impl MediaKey {
    pub fn from_identifier(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "volume_up" => Some(MediaKey::VolumeUp),
            "volume_down" => Some(MediaKey::VolumeDown),
            "volume_mute" => Some(MediaKey::VolumeMute),
            _ => None,
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            MediaKey::VolumeUp => "volume_up",
            MediaKey::VolumeDown => "volume_down",
            MediaKey::VolumeMute => "volume_mute",
        }
    }
}

pub trait Launcher: Send + Sync {
    /// Start a program from a shortcut path, executable path or command token.
    fn launch(&self, path_or_command: &str) -> Result<(), LaunchError>;

    /// Hand a URI or shell verb to the OS shell-open facility.
    fn open_uri(&self, uri: &str) -> Result<(), LaunchError>;

    fn send_media_key(&self, key: MediaKey) -> Result<(), LaunchError>;

    fn lock_workstation(&self) -> Result<(), LaunchError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, path_or_command: &str) -> Result<(), LaunchError> {
        log::info!("Launching {}", path_or_command);

        #[cfg(target_os = "linux")]
        if let Some(app_id) = path_or_command.strip_suffix(".desktop") {
            let app_id = std::path::Path::new(app_id)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(app_id);
            return std::process::Command::new("gtk-launch")
                .arg(app_id)
                .spawn()
                .map(|_| ())
                .map_err(|source| LaunchError::Os {
                    target: path_or_command.to_string(),
                    source,
                });
        }

        open::that_detached(path_or_command).map_err(|source| LaunchError::Os {
            target: path_or_command.to_string(),
            source,
        })
    }

    fn open_uri(&self, uri: &str) -> Result<(), LaunchError> {
        log::info!("Opening {}", uri);
        open::that_detached(uri).map_err(|source| LaunchError::Os {
            target: uri.to_string(),
            source,
        })
    }

    fn send_media_key(&self, key: MediaKey) -> Result<(), LaunchError> {
        #[cfg(target_os = "windows")]
        {
            crate::utils::windows::send_media_key(key);
            Ok(())
        }
        #[cfg(not(target_os = "windows"))]
        {
            log::warn!("Media key {} requested on an unsupported platform", key.identifier());
            Err(LaunchError::Unsupported("media keys"))
        }
    }

    fn lock_workstation(&self) -> Result<(), LaunchError> {
        #[cfg(target_os = "windows")]
        {
            if crate::utils::windows::lock_workstation() {
                Ok(())
            } else {
                Err(LaunchError::Os {
                    target: "LockWorkStation".to_string(),
                    source: std::io::Error::last_os_error(),
                })
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            Err(LaunchError::Unsupported("workstation lock"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_key_identifiers_round_trip() {
        for key in [MediaKey::VolumeUp, MediaKey::VolumeDown, MediaKey::VolumeMute] {
            assert_eq!(MediaKey::from_identifier(key.identifier()), Some(key));
        }
        assert_eq!(MediaKey::from_identifier(" VOLUME_UP "), Some(MediaKey::VolumeUp));
        assert_eq!(MediaKey::from_identifier("play_pause"), None);
    }
}
