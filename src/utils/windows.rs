use winapi::um::winuser::{
    keybd_event, LockWorkStation, KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, VK_VOLUME_DOWN,
    VK_VOLUME_MUTE, VK_VOLUME_UP,
};

use crate::services::launcher::MediaKey;

/// Synthesize a press + release of a media key.
pub fn send_media_key(key: MediaKey) {
    let vk = match key {
        MediaKey::VolumeUp => VK_VOLUME_UP,
        MediaKey::VolumeDown => VK_VOLUME_DOWN,
        MediaKey::VolumeMute => VK_VOLUME_MUTE,
    } as u8;

    unsafe {
        keybd_event(vk, 0, KEYEVENTF_EXTENDEDKEY, 0);
        keybd_event(vk, 0, KEYEVENTF_EXTENDEDKEY | KEYEVENTF_KEYUP, 0);
    }
}

/// Returns false if the call was rejected (e.g. no interactive desktop).
pub fn lock_workstation() -> bool {
    unsafe { LockWorkStation() != 0 }
}
