//! Kernel input devices as a source of volume-key presses.
//!
//! On Linux every `/dev/input/event*` device that advertises a volume key and
//! that the user may read is watched on its own thread. Reading those nodes
//! requires the user to be granted access (usually membership of the `input`
//! group), which plays the role of the accessibility permission. Devices are
//! not grabbed, so the system still changes the volume as usual.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use super::VolumeKey;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct KeyDevice {
    pub path: PathBuf,
    pub name: String,
}

/// Readable input devices that report volume keys.
pub fn probe() -> Vec<KeyDevice> {
    platform::probe()
}

/// Start one reader thread per device; presses arrive on `tx`. Readers end
/// when their device goes away or the receiving side hangs up.
pub fn spawn_readers(tx: Sender<VolumeKey>) -> Result<Vec<JoinHandle<()>>> {
    platform::spawn_readers(tx)
}

pub fn permission_hint() -> &'static str {
    if cfg!(target_os = "linux") {
        "grant access to /dev/input (e.g. `sudo usermod -aG input $USER`, then log in again)"
    } else {
        "volume-key listening is only supported on Linux"
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use super::{KeyDevice, VolumeKey};
    use crate::error::{HornError, Result};
    use evdev::{Device, InputEventKind, Key};
    use log::{debug, info, warn};
    use std::path::{Path, PathBuf};
    use std::sync::mpsc::Sender;
    use std::thread::{self, JoinHandle};

    fn has_volume_keys(device: &Device) -> bool {
        device.supported_keys().is_some_and(|keys| {
            keys.contains(Key::KEY_VOLUMEUP) || keys.contains(Key::KEY_VOLUMEDOWN)
        })
    }

    fn volume_devices() -> Vec<(PathBuf, Device)> {
        evdev::enumerate()
            .filter(|(_, device)| has_volume_keys(device))
            .collect()
    }

    pub fn probe() -> Vec<KeyDevice> {
        volume_devices()
            .into_iter()
            .map(|(path, device)| KeyDevice {
                path,
                name: device.name().unwrap_or("unnamed").to_string(),
            })
            .collect()
    }

    /// Only presses count; releases (0) and autorepeat (2) are dropped.
    pub(super) fn map_key(key: Key, value: i32) -> Option<VolumeKey> {
        if value != 1 {
            return None;
        }
        match key {
            Key::KEY_VOLUMEUP => Some(VolumeKey::Up),
            Key::KEY_VOLUMEDOWN => Some(VolumeKey::Down),
            _ => None,
        }
    }

    pub fn spawn_readers(tx: Sender<VolumeKey>) -> Result<Vec<JoinHandle<()>>> {
        let devices = volume_devices();
        if devices.is_empty() {
            return Err(HornError::KeySource(format!(
                "no readable input device reports volume keys; {}",
                super::permission_hint()
            )));
        }

        let mut handles = Vec::with_capacity(devices.len());
        for (path, mut device) in devices {
            info!(
                "Watching {} ({})",
                path.display(),
                device.name().unwrap_or("unnamed")
            );
            let tx = tx.clone();
            let handle = thread::Builder::new()
                .name(format!("keys:{}", path.display()))
                .spawn(move || read_device(&path, &mut device, &tx))
                .map_err(|e| HornError::KeySource(e.to_string()))?;
            handles.push(handle);
        }

        Ok(handles)
    }

    fn read_device(path: &Path, device: &mut Device, tx: &Sender<VolumeKey>) {
        loop {
            let events = match device.fetch_events() {
                Ok(events) => events,
                Err(e) => {
                    warn!("Stopped reading {}: {e}", path.display());
                    return;
                }
            };

            for event in events {
                let InputEventKind::Key(key) = event.kind() else {
                    continue;
                };
                if let Some(volume_key) = map_key(key, event.value()) {
                    debug!("{volume_key:?} from {}", path.display());
                    if tx.send(volume_key).is_err() {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    use super::{KeyDevice, VolumeKey};
    use crate::error::{HornError, Result};
    use std::sync::mpsc::Sender;
    use std::thread::JoinHandle;

    pub fn probe() -> Vec<KeyDevice> {
        Vec::new()
    }

    pub fn spawn_readers(_tx: Sender<VolumeKey>) -> Result<Vec<JoinHandle<()>>> {
        Err(HornError::KeySource(super::permission_hint().to_string()))
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::platform::map_key;
    use super::*;
    use evdev::Key;

    #[test]
    fn test_map_key_presses_only() {
        assert_eq!(map_key(Key::KEY_VOLUMEUP, 1), Some(VolumeKey::Up));
        assert_eq!(map_key(Key::KEY_VOLUMEDOWN, 1), Some(VolumeKey::Down));
        assert_eq!(map_key(Key::KEY_VOLUMEUP, 0), None);
        assert_eq!(map_key(Key::KEY_VOLUMEUP, 2), None);
        assert_eq!(map_key(Key::KEY_A, 1), None);
    }

    #[test]
    fn test_permission_hint_mentions_input_group() {
        assert!(permission_hint().contains("input"));
    }
}
