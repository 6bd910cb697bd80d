//! Background volume-key listener.
//!
//! The listener keeps its own copy of the button records, read once when it
//! is activated. A recognized volume-key press is mapped to a slot by the
//! configured [`TriggerMode`] and played through a focus-arbitrated
//! [`Player`]. When focus is denied the press is dropped.

pub mod keys;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::constants::LISTENER_WAIT_MS;
use crate::error::Result;
use crate::focus::AudioFocus;
use crate::playback::{AudioOutput, PlaybackEvent, Player};
use crate::slots::ButtonConfig;
use crate::store::ButtonStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeKey {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerMode {
    /// Volume up plays the first button; volume down is ignored.
    #[default]
    FirstSlot,
    /// Volume up plays the first button, volume down the second.
    Direction,
}

impl TriggerMode {
    pub fn slot_for(self, key: VolumeKey) -> Option<usize> {
        match (self, key) {
            (_, VolumeKey::Up) => Some(0),
            (TriggerMode::Direction, VolumeKey::Down) => Some(1),
            (TriggerMode::FirstSlot, VolumeKey::Down) => None,
        }
    }
}

impl FromStr for TriggerMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "first-slot" => Ok(TriggerMode::FirstSlot),
            "direction" => Ok(TriggerMode::Direction),
            _ => Err(format!(
                "Unknown trigger mode '{s}', expected 'first-slot' or 'direction'"
            )),
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerMode::FirstSlot => write!(f, "first-slot"),
            TriggerMode::Direction => write!(f, "direction"),
        }
    }
}

pub struct Listener<O: AudioOutput, F: AudioFocus> {
    slots: Vec<ButtonConfig>,
    player: Player<O, F>,
    trigger: TriggerMode,
}

impl<O: AudioOutput, F: AudioFocus> Listener<O, F> {
    /// Read the store and get ready to react to keys. An empty store is not
    /// seeded here; presses are ignored until the board has been set up.
    pub fn activate<S: ButtonStore>(
        store: &S,
        player: Player<O, F>,
        trigger: TriggerMode,
    ) -> Result<Self> {
        let slots = store.get_all()?;
        if slots.is_empty() {
            warn!("No buttons configured yet; run `horn` or `horn init` first");
        } else {
            info!(
                "Listener active with {} buttons, trigger {trigger}",
                slots.len()
            );
        }

        Ok(Self {
            slots,
            player,
            trigger,
        })
    }

    pub fn slots(&self) -> &[ButtonConfig] {
        &self.slots
    }

    pub fn trigger(&self) -> TriggerMode {
        self.trigger
    }

    /// Re-read the records from the store.
    pub fn reload<S: ButtonStore>(&mut self, store: &S) -> Result<()> {
        self.slots = store.get_all()?;
        info!("Reloaded {} buttons", self.slots.len());
        Ok(())
    }

    /// Handle one key press. Returns `None` when the key maps to no
    /// configured button.
    pub fn on_key(&mut self, key: VolumeKey) -> Result<Option<PlaybackEvent>> {
        let Some(slot) = self.trigger.slot_for(key) else {
            debug!("Ignoring {key:?}");
            return Ok(None);
        };

        let Some(config) = self.slots.iter().find(|c| c.id == slot) else {
            debug!("No button in slot {slot} for {key:?}");
            return Ok(None);
        };

        let path = config.sound_path.clone();
        self.player.play(&path).map(Some)
    }

    pub fn poll(&mut self) -> Option<PlaybackEvent> {
        self.player.poll()
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_active()
    }

    /// Play presses arriving on `keys` until `running` is cleared or every
    /// sender has gone away, then shut down.
    pub fn run(&mut self, keys: &Receiver<VolumeKey>, running: &AtomicBool) {
        let wait = Duration::from_millis(LISTENER_WAIT_MS);

        while running.load(Ordering::Relaxed) {
            match keys.recv_timeout(wait) {
                Ok(key) => match self.on_key(key) {
                    Ok(Some(PlaybackEvent::FocusDenied(path))) => {
                        debug!("Audio busy, skipped {}", path.display())
                    }
                    Ok(Some(event)) => debug!("{event:?}"),
                    Ok(None) => {}
                    Err(e) => error!("Playback failed: {e}"),
                },
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("All key readers stopped");
                    break;
                }
            }

            if let Some(event) = self.poll() {
                debug!("{event:?}");
            }
        }

        self.shutdown();
    }

    /// Stop any playing sound and give focus back.
    pub fn shutdown(&mut self) {
        if let Some(event) = self.player.stop() {
            info!("Listener stopped: {event:?}");
        }
    }
}
