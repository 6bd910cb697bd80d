//! Foreground board controller.
//!
//! Owns the foreground copy of the four button records, the store they are
//! persisted to and the playback adapter. Every handler takes the slot it
//! acts on explicitly; edits are written through to the store before the
//! in-memory copy changes.

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::error::{HornError, Result};
use crate::playback::{AudioOutput, PlaybackEvent, Player};
use crate::slots::{ButtonConfig, parse_slot_index};
use crate::sounds::{import_picked, install_bundled};
use crate::store::{ButtonStore, load_or_seed};

/// Where sound files live: bundled defaults and user-picked copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundDirs {
    pub bundled: PathBuf,
    pub private: PathBuf,
}

pub struct Controller<S: ButtonStore, O: AudioOutput> {
    store: S,
    player: Player<O>,
    slots: Vec<ButtonConfig>,
    dirs: SoundDirs,
}

impl<S: ButtonStore, O: AudioOutput> Controller<S, O> {
    /// Install bundled sounds, then load (or seed) the button records.
    pub fn start(store: S, output: O, dirs: SoundDirs) -> Result<Self> {
        let installed = install_bundled(&dirs.bundled)?;
        if !installed.is_empty() {
            info!("Installed {} bundled sounds", installed.len());
        }

        let slots = load_or_seed(&store, &dirs.bundled)?;
        debug!("Loaded buttons: {slots:?}");

        Ok(Self {
            store,
            player: Player::new(output),
            slots,
            dirs,
        })
    }

    pub fn slots(&self) -> &[ButtonConfig] {
        &self.slots
    }

    pub fn dirs(&self) -> &SoundDirs {
        &self.dirs
    }

    pub fn slot(&self, id: usize) -> Result<&ButtonConfig> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .ok_or(HornError::UnknownSlot(id))
    }

    /// Re-read the records from the store.
    pub fn reload(&mut self) -> Result<()> {
        self.slots = self.store.get_all()?;
        Ok(())
    }

    pub fn tap(&mut self, id: usize) -> Result<PlaybackEvent> {
        let path = self.slot(id)?.sound_path.clone();
        self.player.play(&path)
    }

    /// Play the slot named by free-text input; bad input plays slot 0.
    pub fn play_typed_index(&mut self, input: &str) -> Result<PlaybackEvent> {
        self.tap(parse_slot_index(input))
    }

    pub fn rename(&mut self, id: usize, text: &str) -> Result<&ButtonConfig> {
        let updated = self.slot(id)?.with_text(text);
        self.persist(updated)
    }

    pub fn recolor(&mut self, id: usize, color: u32) -> Result<&ButtonConfig> {
        let updated = self.slot(id)?.with_color(color);
        self.persist(updated)
    }

    /// Point a slot at an already imported sound file.
    pub fn assign_sound(&mut self, id: usize, path: PathBuf) -> Result<&ButtonConfig> {
        let updated = self.slot(id)?.with_sound(path);
        self.persist(updated)
    }

    /// Copy `source` into the private sounds directory and assign it.
    pub fn import_sound(&mut self, id: usize, source: &Path) -> Result<&ButtonConfig> {
        self.slot(id)?;
        let path = import_picked(source, &self.dirs.private)?;
        self.assign_sound(id, path)
    }

    pub fn is_playing(&self) -> bool {
        self.player.is_active()
    }

    pub fn playing_path(&self) -> Option<&Path> {
        self.player.active_path()
    }

    pub fn poll(&mut self) -> Option<PlaybackEvent> {
        self.player.poll()
    }

    pub fn stop(&mut self) -> Option<PlaybackEvent> {
        self.player.stop()
    }

    fn persist(&mut self, updated: ButtonConfig) -> Result<&ButtonConfig> {
        self.store.upsert(std::slice::from_ref(&updated))?;

        let index = self
            .slots
            .iter()
            .position(|s| s.id == updated.id)
            .ok_or(HornError::UnknownSlot(updated.id))?;
        info!("Updated button {}: {:?}", updated.id, updated);
        self.slots[index] = updated;
        Ok(&self.slots[index])
    }
}
