//! Audio focus: the right to play a sound right now.
//!
//! Desktops have no platform arbiter for transient focus, so the listener
//! uses an advisory lock file shared by every `horn` process of the user.
//! Whoever creates the file holds focus until playback ends; everybody else
//! is denied and skips. The holder touches the file while its sound plays,
//! so only a lock left behind by a crashed process grows older than the
//! configured staleness window and gets taken over.

use log::{debug, warn};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::{HornError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusGrant {
    Granted,
    Denied,
}

pub trait AudioFocus {
    fn request(&mut self) -> Result<FocusGrant>;

    /// Give focus back. Safe to call when focus is not held.
    fn release(&mut self);

    /// Mark held focus as still in use.
    fn refresh(&mut self) {}
}

/// Focus that is always granted. Used by the foreground board.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unarbitrated;

impl AudioFocus for Unarbitrated {
    fn request(&mut self) -> Result<FocusGrant> {
        Ok(FocusGrant::Granted)
    }

    fn release(&mut self) {}
}

#[derive(Debug)]
pub struct LockFileFocus {
    path: PathBuf,
    stale_after: Duration,
    held: bool,
}

impl LockFileFocus {
    pub fn new(path: PathBuf, stale_after: Duration) -> Self {
        Self {
            path,
            stale_after,
            held: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    fn lock_is_stale(&self) -> bool {
        fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .is_some_and(|age| age > self.stale_after)
    }

    fn try_create(&self) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)?;
        writeln!(file, "{}", std::process::id())
    }
}

impl AudioFocus for LockFileFocus {
    fn request(&mut self) -> Result<FocusGrant> {
        if self.held {
            return Ok(FocusGrant::Granted);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| HornError::io(parent, e))?;
        }

        if self.lock_is_stale() {
            warn!("Taking over stale focus lock {}", self.path.display());
            let _ = fs::remove_file(&self.path);
        }

        match self.try_create() {
            Ok(()) => {
                self.held = true;
                Ok(FocusGrant::Granted)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("Audio focus held elsewhere: {}", self.path.display());
                Ok(FocusGrant::Denied)
            }
            Err(e) => Err(HornError::io(&self.path, e)),
        }
    }

    fn release(&mut self) {
        if !self.held {
            return;
        }
        self.held = false;
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("Could not remove focus lock {}: {e}", self.path.display());
        }
    }

    fn refresh(&mut self) {
        if !self.held {
            return;
        }
        let touched = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .and_then(|file| file.set_modified(SystemTime::now()));
        if let Err(e) = touched {
            warn!("Could not refresh focus lock {}: {e}", self.path.display());
        }
    }
}

impl Drop for LockFileFocus {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unarbitrated_always_grants() {
        let mut focus = Unarbitrated;
        assert_eq!(focus.request().unwrap(), FocusGrant::Granted);
        focus.release();
        assert_eq!(focus.request().unwrap(), FocusGrant::Granted);
    }

    #[test]
    fn test_lock_is_exclusive_between_holders() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audio-focus.lock");
        let mut first = LockFileFocus::new(path.clone(), Duration::from_secs(30));
        let mut second = LockFileFocus::new(path.clone(), Duration::from_secs(30));

        assert_eq!(first.request().unwrap(), FocusGrant::Granted);
        assert!(path.exists());
        assert_eq!(second.request().unwrap(), FocusGrant::Denied);
        assert!(!second.is_held());

        first.release();
        assert!(!path.exists());
        assert_eq!(second.request().unwrap(), FocusGrant::Granted);
    }

    #[test]
    fn test_request_while_held_is_granted() {
        let temp_dir = TempDir::new().unwrap();
        let mut focus = LockFileFocus::new(
            temp_dir.path().join("audio-focus.lock"),
            Duration::from_secs(30),
        );

        assert_eq!(focus.request().unwrap(), FocusGrant::Granted);
        assert_eq!(focus.request().unwrap(), FocusGrant::Granted);
    }

    #[test]
    fn test_release_without_holding_keeps_foreign_lock() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audio-focus.lock");
        fs::write(&path, "12345\n").unwrap();

        let mut focus = LockFileFocus::new(path.clone(), Duration::from_secs(30));
        focus.release();

        assert!(path.exists());
    }

    #[test]
    fn test_stale_lock_is_taken_over() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audio-focus.lock");
        fs::write(&path, "12345\n").unwrap();

        // With a zero window any existing lock counts as stale
        let mut focus = LockFileFocus::new(path.clone(), Duration::ZERO);
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(focus.request().unwrap(), FocusGrant::Granted);
        assert!(focus.is_held());
    }

    #[test]
    fn test_refresh_keeps_held_lock_from_going_stale() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audio-focus.lock");
        let window = Duration::from_millis(200);
        let mut holder = LockFileFocus::new(path.clone(), window);
        assert_eq!(holder.request().unwrap(), FocusGrant::Granted);

        std::thread::sleep(Duration::from_millis(300));
        holder.refresh();

        let mut other = LockFileFocus::new(path.clone(), window);
        assert_eq!(other.request().unwrap(), FocusGrant::Denied);
        assert!(holder.is_held());
        assert!(path.exists());
    }

    #[test]
    fn test_refresh_without_holding_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audio-focus.lock");
        let mut focus = LockFileFocus::new(path.clone(), Duration::from_secs(30));

        focus.refresh();

        assert!(!path.exists());
    }

    #[test]
    fn test_drop_releases_lock() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audio-focus.lock");
        {
            let mut focus = LockFileFocus::new(path.clone(), Duration::from_secs(30));
            focus.request().unwrap();
        }
        assert!(!path.exists());
    }
}
