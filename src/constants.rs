//! Project-wide constants used across multiple modules.
//!
//! This module centralizes constant definitions so the controller, the
//! listener and the command layer agree on names, limits and layout.

/// Number of button slots on the board
pub const SLOT_COUNT: usize = 4;

/// Labels are cut to this many characters when edited
pub const LABEL_MAX_CHARS: usize = 8;

/// Default button colors, one per slot
pub const DEFAULT_COLORS: [&str; SLOT_COUNT] = ["#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4"];

/// Audio file extensions offered by the picker
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "ogg"];

/// Subdirectory holding sound files, both under the downloads dir (bundled)
/// and under the data dir (picked)
pub const SOUNDS_DIR: &str = "sounds";

/// SQLite database file name inside the data dir
pub const DATABASE_FILE: &str = "button-config.db";

/// Audio focus lock file name inside the data dir
pub const FOCUS_LOCK_FILE: &str = "audio-focus.lock";

/// How long a pressed button stays highlighted
pub const PRESS_FLASH_MS: u64 = 200;

/// The sound picker stops scanning after this many files
pub const PICKER_SCAN_LIMIT: usize = 10_000;

/// How long status line messages stay visible
pub const STATUS_MESSAGE_SECS: u64 = 3;

/// How long the listener waits for a key before checking playback and the
/// stop flag again
pub const LISTENER_WAIT_MS: u64 = 100;
