//! Application configuration management.
//!
//! Where the board keeps its database, sounds and logs, where the sound
//! picker looks for media, and how the background listener behaves.
//! Configuration is stored in the user's config directory (typically
//! ~/.config/diyhorn/config.toml); a missing file means defaults.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DATABASE_FILE, FOCUS_LOCK_FILE, SOUNDS_DIR};
use crate::controller::SoundDirs;
use crate::listener::TriggerMode;

const APP_DIR: &str = "diyhorn";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: PathBuf,
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default)]
    pub listener: ListenerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenerConfig {
    #[serde(default)]
    pub trigger: TriggerMode,
    /// Arbitrate with other players through the focus lock file.
    #[serde(default = "default_focus")]
    pub focus: bool,
    #[serde(default = "default_focus_stale_secs")]
    pub focus_stale_secs: u64,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_downloads_dir() -> PathBuf {
    dirs::download_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| default_data_dir().join("downloads"))
}

fn default_media_dir() -> PathBuf {
    dirs::audio_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_log_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| default_data_dir().join("logs"))
}

fn default_focus() -> bool {
    true
}

fn default_focus_stale_secs() -> u64 {
    30
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            trigger: TriggerMode::default(),
            focus: default_focus(),
            focus_stale_secs: default_focus_stale_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            data_dir: default_data_dir(),
            downloads_dir: default_downloads_dir(),
            media_dir: default_media_dir(),
            log_dir: default_log_dir(),
            listener: ListenerConfig::default(),
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join(APP_DIR)
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join(APP_DIR)
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Bundled default sounds, installed on first run.
    pub fn bundled_sound_dir(&self) -> PathBuf {
        self.downloads_dir.join(SOUNDS_DIR)
    }

    /// Copies of sounds the user picked.
    pub fn private_sound_dir(&self) -> PathBuf {
        self.data_dir.join(SOUNDS_DIR)
    }

    pub fn sound_dirs(&self) -> SoundDirs {
        SoundDirs {
            bundled: self.bundled_sound_dir(),
            private: self.private_sound_dir(),
        }
    }

    pub fn focus_lock_path(&self) -> PathBuf {
        self.data_dir.join(FOCUS_LOCK_FILE)
    }

    pub fn focus_stale_after(&self) -> Duration {
        Duration::from_secs(self.listener.focus_stale_secs)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "data_dir" => self.data_dir = expand_path(value)?,
            "downloads_dir" => self.downloads_dir = expand_path(value)?,
            "media_dir" => self.media_dir = expand_path(value)?,
            "log_dir" => self.log_dir = expand_path(value)?,
            "listener.trigger" => self.listener.trigger = value.parse::<TriggerMode>()?,
            "listener.focus" => {
                self.listener.focus = value
                    .parse::<bool>()
                    .map_err(|_| "Value must be 'true' or 'false'")?;
            }
            "listener.focus_stale_secs" => {
                self.listener.focus_stale_secs = value
                    .parse::<u64>()
                    .map_err(|_| "Value must be a whole number of seconds")?;
            }
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        Ok(())
    }
}

fn expand_path(value: &str) -> Result<PathBuf, Box<dyn Error>> {
    if value.trim().is_empty() {
        return Err("Path must not be empty".into());
    }
    let expanded = shellexpand::tilde(value);
    Ok(Path::new(expanded.as_ref()).to_path_buf())
}
