//! Button slot records and the small pure helpers around them.
//!
//! A board always has four slots, ids 0 to 3. Each slot carries a label, the
//! path of the sound it plays and a packed ARGB color. Defaults are created on
//! first run from the bundled sound bank.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_COLORS, LABEL_MAX_CHARS, SLOT_COUNT};
use crate::error::{HornError, Result};
use crate::sounds::BUNDLED_SOUNDS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonConfig {
    pub id: usize,
    pub text: String,
    pub sound_path: PathBuf,
    pub color: u32,
}

impl ButtonConfig {
    /// Copy of this record with a new label, truncated to the label limit.
    pub fn with_text(&self, text: &str) -> Self {
        Self {
            text: truncate_label(text),
            ..self.clone()
        }
    }

    /// Copy of this record playing `path`, labelled after the file name.
    pub fn with_sound(&self, path: PathBuf) -> Self {
        let text = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(truncate_label)
            .unwrap_or_else(|| self.text.clone());
        Self {
            text,
            sound_path: path,
            ..self.clone()
        }
    }

    pub fn with_color(&self, color: u32) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        color_rgb(self.color)
    }
}

/// The four first-run records, pointing into `bundled_dir`.
pub fn default_slots(bundled_dir: &Path) -> Vec<ButtonConfig> {
    BUNDLED_SOUNDS
        .iter()
        .zip(DEFAULT_COLORS)
        .enumerate()
        .map(|(id, (sound, color))| ButtonConfig {
            id,
            text: sound.label.to_string(),
            sound_path: bundled_dir.join(sound.file_name),
            // Built-in colors are well formed
            color: parse_color(color).unwrap_or(0xFF00_0000),
        })
        .collect()
}

pub fn truncate_label(text: &str) -> String {
    text.chars().take(LABEL_MAX_CHARS).collect()
}

/// Resolve a typed slot index. Anything unparsable or outside 0..=3 picks
/// slot 0.
pub fn parse_slot_index(input: &str) -> usize {
    match input.trim().parse::<i64>() {
        Ok(index) if (0..SLOT_COUNT as i64).contains(&index) => index as usize,
        _ => 0,
    }
}

/// Parse `#RRGGBB` (opaque) or `#AARRGGBB` into a packed ARGB value.
pub fn parse_color(value: &str) -> Result<u32> {
    let hex = value
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| HornError::InvalidColor(value.to_string()))?;

    let parsed =
        u32::from_str_radix(hex, 16).map_err(|_| HornError::InvalidColor(value.to_string()))?;

    match hex.len() {
        6 => Ok(0xFF00_0000 | parsed),
        8 => Ok(parsed),
        _ => Err(HornError::InvalidColor(value.to_string())),
    }
}

/// Inverse of [`parse_color`]; opaque colors print as `#RRGGBB`.
pub fn format_color(color: u32) -> String {
    if color >> 24 == 0xFF {
        format!("#{:06X}", color & 0x00FF_FFFF)
    } else {
        format!("#{color:08X}")
    }
}

pub fn color_rgb(color: u32) -> (u8, u8, u8) {
    (
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}
