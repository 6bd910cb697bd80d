//! Edit dialog for a single button.
//!
//! Opened with a long-press equivalent (`e` or a right click). Holds the
//! label and color being typed and tracks which field has focus. Nothing is
//! written to the store until the dialog is confirmed.

use std::path::PathBuf;

use crate::constants::LABEL_MAX_CHARS;
use crate::error::Result;
use crate::slots::{ButtonConfig, format_color, parse_color};

/// Longest color text accepted (`#AARRGGBB`)
const COLOR_MAX_CHARS: usize = 9;

#[derive(Debug, Clone)]
pub struct EditDialog {
    pub slot: usize,
    pub label: String,
    pub color: String,
    pub sound_path: PathBuf,
    pub focus: EditFocus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditFocus {
    Label,
    Color,
    PickSound,
}

impl EditDialog {
    pub fn new(config: &ButtonConfig) -> Self {
        Self {
            slot: config.id,
            label: config.text.clone(),
            color: format_color(config.color),
            sound_path: config.sound_path.clone(),
            focus: EditFocus::Label,
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            EditFocus::Label => EditFocus::Color,
            EditFocus::Color => EditFocus::PickSound,
            EditFocus::PickSound => EditFocus::Label,
        };
    }

    pub fn previous_focus(&mut self) {
        self.focus = match self.focus {
            EditFocus::Label => EditFocus::PickSound,
            EditFocus::Color => EditFocus::Label,
            EditFocus::PickSound => EditFocus::Color,
        };
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            EditFocus::Label if self.label.chars().count() < LABEL_MAX_CHARS => {
                self.label.push(c)
            }
            EditFocus::Color if self.color.chars().count() < COLOR_MAX_CHARS => {
                self.color.push(c)
            }
            _ => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            EditFocus::Label => {
                self.label.pop();
            }
            EditFocus::Color => {
                self.color.pop();
            }
            EditFocus::PickSound => {}
        }
    }

    pub fn parsed_color(&self) -> Result<u32> {
        parse_color(&self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HornError;

    fn dialog() -> EditDialog {
        EditDialog::new(&ButtonConfig {
            id: 2,
            text: "Siren".to_string(),
            sound_path: PathBuf::from("/dl/sounds/siren.wav"),
            color: 0xFF45_B7D1,
        })
    }

    #[test]
    fn test_new_prefills_fields() {
        let dialog = dialog();
        assert_eq!(dialog.slot, 2);
        assert_eq!(dialog.label, "Siren");
        assert_eq!(dialog.color, "#45B7D1");
        assert_eq!(dialog.focus, EditFocus::Label);
    }

    #[test]
    fn test_focus_cycles_both_ways() {
        let mut dialog = dialog();
        dialog.next_focus();
        assert_eq!(dialog.focus, EditFocus::Color);
        dialog.next_focus();
        assert_eq!(dialog.focus, EditFocus::PickSound);
        dialog.next_focus();
        assert_eq!(dialog.focus, EditFocus::Label);
        dialog.previous_focus();
        assert_eq!(dialog.focus, EditFocus::PickSound);
    }

    #[test]
    fn test_label_input_stops_at_limit() {
        let mut dialog = dialog();
        for c in "ABCDEFGHIJ".chars() {
            dialog.push_char(c);
        }
        assert_eq!(dialog.label, "SirenABC");
        dialog.pop_char();
        assert_eq!(dialog.label, "SirenAB");
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut dialog = dialog();
        dialog.focus = EditFocus::Color;
        for _ in 0..7 {
            dialog.pop_char();
        }
        for c in "#123456".chars() {
            dialog.push_char(c);
        }
        assert_eq!(dialog.label, "Siren");
        assert_eq!(dialog.parsed_color().unwrap(), 0xFF12_3456);

        dialog.focus = EditFocus::PickSound;
        dialog.push_char('x');
        dialog.pop_char();
        assert_eq!(dialog.color, "#123456");
    }

    #[test]
    fn test_invalid_color() {
        let mut dialog = dialog();
        dialog.color = "blue".to_string();
        assert!(matches!(
            dialog.parsed_color(),
            Err(HornError::InvalidColor(_))
        ));
    }
}
