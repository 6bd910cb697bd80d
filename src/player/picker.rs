//! Fuzzy sound picker.
//!
//! Stands in for a system media picker: lists audio files under the media
//! directory and narrows them with a fuzzy match on the file name as the
//! user types. Picking a file hands its path back to the app, which imports
//! it into the private sounds directory.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use log::{debug, warn};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use std::fs;
use std::path::{Path, PathBuf};

use super::ui::modal_area;
use crate::constants::{AUDIO_EXTENSIONS, PICKER_SCAN_LIMIT};

pub struct Picker {
    pub root: PathBuf,
    pub items: Vec<PathBuf>,
    filtered: Vec<usize>,
    pub selected: usize,
    pub query: String,
    matcher: SkimMatcherV2,
}

impl Picker {
    pub fn open(root: &Path) -> Self {
        let items = scan_audio_files(root);
        debug!("Picker found {} audio files under {}", items.len(), root.display());
        Self::with_items(root.to_path_buf(), items)
    }

    fn with_items(root: PathBuf, items: Vec<PathBuf>) -> Self {
        let mut picker = Self {
            root,
            items,
            filtered: Vec::new(),
            selected: 0,
            query: String::new(),
            matcher: SkimMatcherV2::default(),
        };
        picker.filter_items();
        picker
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.filter_items();
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.filter_items();
    }

    fn filter_items(&mut self) {
        if self.query.is_empty() {
            self.filtered = (0..self.items.len()).collect();
        } else {
            let mut scored: Vec<(usize, i64)> = self
                .items
                .iter()
                .enumerate()
                .filter_map(|(idx, path)| {
                    self.matcher
                        .fuzzy_match(&display_name(path), &self.query)
                        .map(|score| (idx, score))
                })
                .collect();

            // Highest score first, ties keep scan order
            scored.sort_by(|a, b| b.1.cmp(&a.1));
            self.filtered = scored.into_iter().map(|(idx, _)| idx).collect();
        }

        if self.selected >= self.filtered.len() {
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self) {
        if !self.filtered.is_empty() {
            self.selected = (self.selected + 1) % self.filtered.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.filtered.is_empty() {
            if self.selected == 0 {
                self.selected = self.filtered.len() - 1;
            } else {
                self.selected -= 1;
            }
        }
    }

    pub fn selected_path(&self) -> Option<&Path> {
        self.filtered
            .get(self.selected)
            .and_then(|idx| self.items.get(*idx))
            .map(PathBuf::as_path)
    }

    pub fn filtered_items(&self) -> impl Iterator<Item = &Path> {
        self.filtered
            .iter()
            .filter_map(|idx| self.items.get(*idx))
            .map(PathBuf::as_path)
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Location of `path` relative to the scanned root, for display.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Audio files under `root`, sorted by file name. Hidden directories are
/// skipped; unreadable ones are logged and skipped.
pub fn scan_audio_files(root: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not scan directory {dir:?}: {e}");
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                if !hidden {
                    pending.push(path);
                }
            } else if is_audio_file(&path) {
                found.push(path);
                if found.len() >= PICKER_SCAN_LIMIT {
                    warn!("Stopped scanning after {PICKER_SCAN_LIMIT} files");
                    pending.clear();
                    break;
                }
            }
        }
    }

    found.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));
    found
}

pub fn draw_picker(f: &mut Frame, area: Rect, picker: &Picker) {
    let modal_area = modal_area(area, 70, 24);
    f.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Pick a Sound ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(block, modal_area);

    let inner_area = modal_area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search field
            Constraint::Min(3),    // Matches
            Constraint::Length(1), // Controls
        ])
        .split(inner_area);

    let search = Paragraph::new(picker.query.as_str())
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(
                    " {} · {}/{} ",
                    picker.root.display(),
                    picker.filtered_len(),
                    picker.items.len()
                )),
        );
    f.render_widget(search, chunks[0]);

    let cursor_x = chunks[0].x + 1 + picker.query.chars().count() as u16;
    if cursor_x < chunks[0].right().saturating_sub(1) {
        f.set_cursor_position((cursor_x, chunks[0].y + 1));
    }

    if picker.filtered_len() == 0 {
        let empty = Paragraph::new("No audio files match")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = picker
            .filtered_items()
            .map(|path| ListItem::new(format!("♪ {}", picker.relative(path).display())))
            .collect();
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        let mut state = ListState::default().with_selected(Some(picker.selected));
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    let controls = vec![
        Span::styled("[↑↓]", Style::default().fg(Color::Magenta)),
        Span::raw(" select  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" import  "),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" back"),
    ];
    f.render_widget(
        Paragraph::new(Line::from(controls)).alignment(Alignment::Center),
        chunks[2],
    );
}
