use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::app::{App, BoardFocus};
use super::edit_dialog_ui::draw_edit_dialog;
use super::picker::draw_picker;
use crate::constants::SLOT_COUNT;
use crate::playback::AudioOutput;
use crate::slots::ButtonConfig;
use crate::store::ButtonStore;

pub struct BoardLayout {
    pub title: Rect,
    pub grid: Rect,
    pub index: Rect,
    pub status: Rect,
    pub controls: Rect,
}

pub fn board_layout(area: Rect) -> BoardLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(6),    // Buttons
            Constraint::Length(3), // Index field
            Constraint::Length(1), // Status line
            Constraint::Length(3), // Controls (2 rows + border)
        ])
        .split(area);

    BoardLayout {
        title: chunks[0],
        grid: chunks[1],
        index: chunks[2],
        status: chunks[3],
        controls: chunks[4],
    }
}

/// The 2×2 button cells, in slot order.
pub fn button_areas(grid: Rect) -> [Rect; SLOT_COUNT] {
    let halves = [Constraint::Percentage(50); 2];
    let rows = Layout::vertical(halves).split(grid);
    let top = Layout::horizontal(halves).split(rows[0]);
    let bottom = Layout::horizontal(halves).split(rows[1]);
    [top[0], top[1], bottom[0], bottom[1]]
}

/// Slot under a terminal cell, given the size of the last drawn frame.
pub fn button_at(screen: Rect, column: u16, row: u16) -> Option<usize> {
    let position = Position::new(column, row);
    button_areas(board_layout(screen).grid)
        .iter()
        .position(|area| area.contains(position))
}

/// A centered rectangle of at most `max_width` × `max_height` inside `area`.
pub fn modal_area(area: Rect, max_width: u16, max_height: u16) -> Rect {
    let width = max_width.min(area.width.saturating_sub(4));
    let height = max_height.min(area.height.saturating_sub(4));
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Black or white, whichever reads better on the given background.
fn label_color(r: u8, g: u8, b: u8) -> Color {
    let luma = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    if luma > 150_000 {
        Color::Black
    } else {
        Color::White
    }
}

pub fn draw<S: ButtonStore, O: AudioOutput>(f: &mut Frame, app: &App<S, O>) {
    let size = f.area();

    draw_board(f, app);

    if let Some(ref dialog) = app.edit_dialog {
        draw_edit_dialog(f, size, dialog, app.importing == Some(dialog.slot));
    }

    if let Some(ref picker) = app.picker {
        draw_picker(f, size, picker);
    }
}

fn draw_board<S: ButtonStore, O: AudioOutput>(f: &mut Frame, app: &App<S, O>) {
    let layout = board_layout(f.area());

    let title = Paragraph::new("📯 DIY Horn")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, layout.title);

    let areas = button_areas(layout.grid);
    for config in app.controller.slots() {
        if let Some(area) = areas.get(config.id) {
            draw_button(
                f,
                *area,
                config,
                config.id == app.selected && app.focus == BoardFocus::Buttons,
                app.is_flashing(config.id),
                app.is_playing_slot(config.id),
            );
        }
    }

    draw_index_field(f, layout.index, app);
    draw_status(f, layout.status, app);
    draw_controls(f, layout.controls);
}

fn draw_button(
    f: &mut Frame,
    area: Rect,
    config: &ButtonConfig,
    selected: bool,
    flashing: bool,
    playing: bool,
) {
    let (r, g, b) = config.rgb();
    let background = Color::Rgb(r, g, b);

    let mut style = Style::default().bg(background).fg(label_color(r, g, b));
    if flashing {
        style = style.add_modifier(Modifier::REVERSED);
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", config.id + 1));
    block = if selected {
        block
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    } else {
        block.border_style(Style::default().fg(background))
    };
    if playing {
        block = block.title(Line::from(" ▶ ").right_aligned());
    }

    // Pad from the top so the label sits in the middle
    let inner_height = area.height.saturating_sub(2) as usize;
    let mut lines = vec![Line::from(""); inner_height.saturating_sub(1) / 2];
    lines.push(Line::from(Span::styled(
        config.text.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let button = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(style)
        .block(block);
    f.render_widget(button, area);
}

fn draw_index_field<S: ButtonStore, O: AudioOutput>(f: &mut Frame, area: Rect, app: &App<S, O>) {
    let focused = app.focus == BoardFocus::IndexField;
    let field = Paragraph::new(app.index_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            })
            .title(" Button index (0-3), +/- or volume keys play it "),
    );
    f.render_widget(field, area);

    if focused && app.edit_dialog.is_none() {
        let cursor_x = area.x + 1 + app.index_input.chars().count() as u16;
        if cursor_x < area.right().saturating_sub(1) {
            f.set_cursor_position((cursor_x, area.y + 1));
        }
    }
}

fn draw_status<S: ButtonStore, O: AudioOutput>(f: &mut Frame, area: Rect, app: &App<S, O>) {
    let line = if let Some(ref message) = app.status {
        Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Yellow)))
    } else if let Some(slot) = app.importing {
        Line::from(Span::styled(
            format!("Importing sound for button {}…", slot + 1),
            Style::default().fg(Color::Blue),
        ))
    } else if let Some(path) = app.controller.playing_path() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Line::from(vec![
            Span::styled("▶ ", Style::default().fg(Color::Green)),
            Span::raw(name),
        ])
    } else {
        Line::from(Span::styled("Ready", Style::default().fg(Color::DarkGray)))
    };

    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn draw_controls(f: &mut Frame, area: Rect) {
    let border_widget = Block::default().borders(Borders::TOP);
    f.render_widget(border_widget, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let controls_row1 = vec![
        Span::styled("[1-4]", Style::default().fg(Color::Green)),
        Span::raw(" play  "),
        Span::styled("[←↓↑→]", Style::default().fg(Color::Magenta)),
        Span::raw(" select  "),
        Span::styled("[enter]", Style::default().fg(Color::Green)),
        Span::raw(" play  "),
        Span::styled("[e]", Style::default().fg(Color::Cyan)),
        Span::raw(" edit  "),
        Span::styled("[s]", Style::default().fg(Color::Yellow)),
        Span::raw(" stop  "),
        Span::styled("[q]", Style::default().fg(Color::Red)),
        Span::raw(" quit"),
    ];

    let controls_row2 = vec![
        Span::styled("[i]", Style::default().fg(Color::Cyan)),
        Span::raw(" index  "),
        Span::styled("[+/-]", Style::default().fg(Color::Green)),
        Span::raw(" play index  "),
        Span::styled("[a]", Style::default().fg(Color::Blue)),
        Span::raw(" listener  "),
        Span::styled("[right click]", Style::default().fg(Color::Cyan)),
        Span::raw(" edit"),
    ];

    f.render_widget(
        Paragraph::new(Line::from(controls_row1)).alignment(Alignment::Center),
        rows[1],
    );
    f.render_widget(
        Paragraph::new(Line::from(controls_row2)).alignment(Alignment::Center),
        rows[2],
    );
}
