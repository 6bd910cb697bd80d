use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::edit_dialog::{EditDialog, EditFocus};
use super::ui::modal_area;
use crate::slots::{color_rgb, parse_color};

fn field_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn draw_edit_dialog(f: &mut Frame, area: Rect, dialog: &EditDialog, importing: bool) {
    let modal_area = modal_area(area, 50, 16);
    f.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" Edit Button {} ", dialog.slot + 1))
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
            Constraint::Length(3), // Label
            Constraint::Length(3), // Color
            Constraint::Length(3), // Sound
            Constraint::Min(0),
            Constraint::Length(1), // Controls
        ])
        .split(inner_area);

    let label = Paragraph::new(dialog.label.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(field_border(dialog.focus == EditFocus::Label))
            .title(" Label "),
    );
    f.render_widget(label, chunks[0]);

    // Preview swatch next to the typed color once it parses
    let swatch = match parse_color(&dialog.color) {
        Ok(color) => {
            let (r, g, b) = color_rgb(color);
            Span::styled("  ██", Style::default().fg(Color::Rgb(r, g, b)))
        }
        Err(_) => Span::styled("  invalid", Style::default().fg(Color::Red)),
    };
    let color = Paragraph::new(Line::from(vec![Span::raw(dialog.color.as_str()), swatch])).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(field_border(dialog.focus == EditFocus::Color))
            .title(" Color "),
    );
    f.render_widget(color, chunks[1]);

    let sound_text = if importing {
        "Importing…".to_string()
    } else {
        format!("♪ {}", dialog.sound_path.display())
    };
    let pick_focused = dialog.focus == EditFocus::PickSound;
    let sound = Paragraph::new(sound_text)
        .style(if pick_focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(field_border(pick_focused))
                .title(" Sound (Enter to pick) "),
        );
    f.render_widget(sound, chunks[2]);

    let typed = match dialog.focus {
        EditFocus::Label => Some((chunks[0], dialog.label.chars().count())),
        EditFocus::Color => Some((chunks[1], dialog.color.chars().count())),
        EditFocus::PickSound => None,
    };
    if let Some((field, len)) = typed {
        let cursor_x = field.x + 1 + len as u16;
        if cursor_x < field.right().saturating_sub(1) {
            f.set_cursor_position((cursor_x, field.y + 1));
        }
    }

    let controls = vec![
        Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
        Span::raw(" next  "),
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(if pick_focused { " pick  " } else { " save  " }),
        Span::styled("[Esc]", Style::default().fg(Color::Red)),
        Span::raw(" cancel"),
    ];
    f.render_widget(
        Paragraph::new(Line::from(controls)).alignment(Alignment::Center),
        chunks[4],
    );
}
