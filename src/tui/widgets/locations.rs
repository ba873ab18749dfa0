use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::models::Location;
use crate::tui::picker::LocationPicker;
use crate::tui::theme::Palette;

pub fn render(frame: &mut Frame, palette: &Palette, picker: &LocationPicker, locations: &[Location]) {
    let area = frame.area();
    let popup_area = Rect {
        x: area.width / 6,
        y: area.height / 8,
        width: area.width * 2 / 3,
        height: area.height * 3 / 4,
    };
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Pilih Lokasi ", palette.accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.accent())
        .style(palette.surface());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let query = Line::from(vec![
        Span::styled(" Cari: ", palette.dim()),
        Span::styled(picker.query.as_str(), palette.accent().add_modifier(Modifier::BOLD)),
        Span::styled("█", palette.accent()),
    ]);
    frame.render_widget(Paragraph::new(query), rows[0]);

    let filtered = picker.filtered(locations);
    let name_width = rows[2].width.saturating_sub(10) as usize;
    let items: Vec<ListItem> = filtered
        .iter()
        .map(|loc| {
            Line::from(vec![
                Span::styled(format!(" {:<6}", loc.id), palette.dim()),
                Span::styled(truncate(&loc.name, name_width), palette.bold()),
            ])
        })
        .map(ListItem::new)
        .collect();

    let list = List::new(items).highlight_style(palette.highlight());
    let mut state = ListState::default().with_selected(if filtered.is_empty() {
        None
    } else {
        Some(picker.selected)
    });
    frame.render_stateful_widget(list, rows[2], &mut state);

    let footer = if filtered.is_empty() {
        Span::styled(" Lokasi tidak ditemukan", palette.error())
    } else {
        Span::styled(
            format!(" {} lokasi  ·  [Enter] pilih  ·  [Esc] batal", filtered.len()),
            palette.dim(),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(footer)), rows[3]);
}

/// Cut `s` to at most `max` display columns.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for ch in s.chars() {
        if out.width() + ch.to_string().width() + 1 > max {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}
