use chrono::NaiveDateTime;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::tui::theme::Palette;
use crate::utils::format::{format_clock, format_date_id};
use crate::utils::hijri::hijri_string;

/// Width of "HH:MM:SS" in quadrant pixels.
const CLOCK_WIDTH: u16 = 32;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    palette: &Palette,
    now: NaiveDateTime,
    location_name: Option<&str>,
    hijri_offset: i32,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.accent().add_modifier(Modifier::BOLD))
        .style(palette.surface());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // location
            Constraint::Length(4), // clock
            Constraint::Length(2), // dates
        ])
        .split(inner);

    let location = Line::from(Span::styled(
        location_name.unwrap_or("Pilih lokasi [l]").to_string(),
        palette.accent().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(location).alignment(Alignment::Center), rows[0]);

    let clock = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(palette.bold())
        .lines(vec![format_clock(now.time()).into()])
        .build();
    frame.render_widget(clock, centered(rows[1], CLOCK_WIDTH));

    let mut dates = vec![Line::from(Span::styled(format_date_id(now.date()), palette.dim()))];
    if let Some(hijri) = hijri_string(now.date(), hijri_offset) {
        dates.push(Line::from(Span::styled(hijri, palette.accent())));
    }
    frame.render_widget(Paragraph::new(dates).alignment(Alignment::Center), rows[2]);
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
