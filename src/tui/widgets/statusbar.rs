use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::config::settings::BackgroundImage;
use crate::tui::theme::Palette;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    palette: &Palette,
    background: Option<&BackgroundImage>,
    notice: Option<&str>,
) {
    let hints = [
        ("[l]", " lokasi  "),
        ("[r]", " muat ulang  "),
        ("[t]", " tema  "),
        ("[d]", " gelap  "),
        ("[?]", " bantuan  "),
        ("[Esc]", " keluar"),
    ];

    let mut spans = Vec::new();
    for (key, label) in &hints {
        spans.push(Span::styled(*key, palette.accent()));
        spans.push(Span::styled(*label, palette.dim()));
    }

    let right = match (notice, background) {
        (Some(notice), _) => Span::styled(notice.to_string(), palette.accent()),
        (None, Some(img)) if !img.author.is_empty() => {
            Span::styled(format!("Foto: {} / Unsplash", img.author), palette.dim())
        }
        _ => Span::raw(""),
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(36)])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(spans)), cols[0]);
    frame.render_widget(Paragraph::new(Line::from(right)).alignment(Alignment::Right), cols[1]);
}
