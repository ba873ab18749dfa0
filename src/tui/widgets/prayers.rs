use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::config::settings::DisplayConfig;
use crate::models::PrayerName;
use crate::schedule::{DaySchedule, FormattedPrayerEntry};
use crate::tui::theme::Palette;

/// Rows to show, honoring the Terbit/Dhuha visibility settings.
pub fn visible_rows(schedule: &DaySchedule, display: &DisplayConfig) -> Vec<FormattedPrayerEntry> {
    schedule
        .formatted()
        .into_iter()
        .filter(|row| match row.name {
            PrayerName::Terbit => display.show_terbit,
            PrayerName::Dhuha => display.show_dhuha,
            _ => true,
        })
        .collect()
}

pub fn render(frame: &mut Frame, area: Rect, palette: &Palette, schedule: &DaySchedule, display: &DisplayConfig) {
    let title = format!(" Jadwal {} ", schedule.date().format("%d/%m/%Y"));
    let block = Block::default()
        .title(Span::styled(title, palette.accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border())
        .style(palette.surface());

    let width = block.inner(area).width as usize;
    let items: Vec<ListItem> = visible_rows(schedule, display)
        .into_iter()
        .map(|row| {
            let label = if row.is_next && display.show_next_label {
                format!("{}  · Berikutnya", row.name.display_name())
            } else {
                row.name.display_name().to_string()
            };
            let pad = width.saturating_sub(label.chars().count() + row.time.len() + 4);
            let text = format!("  {}{}{}  ", label, " ".repeat(pad), row.time);

            let style = if row.is_next {
                palette.highlight()
            } else if row.name.is_optional() {
                palette.dim()
            } else {
                palette.bold()
            };
            ListItem::new(Line::from(Span::styled(text, style)))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
