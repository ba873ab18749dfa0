use chrono::NaiveDateTime;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::PrayerName;
use crate::schedule::DaySchedule;
use crate::tui::theme::Palette;
use crate::utils::format::format_countdown;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextPrayerView {
    pub name: PrayerName,
    pub time: String,
    pub remaining: String,
}

/// Countdown to the highlighted prayer. A highlight that is already behind
/// `now` means tomorrow's first prayer, shown as "Besok".
pub fn next_prayer_view(schedule: &DaySchedule, now: NaiveDateTime) -> Option<NextPrayerView> {
    let next = schedule.next_prayer();
    let minutes = u32::from(next.time_in_minutes);
    let at = schedule.date().and_hms_opt(minutes / 60, minutes % 60, 0)?;
    let remaining = if at > now {
        format_countdown((at - now).num_seconds())
    } else {
        "Besok".to_string()
    };
    Some(NextPrayerView {
        name: next.name,
        time: next.time.clone(),
        remaining,
    })
}

pub fn render(frame: &mut Frame, area: Rect, palette: &Palette, view: Option<&NextPrayerView>) {
    let block = Block::default()
        .title(Span::styled(" Shalat Berikutnya ", palette.accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border())
        .style(palette.surface());

    let content = match view {
        None => vec![Line::from(Span::styled("Belum ada jadwal", palette.dim()))],
        Some(v) => vec![Line::from(vec![
            Span::styled(v.name.display_name(), palette.accent().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}  ", v.time), palette.bold()),
            Span::styled("·  ", palette.dim()),
            Span::styled(v.remaining.clone(), palette.bold()),
        ])],
    };

    let paragraph = Paragraph::new(content).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
