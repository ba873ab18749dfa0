use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

pub fn day_name_id(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

/// "Jumat, 16 Oktober 2026"
pub fn format_date_id(date: NaiveDate) -> String {
    format!(
        "{}, {} {} {}",
        day_name_id(date.weekday()),
        date.day(),
        MONTHS_ID[date.month0() as usize],
        date.year()
    )
}

/// Time left until a prayer: "2 jam 5 menit" or "45 menit". Partial minutes are dropped.
pub fn format_countdown(secs: i64) -> String {
    if secs <= 0 {
        return "sekarang".to_string();
    }
    let total_minutes = secs / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{} jam {} menit", hours, minutes)
    } else {
        format!("{} menit", minutes)
    }
}

/// Format a NaiveTime to "HH:MM:SS"
pub fn format_clock(t: NaiveTime) -> String {
    t.format("%H:%M:%S").to_string()
}
