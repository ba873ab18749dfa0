use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::api::ScheduleSource;
use crate::cli::args::ConfigArgs;
use crate::config::{AppConfig, BackgroundMode};
use crate::schedule::{format_schedule, minutes_of_day, DaySchedule, Highlight};
use crate::tui::widgets::next_prayer::next_prayer_view;
use crate::tui::widgets::prayers::visible_rows;
use crate::utils::format::format_date_id;
use crate::utils::hijri::hijri_string;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const ACCENT: &str = "\x1b[38;2;79;70;229m";
const HIGHLIGHT: &str = "\x1b[1;97;48;2;79;70;229m";

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(
    source: &dyn ScheduleSource,
    config: &AppConfig,
    date: Option<NaiveDate>,
    location: Option<&str>,
) -> Result<()> {
    let location_id = location
        .or(config.location.id.as_deref())
        .ok_or_else(|| anyhow!("No location selected. Find one with `jam-shalat locations <name>` and save it with `jam-shalat location <id>`"))?;

    let now = Local::now().naive_local();
    let date = date.unwrap_or(now.date());

    let raw = source
        .fetch_daily_schedule(location_id, date)
        .context("Gagal memuat jadwal shalat")?;
    let schedule = format_schedule(&raw, highlight_for(date, now))?;

    let place = if location.is_none() {
        config.location.name.clone()
    } else {
        None
    }
    .unwrap_or_else(|| location_id.to_string());

    println!();
    println_colored!(ACCENT, "  Jadwal Shalat {}", place);
    let mut date_line = format_date_id(date);
    if let Some(hijri) = hijri_string(date, config.display.hijri_offset) {
        date_line = format!("{}  ·  {}", date_line, hijri);
    }
    println_colored!(DIM, "  {}", date_line);
    println!();

    print_schedule(&schedule, config, date == now.date(), now);
    println!();
    Ok(())
}

/// Highlight rule for a one-shot listing of `date`.
fn highlight_for(date: NaiveDate, now: NaiveDateTime) -> Highlight {
    if date == now.date() {
        Highlight::At(minutes_of_day(&now))
    } else {
        Highlight::First
    }
}

fn print_schedule(schedule: &DaySchedule, config: &AppConfig, is_today: bool, now: NaiveDateTime) {
    let current = minutes_of_day(&now);
    for row in visible_rows(schedule, &config.display) {
        if row.is_next {
            let label = if config.display.show_next_label { "  berikutnya" } else { "" };
            println_colored!(HIGHLIGHT, "  {:<10}  {}{}  ", row.name.display_name(), row.time, label);
        } else if is_today && row.time_in_minutes <= current {
            println_colored!(DIM, "  {:<10}  {}", row.name.display_name(), row.time);
        } else {
            println_colored!(BOLD, "  {:<10}  {}", row.name.display_name(), row.time);
        }
    }

    if is_today {
        if let Some(view) = next_prayer_view(schedule, now) {
            println!();
            println_colored!(AMBER, "  {} {}  ·  {}", view.name.display_name(), view.time, view.remaining);
        }
    }
}

// ─── Locations ───────────────────────────────────────────────────────────────

pub fn handle_locations(source: &dyn ScheduleSource, query: Option<&str>) -> Result<()> {
    let locations = source
        .fetch_locations()
        .context("Tidak dapat terhubung ke server. Pastikan koneksi internet Anda stabil.")?;
    let query = query.unwrap_or("");

    let matches: Vec<_> = locations.iter().filter(|l| l.matches(query)).collect();
    println!();
    if matches.is_empty() {
        println_colored!(AMBER, "  Lokasi '{}' tidak ditemukan", query);
    } else {
        for loc in &matches {
            println!("  {:<6}  {}", loc.id, loc.name);
        }
        println!();
        println_colored!(DIM, "  {} lokasi", matches.len());
    }
    println!();
    Ok(())
}

pub fn handle_set_location(source: &dyn ScheduleSource, config: &mut AppConfig, id: &str) -> Result<()> {
    let locations = source
        .fetch_locations()
        .context("Tidak dapat terhubung ke server. Pastikan koneksi internet Anda stabil.")?;
    let location = locations
        .iter()
        .find(|l| l.id == id)
        .ok_or_else(|| anyhow!("Unknown location id '{}'. See `jam-shalat locations`", id))?;

    config.location.id = Some(location.id.clone());
    config.location.name = Some(location.name.clone());
    config.save()?;
    println_colored!(GREEN, "  ✓ Lokasi disimpan: {} ({})", location.name, location.id);
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(config: &mut AppConfig, args: &ConfigArgs) -> Result<()> {
    if !args.is_empty() {
        apply_config_args(config, args);
        config.save()?;
        println_colored!(GREEN, "  ✓ Pengaturan disimpan");
    }

    let display = &config.display;
    let bg = &config.background;
    println!();
    println!("  Lokasi          {}", config.location.name.as_deref().unwrap_or("-"));
    println!("  Tema            {}", display.theme_color.as_str());
    println!("  Mode gelap      {}", yes_no(display.dark_mode));
    println!("  Terbit          {}", yes_no(display.show_terbit));
    println!("  Dhuha           {}", yes_no(display.show_dhuha));
    println!("  Label berikut   {}", yes_no(display.show_next_label));
    println!("  Offset Hijriah  {:+}", display.hijri_offset);
    println!(
        "  Latar           {} ({} gambar, tiap {} menit)",
        match bg.mode {
            BackgroundMode::Static => "statis",
            BackgroundMode::Auto => "otomatis",
        },
        bg.images.len(),
        bg.rotation_minutes
    );
    println!();
    Ok(())
}

fn apply_config_args(config: &mut AppConfig, args: &ConfigArgs) {
    if let Some(theme) = args.theme {
        config.display.theme_color = theme;
    }
    if args.dark {
        config.display.dark_mode = true;
    }
    if args.light {
        config.display.dark_mode = false;
    }
    if let Some(v) = args.show_terbit {
        config.display.show_terbit = v;
    }
    if let Some(v) = args.show_dhuha {
        config.display.show_dhuha = v;
    }
    if let Some(v) = args.show_next_label {
        config.display.show_next_label = v;
    }
    if let Some(mode) = args.background {
        config.background.mode = mode;
    }
    if let Some(minutes) = args.rotation_minutes {
        config.background.rotation_minutes = minutes;
    }
    if let Some(offset) = args.hijri_offset {
        config.display.hijri_offset = offset;
    }
}

fn yes_no(v: bool) -> &'static str {
    if v { "ya" } else { "tidak" }
}
