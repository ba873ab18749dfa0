use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::settings::{MAX_ROTATION_MINUTES, MIN_ROTATION_MINUTES};
use crate::config::{BackgroundMode, ThemeColor};

#[derive(Parser, Debug)]
#[command(name = "jam-shalat", version, about = "Jadwal shalat kota-kota Indonesia, langsung di terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a day's prayer times and the next prayer
    Times {
        /// Date to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Location id, defaults to the saved location
        #[arg(long)]
        location: Option<String>,
    },
    /// List locations, optionally filtered by name
    Locations {
        /// Case-insensitive part of the city name
        query: Option<String>,
    },
    /// Save the location the board and `times` use
    Location {
        /// Location id as shown by `locations`
        id: String,
    },
    /// Show or change display settings
    Config(ConfigArgs),
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Accent color: gray, red, yellow, green, blue, indigo, purple, pink
    #[arg(long)]
    pub theme: Option<ThemeColor>,
    /// Use the dark palette
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,
    /// Use the light palette
    #[arg(long)]
    pub light: bool,
    #[arg(long)]
    pub show_terbit: Option<bool>,
    #[arg(long)]
    pub show_dhuha: Option<bool>,
    #[arg(long)]
    pub show_next_label: Option<bool>,
    /// Background rotation: static or auto
    #[arg(long, value_parser = parse_background_mode)]
    pub background: Option<BackgroundMode>,
    /// Minutes between background changes
    #[arg(long, value_parser = clap::value_parser!(u64).range(MIN_ROTATION_MINUTES..=MAX_ROTATION_MINUTES))]
    pub rotation_minutes: Option<u64>,
    /// Days to shift the Hijri date for local moon sighting
    #[arg(long, allow_hyphen_values = true)]
    pub hijri_offset: Option<i32>,
}

impl ConfigArgs {
    pub fn is_empty(&self) -> bool {
        self.theme.is_none()
            && !self.dark
            && !self.light
            && self.show_terbit.is_none()
            && self.show_dhuha.is_none()
            && self.show_next_label.is_none()
            && self.background.is_none()
            && self.rotation_minutes.is_none()
            && self.hijri_offset.is_none()
    }
}

fn parse_background_mode(s: &str) -> Result<BackgroundMode, String> {
    match s.to_lowercase().as_str() {
        "static" | "statis" => Ok(BackgroundMode::Static),
        "auto" | "otomatis" => Ok(BackgroundMode::Auto),
        _ => Err(format!("expected 'static' or 'auto', got '{}'", s)),
    }
}
