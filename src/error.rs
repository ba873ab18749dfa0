use thiserror::Error;

use crate::models::PrayerName;

/// A prayer time string from the source data that is not `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time '{value}' for {prayer}")]
pub struct ParseError {
    pub prayer: PrayerName,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with {code}")]
    Status { code: u16 },

    #[error("invalid data received from API: {0}")]
    InvalidPayload(String),
}

/// Why a day's schedule could not be (re)loaded.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("schedule for {date} has no upcoming prayer")]
    Integrity { date: chrono::NaiveDate },
}

impl ScheduleError {
    /// Message shown on the board when the initial load fails.
    pub fn user_message(&self) -> &'static str {
        match self {
            ScheduleError::Fetch(_) => "Gagal memuat jadwal shalat. Silakan coba lagi.",
            ScheduleError::Parse(_) | ScheduleError::Integrity { .. } => {
                "Data jadwal shalat tidak valid. Silakan coba lagi."
            }
        }
    }
}
