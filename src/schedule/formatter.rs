use chrono::NaiveDate;
use std::sync::Arc;

use crate::error::ParseError;
use crate::models::{PrayerName, RawSchedule};

/// How the initial "next" entry of a freshly formatted day is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// First entry strictly after this minute-of-day, else the earliest entry.
    At(u16),
    /// Always the first canonical entry (a day that has not started yet).
    First,
}

/// A prayer time parsed into its sortable minute-of-day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedPrayer {
    pub name: PrayerName,
    pub time: String,
    pub time_in_minutes: u16,
}

/// Display row: a prayer plus whether it is the highlighted "next" one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPrayerEntry {
    pub name: PrayerName,
    pub time: String,
    pub time_in_minutes: u16,
    pub is_next: bool,
}

/// One day of prayers for one location.
///
/// The prayers are immutable and shared; the highlighted entry is a single
/// index, so exactly one row is ever flagged. Changing the highlight produces a
/// new value via [`DaySchedule::with_next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    location_id: String,
    date: NaiveDate,
    prayers: Arc<[TimedPrayer]>,
    next: usize,
}

impl DaySchedule {
    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn prayers(&self) -> &[TimedPrayer] {
        &self.prayers
    }

    pub fn next_index(&self) -> usize {
        self.next
    }

    pub fn next_prayer(&self) -> &TimedPrayer {
        &self.prayers[self.next]
    }

    pub fn with_next(&self, index: usize) -> DaySchedule {
        debug_assert!(index < self.prayers.len());
        DaySchedule {
            location_id: self.location_id.clone(),
            date: self.date,
            prayers: Arc::clone(&self.prayers),
            next: index,
        }
    }

    /// Rows in canonical order with the display flag derived from the index.
    pub fn formatted(&self) -> Vec<FormattedPrayerEntry> {
        self.prayers
            .iter()
            .enumerate()
            .map(|(i, p)| FormattedPrayerEntry {
                name: p.name,
                time: p.time.clone(),
                time_in_minutes: p.time_in_minutes,
                is_next: i == self.next,
            })
            .collect()
    }
}

/// Parse a strict two-digit `HH:MM` into minutes since midnight.
pub fn parse_hhmm(prayer: PrayerName, value: &str) -> Result<u16, ParseError> {
    let err = || ParseError {
        prayer,
        value: value.to_string(),
    };

    let (h, m) = value.split_once(':').ok_or_else(err)?;
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(h) || !two_digits(m) {
        return Err(err());
    }

    let hours: u16 = h.parse().map_err(|_| err())?;
    let minutes: u16 = m.parse().map_err(|_| err())?;
    if hours > 23 || minutes > 59 {
        return Err(err());
    }
    Ok(hours * 60 + minutes)
}

/// Turn a raw day into a [`DaySchedule`]. Any malformed time aborts the whole day.
pub fn format_schedule(raw: &RawSchedule, highlight: Highlight) -> Result<DaySchedule, ParseError> {
    let prayers = raw
        .entries()
        .into_iter()
        .map(|entry| {
            let time_in_minutes = parse_hhmm(entry.name, &entry.time)?;
            Ok(TimedPrayer {
                name: entry.name,
                time: entry.time,
                time_in_minutes,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    let next = match highlight {
        Highlight::First => 0,
        Highlight::At(current) => prayers
            .iter()
            .position(|p| p.time_in_minutes > current)
            .unwrap_or_else(|| earliest_index(&prayers)),
    };

    Ok(DaySchedule {
        location_id: raw.location_id.clone(),
        date: raw.date,
        prayers: prayers.into(),
        next,
    })
}

/// Index of the smallest time; the first one wins on ties.
fn earliest_index(prayers: &[TimedPrayer]) -> usize {
    prayers
        .iter()
        .enumerate()
        .min_by(|(ia, a), (ib, b)| a.time_in_minutes.cmp(&b.time_in_minutes).then(ia.cmp(ib)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
