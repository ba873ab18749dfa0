use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Subuh,
    Terbit,
    Dhuha,
    Dzuhur,
    Ashar,
    Maghrib,
    Isya,
}

impl PrayerName {
    /// Canonical display order. Schedules are never re-sorted.
    pub const ALL: [PrayerName; 7] = [
        PrayerName::Subuh,
        PrayerName::Terbit,
        PrayerName::Dhuha,
        PrayerName::Dzuhur,
        PrayerName::Ashar,
        PrayerName::Maghrib,
        PrayerName::Isya,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Subuh => "Subuh",
            PrayerName::Terbit => "Terbit",
            PrayerName::Dhuha => "Dhuha",
            PrayerName::Dzuhur => "Dzuhur",
            PrayerName::Ashar => "Ashar",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isya => "Isya",
        }
    }

    /// Terbit and Dhuha are markers rather than obligatory prayers and can be hidden.
    pub fn is_optional(&self) -> bool {
        matches!(self, PrayerName::Terbit | PrayerName::Dhuha)
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One named prayer time exactly as the source delivered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerEntry {
    pub name: PrayerName,
    pub time: String,
}

/// A single calendar day of raw `"HH:MM"` times for one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSchedule {
    pub location_id: String,
    pub date: NaiveDate,
    pub subuh: String,
    pub terbit: String,
    pub dhuha: String,
    pub dzuhur: String,
    pub ashar: String,
    pub maghrib: String,
    pub isya: String,
}

impl RawSchedule {
    /// The seven entries in canonical order.
    pub fn entries(&self) -> Vec<PrayerEntry> {
        PrayerName::ALL
            .iter()
            .map(|&name| PrayerEntry {
                name,
                time: self.time_of(name).to_string(),
            })
            .collect()
    }

    pub fn time_of(&self, name: PrayerName) -> &str {
        match name {
            PrayerName::Subuh => &self.subuh,
            PrayerName::Terbit => &self.terbit,
            PrayerName::Dhuha => &self.dhuha,
            PrayerName::Dzuhur => &self.dzuhur,
            PrayerName::Ashar => &self.ashar,
            PrayerName::Maghrib => &self.maghrib,
            PrayerName::Isya => &self.isya,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_raw(location_id: &str, date: NaiveDate) -> RawSchedule {
    RawSchedule {
        location_id: location_id.to_string(),
        date,
        subuh: "04:30".to_string(),
        terbit: "05:45".to_string(),
        dhuha: "06:15".to_string(),
        dzuhur: "12:00".to_string(),
        ashar: "15:30".to_string(),
        maghrib: "18:00".to_string(),
        isya: "19:15".to_string(),
    }
}
