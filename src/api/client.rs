use chrono::{Datelike, NaiveDate};
use log::{debug, error};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use std::time::Duration;

use crate::api::source::ScheduleSource;
use crate::error::FetchError;
use crate::models::{Location, RawSchedule};

pub const DEFAULT_BASE_URL: &str = "https://api.myquran.com/v2/sholat";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

// ─── Wire format ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    status: bool,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct WireLocation {
    id: String,
    #[serde(default)]
    lokasi: String,
}

#[derive(Debug, Deserialize)]
struct WireScheduleData {
    id: String,
    jadwal: Option<WireJadwal>,
}

#[derive(Debug, Deserialize)]
struct WireJadwal {
    subuh: String,
    terbit: String,
    dhuha: String,
    dzuhur: String,
    ashar: String,
    maghrib: String,
    isya: String,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Blocking client for the myquran.com prayer schedule API.
pub struct MyQuranClient {
    http: Client,
    base_url: String,
    locations: Mutex<Option<Vec<Location>>>,
}

impl MyQuranClient {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("jam-shalat/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            locations: Mutex::new(None),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            error!("GET {} failed with {}", url, status);
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }
        let body = resp.text()?;
        decode_body(&body)
    }
}

/// A body that arrived intact but does not match the wire format is bad data,
/// not a transport failure.
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| {
        error!("Undecodable response body: {}", e);
        FetchError::InvalidPayload(e.to_string())
    })
}

impl ScheduleSource for MyQuranClient {
    fn fetch_locations(&self) -> Result<Vec<Location>, FetchError> {
        if let Ok(cache) = self.locations.lock() {
            if let Some(cached) = cache.as_ref() {
                return Ok(cached.clone());
            }
        }

        let url = format!("{}/kota/semua", self.base_url);
        let envelope: Envelope<Vec<WireLocation>> = self.get_json(&url)?;
        let locations = locations_from_wire(envelope)?;

        if let Ok(mut cache) = self.locations.lock() {
            *cache = Some(locations.clone());
        }
        Ok(locations)
    }

    fn fetch_daily_schedule(&self, location_id: &str, date: NaiveDate) -> Result<RawSchedule, FetchError> {
        let url = format!(
            "{}/jadwal/{}/{}/{:02}/{:02}",
            self.base_url,
            location_id,
            date.year(),
            date.month(),
            date.day()
        );
        let envelope: Envelope<WireScheduleData> = self.get_json(&url)?;
        schedule_from_wire(envelope, date)
    }
}

fn locations_from_wire(envelope: Envelope<Vec<WireLocation>>) -> Result<Vec<Location>, FetchError> {
    if !envelope.status {
        return Err(FetchError::InvalidPayload("location list status is false".into()));
    }
    let data = envelope
        .data
        .ok_or_else(|| FetchError::InvalidPayload("location list is missing".into()))?;
    Ok(data
        .into_iter()
        .map(|l| Location {
            name: if l.lokasi.is_empty() {
                "Unknown Location".to_string()
            } else {
                l.lokasi
            },
            id: l.id,
        })
        .collect())
}

fn schedule_from_wire(envelope: Envelope<WireScheduleData>, date: NaiveDate) -> Result<RawSchedule, FetchError> {
    if !envelope.status {
        return Err(FetchError::InvalidPayload("schedule status is false".into()));
    }
    let data = envelope
        .data
        .ok_or_else(|| FetchError::InvalidPayload("schedule data is missing".into()))?;
    let jadwal = data
        .jadwal
        .ok_or_else(|| FetchError::InvalidPayload("schedule has no jadwal".into()))?;
    Ok(RawSchedule {
        location_id: data.id,
        date,
        subuh: jadwal.subuh,
        terbit: jadwal.terbit,
        dhuha: jadwal.dhuha,
        dzuhur: jadwal.dzuhur,
        ashar: jadwal.ashar,
        maghrib: jadwal.maghrib,
        isya: jadwal.isya,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE_JSON: &str = r#"{
        "status": true,
        "request": {"path": "/sholat/jadwal/1301/2026/10/16"},
        "data": {
            "id": "1301",
            "lokasi": "KOTA JAKARTA",
            "daerah": "DKI JAKARTA",
            "jadwal": {
                "tanggal": "Jumat, 16/10/2026",
                "imsak": "04:07",
                "subuh": "04:17",
                "terbit": "05:29",
                "dhuha": "05:57",
                "dzuhur": "11:38",
                "ashar": "14:50",
                "maghrib": "17:43",
                "isya": "18:53",
                "date": "2026-10-16"
            }
        }
    }"#;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_schedule_from_wire() {
        let envelope: Envelope<WireScheduleData> = serde_json::from_str(SCHEDULE_JSON).unwrap();
        let raw = schedule_from_wire(envelope, date()).unwrap();
        assert_eq!(raw.location_id, "1301");
        assert_eq!(raw.date, date());
        assert_eq!(raw.subuh, "04:17");
        assert_eq!(raw.dhuha, "05:57");
        assert_eq!(raw.isya, "18:53");
    }

    #[test]
    fn test_schedule_without_jadwal_is_invalid() {
        let json = r#"{"status": true, "data": {"id": "1301", "lokasi": "KOTA JAKARTA"}}"#;
        let envelope: Envelope<WireScheduleData> = serde_json::from_str(json).unwrap();
        let err = schedule_from_wire(envelope, date()).unwrap_err();
        assert!(matches!(err, FetchError::InvalidPayload(_)));
    }

    #[test]
    fn test_schedule_with_false_status_is_invalid() {
        let json = r#"{"status": false, "message": "Jadwal tidak ditemukan"}"#;
        let envelope: Envelope<WireScheduleData> = serde_json::from_str(json).unwrap();
        assert!(matches!(
            schedule_from_wire(envelope, date()),
            Err(FetchError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_locations_from_wire() {
        let json = r#"{"status": true, "data": [
            {"id": "0101", "lokasi": "KAB. ACEH BARAT"},
            {"id": "1301", "lokasi": "KOTA JAKARTA"},
            {"id": "9999", "lokasi": ""}
        ]}"#;
        let envelope: Envelope<Vec<WireLocation>> = serde_json::from_str(json).unwrap();
        let locations = locations_from_wire(envelope).unwrap();
        assert_eq!(locations.len(), 3);
        assert_eq!(locations[1].id, "1301");
        assert_eq!(locations[1].name, "KOTA JAKARTA");
        assert_eq!(locations[2].name, "Unknown Location");
    }

    #[test]
    fn test_locations_missing_data_is_invalid() {
        let envelope: Envelope<Vec<WireLocation>> = serde_json::from_str(r#"{"status": true}"#).unwrap();
        assert!(locations_from_wire(envelope).is_err());
    }

    #[test]
    fn test_undecodable_body_is_invalid_payload() {
        let err = decode_body::<Envelope<WireScheduleData>>("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::InvalidPayload(_)));

        let err = decode_body::<Envelope<WireScheduleData>>(r#"{"status": true, "data": {"jadwal": 5}}"#).unwrap_err();
        assert!(matches!(err, FetchError::InvalidPayload(_)));
    }

    #[test]
    fn test_decode_body_reads_envelope() {
        let envelope: Envelope<WireScheduleData> = decode_body(SCHEDULE_JSON).unwrap();
        assert!(envelope.status);
        assert_eq!(schedule_from_wire(envelope, date()).unwrap().isya, "18:53");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = MyQuranClient::new("https://example.test/v2/sholat/").unwrap();
        assert_eq!(client.base_url, "https://example.test/v2/sholat");
    }
}
