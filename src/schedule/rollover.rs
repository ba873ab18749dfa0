use chrono::NaiveDate;
use log::info;

use crate::api::ScheduleSource;
use crate::error::{FetchError, ScheduleError};
use crate::models::RawSchedule;

/// Ask for the day after the one currently displayed.
///
/// `generation` ties the reply back to the reconciler state that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverRequest {
    pub location_id: String,
    pub date: NaiveDate,
    pub generation: u64,
}

#[derive(Debug)]
pub struct RolloverReply {
    pub location_id: String,
    pub date: NaiveDate,
    pub generation: u64,
    pub result: Result<RawSchedule, FetchError>,
}

/// What happened when a reply reached the reconciler.
#[derive(Debug)]
pub enum RolloverOutcome {
    /// Tomorrow's schedule is now displayed with Subuh highlighted.
    Applied,
    /// The reply belongs to a superseded schedule or location.
    Discarded,
    /// Fetch or data failure; the previous schedule stays on screen.
    Failed(ScheduleError),
}

impl RolloverRequest {
    /// Perform the fetch. Blocks; run this on a worker thread.
    pub fn execute(self, source: &dyn ScheduleSource) -> RolloverReply {
        info!("Fetching next day's schedule for {} ({})", self.location_id, self.date);
        let result = source.fetch_daily_schedule(&self.location_id, self.date);
        RolloverReply {
            location_id: self.location_id,
            date: self.date,
            generation: self.generation,
            result,
        }
    }
}

/// The day to fetch once `displayed` is over, as seen on `today`.
///
/// Normally the day after `displayed`; if the board missed whole days (e.g.
/// the machine slept) it jumps straight to `today`.
pub fn target_date(displayed: NaiveDate, today: NaiveDate) -> NaiveDate {
    if today > displayed {
        today
    } else {
        displayed.succ_opt().unwrap_or(displayed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prayer::sample_raw;
    use crate::models::Location;
    use std::sync::Mutex;

    struct RecordingSource {
        calls: Mutex<Vec<(String, NaiveDate)>>,
    }

    impl ScheduleSource for RecordingSource {
        fn fetch_locations(&self) -> Result<Vec<Location>, FetchError> {
            Ok(vec![])
        }

        fn fetch_daily_schedule(&self, location_id: &str, date: NaiveDate) -> Result<RawSchedule, FetchError> {
            self.calls.lock().unwrap().push((location_id.to_string(), date));
            Ok(sample_raw(location_id, date))
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[test]
    fn test_target_date_is_next_day() {
        assert_eq!(target_date(d(16), d(16)), d(17));
    }

    #[test]
    fn test_target_date_after_missed_days_is_today() {
        assert_eq!(target_date(d(16), d(17)), d(17));
        assert_eq!(target_date(d(16), d(20)), d(20));
    }

    #[test]
    fn test_execute_fetches_requested_day() {
        let source = RecordingSource {
            calls: Mutex::new(vec![]),
        };
        let request = RolloverRequest {
            location_id: "1301".to_string(),
            date: d(17),
            generation: 4,
        };
        let reply = request.execute(&source);
        assert_eq!(reply.generation, 4);
        assert_eq!(reply.result.unwrap().date, d(17));
        assert_eq!(
            source.calls.lock().unwrap().as_slice(),
            &[("1301".to_string(), d(17))]
        );
    }
}
