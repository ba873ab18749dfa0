use chrono::NaiveDate;

use crate::error::FetchError;
use crate::models::{Location, RawSchedule};

/// Where locations and daily schedules come from.
///
/// Implementations block; callers run them off the event-loop thread.
pub trait ScheduleSource: Send + Sync {
    fn fetch_locations(&self) -> Result<Vec<Location>, FetchError>;

    fn fetch_daily_schedule(&self, location_id: &str, date: NaiveDate) -> Result<RawSchedule, FetchError>;
}
