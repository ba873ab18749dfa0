pub mod location;
pub mod prayer;

pub use location::Location;
pub use prayer::{PrayerEntry, PrayerName, RawSchedule};
