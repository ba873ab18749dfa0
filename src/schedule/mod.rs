pub mod clock;
pub mod formatter;
pub mod reconciler;
pub mod rollover;
pub mod selector;

pub use clock::{Clock, SystemClock};
pub use formatter::{format_schedule, DaySchedule, FormattedPrayerEntry, Highlight};
pub use reconciler::{Phase, Reconciler, ScheduleSink};
pub use rollover::{RolloverOutcome, RolloverReply, RolloverRequest};
pub use selector::{minutes_of_day, select_next, Selection};
