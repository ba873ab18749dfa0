use chrono::Timelike;

use crate::schedule::formatter::TimedPrayer;

/// Which entry should be highlighted right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    /// Every entry of the day is at or before the current minute; `index` is 0.
    pub all_passed: bool,
}

impl Selection {
    /// Highlight for a day that has not started yet, or is over.
    pub const fn first(all_passed: bool) -> Self {
        Selection {
            index: 0,
            all_passed,
        }
    }
}

/// Minutes since midnight; seconds are discarded.
pub fn minutes_of_day<T: Timelike>(t: &T) -> u16 {
    (t.hour() * 60 + t.minute()) as u16
}

/// First entry strictly after `current_minutes` in canonical order.
pub fn select_next(prayers: &[TimedPrayer], current_minutes: u16) -> Selection {
    match prayers.iter().position(|p| p.time_in_minutes > current_minutes) {
        Some(index) => Selection {
            index,
            all_passed: false,
        },
        None => Selection::first(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prayer::sample_raw;
    use crate::schedule::formatter::{format_schedule, Highlight};
    use chrono::{NaiveDate, NaiveTime};

    fn prayers() -> Vec<TimedPrayer> {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        format_schedule(&sample_raw("1301", date), Highlight::First)
            .unwrap()
            .prayers()
            .to_vec()
    }

    #[test]
    fn test_minutes_of_day_drops_seconds() {
        let t = NaiveTime::from_hms_opt(13, 5, 59).unwrap();
        assert_eq!(minutes_of_day(&t), 785);
        assert_eq!(minutes_of_day(&NaiveTime::MIN), 0);
    }

    #[test]
    fn test_afternoon_selects_ashar() {
        let sel = select_next(&prayers(), 13 * 60);
        assert_eq!(sel, Selection { index: 4, all_passed: false });
    }

    #[test]
    fn test_before_dawn_selects_subuh() {
        let sel = select_next(&prayers(), 0);
        assert_eq!(sel, Selection { index: 0, all_passed: false });
    }

    #[test]
    fn test_late_night_is_all_passed() {
        let sel = select_next(&prayers(), 23 * 60 + 50);
        assert_eq!(sel, Selection { index: 0, all_passed: true });
    }

    #[test]
    fn test_at_last_prayer_minute_is_all_passed() {
        let sel = select_next(&prayers(), 19 * 60 + 15);
        assert!(sel.all_passed);
    }

    #[test]
    fn test_empty_schedule_is_all_passed() {
        assert_eq!(select_next(&[], 600), Selection::first(true));
    }

    #[test]
    fn test_index_never_moves_backward_within_day() {
        let prayers = prayers();
        let mut last = 0;
        for minute in 0..1440u16 {
            let sel = select_next(&prayers, minute);
            if sel.all_passed {
                assert!(minute >= 1155);
                continue;
            }
            assert!(sel.index >= last, "moved back at minute {minute}");
            last = sel.index;
        }
    }
}
