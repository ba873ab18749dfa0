use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use std::cmp::Ordering;

use crate::error::ScheduleError;
use crate::schedule::formatter::{format_schedule, DaySchedule, Highlight};
use crate::schedule::rollover::{target_date, RolloverOutcome, RolloverReply, RolloverRequest};
use crate::schedule::selector::{minutes_of_day, select_next, Selection};

/// Receives every schedule value the reconciler commits.
pub trait ScheduleSink {
    fn on_schedule_replaced(&mut self, schedule: &DaySchedule);

    /// The reconciler no longer has a schedule to show.
    fn on_schedule_cleared(&mut self);
}

/// Where the board is in its daily cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The displayed day is the current calendar day.
    DisplayingToday,
    /// Every prayer has passed and the next day's fetch is in flight.
    RollingOver,
    /// The next day's schedule is displayed before its date has begun.
    DisplayingTomorrow,
    /// A rollover failed; the passed schedule stays until a manual reload.
    Stale,
}

/// Owns the displayed schedule and keeps its highlight in step with the clock.
///
/// Runs on the event-loop thread only. Fetch results arrive as whole values and
/// either replace the schedule or are dropped.
#[derive(Debug)]
pub struct Reconciler {
    schedule: Option<DaySchedule>,
    phase: Phase,
    generation: u64,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            schedule: None,
            phase: Phase::DisplayingToday,
            generation: 0,
        }
    }

    pub fn schedule(&self) -> Option<&DaySchedule> {
        self.schedule.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Drop the current schedule, e.g. while a different location loads.
    /// Any rollover still in flight will be discarded.
    pub fn clear(&mut self, sink: &mut dyn ScheduleSink) {
        self.schedule = None;
        self.phase = Phase::DisplayingToday;
        self.generation += 1;
        sink.on_schedule_cleared();
    }

    /// Install a freshly loaded schedule (initial load, reload, location change).
    pub fn replace(&mut self, schedule: DaySchedule, today: NaiveDate, sink: &mut dyn ScheduleSink) {
        self.generation += 1;
        self.phase = if schedule.date() > today {
            Phase::DisplayingTomorrow
        } else {
            Phase::DisplayingToday
        };
        info!(
            "Schedule for {} on {} installed, next: {}",
            schedule.location_id(),
            schedule.date(),
            schedule.next_prayer().name
        );
        sink.on_schedule_replaced(&schedule);
        self.schedule = Some(schedule);
    }

    /// Re-derive the highlight for `now`.
    ///
    /// Safe to call at any rate: with an unchanged clock minute and schedule it
    /// changes nothing. Returns a request at most once per day transition.
    pub fn tick(&mut self, now: NaiveDateTime, sink: &mut dyn ScheduleSink) -> Option<RolloverRequest> {
        let schedule = self.schedule.as_ref()?;
        let today = now.date();
        let shown = schedule.date();

        if self.phase == Phase::DisplayingTomorrow && today >= shown {
            debug!("{} has begun", shown);
            self.phase = Phase::DisplayingToday;
        }

        let selection = if today < shown {
            Selection::first(false)
        } else if today > shown {
            Selection::first(true)
        } else {
            select_next(schedule.prayers(), minutes_of_day(&now))
        };

        if selection.index != schedule.next_index() {
            let updated = schedule.with_next(selection.index);
            debug!("Next prayer is now {}", updated.next_prayer().name);
            sink.on_schedule_replaced(&updated);
            self.schedule = Some(updated);
        }

        if selection.all_passed && self.phase == Phase::DisplayingToday {
            self.phase = Phase::RollingOver;
            info!("All prayers for {} have passed, rolling over", shown);
            let location_id = self
                .schedule
                .as_ref()
                .map(|s| s.location_id().to_string())
                .unwrap_or_default();
            return Some(RolloverRequest {
                location_id,
                date: target_date(shown, today),
                generation: self.generation,
            });
        }
        None
    }

    /// Apply the result of a rollover fetch.
    ///
    /// `selected_location` is the location chosen at the moment the reply is
    /// processed; a reply for any other location is dropped.
    pub fn complete_rollover(
        &mut self,
        reply: RolloverReply,
        selected_location: Option<&str>,
        now: NaiveDateTime,
        sink: &mut dyn ScheduleSink,
    ) -> RolloverOutcome {
        if reply.generation != self.generation || self.phase != Phase::RollingOver {
            debug!(
                "Dropping rollover reply for {} (generation {}, current {})",
                reply.date, reply.generation, self.generation
            );
            return RolloverOutcome::Discarded;
        }
        if selected_location != Some(reply.location_id.as_str()) {
            debug!("Dropping rollover reply for deselected location {}", reply.location_id);
            self.phase = Phase::Stale;
            return RolloverOutcome::Discarded;
        }

        let target = reply.date;
        match self.build_next_day(reply, now) {
            Ok(schedule) => {
                self.phase = if schedule.date() > now.date() {
                    Phase::DisplayingTomorrow
                } else {
                    Phase::DisplayingToday
                };
                info!("Rolled over to {}", schedule.date());
                sink.on_schedule_replaced(&schedule);
                self.schedule = Some(schedule);
                RolloverOutcome::Applied
            }
            Err(e) => {
                debug!("Rollover to {} failed, keeping the current schedule", target);
                self.phase = Phase::Stale;
                RolloverOutcome::Failed(e)
            }
        }
    }

    fn build_next_day(&self, reply: RolloverReply, now: NaiveDateTime) -> Result<DaySchedule, ScheduleError> {
        let raw = reply.result?;
        let schedule = format_schedule(&raw, Highlight::First)?;
        let already_over = match schedule.date().cmp(&now.date()) {
            Ordering::Less => true,
            Ordering::Equal => select_next(schedule.prayers(), minutes_of_day(&now)).all_passed,
            Ordering::Greater => false,
        };
        if already_over {
            return Err(ScheduleError::Integrity {
                date: schedule.date(),
            });
        }
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::prayer::sample_raw;
    use crate::models::{PrayerName, RawSchedule};
    use chrono::NaiveTime;

    #[derive(Default)]
    struct RecordingSink {
        replaced: Vec<DaySchedule>,
        cleared: usize,
    }

    impl ScheduleSink for RecordingSink {
        fn on_schedule_replaced(&mut self, schedule: &DaySchedule) {
            self.replaced.push(schedule.clone());
        }

        fn on_schedule_cleared(&mut self) {
            self.cleared += 1;
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        day(d).and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn minute(d: u32, total: u32) -> NaiveDateTime {
        at(d, total / 60, total % 60)
    }

    fn loaded(raw: &RawSchedule, now: NaiveDateTime, sink: &mut RecordingSink) -> Reconciler {
        let schedule = format_schedule(raw, Highlight::At(minutes_of_day(&now))).unwrap();
        let mut rec = Reconciler::new();
        rec.replace(schedule, now.date(), sink);
        sink.replaced.clear();
        rec
    }

    fn flagged(rec: &Reconciler) -> Vec<usize> {
        rec.schedule()
            .unwrap()
            .formatted()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_next)
            .map(|(i, _)| i)
            .collect()
    }

    fn reply_for(req: &RolloverRequest, result: Result<RawSchedule, FetchError>) -> RolloverReply {
        RolloverReply {
            location_id: req.location_id.clone(),
            date: req.date,
            generation: req.generation,
            result,
        }
    }

    #[test]
    fn test_tick_without_schedule_is_noop() {
        let mut sink = RecordingSink::default();
        let mut rec = Reconciler::new();
        assert!(rec.tick(at(16, 12, 0), &mut sink).is_none());
        assert!(sink.replaced.is_empty());
    }

    #[test]
    fn test_afternoon_highlights_ashar() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 9, 0), &mut sink);
        assert!(rec.tick(at(16, 13, 0), &mut sink).is_none());
        assert_eq!(rec.schedule().unwrap().next_prayer().name, PrayerName::Ashar);
        assert_eq!(rec.schedule().unwrap().next_index(), 4);
        assert_eq!(sink.replaced.len(), 1);
    }

    #[test]
    fn test_exactly_one_flag_for_every_minute() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 0, 0), &mut sink);
        for m in 0..1440 {
            rec.tick(minute(16, m), &mut sink);
            assert_eq!(flagged(&rec).len(), 1, "minute {m}");
        }
    }

    #[test]
    fn test_repeated_tick_is_idempotent() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 9, 0), &mut sink);
        rec.tick(at(16, 13, 0), &mut sink);
        let after_first = rec.schedule().cloned();
        let replaced = sink.replaced.len();

        assert!(rec.tick(at(16, 13, 0), &mut sink).is_none());
        assert_eq!(rec.schedule().cloned(), after_first);
        assert_eq!(sink.replaced.len(), replaced);
    }

    #[test]
    fn test_seconds_within_a_minute_do_not_change_state() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 11, 59), &mut sink);
        for s in 0..60 {
            let now = day(16).and_time(NaiveTime::from_hms_opt(11, 59, s).unwrap());
            rec.tick(now, &mut sink);
        }
        assert!(sink.replaced.is_empty());
        assert_eq!(rec.schedule().unwrap().next_prayer().name, PrayerName::Dzuhur);
    }

    #[test]
    fn test_highlight_never_moves_backward_before_wrap() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 0, 0), &mut sink);
        let mut last = 0;
        for m in (0..1155).step_by(7) {
            rec.tick(minute(16, m), &mut sink);
            let idx = rec.schedule().unwrap().next_index();
            assert!(idx >= last);
            last = idx;
        }
    }

    #[test]
    fn test_irregular_ticks_jump_to_correct_entry() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 4, 0), &mut sink);
        rec.tick(at(16, 16, 0), &mut sink);
        assert_eq!(rec.schedule().unwrap().next_prayer().name, PrayerName::Maghrib);
        assert_eq!(sink.replaced.len(), 1);
    }

    #[test]
    fn test_late_night_triggers_rollover() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 19, 0), &mut sink);
        let req = rec.tick(at(16, 23, 50), &mut sink).expect("rollover requested");
        assert_eq!(req.location_id, "1301");
        assert_eq!(req.date, day(17));
        assert_eq!(rec.schedule().unwrap().next_index(), 0);
        assert_eq!(rec.phase(), Phase::RollingOver);
    }

    #[test]
    fn test_rollover_triggers_once_across_midnight() {
        let mut raw = sample_raw("1301", day(16));
        raw.isya = "23:59".to_string();
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&raw, minute(16, 1400), &mut sink);

        let mut requests = Vec::new();
        for now in [minute(16, 1438), minute(16, 1439), minute(17, 0), minute(17, 0), minute(17, 1)] {
            if let Some(req) = rec.tick(now, &mut sink) {
                requests.push((now, req));
            }
        }
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, minute(16, 1439));
        assert_eq!(requests[0].1.date, day(17));
    }

    #[test]
    fn test_loaded_after_last_prayer_still_rolls_over() {
        // Formatter falls back to Subuh; the first tick must still ask for tomorrow.
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 22, 0), &mut sink);
        assert_eq!(rec.schedule().unwrap().next_index(), 0);
        assert!(rec.tick(at(16, 22, 0), &mut sink).is_some());
        assert!(rec.tick(at(16, 22, 1), &mut sink).is_none());
    }

    #[test]
    fn test_successful_rollover_shows_tomorrow_from_subuh() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 19, 0), &mut sink);
        let req = rec.tick(at(16, 23, 50), &mut sink).unwrap();
        let reply = reply_for(&req, Ok(sample_raw("1301", day(17))));

        let outcome = rec.complete_rollover(reply, Some("1301"), at(16, 23, 50), &mut sink);
        assert!(matches!(outcome, RolloverOutcome::Applied));
        assert_eq!(rec.phase(), Phase::DisplayingTomorrow);
        let schedule = rec.schedule().unwrap();
        assert_eq!(schedule.date(), day(17));
        assert_eq!(schedule.next_prayer().name, PrayerName::Subuh);

        // Still before midnight: ticking keeps Subuh and asks for nothing.
        assert!(rec.tick(at(16, 23, 59), &mut sink).is_none());
        assert_eq!(rec.schedule().unwrap().next_index(), 0);

        // After midnight the new day is simply "today".
        assert!(rec.tick(at(17, 5, 0), &mut sink).is_none());
        assert_eq!(rec.phase(), Phase::DisplayingToday);
        assert_eq!(rec.schedule().unwrap().next_prayer().name, PrayerName::Terbit);
    }

    #[test]
    fn test_failed_rollover_keeps_stale_schedule_without_retry() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 19, 0), &mut sink);
        let req = rec.tick(at(16, 23, 50), &mut sink).unwrap();
        let replaced = sink.replaced.len();
        let reply = reply_for(&req, Err(FetchError::Status { code: 503 }));

        let outcome = rec.complete_rollover(reply, Some("1301"), at(16, 23, 51), &mut sink);
        assert!(matches!(outcome, RolloverOutcome::Failed(ScheduleError::Fetch(_))));
        assert_eq!(rec.phase(), Phase::Stale);
        assert_eq!(rec.schedule().unwrap().date(), day(16));
        assert_eq!(sink.replaced.len(), replaced);

        assert!(rec.tick(at(16, 23, 52), &mut sink).is_none());
        assert!(rec.tick(at(17, 0, 1), &mut sink).is_none());
    }

    #[test]
    fn test_malformed_rollover_data_is_swallowed() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 19, 0), &mut sink);
        let req = rec.tick(at(16, 23, 50), &mut sink).unwrap();
        let mut raw = sample_raw("1301", day(17));
        raw.dzuhur = "25:99".to_string();

        let outcome = rec.complete_rollover(reply_for(&req, Ok(raw)), Some("1301"), at(16, 23, 51), &mut sink);
        assert!(matches!(outcome, RolloverOutcome::Failed(ScheduleError::Parse(_))));
        assert_eq!(rec.schedule().unwrap().date(), day(16));
    }

    #[test]
    fn test_rollover_already_passed_is_integrity_error() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 19, 0), &mut sink);
        let req = rec.tick(at(16, 23, 50), &mut sink).unwrap();
        let reply = reply_for(&req, Ok(sample_raw("1301", day(17))));

        // Reply processed so late that all of its prayers are behind us.
        let outcome = rec.complete_rollover(reply, Some("1301"), at(17, 21, 0), &mut sink);
        assert!(matches!(outcome, RolloverOutcome::Failed(ScheduleError::Integrity { .. })));
        assert_eq!(rec.phase(), Phase::Stale);
    }

    #[test]
    fn test_rollover_for_other_location_is_discarded() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 19, 0), &mut sink);
        let req = rec.tick(at(16, 23, 50), &mut sink).unwrap();
        let reply = reply_for(&req, Ok(sample_raw("1301", day(17))));

        let outcome = rec.complete_rollover(reply, Some("1638"), at(16, 23, 51), &mut sink);
        assert!(matches!(outcome, RolloverOutcome::Discarded));
        assert_eq!(rec.schedule().unwrap().date(), day(16));
    }

    #[test]
    fn test_rollover_after_replace_is_discarded() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 19, 0), &mut sink);
        let req = rec.tick(at(16, 23, 50), &mut sink).unwrap();

        // User switched city while the fetch was in flight.
        rec.clear(&mut sink);
        assert_eq!(sink.cleared, 1);
        assert!(rec.schedule().is_none());
        let fresh = format_schedule(&sample_raw("1638", day(16)), Highlight::At(1430)).unwrap();
        rec.replace(fresh, day(16), &mut sink);

        let reply = reply_for(&req, Ok(sample_raw("1301", day(17))));
        let outcome = rec.complete_rollover(reply, Some("1638"), at(16, 23, 51), &mut sink);
        assert!(matches!(outcome, RolloverOutcome::Discarded));
        assert_eq!(rec.schedule().unwrap().location_id(), "1638");
    }

    #[test]
    fn test_clear_notifies_sink_and_stops_ticks() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 19, 0), &mut sink);
        rec.clear(&mut sink);
        assert_eq!(sink.cleared, 1);
        assert!(rec.schedule().is_none());
        assert!(rec.tick(at(16, 23, 50), &mut sink).is_none());
        assert!(sink.replaced.is_empty());
    }

    #[test]
    fn test_manual_reload_after_stale_resumes_cycle() {
        let mut sink = RecordingSink::default();
        let mut rec = loaded(&sample_raw("1301", day(16)), at(16, 19, 0), &mut sink);
        let req = rec.tick(at(16, 23, 50), &mut sink).unwrap();
        rec.complete_rollover(
            reply_for(&req, Err(FetchError::InvalidPayload("empty".into()))),
            Some("1301"),
            at(16, 23, 50),
            &mut sink,
        );
        assert_eq!(rec.phase(), Phase::Stale);

        let reloaded = format_schedule(&sample_raw("1301", day(17)), Highlight::At(10)).unwrap();
        rec.replace(reloaded, day(17), &mut sink);
        assert_eq!(rec.phase(), Phase::DisplayingToday);
        assert!(rec.tick(at(17, 19, 20), &mut sink).is_some());
    }
}
