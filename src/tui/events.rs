use crossterm::event::{self, Event as CEvent, KeyEvent};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::FetchError;
use crate::models::{Location, RawSchedule};
use crate::schedule::RolloverReply;

const INPUT_POLL: Duration = Duration::from_millis(250);

/// Result of loading today's schedule for a location.
#[derive(Debug)]
pub struct LoadReply {
    pub location_id: String,
    pub generation: u64,
    pub result: Result<RawSchedule, FetchError>,
}

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// One wall-clock second has elapsed.
    Tick,
    RotateBackground,
    LocationsLoaded(Result<Vec<Location>, FetchError>),
    ScheduleLoaded(LoadReply),
    Rollover(RolloverReply),
}

/// Single queue every producer (input, timers, fetch workers) posts into.
/// The event loop drains it one event at a time.
pub struct EventHandler {
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Start forwarding terminal key presses into the queue.
    pub fn spawn_input(&self) {
        let tx = self.tx.clone();
        thread::spawn(move || {
            loop {
                if event::poll(INPUT_POLL).unwrap_or(false) {
                    match event::read() {
                        Ok(CEvent::Key(key)) => {
                            if tx.send(Event::Key(key)).is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(_) => break,
                    }
                }
            }
        });
    }

    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
