use log::debug;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::tui::events::Event;

/// A repeating timer that posts an event every `period`.
///
/// The timer lives exactly as long as the value: dropping it stops the thread
/// and waits for it to exit. Replace the value to change the period.
pub struct Interval {
    name: &'static str,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Interval {
    pub fn start(name: &'static str, period: Duration, tx: Sender<Event>, make: fn() -> Event) -> Self {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tx.send(make()).is_err() {
                            break;
                        }
                    }
                    // Stop requested or owner gone
                    _ => break,
                }
            }
        });
        debug!("{} timer started ({:?})", name, period);
        Self {
            name,
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        debug!("{} timer stopped", self.name);
    }
}
