use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent};
use futures::StreamExt;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::error::{AppError, Result};

/// Application events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key event.
    Key(KeyEvent),
    /// A periodic tick for status expiry.
    Tick,
    /// Terminal resize event (columns, rows).
    Resize(u16, u16),
}

/// Reads terminal events and ticks on the current task.
///
/// Nothing runs in the background: each call to [`next`](Self::next) waits
/// for exactly one event, so the caller finishes handling it before the
/// next one is read.
pub struct EventHandler {
    stream: EventStream,
    ticker: Interval,
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let mut ticker = interval(tick_rate);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            stream: EventStream::new(),
            ticker,
        }
    }

    /// Wait for the next event.
    pub async fn next(&mut self) -> Result<Event> {
        loop {
            tokio::select! {
                _ = self.ticker.tick() => return Ok(Event::Tick),
                maybe = self.stream.next() => match maybe {
                    Some(Ok(CrosstermEvent::Key(key))) => return Ok(Event::Key(key)),
                    Some(Ok(CrosstermEvent::Resize(w, h))) => return Ok(Event::Resize(w, h)),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(AppError::Io(e)),
                    None => return Err(AppError::Terminal("Event stream closed".into())),
                },
            }
        }
    }
}
