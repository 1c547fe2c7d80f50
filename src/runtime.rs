use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use ratatui::{backend::Backend, Terminal};

use crate::{
    app::{App, Flow},
    clock::Clock,
    ui,
};

pub const TICK_RATE_MS: u64 = 100;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    Key(KeyEvent),
    Paste(String),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, paste, resize)
pub trait EventSource {
    /// Wait up to `timeout` for an event. `Ok(None)` means nothing arrived.
    fn recv_timeout(&self, timeout: Duration) -> io::Result<Option<AppEvent>>;
}

/// Production event source polling crossterm on the calling thread, so no
/// reader outlives the loop that owns the terminal.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrosstermEventSource;

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> io::Result<Option<AppEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        Ok(match event::read()? {
            CtEvent::Key(key) => Some(AppEvent::Key(key)),
            CtEvent::Paste(text) => Some(AppEvent::Paste(text)),
            CtEvent::Resize(_, _) => Some(AppEvent::Resize),
            _ => None,
        })
    }
}

/// Channel-fed event source for tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> io::Result<Option<AppEvent>> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Ok(Some(ev)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => Ok(None),
        }
    }
}

/// Configurable ticker interface
pub trait Ticker {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> io::Result<AppEvent> {
        Ok(self
            .event_source
            .recv_timeout(self.ticker.interval())?
            .unwrap_or(AppEvent::Tick))
    }
}

/// Draw, then redraw after every handled event until the app asks to quit.
/// Ticks change nothing and are not redrawn.
pub fn drive<B, C, E, T>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
    runner: &Runner<E, T>,
) -> io::Result<()>
where
    B: Backend,
    C: Clock,
    E: EventSource,
    T: Ticker,
{
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let event = runner.step()?;
        if event == AppEvent::Tick {
            continue;
        }

        if app.on_event(event) == Flow::Quit {
            break;
        }

        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}
