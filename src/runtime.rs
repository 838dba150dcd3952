use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::warn;

use crate::scheduler::{Clock, TimerHandle, TimerQueue};

/// How long to wait for input when no timer is pending.
pub const IDLE_POLL: Duration = Duration::from_millis(250);

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// A scheduled timer came due.
    Timer(TimerHandle),
    /// Nothing happened within the poll interval.
    Idle,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                // Windows reports releases too
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    warn!(%err, "terminal event read failed");
                    break;
                }
            };
            if tx.send(ev).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source fed from a channel
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Multiplexes input events with timer deadlines, one event per step.
pub struct Runner<E: EventSource> {
    event_source: E,
    idle_poll: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self::with_idle_poll(event_source, IDLE_POLL)
    }

    pub fn with_idle_poll(event_source: E, idle_poll: Duration) -> Self {
        Self {
            event_source,
            idle_poll,
        }
    }

    /// Due timers win over input so a burst of keys cannot starve the countdown.
    pub fn step<C: Clock>(&self, timers: &mut TimerQueue<C>) -> AppEvent {
        if let Some(handle) = timers.pop_due() {
            return AppEvent::Timer(handle);
        }

        let timeout = timers
            .time_until_next()
            .map_or(self.idle_poll, |d| d.min(self.idle_poll));

        match self.event_source.recv_timeout(timeout) {
            Ok(ev) => return ev,
            Err(RecvTimeoutError::Timeout) => {}
            // input is gone; keep the countdown alive without spinning
            Err(RecvTimeoutError::Disconnected) => std::thread::sleep(timeout),
        }
        timers.pop_due().map_or(AppEvent::Idle, AppEvent::Timer)
    }
}
