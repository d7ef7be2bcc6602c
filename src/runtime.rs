use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Events the UI loop reacts to
#[derive(Clone, Debug)]
pub enum UiEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<UiEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread
pub struct TerminalEventSource {
    rx: Receiver<UiEvent>,
}

impl TerminalEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                // Windows reports both press and release
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => UiEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => UiEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!(error = %e, "terminal event reader stopped");
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

impl Default for TerminalEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for TerminalEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<UiEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Event source fed from a channel, for headless driving
pub struct ChannelEventSource {
    rx: Receiver<UiEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<UiEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<UiEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the UI one event or tick at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    tick: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, tick: Duration) -> Self {
        Self { event_source, tick }
    }

    /// Blocks up to the tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> UiEvent {
        match self.event_source.recv_timeout(self.tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => UiEvent::Tick,
        }
    }
}
