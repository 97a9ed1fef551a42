//! Terminal session: lifecycle, event polling and input dispatch.
//!
//! A [`Session`] ties together the three halves of the input core:
//!
//! - a background thread blocking on an [`EventSource`]
//! - a rendezvous channel carrying events to the dispatch side one at a time
//! - a non-blocking dispatch step driven from the application's tick loop
//!
//! ```text
//! EventSource ──(polling thread)──> channel ──dispatch_input()──> Handler
//!                                                 │
//!                                                 ├─ redirect handler, if installed
//!                                                 └─ char / key tables otherwise
//! ```
//!
//! Exactly two flows touch a session: the polling thread, which may suspend
//! indefinitely inside the blocking fetch, and the dispatch caller, which
//! never suspends. Events arrive in the order the source produced them.

use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::event::{Event, KeyCode};
use crate::registry::{Handler, HandlerRegistry};
use crate::screen::Screen;
use crate::source::{CrosstermSource, EventSource};

#[derive(Error, Debug)]
pub enum InputError {
    /// The terminal could not be acquired. Fatal: there is no session to
    /// run without a terminal to drive.
    #[error("failed to initialize terminal driver: {0}")]
    DriverInit(#[source] io::Error),

    /// The event source reported a failure. Scoped to one dispatch
    /// invocation; the session stays usable.
    #[error("event source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, InputError>;

/// Callback invoked with the new (cols, rows) when the terminal is resized.
pub type ResizeHook = Box<dyn FnMut(u16, u16) + Send>;

/// An interactive terminal session.
///
/// Owns the event channel, the handler registry and the terminal driver.
/// Created once at startup and torn down (explicitly via [`stop`], or on
/// drop) when the interactive session ends.
///
/// [`stop`]: Session::stop
pub struct Session {
    registry: Arc<HandlerRegistry>,
    events: Option<Receiver<Event>>,
    running: Arc<AtomicBool>,
    resize_hook: Option<ResizeHook>,
    screen: Option<Screen>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(HandlerRegistry::new()),
            events: None,
            running: Arc::new(AtomicBool::new(false)),
            resize_hook: None,
            screen: None,
        }
    }

    /// Acquire the terminal and start polling for input.
    ///
    /// Fails only if the terminal driver cannot be initialized; there is no
    /// recovery path from that.
    pub fn start(&mut self, config: &Config) -> Result<()> {
        let screen = Screen::init(config).map_err(InputError::DriverInit)?;
        self.screen = Some(screen);
        self.attach_source(CrosstermSource::new());
        info!("terminal session started");
        Ok(())
    }

    /// Spawn the polling thread for `source`.
    ///
    /// [`start`] calls this with the crossterm backend. Callable directly
    /// with a custom source for headless use — embedding, or driving a
    /// session from scripted input in tests.
    ///
    /// The channel is a rendezvous: at most one event is in flight, and the
    /// thread blocks in the handoff until the dispatch side takes it. No
    /// event fetched while the session is running is ever dropped.
    ///
    /// [`start`]: Session::start
    pub fn attach_source<S>(&mut self, mut source: S)
    where
        S: EventSource + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<Event>(0);
        self.events = Some(rx);
        self.running.store(true, Ordering::SeqCst);

        let running = self.running.clone();
        thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                let event = source.next_event();
                // Receiver gone means the session was torn down.
                if tx.send(event).is_err() {
                    break;
                }
            }
        });
    }

    /// The routing tables, shareable with setup code on another thread.
    pub fn registry(&self) -> Arc<HandlerRegistry> {
        self.registry.clone()
    }

    /// Bind a handler to a printable character. Last binding wins.
    pub fn on_char<F>(&self, ch: char, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.registry.bind_char(ch, handler);
    }

    /// Bind a handler to a symbolic key. Last binding wins.
    pub fn on_key<F>(&self, key: KeyCode, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.registry.bind_key(key, handler);
    }

    /// Install (or clear) the redirect handler, returning the previous
    /// occupant so the caller can restore it later.
    ///
    /// While installed, the redirect receives every key press ahead of the
    /// per-character and per-key tables.
    pub fn set_redirect(&self, handler: Option<Handler>) -> Option<Handler> {
        self.registry.set_redirect(handler)
    }

    /// Replace the resize notification callback (default: none).
    pub fn set_resize_hook<F>(&mut self, hook: F)
    where
        F: FnMut(u16, u16) + Send + 'static,
    {
        self.resize_hook = Some(Box::new(hook));
    }

    /// The drawing surface, present while the session is started.
    pub fn screen(&mut self) -> Option<&mut Screen> {
        self.screen.as_mut()
    }

    /// Whether the polling thread is still live.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Consume and route at most one pending event.
    ///
    /// Never blocks: returns `Ok(false)` when nothing is pending, `Ok(true)`
    /// when one event was consumed. Callers wanting to drain the queue
    /// invoke this repeatedly, typically once per application tick so a
    /// burst of input cannot starve rendering or game logic.
    ///
    /// A key press with no matching handler is consumed silently. An
    /// [`Event::Error`] surfaces as `Err`; the session is not torn down and
    /// later invocations dispatch normally.
    pub fn dispatch_input(&mut self) -> Result<bool> {
        let Some(events) = &self.events else {
            return Ok(false);
        };

        let event = match events.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => return Ok(false),
            Err(TryRecvError::Disconnected) => {
                self.running.store(false, Ordering::SeqCst);
                return Ok(false);
            }
        };

        match event {
            Event::Key(press) => {
                debug!("key press: {:?}", press);
                let event = Event::Key(press);
                match self.registry.lookup(&event) {
                    Some(handler) => invoke(&handler, &event),
                    None => debug!("no handler bound for {:?}", press.code),
                }
            }
            Event::Resize { cols, rows } => {
                debug!("terminal resized to {}x{}", cols, rows);
                if let Some(hook) = &mut self.resize_hook {
                    hook(cols, rows);
                }
            }
            Event::Error(msg) => return Err(InputError::Source(msg)),
        }

        Ok(true)
    }

    /// Release the terminal and signal the polling thread to stop.
    ///
    /// The thread observes the flag at its next event boundary; if it is
    /// parked inside the blocking fetch it is left behind until process
    /// exit. No further events matter once the driver is released, so the
    /// abandonment costs nothing but the thread itself.
    pub fn stop(&mut self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("terminal session stopped");
        }
        // Dropping the receiver disconnects the channel, so a sender parked
        // in the handoff exits instead of waiting for another event.
        self.events = None;
        self.screen = None;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run a handler, containing any panic so one misbehaving callback cannot
/// take down the dispatch loop.
fn invoke(handler: &Handler, event: &Event) {
    if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
        warn!("input handler panicked on {:?}", event);
    }
}
