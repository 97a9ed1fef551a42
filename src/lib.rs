//! termtick - tick-driven terminal input dispatch
//!
//! termtick decouples the asynchronous arrival of terminal input from the
//! synchronous logic that consumes it. A background thread blocks on the
//! terminal event stream and hands events over a rendezvous channel; the
//! application drains them one at a time from its own tick loop, so a burst
//! of keystrokes can never starve rendering or game logic.
//!
//! # Routing
//!
//! Key presses are routed through a [`HandlerRegistry`]: a per-character
//! table, a per-symbolic-key table, and one optional *redirect* slot. While
//! a redirect handler is installed it intercepts every key press — the
//! mechanism behind modal prompts that must capture all input until
//! answered. [`set_redirect`] returns the previous occupant so callers can
//! restore it when the mode ends.
//!
//! # Quick start
//!
//! ```no_run
//! use termtick::{Config, Session};
//!
//! fn main() -> Result<(), termtick::InputError> {
//!     let mut session = Session::new();
//!     session.start(&Config::load())?;
//!
//!     session.on_char('q', |_| std::process::exit(0));
//!
//!     loop {
//!         // At most one event is consumed per call; errors from the
//!         // event backend are reported here without ending the session.
//!         if let Err(e) = session.dispatch_input() {
//!             tracing::error!("input error: {}", e);
//!         }
//!         // ...draw a frame, run application logic...
//!     }
//! }
//! ```
//!
//! [`set_redirect`]: Session::set_redirect

pub mod config;
pub mod event;
pub mod map;
pub mod registry;
pub mod screen;
pub mod session;
pub mod source;

pub use config::Config;
pub use event::{Event, KeyCode, KeyPress, Modifiers};
pub use registry::{handler, Handler, HandlerRegistry};
pub use screen::{Cell, Screen};
pub use session::{InputError, Session};
pub use source::{CrosstermSource, EventSource};
