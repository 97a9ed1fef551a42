//! Handler routing tables.
//!
//! Two mappings — printable character to handler, symbolic key to handler —
//! plus one optional redirect slot. While a redirect handler is installed it
//! receives every key press and the tables are bypassed entirely.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::event::{Event, KeyCode};

/// Callback invoked with the event that triggered it.
///
/// Handlers have no return value; failures must be contained inside the
/// callback. The dispatch loop additionally guards each invocation against
/// panics.
pub type Handler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Default)]
struct Tables {
    chars: HashMap<char, Handler>,
    keys: HashMap<KeyCode, Handler>,
    redirect: Option<Handler>,
}

/// Routing tables shared between application setup code and the dispatch
/// loop.
///
/// Every operation takes the internal lock exactly once and never blocks on
/// I/O. Registrations and lookups cannot fail: re-binding replaces, a missed
/// lookup is a normal outcome.
#[derive(Default)]
pub struct HandlerRegistry {
    inner: Mutex<Tables>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind a handler to a printable character. Last binding wins.
    pub fn bind_char<F>(&self, ch: char, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.tables().chars.insert(ch, Arc::new(handler));
    }

    /// Bind a handler to a key. Last binding wins.
    ///
    /// `KeyCode::Char` bindings land in the character table, so the two
    /// tables never shadow each other.
    pub fn bind_key<F>(&self, key: KeyCode, handler: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let mut tables = self.tables();
        match key {
            KeyCode::Char(ch) => {
                tables.chars.insert(ch, handler);
            }
            key => {
                tables.keys.insert(key, handler);
            }
        }
    }

    /// Install (or clear) the redirect handler, returning the previous
    /// occupant.
    ///
    /// One slot only: a caller that overrides an existing redirect must keep
    /// the returned handler and re-install it when done.
    pub fn set_redirect(&self, handler: Option<Handler>) -> Option<Handler> {
        debug!("changing input redirect (installed: {})", handler.is_some());
        std::mem::replace(&mut self.tables().redirect, handler)
    }

    /// Whether a redirect handler is currently installed.
    pub fn has_redirect(&self) -> bool {
        self.tables().redirect.is_some()
    }

    /// Resolve the handler for an event.
    ///
    /// Key presses go to the redirect handler while one is installed,
    /// regardless of their character or key identity; otherwise to the
    /// character table for `Char` codes and the key table for the rest.
    /// The handler is cloned out so the caller invokes it with no lock
    /// held and handlers may re-enter the registry.
    pub fn lookup(&self, event: &Event) -> Option<Handler> {
        let Event::Key(press) = event else {
            return None;
        };
        let tables = self.tables();
        if let Some(redirect) = &tables.redirect {
            return Some(redirect.clone());
        }
        match press.code {
            KeyCode::Char(ch) => tables.chars.get(&ch).cloned(),
            key => tables.keys.get(&key).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyPress;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(counter: Arc<AtomicUsize>) -> impl Fn(&Event) + Send + Sync {
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fire(registry: &HandlerRegistry, event: &Event) {
        if let Some(handler) = registry.lookup(event) {
            handler(event);
        }
    }

    #[test]
    fn test_char_and_key_tables_are_separate() {
        let registry = HandlerRegistry::new();
        let chars = Arc::new(AtomicUsize::new(0));
        let keys = Arc::new(AtomicUsize::new(0));
        registry.bind_char('q', counting_handler(chars.clone()));
        registry.bind_key(KeyCode::Enter, counting_handler(keys.clone()));

        fire(&registry, &Event::Key(KeyPress::ch('q')));
        fire(&registry, &Event::Key(KeyPress::plain(KeyCode::Enter)));

        assert_eq!(chars.load(Ordering::SeqCst), 1);
        assert_eq!(keys.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_binding_is_not_an_error() {
        let registry = HandlerRegistry::new();
        assert!(registry.lookup(&Event::Key(KeyPress::ch('z'))).is_none());
        assert!(registry
            .lookup(&Event::Resize { cols: 80, rows: 24 })
            .is_none());
    }

    #[test]
    fn test_rebinding_replaces_previous_handler() {
        let registry = HandlerRegistry::new();
        let old = Arc::new(AtomicUsize::new(0));
        let new = Arc::new(AtomicUsize::new(0));
        registry.bind_char('x', counting_handler(old.clone()));
        registry.bind_char('x', counting_handler(new.clone()));

        fire(&registry, &Event::Key(KeyPress::ch('x')));

        assert_eq!(old.load(Ordering::SeqCst), 0);
        assert_eq!(new.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bind_key_char_routes_to_char_table() {
        let registry = HandlerRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        registry.bind_key(KeyCode::Char('a'), counting_handler(count.clone()));

        fire(&registry, &Event::Key(KeyPress::ch('a')));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_redirect_bypasses_tables() {
        let registry = HandlerRegistry::new();
        let table = Arc::new(AtomicUsize::new(0));
        let redirect = Arc::new(AtomicUsize::new(0));
        registry.bind_char('q', counting_handler(table.clone()));

        let prev = registry.set_redirect(Some(handler(counting_handler(redirect.clone()))));
        assert!(prev.is_none());

        // Bound character and unbound symbolic key both reach the redirect.
        fire(&registry, &Event::Key(KeyPress::ch('q')));
        fire(&registry, &Event::Key(KeyPress::plain(KeyCode::Esc)));

        assert_eq!(table.load(Ordering::SeqCst), 0);
        assert_eq!(redirect.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_set_redirect_returns_previous_for_restore() {
        let registry = HandlerRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        registry.set_redirect(Some(handler(counting_handler(first.clone()))));
        let prev = registry
            .set_redirect(Some(handler(counting_handler(second.clone()))))
            .expect("first redirect should be returned");

        // Restore the saved handler and confirm it receives input again.
        registry.set_redirect(Some(prev));
        fire(&registry, &Event::Key(KeyPress::ch('q')));

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_clearing_redirect_restores_table_routing() {
        let registry = HandlerRegistry::new();
        let table = Arc::new(AtomicUsize::new(0));
        registry.bind_char('q', counting_handler(table.clone()));

        registry.set_redirect(Some(handler(|_| {})));
        assert!(registry.has_redirect());
        registry.set_redirect(None);
        assert!(!registry.has_redirect());

        fire(&registry, &Event::Key(KeyPress::ch('q')));
        assert_eq!(table.load(Ordering::SeqCst), 1);
    }
}
