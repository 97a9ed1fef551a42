//! Event sources.
//!
//! The polling thread owns an [`EventSource`] and calls [`next_event`] in an
//! unbounded loop. The call blocks until something happens; there is no
//! "no event" value. [`CrosstermSource`] is the production implementation,
//! translating the crossterm event stream into the dispatch model.
//!
//! [`next_event`]: EventSource::next_event

use crossterm::event::{
    self, Event as CtEvent, KeyCode as CtKeyCode, KeyEvent as CtKeyEvent, KeyEventKind,
};

use crate::event::{Event, KeyCode, KeyPress, Modifiers};

/// Blocking producer of terminal events.
pub trait EventSource {
    /// Fetch the next event, blocking until one is available.
    fn next_event(&mut self) -> Event;
}

/// Event source backed by the crossterm event stream.
#[derive(Debug, Default)]
pub struct CrosstermSource;

impl CrosstermSource {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for CrosstermSource {
    fn next_event(&mut self) -> Event {
        loop {
            match event::read() {
                Ok(raw) => {
                    // Mouse, focus, paste and non-press key events have no
                    // place in the dispatch model; keep reading.
                    if let Some(ev) = translate(raw) {
                        return ev;
                    }
                }
                Err(e) => return Event::Error(e.to_string()),
            }
        }
    }
}

/// Translate a crossterm event, if it has a place in the dispatch model.
fn translate(raw: CtEvent) -> Option<Event> {
    match raw {
        CtEvent::Key(key) => translate_key(&key).map(Event::Key),
        CtEvent::Resize(cols, rows) => Some(Event::Resize { cols, rows }),
        _ => None,
    }
}

fn translate_key(key: &CtKeyEvent) -> Option<KeyPress> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let code = match key.code {
        CtKeyCode::Char(ch) => KeyCode::Char(ch),
        CtKeyCode::Enter => KeyCode::Enter,
        CtKeyCode::Esc => KeyCode::Esc,
        CtKeyCode::Backspace => KeyCode::Backspace,
        CtKeyCode::Tab => KeyCode::Tab,
        CtKeyCode::BackTab => KeyCode::BackTab,
        CtKeyCode::Up => KeyCode::Up,
        CtKeyCode::Down => KeyCode::Down,
        CtKeyCode::Left => KeyCode::Left,
        CtKeyCode::Right => KeyCode::Right,
        CtKeyCode::Home => KeyCode::Home,
        CtKeyCode::End => KeyCode::End,
        CtKeyCode::PageUp => KeyCode::PageUp,
        CtKeyCode::PageDown => KeyCode::PageDown,
        CtKeyCode::Insert => KeyCode::Insert,
        CtKeyCode::Delete => KeyCode::Delete,
        CtKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };
    Some(KeyPress {
        code,
        mods: Modifiers::from(key.modifiers),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key_event(code: CtKeyCode, mods: KeyModifiers) -> CtEvent {
        CtEvent::Key(CtKeyEvent::new(code, mods))
    }

    #[test]
    fn test_char_keys() {
        let translated = translate(key_event(CtKeyCode::Char('a'), KeyModifiers::NONE));
        assert_eq!(translated, Some(Event::Key(KeyPress::ch('a'))));

        let translated = translate(key_event(CtKeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(
            translated,
            Some(Event::Key(KeyPress {
                code: KeyCode::Char('c'),
                mods: Modifiers::CTRL,
            }))
        );
    }

    #[test]
    fn test_symbolic_keys() {
        let translated = translate(key_event(CtKeyCode::Up, KeyModifiers::NONE));
        assert_eq!(translated, Some(Event::Key(KeyPress::plain(KeyCode::Up))));

        let translated = translate(key_event(CtKeyCode::F(5), KeyModifiers::NONE));
        assert_eq!(translated, Some(Event::Key(KeyPress::plain(KeyCode::F(5)))));
    }

    #[test]
    fn test_resize() {
        assert_eq!(
            translate(CtEvent::Resize(120, 40)),
            Some(Event::Resize {
                cols: 120,
                rows: 40
            })
        );
    }

    #[test]
    fn test_release_and_foreign_events_are_skipped() {
        let release = CtEvent::Key(CtKeyEvent::new_with_kind(
            CtKeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert_eq!(translate(release), None);
        assert_eq!(translate(CtEvent::FocusGained), None);
    }
}
