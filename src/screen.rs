//! Terminal driver and cell-drawing surface.
//!
//! A [`Screen`] owns the terminal for the lifetime of a session: raw mode,
//! the alternate screen and cursor visibility are acquired in [`init`] and
//! restored on drop. Drawing goes through a queued stdout writer; nothing
//! reaches the terminal until [`flush`].
//!
//! The dispatch core itself never draws. Handlers and the application tick
//! loop are the callers here.
//!
//! [`init`]: Screen::init
//! [`flush`]: Screen::flush

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use tracing::debug;
use unicode_width::UnicodeWidthChar;

use crate::config::Config;

/// One styled glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    /// A glyph in the terminal's default colors
    pub const fn new(glyph: char) -> Self {
        Self {
            glyph,
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }

    /// A glyph with a foreground color
    pub const fn with_fg(glyph: char, fg: Color) -> Self {
        Self {
            glyph,
            fg,
            bg: Color::Reset,
        }
    }
}

/// Exclusive handle on the terminal display.
pub struct Screen {
    out: Stdout,
    alternate_screen: bool,
    hide_cursor: bool,
    initialized: bool,
}

impl Screen {
    /// Acquire the terminal according to `config`.
    ///
    /// Failure here means the process has no terminal to drive; callers are
    /// expected to abort startup rather than retry.
    pub fn init(config: &Config) -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        let mut out = io::stdout();
        if config.alternate_screen {
            execute!(out, EnterAlternateScreen)?;
        }
        if config.hide_cursor {
            execute!(out, Hide)?;
        }
        if let Some(title) = &config.title {
            execute!(out, SetTitle(title))?;
        }
        execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

        debug!("terminal acquired");
        Ok(Self {
            out,
            alternate_screen: config.alternate_screen,
            hide_cursor: config.hide_cursor,
            initialized: true,
        })
    }

    /// Current terminal size as (cols, rows)
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Queue one styled cell at (x, y).
    pub fn set_cell(&mut self, x: u16, y: u16, cell: Cell) {
        let _ = queue!(
            self.out,
            MoveTo(x, y),
            SetForegroundColor(cell.fg),
            SetBackgroundColor(cell.bg),
            Print(cell.glyph)
        );
    }

    /// Queue a run of text starting at (x, y), advancing by display width.
    pub fn print(&mut self, x: u16, y: u16, fg: Color, bg: Color, text: &str) {
        let mut col = x;
        for glyph in text.chars() {
            let width = glyph.width().unwrap_or(0);
            if width == 0 {
                continue;
            }
            self.set_cell(col, y, Cell { glyph, fg, bg });
            col = col.saturating_add(width as u16);
        }
    }

    /// Queue a full-screen clear in the terminal's default colors.
    pub fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor, Clear(ClearType::All))?;
        Ok(())
    }

    /// Push everything queued so far to the terminal.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Release the terminal. Safe to call more than once.
    pub fn cleanup(&mut self) {
        if !self.initialized {
            return;
        }
        self.initialized = false;

        if self.hide_cursor {
            let _ = execute!(self.out, Show);
        }
        if self.alternate_screen {
            let _ = execute!(self.out, LeaveAlternateScreen);
        }
        let _ = execute!(self.out, ResetColor);
        let _ = terminal::disable_raw_mode();
        let _ = self.out.flush();
        debug!("terminal restored");
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        self.cleanup();
    }
}
