//! The terminal viewport the render loop draws into.

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};

/// A drawing surface for whole frames.
pub trait Screen {
    /// Prepares the viewport; called once before the first frame.
    fn enter(&mut self) -> io::Result<()>;

    /// Replaces the visible frame. With `clear` the viewport is wiped first,
    /// otherwise the cursor only returns home and the frame is overwritten.
    fn draw(&mut self, frame: &str, clear: bool) -> io::Result<()>;

    /// Undoes everything `enter` changed. Must be safe to call twice.
    fn leave(&mut self) -> io::Result<()>;
}

/// A crossterm-backed screen on any writer, usually stdout.
pub struct TerminalScreen<W: Write> {
    out: W,
    raw_mode: bool,
    entered: bool,
}

impl TerminalScreen<Stdout> {
    /// A screen on stdout; with `raw_mode` the terminal stops echoing and
    /// delivers keys immediately.
    pub fn stdout(raw_mode: bool) -> Self {
        Self::new(io::stdout(), raw_mode)
    }
}

impl<W: Write> TerminalScreen<W> {
    pub fn new(out: W, raw_mode: bool) -> Self {
        Self {
            out,
            raw_mode,
            entered: false,
        }
    }
}

impl<W: Write> Screen for TerminalScreen<W> {
    fn enter(&mut self) -> io::Result<()> {
        if self.raw_mode {
            terminal::enable_raw_mode()?;
        }
        self.entered = true;
        execute!(self.out, Hide, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn draw(&mut self, frame: &str, clear: bool) -> io::Result<()> {
        if clear {
            queue!(self.out, Clear(ClearType::All))?;
        }
        queue!(self.out, MoveTo(0, 0))?;
        // Raw mode disables output post-processing, so every line needs an
        // explicit carriage return.
        for (i, line) in frame.split('\n').enumerate() {
            if i > 0 {
                self.out.write_all(b"\r\n")?;
            }
            self.out.write_all(line.as_bytes())?;
            queue!(self.out, Clear(ClearType::UntilNewLine))?;
        }
        queue!(self.out, Clear(ClearType::FromCursorDown))?;
        self.out.flush()
    }

    fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        let shown = execute!(self.out, Show);
        if self.raw_mode {
            terminal::disable_raw_mode()?;
        }
        shown?;
        self.out.write_all(b"\r\n")?;
        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalScreen<W> {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_writes_every_line_with_crlf() {
        let mut screen = TerminalScreen::new(Vec::new(), false);
        screen.draw("one\ntwo", false).unwrap();
        let written = String::from_utf8(screen.out.clone()).unwrap();
        assert!(written.contains("one"));
        assert!(written.contains("\r\ntwo"));
    }

    #[test]
    fn leave_without_enter_writes_nothing() {
        let mut screen = TerminalScreen::new(Vec::new(), false);
        screen.leave().unwrap();
        assert!(screen.out.is_empty());
    }

    #[test]
    fn leave_shows_the_cursor_once() {
        let mut screen = TerminalScreen::new(Vec::new(), false);
        screen.enter().unwrap();
        screen.leave().unwrap();
        let after_first = screen.out.len();
        screen.leave().unwrap();
        assert_eq!(screen.out.len(), after_first);
        let written = String::from_utf8(screen.out.clone()).unwrap();
        assert!(written.contains("\x1b[?25h"));
    }
}
