//! Raw keyboard input sources.
//!
//! A `KeySource` performs a blocking read and yields one decoded `Key` at a
//! time. The engine drives it from a dedicated thread, so implementations
//! never need to be async. Which source to use is decided once at startup by
//! [`default_source`].

use crate::common::Key;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io::{self, IsTerminal, Read};

const ESC: u8 = 0x1b;

/// A blocking supplier of decoded keys.
pub trait KeySource: Send + 'static {
    /// Blocks until the next key. `Ok(None)` means the source is exhausted.
    fn next_key(&mut self) -> io::Result<Option<Key>>;
}

impl KeySource for Box<dyn KeySource> {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        (**self).next_key()
    }
}

/// Decodes one read of up to three raw bytes.
///
/// `ESC [ D` and `ESC [ C` become the arrow sentinels; any other escape
/// sequence yields a lone `ESC`; otherwise the first byte passes through.
pub fn decode_bytes(buf: &[u8]) -> Option<Key> {
    match buf {
        [] => None,
        [ESC, b'[', b'D'] => Some(Key::Left),
        [ESC, b'[', b'C'] => Some(Key::Right),
        [ESC, b'[', _] => Some(Key::Byte(ESC)),
        [first, ..] => Some(Key::Byte(*first)),
    }
}

/// Reads raw bytes from stdin, or any reader. Used when stdin is not a
/// terminal.
///
/// A read may deliver several keys at once; the bytes beyond the first key
/// are kept and decoded on later calls.
pub struct StdinKeySource<R = io::Stdin> {
    input: R,
    pending: Vec<u8>,
}

impl StdinKeySource {
    pub fn new() -> Self {
        Self::from_reader(io::stdin())
    }
}

impl Default for StdinKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Read> StdinKeySource<R> {
    pub fn from_reader(input: R) -> Self {
        Self {
            input,
            pending: Vec::new(),
        }
    }
}

impl<R: Read + Send + 'static> KeySource for StdinKeySource<R> {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        if self.pending.is_empty() {
            let mut buf = [0u8; 64];
            let n = loop {
                match self.input.read(&mut buf) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            if n == 0 {
                return Ok(None);
            }
            self.pending.extend_from_slice(&buf[..n]);
        }

        // Only an `ESC [` prefix spans more than one byte.
        let take = if self.pending.starts_with(&[ESC, b'[']) {
            self.pending.len().min(3)
        } else {
            1
        };
        let key = decode_bytes(&self.pending[..take]);
        self.pending.drain(..take);
        Ok(key)
    }
}

/// Decodes crossterm key events. Requires the terminal to be in raw mode,
/// which the `TerminalScreen` takes care of.
pub struct CrosstermKeySource;

impl CrosstermKeySource {
    /// Maps a crossterm event to a key; `None` for events the loop ignores.
    pub fn translate(event: Event) -> Option<Key> {
        let Event::Key(key) = event else {
            return None;
        };
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Key::Interrupt)
            }
            KeyCode::Char(c) if c.is_ascii() => Some(Key::Byte(c as u8)),
            KeyCode::Enter => Some(Key::Byte(b'\r')),
            KeyCode::Esc => Some(Key::Byte(ESC)),
            _ => None,
        }
    }
}

impl KeySource for CrosstermKeySource {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        loop {
            if let Some(key) = Self::translate(event::read()?) {
                return Ok(Some(key));
            }
        }
    }
}

/// Picks the key source for this process and reports whether it needs raw mode.
pub fn default_source() -> (Box<dyn KeySource>, bool) {
    if io::stdin().is_terminal() {
        (Box::new(CrosstermKeySource), true)
    } else {
        (Box::new(StdinKeySource::new()), false)
    }
}
