use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};

/// One key press as seen by the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    /// A printable character.
    Char(char),
    /// A key that does not decode to a character (arrows, function keys, ...).
    Undecodable,
}

/// Source of the user's answers.
pub trait UserInput {
    /// What: Block until one key is pressed.
    ///
    /// Output:
    /// - The key, or an I/O error (`Interrupted` for Ctrl-C, `UnexpectedEof` when input ended).
    fn wait_key(&mut self) -> io::Result<KeyPress>;

    /// Show `prompt` and read one line of text without its line ending.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

/// Leaves raw mode when dropped, unless raw mode was already on before.
struct RawModeGuard {
    restore: bool,
}

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        let was_raw = is_raw_mode_enabled().unwrap_or(false);
        if !was_raw {
            enable_raw_mode()?;
        }
        Ok(Self { restore: !was_raw })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.restore {
            let _ = disable_raw_mode();
        }
    }
}

/// The controlling terminal: single key presses via crossterm, lines via stdin.
#[derive(Debug, Default)]
pub struct TerminalInput;

/// What: Map a crossterm key event to a menu key press.
///
/// Output:
/// - `None` for events that should be skipped (releases and repeats).
/// - `Err(Interrupted)` for Ctrl-C, which raw mode no longer turns into a signal.
fn decode_key(key: KeyEvent) -> io::Result<Option<KeyPress>> {
    if key.kind != KeyEventKind::Press {
        return Ok(None);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Err(io::Error::new(io::ErrorKind::Interrupted, "keyboard interrupt"));
    }
    Ok(Some(match key.code {
        KeyCode::Char(c) => KeyPress::Char(c),
        _ => KeyPress::Undecodable,
    }))
}

impl UserInput for TerminalInput {
    fn wait_key(&mut self) -> io::Result<KeyPress> {
        let _raw = RawModeGuard::enable()?;
        loop {
            if let Event::Key(key) = event::read()?
                && let Some(press) = decode_key(key)?
            {
                tracing::trace!(?press, "key read");
                return Ok(press);
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        print!("{prompt}");
        io::stdout().flush().ok();
        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted keyboard for tests.

    use std::collections::VecDeque;
    use std::io;

    use super::{KeyPress, UserInput};

    /// Replays queued key presses and lines; records every line prompt.
    #[derive(Debug, Default)]
    pub struct ScriptedInput {
        pub keys: VecDeque<KeyPress>,
        pub lines: VecDeque<String>,
        pub prompts: Vec<String>,
        pub keys_read: usize,
    }

    impl ScriptedInput {
        #[must_use]
        pub fn new(keys: &str, lines: &[&str]) -> Self {
            Self {
                keys: keys.chars().map(KeyPress::Char).collect(),
                lines: lines.iter().map(|s| (*s).to_string()).collect(),
                ..Self::default()
            }
        }
    }

    impl UserInput for ScriptedInput {
        fn wait_key(&mut self) -> io::Result<KeyPress> {
            self.keys_read += 1;
            self.keys
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }

        fn read_line(&mut self, prompt: &str) -> io::Result<String> {
            self.prompts.push(prompt.to_string());
            self.lines
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Key events decode to characters, undecodable keys, skips and interrupts.
    ///
    /// Inputs:
    /// - Press of `a`, press of `Up`, release of `a`, Ctrl-C.
    ///
    /// Output:
    /// - `Char('a')`, `Undecodable`, `None`, `Interrupted` error.
    fn input_decode_key_variants() {
        let press = |code, modifiers| KeyEvent::new(code, modifiers);
        assert_eq!(
            decode_key(press(KeyCode::Char('a'), KeyModifiers::NONE)).expect("ok"),
            Some(KeyPress::Char('a'))
        );
        assert_eq!(
            decode_key(press(KeyCode::Up, KeyModifiers::NONE)).expect("ok"),
            Some(KeyPress::Undecodable)
        );
        let mut release = press(KeyCode::Char('a'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(decode_key(release).expect("ok"), None);
        let err = decode_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)).expect_err("ctrl-c");
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    }
}
