//! Single-keystroke text menus printed through the console log.
//!
//! A [`TextMenu`] never prints directly; every line goes out as an INFO (or WARN)
//! event on [`CONSOLE_TARGET`], so the log files record exactly what the user saw.

use std::io;

use crate::logging::CONSOLE_TARGET;
use crate::logging::highlight::{Highlight, Highlighter, display_width};

/// Keyboard access for menus.
pub mod input;

pub use input::{KeyPress, TerminalInput, UserInput};

/// Width of the separator line, in characters.
pub const SEPARATOR_WIDTH: usize = 42;
/// Character the separator line is made of.
pub const SEPARATOR_CHAR: char = '·';

/// One selectable entry: the key to press and what it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    /// Upper-case key letter.
    pub key: char,
    /// Description shown next to the key.
    pub text: String,
}

impl MenuOption {
    /// New option; the key is stored upper-case.
    #[must_use]
    pub fn new(key: char, text: impl Into<String>) -> Self {
        Self {
            key: key.to_ascii_uppercase(),
            text: text.into(),
        }
    }
}

/// A named menu with a multi-line heading.
#[derive(Debug)]
pub struct TextMenu<'h> {
    name: String,
    heading: String,
    highlighter: &'h Highlighter,
}

fn blank() {
    tracing::info!(target: CONSOLE_TARGET, "");
}

impl<'h> TextMenu<'h> {
    /// New menu; nothing is printed until one of the `show_*` methods is called.
    #[must_use]
    pub fn new(name: impl Into<String>, heading: impl Into<String>, highlighter: &'h Highlighter) -> Self {
        Self {
            name: name.into(),
            heading: heading.into(),
            highlighter,
        }
    }

    /// Menu name, used in diagnostics only.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Print the heading line by line.
    pub fn show_heading(&self) {
        tracing::debug!(menu = %self.name, "showing heading");
        for line in self.heading.lines() {
            tracing::info!(target: CONSOLE_TARGET, "{line}");
        }
    }

    /// Print a blank line followed by the separator.
    pub fn show_separator(&self) {
        blank();
        let line: String = std::iter::repeat_n(SEPARATOR_CHAR, SEPARATOR_WIDTH).collect();
        tracing::info!(target: CONSOLE_TARGET, "{line}");
    }

    /// Print the reason for showing the menu as a highlighted warning.
    pub fn show_reason(&self, reason: &str) {
        blank();
        tracing::warn!(target: CONSOLE_TARGET, "{}", self.highlighter.warn(reason));
    }

    /// What: Print an explanatory comment aligned with the text of the reason.
    ///
    /// Details:
    /// - Each line is indented by the visible width of the warning marker.
    pub fn show_comment(&self, comment: &str) {
        let indent = " ".repeat(display_width(&self.highlighter.warn("")));
        for line in comment.lines() {
            tracing::info!(target: CONSOLE_TARGET, "{indent}{line}");
        }
        blank();
    }

    /// Print the options, one per line, keys highlighted.
    pub fn show_options(&self, options: &[MenuOption]) {
        for option in options {
            let key = self
                .highlighter
                .paint(Highlight::Choice, &format!("({})", option.key));
            tracing::info!(target: CONSOLE_TARGET, "     {key} {}", option.text);
        }
        blank();
    }

    /// What: Show `options` and block until one of their keys is pressed.
    ///
    /// Inputs:
    /// - `options`: Allowed choices.
    /// - `input`: Keyboard source.
    ///
    /// Output:
    /// - The chosen key, upper-case; input errors (including Ctrl-C) are returned as-is.
    ///
    /// Details:
    /// - Letters are matched case-insensitively.
    /// - Keys outside `options` and undecodable keys are ignored.
    pub fn choose_from(&self, options: &[MenuOption], input: &mut dyn UserInput) -> io::Result<char> {
        self.show_options(options);
        loop {
            match input.wait_key()? {
                KeyPress::Char(c) => {
                    let key = c.to_ascii_uppercase();
                    if options.iter().any(|o| o.key == key) {
                        tracing::debug!(menu = %self.name, %key, "menu choice");
                        return Ok(key);
                    }
                    tracing::trace!(menu = %self.name, %key, "key not offered; ignored");
                }
                KeyPress::Undecodable => {
                    tracing::trace!(menu = %self.name, "undecodable key discarded");
                }
            }
        }
    }
}
