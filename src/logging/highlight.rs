//! Highlighting of console messages.
//!
//! A [`Highlighter`] holds one formatting closure per [`Highlight`] kind. The table
//! is built once from a [`Palette`]; with colour disabled every entry is the identity.

use std::collections::HashMap;

use crossterm::style::{Color, Stylize};
use unicode_width::UnicodeWidthStr;

/// Keys accepted in the `[Colors]` section, one per highlight kind.
pub const COLOR_KEYS: [&str; 6] = ["path", "key", "choice", "warning", "success", "error"];

/// Marker put in front of warnings.
pub const WARN_MARKER: &str = "◊";

/// What a piece of console text represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    /// Filesystem paths.
    Path,
    /// Configuration keys.
    Key,
    /// Menu option letters.
    Choice,
    /// Warning text.
    Warning,
    /// Confirmation text.
    Success,
    /// Error text.
    Error,
}

impl Highlight {
    /// All kinds, in [`COLOR_KEYS`] order.
    pub const ALL: [Self; 6] = [
        Self::Path,
        Self::Key,
        Self::Choice,
        Self::Warning,
        Self::Success,
        Self::Error,
    ];

    /// Key of this kind in the `[Colors]` section.
    #[must_use]
    pub const fn config_key(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Key => "key",
            Self::Choice => "choice",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Colour per highlight kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: HashMap<Highlight, Color>,
}

impl Default for Palette {
    fn default() -> Self {
        let colors = HashMap::from([
            (Highlight::Path, Color::Rgb { r: 0x74, g: 0xc7, b: 0xec }),
            (Highlight::Key, Color::Rgb { r: 0xcb, g: 0xa6, b: 0xf7 }),
            (Highlight::Choice, Color::Rgb { r: 0xb4, g: 0xbe, b: 0xfe }),
            (Highlight::Warning, Color::Rgb { r: 0xf9, g: 0xe2, b: 0xaf }),
            (Highlight::Success, Color::Rgb { r: 0xa6, g: 0xe3, b: 0xa1 }),
            (Highlight::Error, Color::Rgb { r: 0xf3, g: 0x8b, b: 0xa8 }),
        ]);
        Self { colors }
    }
}

impl Palette {
    /// Colour configured for the kind named `key`; unknown keys fall back to `Reset`.
    #[must_use]
    pub fn get(&self, key: &str) -> Color {
        Highlight::ALL
            .iter()
            .find(|h| h.config_key() == key)
            .and_then(|h| self.colors.get(h).copied())
            .unwrap_or(Color::Reset)
    }

    /// Override the colour of the kind named `key`; unknown keys are ignored.
    pub fn set(&mut self, key: &str, color: Color) {
        if let Some(h) = Highlight::ALL.iter().find(|h| h.config_key() == key) {
            self.colors.insert(*h, color);
        }
    }

    /// Every kind with its colour, in [`COLOR_KEYS`] order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static str, Color)> {
        Highlight::ALL
            .iter()
            .map(|h| (h.config_key(), self.colors.get(h).copied().unwrap_or(Color::Reset)))
            .collect()
    }
}

type Formatter = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Lookup table from highlight kind to formatting function.
pub struct Highlighter {
    table: HashMap<Highlight, Formatter>,
    colored: bool,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("colored", &self.colored)
            .finish_non_exhaustive()
    }
}

impl Highlighter {
    /// What: Build the formatting table.
    ///
    /// Inputs:
    /// - `palette`: Colours per kind.
    /// - `colored`: `false` yields identity formatters for every kind.
    ///
    /// Output:
    /// - A `Highlighter` whose `paint` never allocates new table entries.
    ///
    /// Details:
    /// - Paths are additionally wrapped in backticks so they stand out without colour.
    #[must_use]
    pub fn new(palette: &Palette, colored: bool) -> Self {
        let mut table: HashMap<Highlight, Formatter> = HashMap::new();
        for kind in Highlight::ALL {
            let color = palette.get(kind.config_key());
            let formatter: Formatter = match (kind, colored) {
                (Highlight::Path, true) => {
                    Box::new(move |s: &str| format!("`{}`", s.with(color)))
                }
                (Highlight::Path, false) => Box::new(|s: &str| format!("`{s}`")),
                (Highlight::Choice, true) => {
                    Box::new(move |s: &str| s.with(color).bold().to_string())
                }
                (_, true) => Box::new(move |s: &str| s.with(color).to_string()),
                (_, false) => Box::new(|s: &str| s.to_string()),
            };
            table.insert(kind, formatter);
        }
        Self { table, colored }
    }

    /// Highlighter without colours.
    #[must_use]
    pub fn plain() -> Self {
        Self::new(&Palette::default(), false)
    }

    /// Whether ANSI colours are emitted.
    #[must_use]
    pub const fn colored(&self) -> bool {
        self.colored
    }

    /// Format `text` as `kind`.
    #[must_use]
    pub fn paint(&self, kind: Highlight, text: &str) -> String {
        self.table
            .get(&kind)
            .map_or_else(|| text.to_string(), |f| f(text))
    }

    /// Prefix `text` with the warning marker, both highlighted as a warning.
    #[must_use]
    pub fn warn(&self, text: &str) -> String {
        self.paint(Highlight::Warning, &format!("{WARN_MARKER} {text}"))
    }
}

/// What: Terminal column width of `text`, ignoring ANSI escape sequences.
///
/// Inputs:
/// - `text`: Possibly coloured text.
///
/// Output:
/// - Number of columns the visible characters occupy.
#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi_escapes::strip_str(text).as_str())
}

/// What: Parse a color literal from configuration text into a [`Color`].
///
/// Inputs:
/// - `s`: Color specification string potentially containing inline comments.
///
/// Output:
/// - `Some(Color)` for recognized hex or decimal triplet formats; `None` otherwise.
///
/// Details:
/// - Strips trailing comments beginning with `//` or secondary `#` markers.
/// - Accepts `#RRGGBB` hex and `R,G,B` decimal triplets (0-255 per channel).
#[must_use]
pub fn parse_color_value(s: &str) -> Option<Color> {
    let mut t = s.trim();
    if let Some(i) = t.find("//") {
        t = &t[..i];
    }
    // Preserve a leading '#' for hex values by searching for '#' only after the first char.
    if let Some(i_rel) = if let Some(stripped) = t.strip_prefix('#') {
        stripped.find('#').map(|j| j + 1)
    } else {
        t.find('#')
    } {
        t = &t[..i_rel];
    }
    t = t.trim();
    if t.is_empty() {
        return None;
    }
    let h = t.strip_prefix('#').unwrap_or(t);
    if h.len() == 6 && h.chars().all(|c| c.is_ascii_hexdigit()) {
        let r = u8::from_str_radix(&h[0..2], 16).ok()?;
        let g = u8::from_str_radix(&h[2..4], 16).ok()?;
        let b = u8::from_str_radix(&h[4..6], 16).ok()?;
        return Some(Color::Rgb { r, g, b });
    }
    let parts: Vec<&str> = t.split(',').collect();
    if parts.len() == 3 {
        let r = parts[0].trim().parse::<u8>().ok()?;
        let g = parts[1].trim().parse::<u8>().ok()?;
        let b = parts[2].trim().parse::<u8>().ok()?;
        return Some(Color::Rgb { r, g, b });
    }
    None
}

/// Render a colour the way it is written in the config file.
#[must_use]
pub fn format_color(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("#{r:02x}{g:02x}{b:02x}"),
        other => format!("{other:?}").to_lowercase(),
    }
}

/// What: Suggest the colour key closest to a potentially misspelled input.
///
/// Inputs:
/// - `input`: User-provided key string.
///
/// Output:
/// - `Some(&'static str)` when the best match is within edit distance 3; `None` otherwise.
#[must_use]
pub fn nearest_color_key(input: &str) -> Option<&'static str> {
    let norm = input.trim().to_lowercase();
    let mut best: Option<(&'static str, usize)> = None;
    for &k in &COLOR_KEYS {
        let d = levenshtein(&norm, k);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((k, d));
        }
    }
    best.and_then(|(k, d)| if d <= 3 { Some(k) } else { None })
}

/// What: Compute the Levenshtein edit distance between two strings.
///
/// Details:
/// - Uses a rolling dynamic programming row to keep allocations to one vector.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut dp: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let tmp = dp[j + 1];
            let cost = usize::from(ca != *cb);
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = tmp;
        }
    }
    dp[b.len()]
}
