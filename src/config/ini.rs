//! Ordered INI document with comment-preserving reader and writer.
//!
//! Sections and their entries keep insertion order so a document that is read
//! and written back without changes produces byte-identical output.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::error::IniError;

/// What: Check if a line is a comment.
///
/// Inputs:
/// - `line`: Line to check
///
/// Output:
/// - `true` for lines starting with `#` or `;` after leading whitespace
fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with(';')
}

/// What: Parse a key-value pair from a line.
///
/// Inputs:
/// - `line`: Line containing key=value format
///
/// Output:
/// - `Some((key, value))` if the line contains `=`, `None` otherwise
///
/// Details:
/// - Splits on the first `=` character
/// - Trims whitespace from both key and value
fn parse_key_value(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

/// Result of looking a key up in a [`Section`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The key does not occur in the section.
    Absent,
    /// The key is written as a bare word, without `=`.
    Bare,
    /// `key = value`
    Value(&'a str),
}

impl<'a> Lookup<'a> {
    /// Whether the key occurs at all, with or without value.
    #[must_use]
    pub const fn is_present(self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// The value, if the key has one.
    #[must_use]
    pub const fn value(self) -> Option<&'a str> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent | Self::Bare => None,
        }
    }
}

/// One line inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// `key = value`
    Pair {
        /// Key, case-sensitive.
        key: String,
        /// Value with surrounding whitespace removed.
        value: String,
    },
    /// A key without value: comments, blank lines and bare words, kept verbatim.
    Bare(String),
}

impl Entry {
    fn render(&self) -> String {
        match self {
            Self::Pair { key, value } => format!("{key} = {value}"),
            Self::Bare(text) => text.clone(),
        }
    }
}

/// A named, ordered group of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<Entry>,
}

impl Section {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    /// Section name as written between the brackets.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// What: Look up a key in this section.
    ///
    /// Inputs:
    /// - `key`: Key to look for (case-sensitive).
    ///
    /// Output:
    /// - [`Lookup::Absent`], [`Lookup::Bare`] for a bare word line, or [`Lookup::Value`].
    #[must_use]
    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        self.entries
            .iter()
            .find_map(|entry| match entry {
                Entry::Pair { key: k, value } if k == key => Some(Lookup::Value(value.as_str())),
                Entry::Bare(text) if !is_comment(text) && text.trim() == key => Some(Lookup::Bare),
                _ => None,
            })
            .unwrap_or(Lookup::Absent)
    }

    /// Iterate over `key = value` pairs only.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Pair { key, value } => Some((key.as_str(), value.as_str())),
            Entry::Bare(_) => None,
        })
    }

    /// Set `key` to `value`, replacing an existing entry in place or appending a new one.
    pub fn set(&mut self, key: &str, value: &str) {
        let existing = self.entries.iter_mut().find(|entry| match entry {
            Entry::Pair { key: k, .. } => k == key,
            Entry::Bare(text) => !is_comment(text) && text.trim() == key,
        });
        let replacement = Entry::Pair {
            key: key.to_string(),
            value: value.to_string(),
        };
        match existing {
            Some(slot) => *slot = replacement,
            None => self.entries.push(replacement),
        }
    }

    /// Append a value-less line (comment or blank line).
    pub fn push_bare(&mut self, text: &str) {
        self.entries.push(Entry::Bare(text.to_string()));
    }
}

/// An INI file: optional leading comments followed by ordered sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    preamble: Vec<String>,
    sections: Vec<Section>,
}

impl IniDocument {
    /// Empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Tokenize INI text into a document.
    ///
    /// Inputs:
    /// - `content`: Whole file content.
    ///
    /// Output:
    /// - `Ok(IniDocument)` on success.
    /// - `Err(IniError::CorruptSyntax)` naming the first offending line.
    ///
    /// Details:
    /// - Rejects unclosed or empty section headers, repeated sections, repeated keys,
    ///   empty keys and content before the first section header.
    /// - A comment after a header's closing `]` is accepted and not kept.
    /// - Blank lines closing a section are treated as the separator and not stored.
    pub fn parse(content: &str) -> Result<Self, IniError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut doc = Self::new();
        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end();
            let trimmed = line.trim_start();
            let corrupt = |reason: String| IniError::CorruptSyntax {
                line: line_no,
                reason,
            };

            if let Some(rest) = trimmed.strip_prefix('[') {
                let Some((inner, trailing)) = rest.split_once(']') else {
                    return Err(corrupt(format!("section header '{trimmed}' is not closed")));
                };
                let trailing = trailing.trim();
                if !trailing.is_empty() && !is_comment(trailing) {
                    return Err(corrupt(format!(
                        "unexpected '{trailing}' after section header"
                    )));
                }
                let name = inner.trim();
                if name.is_empty() {
                    return Err(corrupt("section header has no name".to_string()));
                }
                if doc.section(name).is_some() {
                    return Err(corrupt(format!("section '{name}' already exists")));
                }
                doc.close_last_section();
                doc.sections.push(Section::new(name));
                continue;
            }

            if doc.sections.is_empty() {
                if trimmed.is_empty() || is_comment(trimmed) {
                    doc.preamble.push(line.to_string());
                    continue;
                }
                return Err(corrupt(format!(
                    "'{trimmed}' appears before any section header"
                )));
            }
            let Some(section) = doc.sections.last_mut() else {
                continue;
            };

            if trimmed.is_empty() || is_comment(trimmed) {
                section.entries.push(Entry::Bare(line.to_string()));
                continue;
            }
            match parse_key_value(trimmed) {
                Some((key, _)) if key.is_empty() => {
                    return Err(corrupt("missing key before '='".to_string()));
                }
                Some((key, value)) => {
                    if section.lookup(&key).is_present() {
                        return Err(corrupt(format!(
                            "key '{key}' already exists in section '{}'",
                            section.name
                        )));
                    }
                    section.entries.push(Entry::Pair { key, value });
                }
                None => {
                    if section.lookup(trimmed).is_present() {
                        return Err(corrupt(format!(
                            "key '{trimmed}' already exists in section '{}'",
                            section.name
                        )));
                    }
                    section.entries.push(Entry::Bare(line.to_string()));
                }
            }
        }
        doc.close_last_section();
        while doc.preamble.last().is_some_and(|l| l.trim().is_empty()) {
            doc.preamble.pop();
        }
        Ok(doc)
    }

    /// Drop trailing blank lines from the most recent section.
    fn close_last_section(&mut self) {
        if let Some(section) = self.sections.last_mut() {
            while matches!(section.entries.last(), Some(Entry::Bare(t)) if t.trim().is_empty()) {
                section.entries.pop();
            }
        }
    }

    /// What: Read and tokenize an INI file.
    ///
    /// Inputs:
    /// - `path`: File to read.
    ///
    /// Output:
    /// - `Err(IniError::FileMissing)` when the file does not exist.
    /// - `Err(IniError::UnreadableEncoding)` when the bytes are not UTF-8.
    /// - `Err(IniError::CorruptSyntax)` when tokenizing fails.
    pub fn read(path: &Path) -> Result<Self, IniError> {
        let bytes = fs::read(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                IniError::FileMissing {
                    path: path.to_path_buf(),
                }
            } else {
                IniError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let content = String::from_utf8(bytes).map_err(|source| IniError::UnreadableEncoding {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            sections = doc.sections.len(),
            "config file read"
        );
        Ok(doc)
    }

    /// Truncate `path` and write the serialized document into it.
    pub fn write(&self, path: &Path) -> Result<(), IniError> {
        fs::write(path, self.to_ini_string()).map_err(|source| IniError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "config file written");
        Ok(())
    }

    /// What: Serialize the document.
    ///
    /// Output:
    /// - Preamble lines (plus a separating blank line), then each section as header,
    ///   entries in insertion order, and one blank line.
    #[must_use]
    pub fn to_ini_string(&self) -> String {
        let mut out = String::new();
        for line in &self.preamble {
            out.push_str(line);
            out.push('\n');
        }
        if !self.preamble.is_empty() {
            out.push('\n');
        }
        for section in &self.sections {
            out.push('[');
            out.push_str(&section.name);
            out.push_str("]\n");
            for entry in &section.entries {
                out.push_str(&entry.render());
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// Section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// All sections in file order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section by name, created at the end of the document when absent.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        let idx = match self.sections.iter().position(|s| s.name == name) {
            Some(idx) => idx,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    /// Replace the section named like `section`, keeping its position, or append it.
    pub fn replace_section(&mut self, section: Section) {
        match self.sections.iter_mut().find(|s| s.name == section.name) {
            Some(slot) => *slot = section,
            None => self.sections.push(section),
        }
    }

    /// Start a fresh, empty section that can later be handed to [`Self::replace_section`].
    #[must_use]
    pub fn detached_section(name: &str) -> Section {
        Section::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# leading comment\n\n[Local Paths]\n# A comment\nlocal_sub_dir = /tmp/a\n\n# Second\noutput_dir = /tmp/b\n\n[Values]\nrepeat_count = 3\n\n";

    #[test]
    /// What: Parsing keeps comments, blank lines and pairs in order.
    ///
    /// Inputs:
    /// - Two-section sample with a preamble comment.
    ///
    /// Output:
    /// - Lookups return values; comments survive as bare entries.
    fn ini_parse_keeps_order_and_comments() {
        let doc = IniDocument::parse(SAMPLE).expect("sample parses");
        let paths = doc.section("Local Paths").expect("section present");
        assert_eq!(paths.lookup("local_sub_dir"), Lookup::Value("/tmp/a"));
        assert_eq!(paths.lookup("missing"), Lookup::Absent);
        assert_eq!(paths.entries()[0], Entry::Bare("# A comment".into()));
        assert_eq!(paths.entries().len(), 5);
        assert_eq!(
            doc.sections().iter().map(Section::name).collect::<Vec<_>>(),
            ["Local Paths", "Values"]
        );
    }

    #[test]
    /// What: Writing what was read reproduces the exact bytes.
    ///
    /// Inputs:
    /// - Sample text, already in canonical form.
    ///
    /// Output:
    /// - `to_ini_string` equals the input; a second round stays identical.
    fn ini_write_after_read_is_byte_identical() {
        let once = IniDocument::parse(SAMPLE).expect("parse").to_ini_string();
        assert_eq!(once, SAMPLE);
        let twice = IniDocument::parse(&once).expect("reparse").to_ini_string();
        assert_eq!(once, twice);
    }

    #[test]
    /// What: Structural problems surface as `CorruptSyntax` with a line number.
    ///
    /// Inputs:
    /// - Duplicate section, duplicate key, unclosed header, orphan pair, empty key.
    ///
    /// Output:
    /// - Each input fails on the expected line.
    fn ini_corrupt_inputs_are_rejected() {
        let cases = [
            ("[A]\nx = 1\n[A]\n", 3),
            ("[A]\nx = 1\nx = 2\n", 3),
            ("[A\nx = 1\n", 1),
            ("x = 1\n[A]\n", 1),
            ("[A]\n = 1\n", 2),
            ("[]\n", 1),
            ("[A] x = 1\n", 1),
            ("[A]\nflag\nflag\n", 3),
        ];
        for (input, expected) in cases {
            match IniDocument::parse(input) {
                Err(IniError::CorruptSyntax { line, .. }) => assert_eq!(line, expected, "{input:?}"),
                other => panic!("expected CorruptSyntax for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    /// What: A comment after a section header is accepted and dropped on write.
    ///
    /// Inputs:
    /// - `[Local Paths]  ; note` and `[Values] # other`.
    ///
    /// Output:
    /// - Both sections parse under their plain names; serialization writes bare headers.
    fn ini_header_trailing_comment_is_accepted() {
        let doc = IniDocument::parse("[Local Paths]  ; note\nlocal_sub_dir = /x\n[Values] # other\n")
            .expect("parse");
        let section = doc.section("Local Paths").expect("section");
        assert!(section.lookup("local_sub_dir").is_present());
        assert_eq!(section.lookup("local_sub_dir").value(), Some("/x"));
        assert!(doc.section("Values").is_some());
        assert_eq!(
            doc.to_ini_string(),
            "[Local Paths]\nlocal_sub_dir = /x\n\n[Values]\n\n"
        );
    }

    #[test]
    /// What: Bare words are value-less keys; `set` upgrades them in place.
    ///
    /// Inputs:
    /// - Section containing the bare word `local_sub_dir`.
    ///
    /// Output:
    /// - Lookup reports `Bare`; after `set` the pair sits at the same index.
    fn ini_bare_key_lookup_and_set() {
        let mut doc = IniDocument::parse("[Local Paths]\n# c\nlocal_sub_dir\n").expect("parse");
        let section = doc.section_mut("Local Paths");
        assert_eq!(section.lookup("local_sub_dir"), Lookup::Bare);
        assert_eq!(section.lookup("local_sub_dir").value(), None);
        section.set("local_sub_dir", "/srv/x");
        assert_eq!(
            section.entries()[1],
            Entry::Pair {
                key: "local_sub_dir".into(),
                value: "/srv/x".into()
            }
        );
        section.set("other", "1");
        assert_eq!(section.pairs().count(), 2);
    }

    #[test]
    /// What: File-level read errors map onto the INI error kinds.
    ///
    /// Inputs:
    /// - A missing path and a file holding invalid UTF-8.
    ///
    /// Output:
    /// - `FileMissing` and `UnreadableEncoding` respectively.
    fn ini_read_reports_missing_and_bad_encoding() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.ini");
        assert!(matches!(
            IniDocument::read(&missing),
            Err(IniError::FileMissing { .. })
        ));
        let binary = dir.path().join("binary.ini");
        fs::write(&binary, [b'[', 0xff, 0xfe, b']']).expect("write");
        assert!(matches!(
            IniDocument::read(&binary),
            Err(IniError::UnreadableEncoding { .. })
        ));
    }

    #[test]
    /// What: `replace_section` keeps section position; new sections append.
    fn ini_replace_section_keeps_position() {
        let mut doc = IniDocument::parse(SAMPLE).expect("parse");
        let mut fresh = IniDocument::detached_section("Local Paths");
        fresh.set("local_sub_dir", "/x");
        doc.replace_section(fresh);
        assert_eq!(doc.sections()[0].entries().len(), 1);
        doc.replace_section(IniDocument::detached_section("Colors"));
        assert_eq!(doc.sections()[2].name(), "Colors");
    }
}
