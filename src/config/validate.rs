//! Syntactic validation of the configuration document.
//!
//! Only the *shape* of values is checked here. Whether configured paths exist on
//! disk is decided afterwards by the façade, because missing directories can be
//! repaired by the wizard while malformed values cannot.

use std::path::PathBuf;

use crossterm::style::Color;
use url::Url;

use super::error::{Cause, ConfigurationError, LookupError, ValueError};
use super::ini::{IniDocument, Lookup, Section};
use super::paths::ConfiguredPath;
use super::skeleton::LOCAL_PATHS_SECTION;
use crate::logging::highlight::{COLOR_KEYS, Palette, nearest_color_key, parse_color_value};

/// Optional section with simple typed settings.
pub const VALUES_SECTION: &str = "Values";
/// Optional section overriding the highlight palette.
pub const COLORS_SECTION: &str = "Colors";

/// Typed settings from the `[Values]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Values {
    /// How many times the starter repeats its work.
    pub repeat_count: i64,
    /// Project homepage.
    pub project_url: Option<Url>,
}

impl Default for Values {
    fn default() -> Self {
        Self {
            repeat_count: 1,
            project_url: None,
        }
    }
}

/// Everything the validator extracted from a syntactically valid document.
#[derive(Debug, Clone)]
pub struct Validated {
    /// Configured paths with `current_path` taken from the file.
    pub paths: Vec<ConfiguredPath>,
    /// `[Values]` settings, defaults where absent.
    pub values: Values,
    /// Palette with `[Colors]` overrides applied.
    pub palette: Palette,
}

/// Typed read access to one document.
pub struct Getter<'a> {
    doc: &'a IniDocument,
}

impl<'a> Getter<'a> {
    /// Wrap a document.
    #[must_use]
    pub const fn new(doc: &'a IniDocument) -> Self {
        Self { doc }
    }

    fn section(&self, section: &str) -> Result<&'a Section, LookupError> {
        self.doc
            .section(section)
            .ok_or_else(|| LookupError::MissingSection {
                section: section.to_string(),
            })
    }

    /// What: Raw lookup of `section` / `key`.
    ///
    /// Output:
    /// - `Ok(None)` for a key written without value.
    /// - `Err(Cause::Lookup)` when the section or the key is absent.
    pub fn get(&self, section: &str, key: &str) -> Result<Option<&'a str>, Cause> {
        match self.section(section)?.lookup(key) {
            Lookup::Value(value) => Ok(Some(value)),
            Lookup::Bare => Ok(None),
            Lookup::Absent => Err(Cause::from(LookupError::MissingKey {
                section: section.to_string(),
                key: key.to_string(),
            })),
        }
    }

    fn get_value(&self, section: &str, key: &str, what: &str) -> Result<&'a str, Cause> {
        self.get(section, key)?
            .ok_or_else(|| invalid(section, key, "(none)", &format!("{what} expected, key has no value")))
    }

    /// What: Read a value as a filesystem path.
    ///
    /// Details:
    /// - Any non-empty string without NUL bytes is a syntactically valid path;
    ///   existence is not checked.
    pub fn get_path(&self, section: &str, key: &str) -> Result<PathBuf, Cause> {
        let raw = self.get_value(section, key, "a path")?;
        if raw.is_empty() {
            return Err(invalid(section, key, raw, "path is empty"));
        }
        if raw.contains('\0') {
            return Err(invalid(section, key, raw, "path contains a NUL byte"));
        }
        Ok(PathBuf::from(raw))
    }

    /// Read a value as a signed integer.
    pub fn get_int(&self, section: &str, key: &str) -> Result<i64, Cause> {
        let raw = self.get_value(section, key, "an integer")?;
        raw.parse::<i64>()
            .map_err(|e| invalid(section, key, raw, &format!("not an integer: {e}")))
    }

    /// Read a value as an absolute URL.
    pub fn get_url(&self, section: &str, key: &str) -> Result<Url, Cause> {
        let raw = self.get_value(section, key, "a URL")?;
        Url::parse(raw).map_err(|e| invalid(section, key, raw, &format!("not a URL: {e}")))
    }

    /// Read a value as a `#RRGGBB` or `R,G,B` colour.
    pub fn get_color(&self, section: &str, key: &str) -> Result<Color, Cause> {
        let raw = self.get_value(section, key, "a colour")?;
        parse_color_value(raw)
            .ok_or_else(|| invalid(section, key, raw, "use #RRGGBB or R,G,B"))
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> Cause {
    Cause::from(ValueError {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    })
}

/// What: Turn a lower-level failure into the user-facing error.
///
/// Inputs:
/// - `file_name`: Config file name for the message prefix.
/// - `cause`: Failure raised by a getter.
///
/// Output:
/// - `ConfigurationError` whose message names section, key and literal for value
///   errors, quotes the lookup message for absences, or falls back to the generic advice.
#[must_use]
pub fn to_configuration_error(file_name: &str, cause: Cause) -> ConfigurationError {
    let message = match &cause {
        Cause::Value(v) => format!(
            "{file_name}: '{}' in section '{}' has an unacceptable value of {}",
            v.key, v.section, v.value
        ),
        Cause::Lookup(l) => format!("{file_name}: {l}"),
        _ => generic_message(file_name),
    };
    ConfigurationError::new(message, Some(cause))
}

/// Advice used for failures that cannot be pinned to a section and key.
#[must_use]
pub fn generic_message(file_name: &str) -> String {
    format!(
        "There is something wrong with {file_name}. Please check it carefully or delete it to have it recreated."
    )
}

/// What: Validate a document against the configured paths and optional typed sections.
///
/// Inputs:
/// - `doc`: Parsed configuration.
/// - `paths`: Settings to look up; their `current_path` is replaced by the file's value.
/// - `file_name`: Used in error messages.
///
/// Output:
/// - `Ok(Validated)` when every value converts.
/// - `Err(ConfigurationError)` on the first missing section/key or unacceptable value.
pub fn validate(
    doc: &IniDocument,
    paths: &[ConfiguredPath],
    file_name: &str,
) -> Result<Validated, ConfigurationError> {
    let getter = Getter::new(doc);
    let fail = |cause: Cause| {
        tracing::debug!(kind = cause.kind(), "raising configuration error");
        to_configuration_error(file_name, cause)
    };

    let mut checked = Vec::with_capacity(paths.len());
    for path in paths {
        let value = getter
            .get_path(LOCAL_PATHS_SECTION, &path.internal_name)
            .map_err(fail)?;
        tracing::trace!(key = %path.internal_name, value = %value.display(), "path parsed");
        let mut updated = path.clone();
        updated.current_path = value;
        checked.push(updated);
    }

    let mut values = Values::default();
    if let Some(section) = doc.section(VALUES_SECTION) {
        if section.lookup("repeat_count").is_present() {
            values.repeat_count = getter.get_int(VALUES_SECTION, "repeat_count").map_err(fail)?;
        }
        if section.lookup("project_url").is_present() {
            values.project_url = Some(getter.get_url(VALUES_SECTION, "project_url").map_err(fail)?);
        }
    }

    let mut palette = Palette::default();
    if let Some(section) = doc.section(COLORS_SECTION) {
        for (key, value) in section.pairs() {
            if !COLOR_KEYS.contains(&key) {
                let reason = nearest_color_key(key).map_or_else(
                    || "unknown colour key".to_string(),
                    |s| format!("unknown colour key (did you mean '{s}'?)"),
                );
                return Err(fail(invalid(COLORS_SECTION, key, value, &reason)));
            }
            let color = getter.get_color(COLORS_SECTION, key).map_err(fail)?;
            palette.set(key, color);
        }
    }

    Ok(Validated {
        paths: checked,
        values,
        palette,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::default_configured_paths;

    fn doc(text: &str) -> IniDocument {
        IniDocument::parse(text).expect("fixture parses")
    }

    #[test]
    /// What: A complete document validates and paths take the file's values.
    ///
    /// Inputs:
    /// - `[Local Paths]` with both keys, `[Values]` and `[Colors]` overrides.
    ///
    /// Output:
    /// - Paths, integer, URL and colour come back converted.
    fn validate_accepts_complete_document() {
        let paths = default_configured_paths(std::path::Path::new("/d"));
        let d = doc("[Local Paths]\nlocal_sub_dir = /tmp/does/not/exist\noutput_dir = /tmp/out/\n\n[Values]\nrepeat_count = 4\nproject_url = https://example.org/x\n\n[Colors]\nwarning = 255,0,0\n");
        let v = validate(&d, &paths, "cfg.ini").expect("valid");
        assert_eq!(v.paths[0].current_path, PathBuf::from("/tmp/does/not/exist"));
        assert_eq!(v.paths[0].default_path, PathBuf::from("/d/subdir"));
        assert_eq!(v.values.repeat_count, 4);
        assert_eq!(
            v.values.project_url.as_ref().map(Url::as_str),
            Some("https://example.org/x")
        );
        assert_eq!(v.palette.get("warning"), Color::Rgb { r: 255, g: 0, b: 0 });
    }

    #[test]
    /// What: Missing key and missing section messages name what is missing.
    ///
    /// Inputs:
    /// - Document lacking `output_dir`; document lacking `[Local Paths]`.
    ///
    /// Output:
    /// - Messages contain the key name and the section name respectively.
    fn validate_reports_missing_key_and_section() {
        let paths = default_configured_paths(std::path::Path::new("/d"));
        let err = validate(&doc("[Local Paths]\nlocal_sub_dir = /a\n"), &paths, "cfg.ini")
            .expect_err("missing key");
        assert!(err.message().starts_with("cfg.ini: "));
        assert!(err.message().contains("output_dir"));
        assert_eq!(err.cause().map(Cause::kind), Some("MissingKey"));

        let err = validate(&doc("[Other]\nx = 1\n"), &paths, "cfg.ini").expect_err("missing section");
        assert!(err.message().contains("Local Paths"));
        assert_eq!(err.cause().map(Cause::kind), Some("MissingSection"));
    }

    #[test]
    /// What: Unconvertible literals produce the "unacceptable value" message.
    ///
    /// Inputs:
    /// - Non-integer `repeat_count`, empty path, value-less path key, bad colour, unknown colour key.
    ///
    /// Output:
    /// - Every case fails with `InvalidValue` and the message quotes section and key.
    fn validate_rejects_unacceptable_values() {
        let paths = default_configured_paths(std::path::Path::new("/d"));
        let base = "[Local Paths]\nlocal_sub_dir = /a\noutput_dir = /b\n\n";
        let cases = [
            (format!("{base}[Values]\nrepeat_count = many\n"), "repeat_count"),
            (format!("{base}[Values]\nproject_url = not a url\n"), "project_url"),
            ("[Local Paths]\nlocal_sub_dir =\noutput_dir = /b\n".to_string(), "local_sub_dir"),
            ("[Local Paths]\nlocal_sub_dir = /a\noutput_dir\n".to_string(), "output_dir"),
            (format!("{base}[Colors]\nerror = #zzzzzz\n"), "error"),
            (format!("{base}[Colors]\nwarnin = #ffffff\n"), "warnin"),
        ];
        for (text, key) in cases {
            let err = validate(&doc(&text), &paths, "cfg.ini").expect_err("invalid");
            assert!(err.message().contains("unacceptable value"), "{}", err.message());
            assert!(err.message().contains(&format!("'{key}'")), "{}", err.message());
            assert_eq!(err.cause().map(Cause::kind), Some("InvalidValue"));
        }
    }

    #[test]
    /// What: Unknown colour keys carry a spelling suggestion in the cause.
    fn validate_suggests_colour_key() {
        let paths = default_configured_paths(std::path::Path::new("/d"));
        let err = validate(
            &doc("[Local Paths]\nlocal_sub_dir = /a\noutput_dir = /b\n\n[Colors]\nwarnin = #ffffff\n"),
            &paths,
            "cfg.ini",
        )
        .expect_err("unknown key");
        match err.cause() {
            Some(Cause::Value(v)) => assert!(v.reason.contains("'warning'")),
            other => panic!("unexpected cause {other:?}"),
        }
    }
}
