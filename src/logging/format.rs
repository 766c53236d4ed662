use std::fmt;

use crossterm::style::Stylize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Timestamp for log files: `YYYY-MM-DD HH:MM:SS,mmm` in local time.
pub struct FileTimer;

impl FormatTime for FileTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"))
    }
}

/// Console event format: the message and its fields, nothing else, coloured by level.
pub struct ConsoleFormat {
    /// Emit ANSI colours.
    pub colored: bool,
}

/// Collects an event's message and fields as plain text.
///
/// Field values are written untouched so highlighting inside messages reaches the
/// terminal as ANSI sequences instead of being escaped.
#[derive(Default)]
struct ConsoleLine {
    message: String,
    fields: String,
}

impl Visit for ConsoleLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        use std::fmt::Write as _;
        let _ = if field.name() == "message" {
            write!(self.message, "{value:?}")
        } else {
            write!(self.fields, " {}={value:?}", field.name())
        };
    }
}

impl ConsoleLine {
    fn into_line(self) -> String {
        if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        }
    }
}

/// What: Colour a console line according to its level.
///
/// Details:
/// - Only diagnostic levels are tinted; INFO and WARN lines carry their own highlighting.
fn tint(level: Level, line: &str) -> String {
    match level {
        Level::TRACE => line.cyan().to_string(),
        Level::DEBUG => line.blue().to_string(),
        Level::ERROR => line.red().to_string(),
        _ => line.to_string(),
    }
}

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = ConsoleLine::default();
        event.record(&mut visitor);
        let mut line = visitor.into_line();
        if self.colored {
            line = tint(*event.metadata().level(), &line);
        }
        writeln!(writer, "{line}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: FormatTime impl writes a millisecond timestamp without panicking
    ///
    /// - Input: Tracing writer buffer
    /// - Output: Buffer holds `YYYY-MM-DD HH:MM:SS,mmm`
    fn file_timer_formats_milliseconds() {
        let mut buf = String::new();
        let mut writer = Writer::new(&mut buf);
        FileTimer.format_time(&mut writer).expect("format");
        assert_eq!(buf.len(), "2024-01-01 00:00:00,000".len());
        assert_eq!(&buf[19..20], ",");
    }

    #[test]
    /// What: Highlighting inside a console message is written through unescaped.
    ///
    /// Inputs:
    /// - An info event whose message carries an ANSI colour sequence, plus one field.
    ///
    /// Output:
    /// - The captured line holds the raw escape byte and the field after the message.
    fn console_format_keeps_ansi_in_messages() {
        let painted = "x".red().to_string();
        let (_, logs) = crate::logging::capture::capture_logs(|| {
            tracing::info!(count = 2, "{painted} done");
        });
        assert!(logs.contains(&format!("{painted} done count=2")), "{logs:?}");
        assert!(!logs.contains("\\x1b"));
    }

    #[test]
    fn tint_leaves_info_untouched() {
        assert_eq!(tint(Level::INFO, "hello"), "hello");
        assert_eq!(tint(Level::WARN, "hello"), "hello");
    }
}
