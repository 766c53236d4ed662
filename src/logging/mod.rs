//! Logging setup for the starter.
//!
//! [`init`] is called once at process start and returns a [`LogHandle`]. The handle
//! owns the file writer guards and the console [`Highlighter`]; dropping it (or
//! calling [`LogHandle::shutdown`]) flushes the log files. Nothing else in the crate
//! installs or reconfigures subscribers.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Console formatting and file timestamps.
pub mod format;
/// Highlight table and colour palette.
pub mod highlight;

use format::{ConsoleFormat, FileTimer};
use highlight::{Highlighter, Palette};

/// Target of user-facing console messages (menus, prompts, reports).
pub const CONSOLE_TARGET: &str = "starter::console";

/// Log files written into the application directory, with their level.
pub const LOG_FILES: [(&str, LevelFilter); 3] = [
    ("trace.log", LevelFilter::TRACE),
    ("debug.log", LevelFilter::DEBUG),
    ("info.log", LevelFilter::INFO),
];

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// How logging should be set up.
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Directory for the log files; `None` logs to the console only.
    pub log_dir: Option<PathBuf>,
    /// Console level (`trace`, `debug`, `info`, `warn`, `error`), overridden by `RUST_LOG`.
    pub console_level: String,
    /// Emit ANSI colours on the console.
    pub colored: bool,
}

/// Handle to the installed logging; keep it alive until the process ends.
#[derive(Debug)]
pub struct LogHandle {
    guards: Vec<WorkerGuard>,
    highlighter: Highlighter,
    log_dir: Option<PathBuf>,
}

impl LogHandle {
    /// Highlighter matching the console's colour setting.
    #[must_use]
    pub const fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Replace the highlighter, e.g. once the configured palette is known.
    pub fn set_palette(&mut self, palette: &Palette) {
        self.highlighter = Highlighter::new(palette, self.highlighter.colored());
    }

    /// Directory the log files are written to, if any.
    #[must_use]
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    /// Flush and close the log files.
    pub fn shutdown(self) {
        tracing::trace!(files = self.guards.len(), "flushing log files");
        drop(self);
    }
}

/// What: Build the console filter from the requested level.
///
/// Inputs:
/// - `level`: Level name used when `RUST_LOG` is unset or invalid.
///
/// Output:
/// - `EnvFilter` that always lets user-facing console messages through at INFO.
fn console_filter(level: &str) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    match format!("{CONSOLE_TARGET}=info").parse() {
        Ok(directive) => base.add_directive(directive),
        Err(_) => base,
    }
}

/// What: Open (truncating) every log file and build one layer per file.
///
/// Inputs:
/// - `dir`: Existing directory for the files.
///
/// Output:
/// - Layers plus their writer guards, or the first I/O error.
fn file_layers(dir: &Path) -> std::io::Result<(Vec<BoxedLayer>, Vec<WorkerGuard>)> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guards = Vec::new();
    for (name, level) in LOG_FILES {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(dir.join(name))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(FileTimer)
                .with_filter(level)
                .boxed(),
        );
        guards.push(guard);
    }
    Ok((layers, guards))
}

/// What: Install the global subscriber: coloured console plus trace/debug/info files.
///
/// Inputs:
/// - `options`: Log directory, console level and colour setting.
///
/// Output:
/// - `LogHandle` to keep alive for the rest of the process.
///
/// Details:
/// - The log directory is provisioned first; when that or opening a file fails the
///   console layer is installed alone and a warning is logged.
/// - A second call in the same process keeps the first subscriber.
#[must_use]
pub fn init(options: &LoggingOptions) -> LogHandle {
    let console: BoxedLayer = tracing_subscriber::fmt::layer()
        .event_format(ConsoleFormat {
            colored: options.colored,
        })
        .with_ansi(options.colored)
        .with_writer(std::io::stdout)
        .with_filter(console_filter(&options.console_level))
        .boxed();

    let mut layers = vec![console];
    let mut guards = Vec::new();
    let mut failure = None;
    let mut log_dir = None;
    if let Some(dir) = options.log_dir.as_deref() {
        match crate::config::ensure_directory(dir)
            .map_err(|e| e.to_string())
            .and_then(|dir| file_layers(&dir).map_err(|e| e.to_string()))
        {
            Ok((files, file_guards)) => {
                layers.extend(files);
                guards = file_guards;
                log_dir = Some(dir.to_path_buf());
            }
            Err(e) => failure = Some((dir.to_path_buf(), e)),
        }
    }

    if tracing_subscriber::registry().with(layers).try_init().is_err() {
        tracing::debug!("subscriber already installed; keeping it");
    }
    if let Some((dir, error)) = failure {
        tracing::warn!(path = %dir.display(), %error, "log files unavailable; logging to console only");
    } else if let Some(dir) = log_dir.as_deref() {
        tracing::debug!(path = %dir.display(), "logging initialized");
    }

    LogHandle {
        guards,
        highlighter: Highlighter::new(&Palette::default(), options.colored),
        log_dir,
    }
}
