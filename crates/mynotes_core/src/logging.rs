//! Rolling file logs for the notes core.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend from an [`AppConfig`] (or an explicit
//!   level and directory) once per process.
//! - Record panics as single-line `event=panic_captured` entries.
//!
//! # Invariants
//! - Note titles and content never reach a log line; callers log ids,
//!   counts and durations only.
//! - A running logger is never reconfigured. Asking again for the same
//!   settings is a no-op, asking for different ones is an error.

use crate::config::AppConfig;
use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, LogSpecification, Logger, LoggerHandle,
    Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Once;

const LOG_FILE_BASENAME: &str = "mynotes";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_SUMMARY_MAX_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: Once = Once::new();

/// Level and absolute directory of the file logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub dir: PathBuf,
}

impl LogSettings {
    pub fn new(level: LevelFilter, dir: impl Into<PathBuf>) -> Result<Self, LoggingError> {
        let dir = dir.into();
        if dir.as_os_str().is_empty() || !dir.is_absolute() {
            return Err(LoggingError::InvalidDir(dir));
        }
        if level == LevelFilter::Off {
            return Err(LoggingError::UnsupportedLevel(level.to_string()));
        }
        Ok(Self { level, dir })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, LoggingError> {
        Self::new(config.log_level, config.log_dir.clone())
    }
}

#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    /// Blank or relative log directory.
    InvalidDir(PathBuf),
    AlreadyRunning {
        active: LogSettings,
        requested: LogSettings,
    },
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(FlexiLoggerError),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDir(dir) => write!(
                f,
                "log directory must be a non-empty absolute path, got `{}`",
                dir.display()
            ),
            Self::AlreadyRunning { active, requested } => write!(
                f,
                "logging already runs at `{}` in `{}`; refusing to switch to `{}` in `{}`",
                active.level,
                active.dir.display(),
                requested.level,
                requested.dir.display()
            ),
            Self::CreateDir { dir, source } => {
                write!(f, "failed to create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Parses a level name, case-insensitive; `warning` is accepted for `warn`.
pub fn parse_level(raw: &str) -> Result<LevelFilter, LoggingError> {
    let name = raw.trim().to_ascii_lowercase();
    let name = if name == "warning" { "warn" } else { name.as_str() };
    match name.parse::<LevelFilter>() {
        Ok(LevelFilter::Off) | Err(_) => Err(LoggingError::UnsupportedLevel(raw.trim().to_string())),
        Ok(level) => Ok(level),
    }
}

/// `debug` in debug builds, `info` in release builds.
pub fn default_log_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Starts file logging with the configured level and directory.
pub fn init_logging_from_config(config: &AppConfig) -> Result<(), LoggingError> {
    start(LogSettings::from_config(config)?)
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
pub fn init_logging(level: LevelFilter, log_dir: &Path) -> Result<(), LoggingError> {
    start(LogSettings::new(level, log_dir)?)
}

/// Settings of the running logger, `None` before init.
pub fn logging_status() -> Option<LogSettings> {
    ACTIVE.get().map(|active| active.settings.clone())
}

fn start(requested: LogSettings) -> Result<(), LoggingError> {
    let active = ACTIVE.get_or_try_init(|| spawn_logger(requested.clone()))?;
    if active.settings != requested {
        return Err(LoggingError::AlreadyRunning {
            active: active.settings.clone(),
            requested,
        });
    }
    Ok(())
}

fn spawn_logger(settings: LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.dir).map_err(|source| LoggingError::CreateDir {
        dir: settings.dir.clone(),
        source,
    })?;

    let handle = Logger::with(LogSpecification::builder().default(settings.level).build())
        .log_to_file(
            FileSpec::default()
                .directory(settings.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        // [YYYY-MM-DD HH:MM:SS.ffffff TZ] LEVEL [module] file:line: message
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    install_panic_logger();
    info!(
        "event=logging_init module=core status=ok platform={} version={} level={} log_dir={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        settings.level,
        settings.dir.display()
    );

    Ok(ActiveLogger {
        settings,
        _handle: handle,
    })
}

fn install_panic_logger() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let location = info.location().map_or_else(
                || "unknown".to_string(),
                |loc| format!("{}:{}", loc.file(), loc.line()),
            );
            error!(
                "event=panic_captured module=core status=error location={location} payload={}",
                panic_summary(info.payload())
            );
            previous(info);
        }));
    });
}

/// Panic text on one line, capped; payloads may quote note text.
fn panic_summary(payload: &(dyn Any + Send)) -> String {
    let text = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    one_line(text, PANIC_SUMMARY_MAX_CHARS)
}

fn one_line(text: &str, max_chars: usize) -> String {
    let mut line: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(max_chars)
        .collect();
    if text.chars().count() > max_chars {
        line.push_str("...");
    }
    line
}
