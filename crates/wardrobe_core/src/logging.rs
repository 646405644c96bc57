//! Rolling file logs for the wardrobe core.
//!
//! # Responsibility
//! - Initialize file-based rolling logs exactly once per process.
//! - Keep catalog and acquisition events metadata-only (ids and counts, never
//!   image bytes).
//!
//! # Invariants
//! - Init is idempotent for the same level and directory.
//! - Init never panics.
//! - Re-initialization with a different directory or level is rejected.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

/// Where log files go and how they roll over.
struct RotationPolicy {
    basename: &'static str,
    rotate_bytes: u64,
    keep_files: usize,
}

const ROTATION: RotationPolicy = RotationPolicy {
    basename: "wardrobe",
    rotate_bytes: 8 * 1024 * 1024,
    keep_files: 4,
};
const PANIC_MESSAGE_LIMIT: usize = 200;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Supported log verbosity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses a case-insensitive level name. `warning` is accepted as `warn`.
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unsupported log level `{other}`; expected trace|debug|info|warn|error"
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct ActiveLogger {
    level: LogLevel,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn ensure_same(&self, level: LogLevel, log_dir: &Path) -> Result<(), String> {
        if self.log_dir != log_dir {
            return Err(format!(
                "logging already initialized at `{}`; refusing to switch to `{}`",
                self.log_dir.display(),
                log_dir.display()
            ));
        }
        if self.level != level {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                self.level, level
            ));
        }
        Ok(())
    }
}

/// Starts rolling file logs under `log_dir` at `level`.
///
/// Returns a human-readable message on failure so hosts can surface it
/// without depending on `flexi_logger` error types.
///
/// # Errors
/// - `level` is not one of `trace|debug|info|warn|error`.
/// - `log_dir` is empty, relative, or cannot be created.
/// - Logging is already active with a different level or directory.
/// - The logger backend fails to start.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = LogLevel::parse(level)?;
    let log_dir = parse_log_dir(log_dir)?;

    if let Some(active) = ACTIVE_LOGGER.get() {
        return active.ensure_same(level, &log_dir);
    }

    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(level, &log_dir))?;
    // A concurrent caller may have won the race with a different config.
    active.ensure_same(level, &log_dir)
}

/// Returns `(level, log_dir)` when logging is active.
pub fn logging_status() -> Option<(LogLevel, PathBuf)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

/// Default level name for the current build: `debug` in debug builds,
/// `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        LogLevel::Debug.as_str()
    } else {
        LogLevel::Info.as_str()
    }
}

fn start_logger(level: LogLevel, log_dir: &Path) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|err| format!("cannot create log directory `{}`: {err}", log_dir.display()))?;

    let handle = build_logger(level, log_dir)?
        .start()
        .map_err(|err| format!("logger backend failed to start: {err}"))?;
    install_panic_hook();

    info!(
        "event=logging_start module=logging status=ok os={} core_version={} level={level} dir={} rotate_bytes={} keep_files={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        log_dir.display(),
        ROTATION.rotate_bytes,
        ROTATION.keep_files
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

fn build_logger(level: LogLevel, log_dir: &Path) -> Result<Logger, String> {
    let file_spec = FileSpec::default()
        .directory(log_dir)
        .basename(ROTATION.basename);
    let logger = Logger::try_with_str(level.as_str())
        .map_err(|err| format!("log level `{level}` rejected by backend: {err}"))?
        .log_to_file(file_spec)
        .append()
        .rotate(
            Criterion::Size(ROTATION.rotate_bytes),
            Naming::Numbers,
            Cleanup::KeepLogFiles(ROTATION.keep_files),
        )
        .format_for_files(flexi_logger::detailed_format)
        .write_mode(WriteMode::BufferAndFlush);
    Ok(logger)
}

fn parse_log_dir(raw: &str) -> Result<PathBuf, String> {
    let dir = PathBuf::from(raw.trim());
    if dir.as_os_str().is_empty() {
        Err("log_dir cannot be empty".to_string())
    } else if dir.is_relative() {
        Err(format!("log_dir must be an absolute path, got `{}`", dir.display()))
    } else {
        Ok(dir)
    }
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let chained = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Messages can echo garment labels.
        error!(
            "event=core_panic module=logging status=error at={} message={}",
            panic_site(info),
            redact_for_log(&panic_message(info), PANIC_MESSAGE_LIMIT)
        );
        chained(info);
    }));
}

fn panic_site(info: &PanicHookInfo<'_>) -> String {
    match info.location() {
        Some(location) => format!("{}:{}", location.file(), location.line()),
        None => "unknown".to_string(),
    }
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    match payload.downcast_ref::<String>() {
        Some(message) => message.clone(),
        None => "<opaque panic payload>".to_string(),
    }
}

/// Replaces control characters with spaces and keeps at most `limit` chars.
fn redact_for_log(value: &str, limit: usize) -> String {
    let mut chars = value.chars();
    let mut out: String = chars
        .by_ref()
        .take(limit)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}
