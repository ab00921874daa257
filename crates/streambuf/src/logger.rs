//! Timestamped console/file logger for the [`log`] facade.
//!
//! Lines have the shape `[<I|W|E>] <MM/DD HH:MM:SS.ffffff> | <message>`:
//! a single-letter severity code, local wall-clock time with microsecond
//! precision, then the message. Every record goes to stdout; a file sink can
//! additionally be configured once per process with [`init_with_file`].
//!
//! Callers log through the facade macros:
//!
//! ```rust,no_run
//! streambuf::logger::init().expect("first init");
//! log::info!("listening {}", streambuf::logger::kv("port", 9000));
//! // prints: [I] <08/07 12:34:56.123456> | listening port=(9000)
//! ```
//!
//! Not designed for throughput; this is glue for tools and services that
//! want readable, timestamped lines without a subscriber stack.

use std::{
    fmt, format,
    fs::{File, OpenOptions},
    io::Write as _,
    path::Path,
    string::String,
    sync::{Mutex, OnceLock},
    time::{SystemTime, UNIX_EPOCH},
};

use log::{Level, LevelFilter, Log, Metadata, Record};
use thiserror::Error;

/// Errors surfaced by logger initialization.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// A logger was already installed for this process.
    #[error("logger already initialized")]
    AlreadyInitialized,

    /// The file sink could not be opened.
    #[error("failed to open log file: {0}")]
    OpenFile(#[from] std::io::Error),
}

/// Installs the console logger and enables `INFO` and above.
///
/// # Errors
///
/// Returns [`LoggerError::AlreadyInitialized`] if any logger was installed
/// before, by this crate or another.
pub fn init() -> Result<(), LoggerError> {
    install(None)
}

/// Installs the console logger with an additional file sink appending to
/// `path`.
///
/// The file is opened once and shared for the life of the process; it is
/// created if missing and appended to otherwise.
///
/// # Errors
///
/// Returns [`LoggerError::OpenFile`] if the file cannot be opened and
/// [`LoggerError::AlreadyInitialized`] if a logger was installed before.
pub fn init_with_file<P: AsRef<Path>>(path: P) -> Result<(), LoggerError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    install(Some(file))
}

/// Renders a key/value pair as `key=(value)` inside a log line.
///
/// ```rust
/// assert_eq!(streambuf::logger::kv("bytes", 42).to_string(), "bytes=(42)");
/// ```
#[must_use]
pub fn kv<T: fmt::Display>(key: &str, value: T) -> Kv<'_, T> {
    Kv { key, value }
}

/// Display adapter returned by [`kv`].
pub struct Kv<'a, T> {
    key: &'a str,
    value: T,
}

impl<T: fmt::Display> fmt::Display for Kv<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=({})", self.key, self.value)
    }
}

/// Nanoseconds since the Unix epoch, or `-1` if the clock reports a
/// pre-epoch time.
#[must_use]
pub fn now_nanos() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_nanos()).unwrap_or(i64::MAX),
        Err(_) => -1,
    }
}

static LOGGER: OnceLock<StreamLogger> = OnceLock::new();

struct StreamLogger {
    file: Option<Mutex<File>>,
}

fn install(file: Option<File>) -> Result<(), LoggerError> {
    let logger = LOGGER.get_or_init(|| StreamLogger {
        file: file.map(Mutex::new),
    });
    log::set_logger(logger).map_err(|_| LoggerError::AlreadyInitialized)?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}

impl Log for StreamLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(severity(record.level()), stamp_now(), record.args());

        // Sink writes are best-effort.
        let _ = std::io::stdout().write_all(line.as_bytes());

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.write_all(line.as_bytes());
                let _ = file.flush();
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

fn severity(level: Level) -> &'static str {
    match level {
        Level::Error => "E",
        Level::Warn => "W",
        _ => "I",
    }
}

#[derive(Debug, Clone, Copy)]
struct Stamp {
    mon: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
    usec: u32,
}

fn format_line(code: &str, stamp: Stamp, args: &fmt::Arguments<'_>) -> String {
    format!(
        "[{code}] <{:02}/{:02} {:02}:{:02}:{:02}.{:06}> | {args}\n",
        stamp.mon, stamp.day, stamp.hour, stamp.min, stamp.sec, stamp.usec
    )
}

fn stamp_now() -> Stamp {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let (mon, day, hour, min, sec) = local_parts(now.as_secs());

    Stamp {
        mon,
        day,
        hour,
        min,
        sec,
        usec: now.subsec_micros(),
    }
}

/// Local wall-clock breakdown of `secs` since the epoch as
/// `(month, day, hour, minute, second)`.
#[cfg(unix)]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
fn local_parts(secs: u64) -> (u32, u32, u32, u32, u32) {
    let t = secs as libc::time_t;
    let mut tm = core::mem::MaybeUninit::<libc::tm>::uninit();

    // localtime_r only fails for inputs far outside the representable range.
    let tm = unsafe {
        if libc::localtime_r(&raw const t, tm.as_mut_ptr()).is_null() {
            return (0, 0, 0, 0, 0);
        }
        tm.assume_init()
    };

    (
        (tm.tm_mon + 1) as u32,
        tm.tm_mday as u32,
        tm.tm_hour as u32,
        tm.tm_min as u32,
        tm.tm_sec as u32,
    )
}

/// UTC breakdown of `secs` since the epoch; without a calendar dependency
/// there is no portable local-time conversion off unix.
#[cfg(not(unix))]
#[allow(clippy::cast_possible_truncation)]
fn local_parts(secs: u64) -> (u32, u32, u32, u32, u32) {
    let days = (secs / 86_400) as i64;
    let rem = secs % 86_400;
    let (mon, day) = civil_from_days(days);

    (
        mon,
        day,
        (rem / 3_600) as u32,
        (rem % 3_600 / 60) as u32,
        (rem % 60) as u32,
    )
}

/// Gregorian month and day for a day count since 1970-01-01.
#[cfg(not(unix))]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn civil_from_days(z: i64) -> (u32, u32) {
    let z = z + 719_468;
    let era = (if z >= 0 { z } else { z - 146_096 }) / 146_097;
    let doe = (z - era * 146_097) as u64;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let mon = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;

    (mon, day)
}
