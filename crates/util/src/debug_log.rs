//! Contains tools for debug-mode logging.
//!
//! Logging cannot be enabled when `cfg!(debug_assertions)` is false, otherwise
//! it's enabled by default. Log lines go to stdout (info) or stderr (warnings
//! and errors) and are colored when the stream is a terminal.

pub mod panic_on_errors;

use std::io::IsTerminal;
use std::panic::Location;
#[cfg(debug_assertions)]
use std::sync::atomic::{AtomicBool, Ordering};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Log some info to stdout if both `cfg!(debug_assertions)` and [enabled] are
/// true.
#[macro_export]
macro_rules! debug_log_info {
    ($($arg:tt)*) => {{
        #[cfg(debug_assertions)]
        if $crate::debug_log::enabled() {
            $crate::debug_log::write_entry(
                $crate::debug_log::Level::Info,
                &::std::format!($($arg)*),
            );
        }
    }};
}

/// Log a warning to stderr if both `cfg!(debug_assertions)` and [enabled] are
/// true.
#[macro_export]
macro_rules! debug_log_warning {
    ($($arg:tt)*) => {{
        #[cfg(debug_assertions)]
        if $crate::debug_log::enabled() {
            $crate::debug_log::write_entry(
                $crate::debug_log::Level::Warning,
                &::std::format!($($arg)*),
            );
        }
    }};
}

/// Log an error to stderr if both `cfg!(debug_assertions)` and [enabled] are
/// true.
///
/// Panics afterwards if [panic_on_errors::enabled] is true.
#[macro_export]
macro_rules! debug_log_error {
    ($($arg:tt)*) => {{
        #[cfg(debug_assertions)]
        if $crate::debug_log::enabled() {
            $crate::debug_log::write_entry(
                $crate::debug_log::Level::Error,
                &::std::format!($($arg)*),
            );

            if $crate::debug_log::panic_on_errors::enabled() {
                panic!("Panicking on error logging enabled.");
            }
        }
    }};
}

/// The severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }

    /// ANSI escape for the level's label.
    fn color(self) -> &'static str {
        match self {
            Level::Info => "\x1b[35m",
            Level::Warning => "\x1b[33m",
            Level::Error => "\x1b[31m",
        }
    }
}

/// Writes a single log entry. Called by the debug log macros (e.g.
/// [debug_log_info]) and generally shouldn't be called directly.
#[track_caller]
pub fn write_entry(level: Level, msg: &str) {
    let is_terminal = match level {
        Level::Info => std::io::stdout().is_terminal(),
        Level::Warning | Level::Error => std::io::stderr().is_terminal(),
    };
    let (blue, level_color, reset_color) = if is_terminal {
        ("\x1b[34m", level.color(), "\x1b[0m")
    } else {
        ("", "", "")
    };

    let where_and_when = where_and_when(blue, reset_color);
    let entry = format!(
        "{blue}DEBUG LOG{reset_color} [{level_color}{}{reset_color}]: {msg}\n{where_and_when}",
        level.label(),
    );

    match level {
        Level::Info => println!("{entry}"),
        Level::Warning | Level::Error => eprintln!("{entry}"),
    }
}

/// Whether logging is enabled or not.
///
/// Logging cannot be enabled when `cfg!(debug_assertions)` is false, otherwise
/// it's enabled by default.
#[inline(always)]
pub fn enabled() -> bool {
    #[cfg(not(debug_assertions))]
    #[inline(always)]
    fn enabled_impl() -> bool {
        false
    }

    #[cfg(debug_assertions)]
    #[inline(always)]
    fn enabled_impl() -> bool {
        ENABLED.load(Ordering::Relaxed)
    }

    enabled_impl()
}

/// Disable logging.
#[inline(always)]
pub fn disable() {
    #[cfg(debug_assertions)]
    ENABLED.store(false, Ordering::Relaxed);
}

/// Enable logging.
///
/// Trying to manually enable logging when `cfg!(debug_assertions)` is false
/// will result in the program panicking.
#[inline(always)]
pub fn enable() {
    #[cfg(not(debug_assertions))]
    panic!("Debug logging cannot be enabled.");

    #[cfg(debug_assertions)]
    ENABLED.store(true, Ordering::Relaxed);
}

/// The location of the caller, the time this was called, and the executable
/// (argv), all as strings.
#[track_caller]
fn where_and_when(color: &str, reset_color: &str) -> String {
    let now = OffsetDateTime::now_utc();

    let loc = Location::caller();
    let where_ = format!("{}:{}:{}", loc.file(), loc.line(), loc.column());

    let when = now
        .format(&Rfc3339)
        .unwrap_or_else(|e| format!("Unknown time: {e}"));

    let exec = std::env::args().collect::<Vec<_>>().join(" ");

    format!(
        "\tWhere: {color}{where_}{reset_color}\n\
         \tTime:  {color}{when}{reset_color}\n\
         \tExec.: {color}{exec}{reset_color}"
    )
}

#[cfg(debug_assertions)]
static ENABLED: AtomicBool = AtomicBool::new(true);
