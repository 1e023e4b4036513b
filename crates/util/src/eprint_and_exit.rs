//! Defines [eprintln_and_exit].

/// The equivalent to calling [eprintln], then calling [std::process::exit]
/// with an exit code of `1`.
///
/// Useful for bailing out of a thread that can't hand an error back to
/// `main` (e.g. the UI thread once the event loop owns it).
#[macro_export]
macro_rules! eprintln_and_exit {
    ($($arg:tt)*) => {{
        ::std::eprintln!($($arg)*);
        ::std::process::exit(1);
    }};
}
