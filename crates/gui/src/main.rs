#![cfg_attr(all(windows, feature = "no-console"), windows_subsystem = "windows")]

mod args;
mod form;
mod prefs;
mod ui;
mod worker;

use std::process::ExitCode;

use args::Args;
use prefs::Preferences;
use worker::Worker;

fn main() -> ExitCode {
    let args = Args::default();

    #[cfg(debug_assertions)]
    {
        use util::debug_log;
        if args.no_debug_logging {
            debug_log::disable();
        } else if args.debug_error_log_panics {
            debug_log::panic_on_errors::enable();
        }
    }

    let prefs = if args.reset_preferences {
        Preferences::default()
    } else {
        Preferences::load()
    };

    let worker = match Worker::new() {
        Ok(worker) => worker,
        Err(e) => {
            util::debug_log_error!("Failed to start the worker thread: {e}");
            eprintln!("Something went wrong.");
            return ExitCode::FAILURE;
        }
    };

    ui::run_ui(&worker, prefs)
}
