//! Contains [run_ui], which starts up the desktop UI.

mod layout;
mod ui_manager;

use std::process::ExitCode;

use eframe::NativeOptions;
use egui::ViewportBuilder;

use util::version;

use crate::prefs::Preferences;
use crate::worker::Worker;
use ui_manager::UiManager;

/// Starts up the UI, exiting when the window is closed.
///
/// This function can only be run from the main thread.
pub fn run_ui(worker: &Worker, prefs: Preferences) -> ExitCode {
    let ui_manager = UiManager::new(worker, prefs);

    eframe::run_native(
        version::APP_NAME,
        NativeOptions {
            viewport: ViewportBuilder::default()
                .with_title(version::APP_NAME)
                .with_min_inner_size(ui_manager::MIN_WINDOW_SIZE)
                .with_inner_size(ui_manager::DEFAULT_WINDOW_SIZE),
            centered: true,
            ..Default::default()
        },
        Box::new(|_cc| Ok(Box::new(ui_manager))),
    )
    .map_or_else(
        |e| {
            util::debug_log_error!("UI (run native) failed: {e}");
            ExitCode::FAILURE
        },
        |_| ExitCode::SUCCESS,
    )
}
