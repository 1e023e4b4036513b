//! Contains [UiManager] which is used to manage everything UI related except
//! the UI's actual layout and style.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{self, Duration, SystemTime};

use eframe::{App, Frame};
use egui::{Context, Vec2, ViewportCommand};

use media::{ImageFormat, SourceInfo, Stage, SystemRunner};
use util::ui::ErrorPopup;

use super::layout;
use crate::form::{self, FormError};
use crate::prefs::{Preferences, Theme};
use crate::worker::{Worker, WorkerMsg, WorkerTask};

/// The size of the UI's window when it opens.
pub const DEFAULT_WINDOW_SIZE: Vec2 = Vec2::new(760.0, 640.0);

/// The minimum size of the UI's window. It will not be able to shrink smaller
/// than this.
pub const MIN_WINDOW_SIZE: Vec2 = Vec2::new(560.0, 480.0);

/// An object for managing the UI's data and state.
#[derive(Debug)]
pub struct UiManager<'a> {
    worker: &'a Worker,
    prefs: Preferences,
    saved_prefs: Preferences,
    source: SourceInfo,
    /// The input path the last probe was requested for.
    probed_input: Option<PathBuf>,
    status_log: Vec<String>,
    status_bar: String,
    extracting: bool,
    show_about: bool,
    error_popup_queue: VecDeque<String>,
    last_save_worked: bool,
    last_save_timestamp: SystemTime,
    is_1st_update: bool,
}

impl<'a> UiManager<'a> {
    /// Create a UI manager.
    ///
    /// This will not start the UI.
    pub fn new(worker: &'a Worker, prefs: Preferences) -> Self {
        Self {
            worker,
            saved_prefs: prefs.clone(),
            prefs,
            source: SourceInfo::default(),
            probed_input: None,
            status_log: Vec::new(),
            status_bar: READY.into(),
            extracting: false,
            show_about: false,
            error_popup_queue: VecDeque::default(),
            last_save_worked: true,
            last_save_timestamp: time::UNIX_EPOCH,
            is_1st_update: true,
        }
    }

    /// How often to save the preferences.
    const SAVE_INTERVAL: Duration = Duration::from_secs(10);

    /// Calls [Self::save_prefs] if it has been at least [Self::SAVE_INTERVAL]
    /// since the last save.
    fn save_prefs_on_interval(&mut self) {
        let now = SystemTime::now();
        if now
            .duration_since(self.last_save_timestamp)
            .unwrap_or(Duration::ZERO)
            < Self::SAVE_INTERVAL
        {
            return;
        }

        self.last_save_timestamp = now;
        self.save_prefs();
    }

    /// Tries to save the preferences to disk. The disk will not be written to
    /// if nothing changed and the last save worked.
    fn save_prefs(&mut self) {
        if self.last_save_worked && self.prefs == self.saved_prefs {
            return;
        }

        self.last_save_worked = match self.prefs.save() {
            Ok(path) => {
                util::debug_log_info!("Saved preferences to `{}`.", path.display());
                self.saved_prefs = self.prefs.clone();
                true
            }
            Err(e) => {
                util::debug_log_error!("Failed to save preferences (ignoring): {e}");
                false
            }
        };
        self.last_save_timestamp = SystemTime::now();
    }

    /// Add a line to the status log and show it in the status bar.
    fn append_status(&mut self, line: String) {
        self.status_bar = status_bar_text(&line);
        self.status_log.push(line);
    }

    fn handle_worker_msgs(&mut self) {
        let msgs = match self.worker.inbox().check_all() {
            Ok(Some(msgs)) => msgs,
            Ok(None) => return,
            Err(e) => util::eprintln_and_exit!("Fatal error: the worker stopped ({e})."),
        };

        for msg in msgs {
            match msg {
                WorkerMsg::Status(line) => self.append_status(line),

                WorkerMsg::SourceProbed { path, info } => {
                    // Ignore results for an input that has since changed.
                    if self.probed_input.as_deref() != Some(path.as_path()) {
                        continue;
                    }
                    self.source = info;
                    self.clamp_fps();
                }

                WorkerMsg::ExtractionDone { success } => {
                    util::debug_log_info!("Extraction finished (success: {success}).");
                    self.extracting = false;
                    self.status_bar = READY.into();
                }
            }
        }
    }

    /// Ask the worker to probe the input video if it changed since the last
    /// probe. Inputs that aren't files are never probed.
    fn probe_input(&mut self) {
        let input = PathBuf::from(self.prefs.input_video.trim());
        if self.probed_input.as_ref() == Some(&input) {
            return;
        }

        self.source = SourceInfo::default();
        if !input.is_file() {
            self.probed_input = None;
            return;
        }

        self.probed_input = Some(input.clone());
        self.send_task(WorkerTask::Probe(input));
    }

    fn clamp_fps(&mut self) {
        if let Some(note) = form::clamp_fps(&mut self.prefs, &self.source) {
            self.append_status(note);
        }
    }

    /// Returns whether the worker accepted the task.
    fn send_task(&mut self, task: WorkerTask) -> bool {
        match self.worker.send(task) {
            Ok(()) => true,
            Err(e) => {
                util::debug_log_error!("Failed to send a task to the worker: {e}");
                self.error_popup_queue.push_back(GENERIC_ERROR_MSG.into());
                false
            }
        }
    }

    /// Show a form error as a popup, except for field errors which are already
    /// shown inline (a note is logged instead).
    fn report_form_error(&mut self, e: FormError) {
        match e {
            FormError::InvalidFields => self.append_status(e.to_string()),
            FormError::MissingInput | FormError::MissingOutput => {
                self.error_popup_queue.push_back(e.to_string())
            }
        }
    }

    /// Build the command without running anything and log it.
    fn preview_command(&mut self) {
        let options = match form::to_options(&self.prefs, true) {
            Ok(options) => options,
            Err(e) => return self.report_form_error(e),
        };

        let mut printable = String::new();
        let result = media::extract_with_progress(&options, &SystemRunner::new(), |stage| {
            if let Stage::CommandReady(command) = stage {
                printable = command.to_string();
            }
        });

        match result {
            Ok(_) => self.append_status(printable),
            Err(e) => {
                util::debug_log_warning!("Preview failed: {e}");
                self.error_popup_queue.push_back(e.to_string());
            }
        }
    }

    fn extract_frames(&mut self) {
        if self.extracting {
            self.error_popup_queue
                .push_back("An extraction is already running.".into());
            return;
        }

        let options = match form::to_options(&self.prefs, false) {
            Ok(options) => options,
            Err(e) => return self.report_form_error(e),
        };

        if self.send_task(WorkerTask::Extract(options)) {
            self.extracting = true;
            self.status_bar = "Running...".into();
        }
    }

    fn open_output(&mut self) {
        let output = Path::new(self.prefs.output_dir.trim());
        if let Err(e) = util::ui::open_folder_in_file_explorer(output) {
            util::debug_log_warning!("Failed to open the output directory: {e}");
            self.error_popup_queue
                .push_back(format!("Could not open: {e}"));
        }
    }

    fn reset(&mut self) {
        form::reset(&mut self.prefs);
        self.source = SourceInfo::default();
        self.probed_input = None;
        self.status_log.clear();
        self.status_bar = READY.into();
    }

    fn handle_ui_action(&mut self, ctx: &Context, action: UiAction) {
        match action {
            UiAction::ChooseInput => {
                let file = rfd::FileDialog::new()
                    .set_title("Select video file")
                    .add_filter("Video files", VIDEO_EXTENSIONS)
                    .add_filter("All files", &["*"])
                    .pick_file();
                if let Some(file) = file {
                    self.prefs.input_video = file.display().to_string();
                    self.probe_input();
                }
            }
            UiAction::ChooseOutput => {
                let folder = rfd::FileDialog::new()
                    .set_title("Select output directory")
                    .pick_folder();
                if let Some(folder) = folder {
                    self.prefs.output_dir = folder.display().to_string();
                }
            }
            UiAction::InputEdited => self.probe_input(),
            UiAction::FpsEdited => self.clamp_fps(),
            UiAction::Preset(format) => form::apply_preset(&mut self.prefs, format),

            UiAction::PreviewCommand => self.preview_command(),
            UiAction::ExtractFrames => self.extract_frames(),
            UiAction::OpenOutput => self.open_output(),
            UiAction::Reset => self.reset(),

            UiAction::SetTheme(theme) => {
                self.prefs.theme = theme;
                ctx.set_theme(theme.egui_preference());
            }
            UiAction::ShowAbout => self.show_about = true,
            UiAction::Close => ctx.send_viewport_cmd(ViewportCommand::Close),
        }
    }

    fn handle_1st_update(&mut self, ctx: &Context) {
        ctx.set_theme(self.prefs.theme.egui_preference());

        _ = self
            .worker
            .send(WorkerTask::UseUiContext(ctx.clone()))
            .inspect_err(|e| {
                util::debug_log_error!("Failed to send UI context to worker (ignoring): {e}");
            });

        // Saved input paths are probed right away.
        self.probe_input();

        self.is_1st_update = false;
    }
}

impl<'a> ErrorPopup<String> for UiManager<'a> {
    fn error_queue_mut(&mut self) -> &mut VecDeque<String> {
        &mut self.error_popup_queue
    }
}

impl<'a> App for UiManager<'a> {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        if self.is_1st_update {
            self.handle_1st_update(ctx);
        }

        self.handle_worker_msgs();

        apply_base_style(ctx);

        let mut ui_action_queue = VecDeque::default();
        let field_errors = form::validate(&self.prefs);
        let estimate = form::estimate(&self.prefs, &self.source);

        layout::layout(
            ctx,
            &mut LayoutState {
                prefs: &mut self.prefs,
                field_errors: &field_errors,
                source: &self.source,
                estimate,
                status_log: &self.status_log,
                status_bar: &self.status_bar,
                extracting: self.extracting,
                ui_action_queue: &mut ui_action_queue,
            },
        );

        for action in ui_action_queue.drain(..) {
            self.handle_ui_action(ctx, action);
        }

        self.save_prefs_on_interval();

        if self.show_about {
            util::ui::popup_window(ctx, format!("About {}", util::version::APP_NAME), |ui| {
                layout::about(ui, &mut self.show_about);
            });
        }
        self.show_any_error_popups(ctx);

        util::ui::handle_zoom_shortcuts(ctx, ZOOM_LIMITS.0, ZOOM_LIMITS.1);
        util::ui::windows_scroll_fix(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.save_prefs();

        util::debug_log_info!("Closing UI...");
    }
}

/// An action the user performed that should be responded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ChooseInput,
    ChooseOutput,
    /// The input path field lost focus.
    InputEdited,
    /// The fps field lost focus.
    FpsEdited,
    Preset(ImageFormat),
    PreviewCommand,
    ExtractFrames,
    OpenOutput,
    Reset,
    SetTheme(Theme),
    ShowAbout,
    Close,
}

/// Data needed for the main UI's layout.
#[derive(Debug)]
pub struct LayoutState<'a> {
    pub prefs: &'a mut Preferences,
    pub field_errors: &'a form::FieldErrors,
    pub source: &'a SourceInfo,
    pub estimate: Option<u64>,
    pub status_log: &'a [String],
    pub status_bar: &'a str,
    pub extracting: bool,
    pub ui_action_queue: &'a mut VecDeque<UiAction>,
}

const READY: &str = "Ready";

const ZOOM_LIMITS: (f32, f32) = (0.5, 2.0);

const GENERIC_ERROR_MSG: &str = "Something went wrong, consider restarting.";

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "mkv", "avi", "webm", "m4v"];

/// The status bar shows at most 80 characters of a status line.
fn status_bar_text(line: &str) -> String {
    const MAX_CHARS: usize = 80;

    if line.chars().count() < MAX_CHARS {
        return line.into();
    }
    line.chars().take(MAX_CHARS - 3).chain("...".chars()).collect()
}

fn apply_base_style(ctx: &Context) {
    ctx.style_mut(|style| {
        // Add some padding to the inside of buttons.
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
    });
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn failed_sends_leave_extraction_available() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mp4");
        fs::write(&input, b"").unwrap();

        let worker = Worker::stopped();
        let prefs = Preferences {
            input_video: input.display().to_string(),
            output_dir: dir.path().join("frames").display().to_string(),
            ..Default::default()
        };
        let mut ui_manager = UiManager::new(&worker, prefs);

        ui_manager.extract_frames();
        assert!(!ui_manager.extracting);
        assert_eq!(ui_manager.status_bar, READY);
        assert_eq!(
            ui_manager.error_popup_queue.front().map(String::as_str),
            Some(GENERIC_ERROR_MSG)
        );

        // Still not marked busy, so a retry reports the same failure.
        ui_manager.extract_frames();
        assert_eq!(ui_manager.error_popup_queue.len(), 2);
        assert_eq!(ui_manager.error_popup_queue[1], GENERIC_ERROR_MSG);
    }

    #[test]
    fn long_status_lines_are_shortened() {
        assert_eq!(status_bar_text("Ready"), "Ready");

        let long = "x".repeat(120);
        let shortened = status_bar_text(&long);
        assert_eq!(shortened.chars().count(), 80);
        assert!(shortened.ends_with("xxx..."));

        // Multi-byte characters are never split.
        let wide = "\u{e9}".repeat(90);
        assert_eq!(status_bar_text(&wide).chars().count(), 80);
    }
}
