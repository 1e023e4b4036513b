//! Contains [layout] which lays out the UI each frame.

use std::path::Path;

use egui::{
    Align, CentralPanel, Color32, Context, Frame, Grid, Key, KeyboardShortcut, Layout, Margin,
    Modifiers, Response, RichText, ScrollArea, TextEdit, TopBottomPanel, Ui,
};

use media::ImageFormat;

use super::ui_manager::{LayoutState, UiAction};
use crate::form;
use crate::prefs::Theme;

/// Draws the main UI for a frame.
pub fn layout(ctx: &Context, state: &mut LayoutState<'_>) {
    menu_bar(ctx, state);

    TopBottomPanel::bottom("status_bar")
        .frame(Frame::side_top_panel(&ctx.style()).inner_margin(Margin::symmetric(10, 4)))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(state.status_bar);
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if state.extracting {
                        ui.spinner();
                    }
                });
            });
        });

    CentralPanel::default().show(ctx, |ui| {
        ScrollArea::vertical().show(ui, |ui| {
            Frame::new()
                .inner_margin(Margin::symmetric(10, 10))
                .show(ui, |ui| {
                    input_output_section(ui, state);
                    ui.add_space(8.0);
                    options_section(ui, state);
                    ui.add_space(8.0);
                    actions(ui, state);
                    ui.add_space(8.0);
                    source_line(ui, state);
                    ui.add_space(8.0);
                    status_log(ui, state.status_log);
                });
        });
    });
}

/// The contents of the About popup. `open` is cleared when it's dismissed.
pub fn about(ui: &mut Ui, open: &mut bool) {
    ui.vertical_centered(|ui| {
        ui.label(format!(
            "{} {}",
            util::version::APP_NAME,
            util::version::APP_VERSION
        ));
        ui.label(util::version::APP_ABOUT);

        ui.add_space(10.0);
        if ui.button("Ok").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            *open = false;
        }
    });
}

fn menu_bar(ctx: &Context, state: &mut LayoutState<'_>) {
    if util::ui::shortcut_pressed(ctx, EXIT_SHORTCUT.modifiers, EXIT_SHORTCUT.logical_key) {
        state.ui_action_queue.push_back(UiAction::Close);
    }

    TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let exit =
                    egui::Button::new("Exit").shortcut_text(ctx.format_shortcut(&EXIT_SHORTCUT));
                if ui.add(exit).clicked() {
                    state.ui_action_queue.push_back(UiAction::Close);
                }
            });

            ui.menu_button("View", |ui| {
                for theme in Theme::ALL {
                    if ui
                        .radio(state.prefs.theme == theme, theme.label())
                        .clicked()
                    {
                        state.ui_action_queue.push_back(UiAction::SetTheme(theme));
                        ui.close();
                    }
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    state.ui_action_queue.push_back(UiAction::ShowAbout);
                }
            });
        });
    });
}

fn input_output_section(ui: &mut Ui, state: &mut LayoutState<'_>) {
    section(ui, "Input / Output", |ui| {
        Grid::new("input_output_grid")
            .num_columns(3)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Input Video:");
                let input = path_field(ui, &mut state.prefs.input_video);
                if input.lost_focus() {
                    state.ui_action_queue.push_back(UiAction::InputEdited);
                }
                if ui.button("Browse").clicked() {
                    state.ui_action_queue.push_back(UiAction::ChooseInput);
                }
                ui.end_row();

                ui.label("Output Dir:");
                path_field(ui, &mut state.prefs.output_dir);
                if ui.button("Browse").clicked() {
                    state.ui_action_queue.push_back(UiAction::ChooseOutput);
                }
                ui.end_row();
            });
    });
}

fn options_section(ui: &mut Ui, state: &mut LayoutState<'_>) {
    let errors = state.field_errors;

    section(ui, "Options", |ui| {
        Grid::new("options_grid")
            .num_columns(6)
            .spacing([8.0, 2.0])
            .show(ui, |ui| {
                ui.label("Start:");
                short_field(ui, &mut state.prefs.start, "sec or HH:MM:SS");
                ui.label("End:");
                short_field(ui, &mut state.prefs.end, "sec or HH:MM:SS");
                ui.label("FPS:");
                let fps = short_field(ui, &mut state.prefs.fps, "source");
                if fps.lost_focus() {
                    state.ui_action_queue.push_back(UiAction::FpsEdited);
                }
                ui.end_row();

                ui.label("");
                field_error(ui, errors.start.as_deref());
                ui.label("");
                field_error(ui, errors.end.as_deref());
                ui.label("");
                field_error(ui, errors.fps.as_deref());
                ui.end_row();
            });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Pattern:");
            ui.add(
                TextEdit::singleline(&mut state.prefs.pattern)
                    .hint_text(media::DEFAULT_PATTERN)
                    .desired_width(220.0),
            );
            preset_picker(ui, state);
        });
        field_error(ui, errors.pattern.as_deref());

        ui.label(format!(
            "Preview: {}",
            form::preview_text(state.prefs, state.estimate)
        ));

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.checkbox(&mut state.prefs.overwrite, "Overwrite")
                .on_hover_text("Overwrite existing output files.");
            ui.checkbox(&mut state.prefs.verbose, "Verbose")
                .on_hover_text("Have ffmpeg print more details.");
            ui.checkbox(&mut state.prefs.dry_run, "Dry-run")
                .on_hover_text("Only print the ffmpeg command.");
        });
    });
}

fn preset_picker(ui: &mut Ui, state: &mut LayoutState<'_>) {
    let current = form::preset(state.prefs);
    let label = |format: Option<ImageFormat>| match format {
        Some(ImageFormat::Jpeg) => "JPEG (.jpg)",
        Some(ImageFormat::Png) => "PNG (.png)",
        None => "Custom",
    };

    egui::ComboBox::from_id_salt("preset")
        .selected_text(label(current))
        .show_ui(ui, |ui| {
            for format in [ImageFormat::Jpeg, ImageFormat::Png] {
                if ui
                    .selectable_label(current == Some(format), label(Some(format)))
                    .clicked()
                {
                    state.ui_action_queue.push_back(UiAction::Preset(format));
                }
            }
        });
}

fn actions(ui: &mut Ui, state: &mut LayoutState<'_>) {
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!state.extracting, egui::Button::new("Preview Command"))
            .clicked()
        {
            state.ui_action_queue.push_back(UiAction::PreviewCommand);
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.button("Reset").clicked() {
                state.ui_action_queue.push_back(UiAction::Reset);
            }

            let output_exists = Path::new(state.prefs.output_dir.trim()).is_dir();
            if ui
                .add_enabled(output_exists, egui::Button::new("Open Output"))
                .clicked()
            {
                state.ui_action_queue.push_back(UiAction::OpenOutput);
            }

            if ui
                .add_enabled(!state.extracting, egui::Button::new("Extract Frames"))
                .clicked()
            {
                state.ui_action_queue.push_back(UiAction::ExtractFrames);
            }
        });
    });
}

fn source_line(ui: &mut Ui, state: &LayoutState<'_>) {
    let summary = state.source.summary();

    ui.horizontal(|ui| {
        ui.label(format!(
            "Source: {}",
            if summary.is_empty() {
                form::UNKNOWN
            } else {
                summary.as_str()
            }
        ));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.label(format!("Estimate: {}", form::estimate_text(state.estimate)));
        });
    });
}

fn status_log(ui: &mut Ui, lines: &[String]) {
    section(ui, "Status / Output", |ui| {
        ScrollArea::vertical()
            .id_salt("status_log")
            .max_height(200.0)
            .stick_to_bottom(true)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for line in lines {
                    ui.label(RichText::new(line).monospace());
                }
            });
    });
}

fn section(ui: &mut Ui, title: &str, inner: impl FnOnce(&mut Ui)) {
    Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(title).strong());
        ui.add_space(4.0);
        inner(ui);
    });
}

fn path_field(ui: &mut Ui, text: &mut String) -> Response {
    ui.add(TextEdit::singleline(text).desired_width(ui.available_width() - 80.0))
}

fn short_field(ui: &mut Ui, text: &mut String, hint: &str) -> Response {
    ui.add(
        TextEdit::singleline(text)
            .hint_text(hint)
            .desired_width(100.0),
    )
}

fn field_error(ui: &mut Ui, error: Option<&str>) {
    match error {
        Some(error) => ui.label(RichText::new(error).small().color(ERROR_COLOR)),
        None => ui.label(""),
    };
}

const EXIT_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Q);

const ERROR_COLOR: Color32 = Color32::from_rgb(0xb0, 0x00, 0x20);
