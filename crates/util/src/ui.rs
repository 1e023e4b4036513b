//! Common UI utilities for the desktop client.

use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::process::Command;

use egui::gui_zoom::{self, kb_shortcuts};
use egui::{Context, Key, Modal, Modifiers, RichText, Ui};

/// A hacky fix to make scrolling smooth on trackpads w/ Windows. See issue:
/// <https://github.com/emilk/egui/issues/4350>
///
/// This compiles down to a no-op when not on Windows.
#[inline(always)]
pub fn windows_scroll_fix(ctx: &Context) {
    #[cfg(windows)]
    {
        let scrolled_recently = ctx.input(|i| i.time_since_last_scroll() < 1.0);
        if scrolled_recently {
            ctx.request_repaint();
        }
    }

    #[cfg(not(windows))]
    let _ = ctx;
}

/// Draw a header with a dimmed background that takes up the entire width of the
/// window (ignoring the window's inner margin). This is meant to be placed as
/// the first element in a window-like container (e.g. [Modal]).
pub fn window_header(ui: &mut Ui, title: impl Into<String>) {
    let pad = ui.spacing().window_margin;

    let heading_frame = egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .inner_margin(egui::Margin::same(8))
        .outer_margin(egui::Margin {
            left: -pad.left,
            right: -pad.right,
            top: -pad.top,
            bottom: 0,
        })
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(title.into());
            });
        });

    // Line along the bottom of the header.
    let rect = heading_frame.response.rect;
    let line_l = rect.left_bottom();
    let line_r = rect.right_bottom();
    ui.painter().line_segment(
        [
            (line_l.x - pad.left as f32, line_l.y).into(),
            (line_r.x + pad.right as f32, line_r.y).into(),
        ],
        ui.visuals().window_stroke(),
    );
}

/// Opens a popup window with a header, dimming and blocking interaction for the
/// rest of the UI below (see [Modal]).
///
/// `title` should be globally unique.
pub fn popup_window<T, F, R>(ctx: &Context, title: T, add_contents: F)
where
    T: Into<String>,
    F: FnOnce(&mut Ui) -> R,
{
    let title = title.into();
    let viewport_size = ctx.viewport_rect().size();

    // The ID depends on the viewport's size so the modal's area is recomputed
    // when the window is resized or zoomed. Otherwise the popup can get cut off
    // by the edges of the window.
    let popup_id = format!("popup='{title}' viewport={viewport_size}").into();

    Modal::new(popup_id).show(ctx, |ui| {
        window_header(ui, title);
        add_contents(ui)
    });
}

/// A simple error popup window system that uses [Modal].
///
/// Implementors store a queue of error messages; call
/// [ErrorPopup::show_any_error_popups] once per frame and the messages are
/// shown one at a time until the user acknowledges each of them.
///
/// ```
/// use std::collections::VecDeque;
///
/// use util::ui::ErrorPopup;
///
/// struct Client {
///     errors: VecDeque<String>,
/// }
///
/// impl ErrorPopup<String> for Client {
///     fn error_queue_mut(&mut self) -> &mut VecDeque<String> {
///         &mut self.errors
///     }
/// }
/// ```
pub trait ErrorPopup<S>
where
    String: for<'a> From<&'a S>,
{
    /// A queue of errors to display to the user.
    fn error_queue_mut(&mut self) -> &mut VecDeque<S>;

    /// If [ErrorPopup::error_queue_mut] returns a non-empty queue, a popup
    /// window that informs the user of an error is shown until they acknowledge
    /// it (see [popup_window]).
    fn show_any_error_popups(&mut self, ctx: &Context) {
        let error_queue = self.error_queue_mut();

        let Some(error_msg) = error_queue.front() else {
            return;
        };
        let error_msg: String = error_msg.into();

        popup_window(ctx, "\u{26a0} Error", |ui| {
            ui.vertical_centered(|ui| {
                ui.label(error_msg);

                ui.add_space(10.0);
                let ok_button = ui.button("Ok");

                let errors_remaining = error_queue.len() - 1;
                if errors_remaining > 0 {
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new(format!(
                            "{errors_remaining} additional error{} remaining",
                            if errors_remaining != 1 { "s" } else { "" }
                        ))
                        .small()
                        .weak(),
                    );
                }

                if ok_button.clicked() || ui.input(|i| i.key_pressed(Key::Enter)) {
                    error_queue.pop_front();
                }
            })
        });
    }
}

/// Handles zoom in/out shortcuts (which are enabled by default in [egui], this
/// just clamps the amount you can actually zoom in/out by). Whether the zoom
/// changed is returned.
///
/// Note that the zoom will not be taken into account until the next draw.
pub fn handle_zoom_shortcuts(ctx: &Context, min: f32, max: f32) -> bool {
    let zoom_in_requested = ctx.input_mut(|i| {
        i.consume_shortcut(&kb_shortcuts::ZOOM_IN)
            | i.consume_shortcut(&kb_shortcuts::ZOOM_IN_SECONDARY)
    });
    if zoom_in_requested {
        let zoom_factor_in_range = ctx.zoom_factor() < max;
        if zoom_factor_in_range {
            gui_zoom::zoom_in(ctx);
        }
        return zoom_factor_in_range;
    }

    let zoom_out_requested = ctx.input_mut(|i| i.consume_shortcut(&kb_shortcuts::ZOOM_OUT));
    if zoom_out_requested && ctx.zoom_factor() > min {
        gui_zoom::zoom_out(ctx);
        return true;
    }
    false
}

/// A more readable helper for determining if a shortcut ([Modifiers] + [Key])
/// was pressed. The key press is consumed.
pub fn shortcut_pressed(ctx: &Context, mods: Modifiers, key: Key) -> bool {
    ctx.input_mut(|i| i.consume_key(mods, key))
}

/// Opens a folder with the OS's file explorer.
pub fn open_folder_in_file_explorer(path: &Path) -> Result<(), io::Error> {
    if !path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Folder not found: {}", path.display()),
        ));
    }

    crate::debug_log_info!("Opening file explorer: `{}`", path.display());

    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        // `xdg-open` is standard on most Linux distros
        "xdg-open"
    };

    Command::new(opener).arg(path).spawn().map(|_| ())
}
