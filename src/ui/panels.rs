use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, PageState};
use crate::ui::plot;

const PAGE_TITLE: &str = "Candidates Security Analysis";

// ---------------------------------------------------------------------------
// Central page
// ---------------------------------------------------------------------------

/// Render the page: centred title, then whatever the current state allows.
pub fn page(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(PAGE_TITLE).size(45.0).strong());
    });
    ui.separator();

    match &state.page {
        PageState::NoFile => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Upload a CSV or Excel file (File → Open…, or drop it here)");
            });
        }
        PageState::LoadError(msg) => {
            ui.label(RichText::new(msg).color(Color32::RED).size(18.0));
        }
        PageState::Loaded(dashboard) => {
            ScrollArea::both()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    for spec in dashboard.charts.in_order() {
                        plot::chart(ui, spec);
                    }
                });
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let loaded = state.dashboard().is_some();
            if ui
                .add_enabled(loaded, egui::Button::new("Export charts…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = state.dashboard() {
            ui.label(format!(
                "{}: {} records, {} since cutoff",
                ds.file_name,
                ds.table.len(),
                ds.views.security.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// Upload sources
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload Data File")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_file();

    if let Some(path) = file {
        state.upload_path(&path);
    }
}

/// Treat a file dropped onto the window as an upload. Only the first file of
/// a multi-file drop is used.
pub fn handle_dropped_files(ctx: &egui::Context, state: &mut AppState) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    let Some(file) = dropped.into_iter().next() else {
        return;
    };
    if let Some(bytes) = &file.bytes {
        state.upload(&file.name, bytes);
    } else if let Some(path) = &file.path {
        state.upload_path(path);
    }
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export charts")
        .add_filter("JSON", &["json"])
        .set_file_name("charts.json")
        .save_file();

    if let Some(path) = file {
        state.export_charts(&path);
    }
}
