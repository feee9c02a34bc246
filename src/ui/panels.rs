use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::query::QueryEngine;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    let Some(engine) = &state.engine else {
        ui.label("No dataset loaded.");
        return;
    };
    if engine.is_empty() {
        ui.label("The loaded table has no rows.");
        return;
    }

    // Clone what we need so we can mutate state inside the loop.
    let countries = engine.countries().to_vec();
    let years: Vec<String> = engine.years().iter().map(|y| y.label().to_string()).collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Headline country ----
            ui.strong("Select a Country");
            let current = state.selected_country.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("headline_country")
                .selected_text(&current)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for country in &countries {
                        if ui.selectable_label(current == *country, country).clicked() {
                            state.select_country(country.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Comparison countries ----
            let n_selected = state.selection.countries.len();
            egui::CollapsingHeader::new(
                RichText::new(format!("Countries to Compare  ({n_selected}/{})", countries.len()))
                    .strong(),
            )
            .id_salt("compare_countries")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.select_all_countries();
                    }
                    if ui.small_button("None").clicked() {
                        state.clear_countries();
                    }
                });

                for country in &countries {
                    let mut checked = state.selection.countries.contains(country);
                    let mut text = RichText::new(country);
                    if let Some(cm) = &state.color_map {
                        text = text.color(cm.color_for(country));
                    }
                    if ui.checkbox(&mut checked, text).changed() {
                        state.selection.toggle_country(country);
                    }
                }
            });

            // ---- Comparison years ----
            let n_selected = state.selection.years.len();
            egui::CollapsingHeader::new(
                RichText::new(format!("Years to Compare  ({n_selected}/{})", years.len())).strong(),
            )
            .id_salt("compare_years")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.select_all_years();
                    }
                    if ui.small_button("None").clicked() {
                        state.clear_years();
                    }
                });

                for year in &years {
                    let mut checked = state.selection.years.contains(year);
                    if ui.checkbox(&mut checked, year.as_str()).changed() {
                        state.selection.toggle_year(year);
                    }
                }
            });
        });
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
        });

        ui.separator();

        if let Some(engine) = &state.engine {
            ui.label(format!(
                "{} rows loaded, {} selected",
                engine.len(),
                state.comparison().len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Replace the current table with one picked by the user. A failed load
/// keeps the current table and reports the error in the top bar.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open indicator table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => state.set_engine(QueryEngine::new(table)),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
