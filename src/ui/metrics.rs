use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::metric::HEADLINE_METRICS;
use crate::data::model::IndicatorRecord;
use crate::data::query::QueryEngine;
use crate::state::AppState;

const CARD_FILL: Color32 = Color32::from_rgb(0x39, 0x39, 0x39);

// ---------------------------------------------------------------------------
// Country banner and headline metric cards
// ---------------------------------------------------------------------------

/// Render the selected country's name and its latest-year metrics.
pub fn headline(ui: &mut Ui, state: &mut AppState) {
    if let Some(err) = state.refresh_headline() {
        ui.label(RichText::new(err.to_string()).color(Color32::RED));
    }
    let Some(engine) = &state.engine else {
        return;
    };
    match state.headline() {
        None => {}
        Some(Ok(record)) => {
            banner(ui, record.country());
            metric_cards(ui, engine, record);
        }
        Some(Err(err)) => {
            ui.label(RichText::new(err.to_string()).color(Color32::RED));
        }
    }
}

fn banner(ui: &mut Ui, country: &str) {
    egui::Frame::group(ui.style())
        .fill(CARD_FILL)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(country).size(48.0).strong().color(Color32::WHITE));
            });
        });
    ui.add_space(12.0);
}

fn metric_cards(ui: &mut Ui, engine: &QueryEngine, record: &IndicatorRecord) {
    ui.columns(HEADLINE_METRICS.len(), |columns: &mut [Ui]| {
        for (ui, metric) in columns.iter_mut().zip(HEADLINE_METRICS.iter()) {
            egui::Frame::group(ui.style())
                .fill(CARD_FILL)
                .show(ui, |ui: &mut Ui| {
                    ui.set_width(ui.available_width());
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.label(RichText::new(metric.label).color(Color32::LIGHT_GRAY));
                        let value = engine.metric_value(record, metric.indicator);
                        let color = if value.is_no_data() {
                            Color32::GRAY
                        } else {
                            Color32::WHITE
                        };
                        ui.label(RichText::new(value.to_string()).size(28.0).color(color));
                    });
                });
            ui.small(format!("Year: {}", record.year()));
        }
    });
}
