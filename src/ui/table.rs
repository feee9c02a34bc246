use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Indicator, IndicatorRecord};
use crate::data::query::QueryEngine;

const ROW_HEIGHT: f32 = 18.0;

/// Filtered rows as a scrollable table, one column per indicator.
pub fn records_table(ui: &mut Ui, engine: &QueryEngine, records: &[&IndicatorRecord]) {
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(Column::auto().at_least(120.0))
            .column(Column::auto())
            .columns(Column::auto().at_least(90.0), Indicator::COUNT)
            .header(ROW_HEIGHT + 4.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Country");
                });
                header.col(|ui| {
                    ui.strong("Year");
                });
                for ind in Indicator::ALL {
                    header.col(|ui| {
                        ui.strong(ind.display_name());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, records.len(), |mut row| {
                    let rec = records[row.index()];
                    row.col(|ui| {
                        ui.label(rec.country());
                    });
                    row.col(|ui| {
                        ui.label(rec.year().label());
                    });
                    for ind in Indicator::ALL {
                        row.col(|ui| {
                            ui.label(engine.metric_value(rec, ind).to_string());
                        });
                    }
                });
            });
    });
}
