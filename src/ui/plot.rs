use eframe::egui::{self, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::data::model::IndicatorRecord;
use crate::data::series::{build_series, ChartSpec, Tab, YearAxis};
use crate::state::AppState;
use crate::ui::table;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Comparison section (central panel, below the headline)
// ---------------------------------------------------------------------------

/// Render the tab strip and the active tab's charts.
pub fn comparison(ui: &mut Ui, state: &mut AppState) {
    if state.engine.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view indicators  (File → Open…)");
        });
        return;
    }

    ui.heading("Historical and Comparative Analysis");
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }
    });
    ui.separator();

    let state = &*state;
    let Some(engine) = &state.engine else {
        return;
    };
    let records = state.comparison();
    if records.is_empty() {
        ui.label("No rows match the selected countries and years.");
    }

    let tab = state.active_tab;
    ui.strong(tab.title());
    if tab == Tab::Data {
        table::records_table(ui, engine, &records);
        return;
    }

    let axis = YearAxis::from_records(&records);
    for row in tab.charts().chunks(2) {
        ui.columns(2, |columns: &mut [Ui]| {
            for (ui, spec) in columns.iter_mut().zip(row) {
                line_chart(ui, state, spec, &records, &axis);
            }
        });
        ui.add_space(8.0);
    }
}

/// One line per country; missing values leave gaps.
fn line_chart(
    ui: &mut Ui,
    state: &AppState,
    spec: &ChartSpec,
    records: &[&IndicatorRecord],
    axis: &YearAxis,
) {
    ui.label(egui::RichText::new(spec.title).strong());

    let label_axis = axis.clone();
    Plot::new(spec.title)
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(spec.value.axis_label())
        .x_axis_formatter(move |mark, _range| label_axis.label_at(mark.value).to_string())
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for series in build_series(records, spec.value, axis) {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&series.country))
                    .unwrap_or(egui::Color32::LIGHT_BLUE);

                for segment in series.segments() {
                    let line = Line::new(PlotPoints::from(segment))
                        .name(&series.country)
                        .color(color)
                        .width(1.5);
                    plot_ui.line(line);
                }
            }
        });

    if let Some(caption) = spec.caption {
        ui.label(caption);
    }
}
