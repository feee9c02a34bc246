mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use app::DashboardApp;
use config::DashboardConfig;
use data::query::QueryEngine;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env()?;

    // The table is loaded once; a bad file aborts startup.
    let table = data::loader::load_file(&config.data_path)
        .context("the indicator table could not be loaded")?;

    let mut state = AppState::new(config.clone());
    state.set_engine(QueryEngine::new(table));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Comparative Country Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard: {e}"))
}
