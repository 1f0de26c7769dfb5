use anyhow::{anyhow, Context, Result};
use eframe::egui;

use csh_dashboard::app::DashboardApp;
use csh_dashboard::config::DashboardConfig;
use csh_dashboard::data::loader;
use csh_dashboard::state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config_path = DashboardConfig::default_path();
    let config = DashboardConfig::load(&config_path)?;

    let mut state = AppState::new(&config);
    if let Some(path) = &config.dataset_path {
        let table = loader::load_file(path).context("loading the configured dataset")?;
        state.set_dataset(table, Some(path.clone()));
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title(&config.window_title),
        ..Default::default()
    };

    eframe::run_native(
        &config.window_title,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard: {e}"))
}
