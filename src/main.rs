mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::EduInsightApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!("Reading KPI data from {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config::WINDOW_SIZE)
            .with_min_inner_size(config::MIN_WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        "EduInsight Canada Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(EduInsightApp::new(&config)))),
    )
}
