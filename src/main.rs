mod app;
mod chart;
mod color;
mod data;
mod state;
mod ui;

use app::SecurityDashboardApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Security Check Analysis")
            .with_inner_size([1500.0, 950.0])
            .with_min_inner_size([800.0, 500.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Security Check Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(SecurityDashboardApp::default()))),
    )
}
