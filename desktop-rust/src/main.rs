mod app;
mod io;
mod model;

use app::MarmatApp;
use marmat_common::Settings;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let settings = Settings::load_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_fullscreen(settings.fullscreen_enabled),
        ..Default::default()
    };
    eframe::run_native(
        "MaRMAT",
        options,
        Box::new(|_cc| Box::new(MarmatApp::new(settings))),
    )
}
