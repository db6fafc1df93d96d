mod app;

use app::UiApp;
use eframe::{NativeOptions, egui};

fn main() {
    tracing_subscriber::fmt::init();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 820.0]),
        ..Default::default()
    };
    let title = format!("Soybean Seed Analyzer {}", env!("SEED_ANALYZER_VERSION"));
    if let Err(e) = eframe::run_native(
        &title,
        options,
        Box::new(|_cc| {
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(UiApp::new()))
        }),
    ) {
        eprintln!("Application stopped with error: {e}");
    }
}
