//! slowShow — a slideshow viewer for the Slow Computer
//!
//! Builds a thumbnail playlist from a folder of slides and presents the
//! selected slide full-screen on a second display.

mod app;
mod display;
mod loader;
mod playlist;
mod prefs;
mod scanner;
mod thumbnail;

use app::SlowShowApp;
use eframe::NativeOptions;
use prefs::Preferences;
use slowcore::storage::JsonStore;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let prefs_path = Preferences::default_path();
    let prefs = Preferences::load_or_init(&prefs_path);
    if let Err(e) = &prefs {
        log::error!("error loading {}: {}", prefs_path.display(), e);
    }

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([700.0, 400.0])
        .with_min_inner_size([320.0, 240.0])
        .with_title("slowShow");

    match prefs.as_ref().ok().and_then(|p| p.window) {
        Some(geometry) => {
            viewport = viewport
                .with_position([geometry.x, geometry.y])
                .with_inner_size([geometry.width, geometry.height]);
        }
        None => {
            if let Some(pos) = slowcore::cascade_position() {
                viewport = viewport.with_position(pos);
            }
        }
    }

    let options = NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native("slowShow", options, Box::new(move |cc| {
        slowcore::SlowTheme::default().apply(&cc.egui_ctx);
        Box::new(SlowShowApp::new(prefs_path, prefs))
    }))
}
