#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use sketchboard::{EditorConfig, SketchApp};

const CONFIG_FILE: &str = "sketchboard.json";

fn main() -> eframe::Result {
    env_logger::init();

    let config = EditorConfig::load_or_default(CONFIG_FILE);
    let export_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let [width, height] = config.canvas_size;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width + 260.0, height + 40.0])
            .with_min_inner_size([400.0, 300.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    eframe::run_native(
        "sketchboard",
        native_options,
        Box::new(move |cc| Ok(Box::new(SketchApp::new(cc, config, export_dir)))),
    )
}
