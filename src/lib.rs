//! Career Calculator launcher
//!
//! Native entry point around [`career_calc_ui::CareerCalcApp`]: reads
//! configuration, installs logging and opens the window. The browser build
//! starts from `career_calc_ui::start` instead.

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::{AppConfig, Cli};
pub use error::AppError;

use career_calc_ui::CareerCalcApp;
use eframe::egui;

/// Open the main window and block until it closes.
pub fn run(config: AppConfig) -> Result<(), AppError> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Career Calculator")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([800.0, 560.0]),
        ..Default::default()
    };

    let options = config.into_app_options();
    eframe::run_native(
        "Career Calculator",
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_theme(egui::Theme::Dark);
            Ok(Box::new(CareerCalcApp::new(cc, options)?) as Box<dyn eframe::App>)
        }),
    )?;

    tracing::info!("application shut down cleanly");
    Ok(())
}
