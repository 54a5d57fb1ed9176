//! Parameter Transfer - Main Entry Point
//!
//! Opens the transfer panel on the demo network.

use parm_transfer::{config::AppConfig, frontend::ParmTransferApp, scene::demo::demo_scene};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_or_default();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.logging.filter))
                .unwrap_or_else(|_| EnvFilter::new(parm_transfer::config::DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Parameter Transfer");

    let scene = demo_scene();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Parameter Transfer"),
        ..Default::default()
    };

    let dark_mode = config.ui.dark_mode;
    eframe::run_native(
        "Parameter Transfer",
        native_options,
        Box::new(move |cc| {
            if dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }

            Ok(Box::new(ParmTransferApp::new(scene, &config)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    tracing::info!("Shutting down...");
    Ok(())
}
