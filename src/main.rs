mod app;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vortex_field::{settings, VortexConfig};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vortex_field=info")),
        )
        .init();

    let config = match settings::load() {
        Ok(config) => config,
        Err(err) => {
            warn!("could not load vortex config, using defaults: {err}");
            VortexConfig::default()
        }
    };
    info!(
        particles = config.particle_count,
        background = %config.background_color,
        "starting vortex field"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vortex Field",
        options,
        Box::new(move |cc| Ok(Box::new(app::VortexApp::new(cc, config)))),
    )
}
