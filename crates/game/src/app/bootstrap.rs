use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{script_path_from_env, AppConfig, ConfigError};

pub(crate) struct AppWiring {
    pub(crate) config: AppConfig,
    pub(crate) script: Option<PathBuf>,
}

pub(crate) fn build_app() -> Result<AppWiring, ConfigError> {
    init_tracing();
    info!("=== Dialog Demo Startup ===");

    let config = AppConfig::from_env()?;
    let script = script_path_from_env();
    info!(
        start_scene = %config.start_scene,
        default_volume = config.default_volume,
        script = ?script,
        "config_loaded"
    );

    Ok(AppWiring { config, script })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
