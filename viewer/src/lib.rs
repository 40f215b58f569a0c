pub mod config;
pub mod controller;
pub mod view;

use config::AppConfig;

/// Load .env from multiple candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env", "../../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::info!("Loaded .env from: {path}");
            return;
        }
    }
    tracing::info!("No .env file found, using system environment variables");
}

/// Load `.env`, then build and validate the runtime config.
pub fn init_config() -> Result<AppConfig, anyhow::Error> {
    load_dotenv();

    let config = AppConfig::from_env()?;
    tracing::info!(
        log_limit = config.log_limit,
        include_global_emotes = config.include_global_emotes,
        output = %config.output_path.display(),
        "Settings loaded"
    );
    Ok(config)
}
