use crate::config::{load_config, save_config, AppConfig};
use crate::error::Result;

#[tauri::command]
pub async fn load_settings() -> AppConfig {
    load_config()
}

/// Persist new timings. Takes effect on next launch.
#[tauri::command]
pub async fn save_settings(
    submit_delay_ms: Option<u64>,
    donation_delay_ms: Option<u64>,
    log_retention: Option<usize>,
) -> Result<AppConfig> {
    let mut config = load_config();
    if let Some(ms) = submit_delay_ms {
        config.submit_delay_ms = ms;
    }
    if let Some(ms) = donation_delay_ms {
        config.donation_delay_ms = ms;
    }
    if let Some(n) = log_retention {
        config.log_retention = n;
    }
    save_config(&config)?;
    Ok(config)
}
