use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::{fs, io};

use tracing::{error, info};

/// Credentials for non-interactive login when no persisted session is
/// usable.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend, e.g. `http://127.0.0.1:5000`.
    pub server_address: String,
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    #[serde(default)]
    pub credentials: Option<Credentials>,
    /// Where the session token and theme preference are persisted.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
    #[serde(default = "default_metrics_per_page")]
    pub metrics_per_page: usize,
    #[serde(default = "default_alerts_per_page")]
    pub alerts_per_page: usize,
}

fn default_poll_interval_seconds() -> u64 {
    30
}

fn default_state_path() -> PathBuf {
    PathBuf::from("obsdash_state.toml")
}

fn default_metrics_per_page() -> usize {
    3
}

fn default_alerts_per_page() -> usize {
    4
}

pub fn load_config(config_path_str: &str) -> Result<ClientConfig, Box<dyn Error>> {
    let config_path = Path::new(config_path_str);
    let absolute_path_display = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    info!(path = ?absolute_path_display, "Attempting to load config.");

    let config_str = fs::read_to_string(config_path).map_err(|e| {
        error!(path = %config_path_str, error = %e, "Failed to read config file.");
        Box::new(e) as Box<dyn Error>
    })?;

    let config: ClientConfig = toml::from_str(&config_str).map_err(|e| {
        error!(path = %config_path_str, error = %e, "Failed to parse config file.");
        Box::new(e) as Box<dyn Error>
    })?;

    if config.poll_interval_seconds == 0 {
        let err = io::Error::new(
            io::ErrorKind::InvalidInput,
            "poll_interval_seconds must be greater than zero",
        );
        error!(path = %config_path_str, "Rejecting config with zero poll interval.");
        return Err(Box::new(err));
    }

    info!(server = %config.server_address, interval = config.poll_interval_seconds, "Loaded config successfully.");
    Ok(config)
}
