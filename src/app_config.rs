use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

/// Service configuration, read from environment variables such as
/// `DATABASE_URL` and `PORT`.
#[derive(Debug, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    #[serde(default = "default_store_reconnect_secs")]
    pub store_reconnect_secs: u64,
}

fn default_database_url() -> String {
    "sqlite://student_feedback.db?mode=rwc".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3002
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_store_reconnect_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn from_env() -> Result<AppConfig, envy::Error> {
        envy::from_env()
    }

    /// `None` when reconnect attempts are disabled.
    pub fn store_reconnect_interval(&self) -> Option<Duration> {
        (self.store_reconnect_secs > 0).then(|| Duration::from_secs(self.store_reconnect_secs))
    }
}
