use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use skillswap_core::AuthConfig;
use tracing::{info, warn};

/// Process-wide settings, read once at startup and handed to [`crate::state::State`].
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// `None` means the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub auth: AuthConfig,
    /// Base URL clients use to reach this server; photo URLs are built from it.
    pub public_url: String,
    pub cors_origin: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let port: u16 = try_load("SKILLSWAP_PORT", "5000")?;
        let token_ttl: u64 = try_load("SKILLSWAP_JWT_EXPIRES_SECS", "3600")?;

        Ok(Self {
            port,
            data_dir: var("SKILLSWAP_DATA_DIR").ok().map(PathBuf::from),
            auth: AuthConfig::new(jwt_secret()?, Duration::from_secs(token_ttl)),
            public_url: var("SKILLSWAP_PUBLIC_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            cors_origin: var("SKILLSWAP_CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("Environment variable {key} not set");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}

/// The signing secret comes from the environment or, failing that, a mounted secret file.
fn jwt_secret() -> anyhow::Result<String> {
    if let Ok(secret) = var("SKILLSWAP_JWT_SECRET") {
        return Ok(secret);
    }

    let path = "/run/secrets/SKILLSWAP_JWT_SECRET";
    read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read JWT secret from {path}: {e}");
            e
        })
        .context("SKILLSWAP_JWT_SECRET is not configured")
}
