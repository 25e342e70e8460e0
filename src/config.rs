use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::DEFAULT_MAX_IMAGE_BYTES;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Failed to parse {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub public_asset_url: String,
    pub file_size_limit: usize,
}

impl AppConfig {
    /// Reads `.env` if present, then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = parse_or(&lookup, "BIND_ADDR", || SocketAddr::from(([0, 0, 0, 0], 3000)))?;
        let file_size_limit = parse_or(&lookup, "FILE_SIZE_LIMIT", || DEFAULT_MAX_IMAGE_BYTES)?;

        let upload_dir = lookup("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./uploads"));
        let public_asset_url = lookup("PUBLIC_ASSET_URL")
            .unwrap_or_else(|| "http://localhost:3000/assets".to_owned());

        Ok(Self {
            database_url,
            bind_addr,
            upload_dir,
            public_asset_url,
            file_size_limit,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: impl FnOnce() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default()),
    }
}
