use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use log::info;
use thiserror::Error;

use crate::modules::store::model::UserId;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid { key: String, value: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_file: PathBuf,
    pub upload_dir: PathBuf,
    pub upload_base_url: String,
    /// User credited with newly created posts.
    pub author_user_id: UserId,
    /// User whose likes the feed reflects and toggles.
    pub viewer_user_id: UserId,
    pub simulated_latency: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            data_file: try_load(&lookup, "DATA_FILE", "data/posts.json")?,
            upload_dir: try_load(&lookup, "UPLOAD_DIR", "public/uploads")?,
            upload_base_url: try_load(&lookup, "UPLOAD_BASE_URL", "/uploads")?,
            author_user_id: try_load(&lookup, "AUTHOR_USER_ID", "1")?,
            viewer_user_id: try_load(&lookup, "VIEWER_USER_ID", "2")?,
            simulated_latency: Duration::from_millis(try_load(&lookup, "SIMULATED_LATENCY_MS", "0")?),
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key: key.to_string(),
        value: value.clone(),
        reason: e.to_string(),
    })
}
