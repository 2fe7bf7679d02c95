use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::error::StartupError;

pub struct Config {
    pub port: u16,
    pub mongo_uri: String,
    pub mongo_db: String,
    pub environment: String,
}

impl Config {
    pub fn load() -> Result<Self, StartupError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, `load` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            mongo_uri: require(&lookup, "MONGO_URI")?,
            mongo_db: try_load(&lookup, "MONGO_DB", "test")?,
            environment: try_load(&lookup, "APP_ENV", "development")?,
        })
    }
}

fn var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, StartupError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    var(lookup, key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            StartupError::Config(format!("invalid {key} value: {e}"))
        })
}

fn require<F>(lookup: &F, key: &str) -> Result<String, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    var(lookup, key).ok_or_else(|| {
        warn!("Environment variable {key} not found");
        StartupError::Config(format!("{key} must be set"))
    })
}
