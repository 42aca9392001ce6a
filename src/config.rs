use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::nav::Location;

const DEFAULT_API_URL: &str = "https://nc-games-api-9f6b.onrender.com/api";
const DEFAULT_START: &str = "/reviews";
const DEFAULT_TOAST_SECS: &str = "4";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Could not determine a data directory; set REVIEW_BOARD_DATA_DIR")]
    NoDataDir,
}

/// Runtime configuration, read from the environment (and an optional `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the reviews API, without a trailing slash
    pub api_url: String,
    /// Where the local vote store lives
    pub data_dir: PathBuf,
    /// Location shown on startup
    pub start: Location,
    /// How long notifications stay on screen
    pub toast_lifetime: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_ok() {
            info!("Loaded .env file");
        }

        let api_url: String = try_load("REVIEW_BOARD_API_URL", DEFAULT_API_URL)?;
        url::Url::parse(&api_url).map_err(|e| ConfigError::Invalid {
            key: "REVIEW_BOARD_API_URL",
            value: api_url.clone(),
            reason: e.to_string(),
        })?;

        let data_dir = match var("REVIEW_BOARD_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let start: String = try_load("REVIEW_BOARD_START", DEFAULT_START)?;
        let toast_secs: u64 = try_load("REVIEW_BOARD_TOAST_SECS", DEFAULT_TOAST_SECS)?;

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            data_dir,
            start: Location::parse(&start),
            toast_lifetime: Duration::from_secs(toast_secs.max(1)),
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}

/// Platform data directory, e.g. ~/.local/share/review-board on Linux
fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let mut path = dirs::data_dir()
        .or_else(dirs::home_dir)
        .ok_or(ConfigError::NoDataDir)?;

    path.push("review-board");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_load_uses_default_for_missing_key() {
        let value: u64 = try_load("REVIEW_BOARD_TEST_MISSING_KEY", "7").unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_try_load_rejects_bad_default() {
        let result: Result<u64, _> = try_load("REVIEW_BOARD_TEST_MISSING_KEY", "seven");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "REVIEW_BOARD_TEST_MISSING_KEY", .. })
        ));
    }
}
