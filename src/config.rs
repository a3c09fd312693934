use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;
use crate::storage::DEFAULT_CART_KEY;

pub const CATALOG_URL_VAR: &str = "CART_CATALOG_URL";
pub const STORAGE_DIR_VAR: &str = "CART_STORAGE_DIR";
pub const STORAGE_KEY_VAR: &str = "CART_STORAGE_KEY";
pub const MAILBOX_SIZE_VAR: &str = "CART_MAILBOX_SIZE";
pub const REQUEST_TIMEOUT_VAR: &str = "CART_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct CartConfig {
    /// Remote catalog base URL. `None` means an in-process catalog.
    pub catalog_url: Option<Url>,
    pub storage_dir: PathBuf,
    pub storage_key: String,
    pub mailbox_size: usize,
    pub request_timeout: Duration,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            catalog_url: None,
            storage_dir: PathBuf::from(".cart"),
            storage_key: DEFAULT_CART_KEY.to_string(),
            mailbox_size: 32,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl CartConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any variable source; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let catalog_url = lookup(CATALOG_URL_VAR)
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse::<Url>(CATALOG_URL_VAR, &raw))
            .transpose()?;

        let storage_dir = lookup(STORAGE_DIR_VAR).map(PathBuf::from).unwrap_or(defaults.storage_dir);

        let storage_key = match lookup(STORAGE_KEY_VAR) {
            Some(key) if key.is_empty() => {
                return Err(ConfigError::Invalid {
                    key: STORAGE_KEY_VAR.to_string(),
                    reason: "must not be empty".to_string(),
                })
            }
            Some(key) => key,
            None => defaults.storage_key,
        };

        let mailbox_size = match lookup(MAILBOX_SIZE_VAR) {
            Some(raw) => parse::<usize>(MAILBOX_SIZE_VAR, &raw)?,
            None => defaults.mailbox_size,
        };
        if mailbox_size == 0 {
            return Err(ConfigError::Invalid {
                key: MAILBOX_SIZE_VAR.to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let request_timeout = match lookup(REQUEST_TIMEOUT_VAR) {
            Some(raw) => Duration::from_secs(parse::<u64>(REQUEST_TIMEOUT_VAR, &raw)?),
            None => defaults.request_timeout,
        };

        tracing::debug!(?catalog_url, storage_dir = %storage_dir.display(), "Configuration loaded");

        Ok(Self {
            catalog_url,
            storage_dir,
            storage_key,
            mailbox_size,
            request_timeout,
        })
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
