//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOP_DATA_DIR` - Directory holding `products.json`, `users.json` and
//!   `orders.json`. When unset, snapshots are kept in memory only.
//! - `SHOP_CHANNEL_CAPACITY` - Actor mailbox size (default: 32)
//! - `SHOP_SESSION_IDLE_SECS` - Seconds without activity before a session is
//!   dropped (default: 1800)
//! - `SHOP_ADMIN_USERNAME` / `SHOP_ADMIN_PASSWORD` - Admin account created at
//!   startup if no user of that name exists. Set both or neither.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_CHANNEL_CAPACITY: usize = 32;
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Credentials for the account seeded at startup.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Snapshot directory; `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// Mailbox size for every actor.
    pub channel_capacity: usize,
    /// Sessions idle for longer than this are expired.
    pub session_idle_timeout: Duration,
    pub admin: Option<AdminSeed>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            admin: None,
        }
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or only half of the
    /// admin credentials are given.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same parsing as [`ShopConfig::from_env`] against an arbitrary source.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = get("SHOP_DATA_DIR").map(PathBuf::from);

        let channel_capacity = match get("SHOP_CHANNEL_CAPACITY") {
            None => DEFAULT_CHANNEL_CAPACITY,
            Some(raw) => positive("SHOP_CHANNEL_CAPACITY", &raw)?,
        };

        let idle_secs = match get("SHOP_SESSION_IDLE_SECS") {
            None => DEFAULT_SESSION_IDLE_SECS,
            Some(raw) => positive("SHOP_SESSION_IDLE_SECS", &raw)?,
        };

        let admin = match (get("SHOP_ADMIN_USERNAME"), get("SHOP_ADMIN_PASSWORD")) {
            (None, None) => None,
            (Some(username), Some(password)) => Some(AdminSeed {
                username: username.trim().to_string(),
                password: SecretString::from(password),
            }),
            (Some(_), None) => return Err(ConfigError::MissingEnvVar("SHOP_ADMIN_PASSWORD".to_string())),
            (None, Some(_)) => return Err(ConfigError::MissingEnvVar("SHOP_ADMIN_USERNAME".to_string())),
        };

        Ok(Self {
            data_dir,
            channel_capacity,
            session_idle_timeout: Duration::from_secs(idle_secs),
            admin,
        })
    }
}

fn positive<N>(key: &str, raw: &str) -> Result<N, ConfigError>
where
    N: std::str::FromStr + Default + PartialEq,
    N::Err: std::fmt::Display,
{
    let value = raw
        .trim()
        .parse::<N>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if value == N::default() {
        return Err(ConfigError::InvalidEnvVar(key.to_string(), "must be greater than zero".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ShopConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ShopConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]).unwrap();
        assert_eq!(config.data_dir, None);
        assert_eq!(config.channel_capacity, 32);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(1800));
        assert!(config.admin.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("SHOP_DATA_DIR", "/var/shop"),
            ("SHOP_CHANNEL_CAPACITY", "8"),
            ("SHOP_SESSION_IDLE_SECS", "90"),
            ("SHOP_ADMIN_USERNAME", "admin"),
            ("SHOP_ADMIN_PASSWORD", "letmein"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/var/shop")));
        assert_eq!(config.channel_capacity, 8);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(90));
        let admin = config.admin.unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.password.expose_secret(), "letmein");
    }

    #[test]
    fn zero_or_garbage_capacity_is_rejected() {
        assert!(matches!(config(&[("SHOP_CHANNEL_CAPACITY", "0")]), Err(ConfigError::InvalidEnvVar(..))));
        assert!(matches!(config(&[("SHOP_CHANNEL_CAPACITY", "lots")]), Err(ConfigError::InvalidEnvVar(..))));
    }

    #[test]
    fn zero_or_garbage_idle_timeout_is_rejected() {
        for raw in ["0", "-5", "soon"] {
            assert!(
                matches!(config(&[("SHOP_SESSION_IDLE_SECS", raw)]), Err(ConfigError::InvalidEnvVar(..))),
                "{raw}"
            );
        }
    }

    #[test]
    fn half_an_admin_is_an_error() {
        assert_eq!(
            config(&[("SHOP_ADMIN_USERNAME", "admin")]).unwrap_err(),
            ConfigError::MissingEnvVar("SHOP_ADMIN_PASSWORD".to_string())
        );
    }

    #[test]
    fn password_is_not_printed() {
        let config = config(&[("SHOP_ADMIN_USERNAME", "admin"), ("SHOP_ADMIN_PASSWORD", "letmein")]).unwrap();
        assert!(!format!("{config:?}").contains("letmein"));
    }
}
