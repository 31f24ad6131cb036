// ============================
// crates/auth-lib/src/config.rs
// ============================
//! Configuration management.
use std::path::{Path, PathBuf};

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::password::{BcryptConfig, DEFAULT_COST};
use crate::error::AuthError;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Identity store backing file
    pub store_path: PathBuf,
    /// Log level
    pub log_level: String,
    /// Column records are looked up by
    pub identity_column: String,
    /// Column holding the stored credential hash
    pub credential_column: String,
    /// Legacy salt column, stripped from returned records
    pub salt_column: String,
    /// bcrypt work factor; each increment doubles hashing time
    pub cost: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("data/identities.json"),
            log_level: "info".to_string(),
            identity_column: "username".to_string(),
            credential_column: "password".to_string(),
            salt_column: "salt".to_string(),
            cost: DEFAULT_COST,
        }
    }
}

impl Settings {
    /// Load settings from `config/default.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from("config/default.toml")
    }

    /// Load settings from an explicit TOML file, with `CREDAUTH_`-prefixed
    /// environment variables taking precedence and defaults filling any gap
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("CREDAUTH_"))
            .extract()?;
        Ok(settings)
    }

    /// Validated hasher configuration for the configured cost.
    ///
    /// An out-of-range cost is rejected here, at configuration time; the
    /// hashing path never re-validates.
    pub fn hasher_config(&self) -> Result<BcryptConfig, AuthError> {
        BcryptConfig::new().with_cost(self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_produce_a_valid_hasher_config() {
        let settings = Settings::default();
        let config = settings.hasher_config().unwrap();
        assert_eq!(config.cost(), DEFAULT_COST);
        assert_eq!(settings.credential_column, "password");
        assert_eq!(settings.salt_column, "salt");
    }

    #[test]
    fn test_out_of_range_cost_is_rejected_at_configuration_time() {
        let settings = Settings {
            cost: 3,
            ..Settings::default()
        };
        assert!(matches!(
            settings.hasher_config(),
            Err(AuthError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_from_missing_file_falls_back_to_defaults() {
        let settings = Settings::load_from("does/not/exist.toml").unwrap();
        assert_eq!(settings.cost, DEFAULT_COST);
        assert_eq!(settings.identity_column, "username");
    }
}
