use std::path::PathBuf;

use crate::error::ConfigError;

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub auth: AuthSettings,
    pub polka: PolkaSettings,
    pub chirps: ChirpSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Deployment flag; destructive admin operations require "dev"
    pub platform: String,
    /// Delete the store file before opening it
    pub debug: bool,
    pub static_dir: String,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_dev(&self) -> bool {
        self.platform == "dev"
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct DatabaseSettings {
    pub path: String,
}

impl DatabaseSettings {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

/// JWT authentication settings
#[derive(serde::Deserialize, Clone, Debug)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_expiry: i64,   // seconds (3600 = 1 hour)
    pub refresh_token_expiry: i64,  // seconds (5184000 = 60 days)
    pub issuer: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct AuthSettings {
    pub bcrypt_cost: u32,
}

/// Shared secret of the Polka payment webhook
#[derive(serde::Deserialize, Clone, Debug)]
pub struct PolkaSettings {
    pub api_key: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ChirpSettings {
    pub max_length: usize,
    pub profane_words: Vec<String>,
    pub censor: String,
}

impl Default for ChirpSettings {
    fn default() -> Self {
        Self {
            max_length: 140,
            profane_words: vec![
                "kerfuffle".to_string(),
                "sharbert".to_string(),
                "fornax".to_string(),
            ],
            censor: "****".to_string(),
        }
    }
}

/// Load settings from defaults, `configuration.{yaml,toml,json}` and
/// `APP_<SECTION>__<KEY>` environment variables, in that order.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let chirp_defaults = ChirpSettings::default();

    let settings = config::Config::builder()
        .set_default("application.host", "127.0.0.1")
        .and_then(|b| b.set_default("application.port", 8080_i64))
        .and_then(|b| b.set_default("application.platform", "production"))
        .and_then(|b| b.set_default("application.debug", false))
        .and_then(|b| b.set_default("application.static_dir", "./public"))
        .and_then(|b| b.set_default("database.path", "database.json"))
        .and_then(|b| b.set_default("jwt.secret", ""))
        .and_then(|b| b.set_default("jwt.access_token_expiry", 3600_i64))
        .and_then(|b| b.set_default("jwt.refresh_token_expiry", 60_i64 * 24 * 60 * 60))
        .and_then(|b| b.set_default("jwt.issuer", "chirpy"))
        .and_then(|b| b.set_default("auth.bcrypt_cost", bcrypt::DEFAULT_COST as i64))
        .and_then(|b| b.set_default("polka.api_key", ""))
        .and_then(|b| b.set_default("chirps.max_length", chirp_defaults.max_length as i64))
        .and_then(|b| b.set_default("chirps.profane_words", chirp_defaults.profane_words))
        .and_then(|b| b.set_default("chirps.censor", chirp_defaults.censor))
        .map_err(|e| ConfigError::InvalidValue(e.to_string()))?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let settings = settings
        .try_deserialize::<Settings>()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    settings.validate()?;
    Ok(settings)
}

impl Settings {
    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::MissingRequired("jwt.secret".to_string()));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt.access_token_expiry must be positive".to_string(),
            ));
        }
        if self.jwt.refresh_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt.refresh_token_expiry must be positive".to_string(),
            ));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.auth.bcrypt_cost) {
            return Err(ConfigError::InvalidValue(format!(
                "auth.bcrypt_cost must be between {} and {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            application: ApplicationSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
                platform: "dev".to_string(),
                debug: false,
                static_dir: "./public".to_string(),
            },
            database: DatabaseSettings {
                path: "database.json".to_string(),
            },
            jwt: JwtSettings {
                secret: "test-secret".to_string(),
                access_token_expiry: 3600,
                refresh_token_expiry: 5_184_000,
                issuer: "chirpy".to_string(),
            },
            auth: AuthSettings { bcrypt_cost: 4 },
            polka: PolkaSettings {
                api_key: "key".to_string(),
            },
            chirps: ChirpSettings::default(),
        }
    }

    #[test]
    fn test_valid_settings() {
        assert!(settings().validate().is_ok());
        assert!(settings().application.is_dev());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut s = settings();
        s.jwt.secret.clear();
        assert!(matches!(s.validate(), Err(ConfigError::MissingRequired(_))));
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let mut s = settings();
        s.auth.bcrypt_cost = 2;
        assert!(matches!(s.validate(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_shipped_configuration_is_not_dev_and_has_no_secret() {
        let shipped = config::Config::builder()
            .add_source(config::File::with_name(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/configuration"
            )))
            .build()
            .unwrap();

        assert_eq!(shipped.get_string("application.platform").unwrap(), "production");
        assert!(shipped.get_string("jwt.secret").is_err());
    }
}
