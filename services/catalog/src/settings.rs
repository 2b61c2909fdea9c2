//! Service configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `config/catalog.toml`, then `CATALOG__SECTION__KEY` environment variables.
//! `DATABASE_URL` and `JWT_PUBLIC_KEY` override everything else.

use anyhow::{Result, anyhow};
use common::DatabaseConfig;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::middleware::JwtConfig;

const SETTINGS_PATH: &str = "config/catalog";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: Server,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub log: Log,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub filter: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(SETTINGS_PATH)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .set_default("server.address", "0.0.0.0:3001")?
            .set_default("log.filter", "info")?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("CATALOG")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.public_key", std::env::var("JWT_PUBLIC_KEY").ok())?
            .build()
            .map_err(|e| anyhow!(e))?
            .try_deserialize()
            .map_err(|e| anyhow!(e))?;

        Ok(settings)
    }
}
