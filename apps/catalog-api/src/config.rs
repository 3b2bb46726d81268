//! Configuration for the Catalog API

use core_config::{server::ServerConfig, tables::CatalogTables, Environment, FromEnv};

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub tables: CatalogTables,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            tables: CatalogTables::from_env()?,
        })
    }
}
