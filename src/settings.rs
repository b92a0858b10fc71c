//! Application settings.
//!
//! Read from an optional `settings` file (`settings.toml`, `settings.yaml`, ...)
//! in the working directory, then from `SAVINGS__*` environment variables,
//! e.g. `SAVINGS__DATABASE__PATH=/tmp/savings.db`.
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::summary::BudgetRules;

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: Database,
    pub log: Log,
    #[serde(default)]
    pub budget: BudgetRules,
}

impl Settings {
    pub fn new() -> Result<Self> {
        Self::from_file("settings")
    }

    pub fn from_file(name: &str) -> Result<Self> {
        let settings = Config::builder()
            .set_default("database.path", "savings.db")?
            .set_default("log.level", "info")?
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("SAVINGS").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
