//! Handles settings for the application. Configuration is written in
//! `settings.toml` and can be overridden with `DRUG_ASSIST__*` variables
//! (e.g. `DRUG_ASSIST__APP__LEVEL=debug`).
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("drug_assist.db".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Enrollment {
    /// Registration portal shown after "enroll now".
    pub portal_url: String,
    /// IANA timezone deciding the current date.
    pub timezone: String,
}

impl Default for Enrollment {
    fn default() -> Self {
        Self {
            portal_url: engine::DEFAULT_PORTAL_URL.to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl Enrollment {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .trim()
            .parse()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub enrollment: Enrollment,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("DRUG_ASSIST").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
