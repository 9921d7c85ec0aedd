use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// A watch on one commodity name with an alert threshold.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Subscription {
    pub commodity: String,
    pub email: Option<String>,
    /// Full email-to-SMS gateway address, e.g. `5551234567@vtext.com`.
    pub sms: Option<String>,
    /// Alternative to `sms`: a bare phone number plus `sms_carrier`, with
    /// the gateway domain looked up from the known carrier list.
    pub sms_number: Option<String>,
    pub sms_carrier: Option<String>,
    #[serde(default = "default_min_percent_change")]
    pub min_percent_change: f64,
}

fn default_min_percent_change() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    pub base_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            base_url: "https://tradingeconomics.com".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    /// Year used to complete the table's `"Mon/Day"` dates. Defaults to the
    /// current UTC year when unset.
    pub reference_year: Option<i32>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    pub smtp: Option<SmtpConfig>,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "cmx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "codito", "cmx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The reference year for two-part dates, falling back to the current
    /// UTC year.
    pub fn reference_year(&self) -> i32 {
        self.reference_year.unwrap_or_else(|| Utc::now().year())
    }
}
