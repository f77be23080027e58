//! Configuration loaded from `deptlist.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const ROLE_ENV_VAR: &str = "DEPTLIST_ROLE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::config("api.base_url is empty"));
        }
        url::Url::parse(&self.api.base_url)?;
        if self.api.timeout_secs == 0 {
            return Err(AppError::config("api.timeout_secs must be > 0"));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::config("api.user_agent is empty"));
        }
        Ok(())
    }

    /// Role precedence: explicit flag, then environment, then file.
    pub fn resolve_role(&self, cli_role: Option<&str>) -> Option<String> {
        cli_role
            .map(str::to_string)
            .or_else(|| std::env::var(ROLE_ENV_VAR).ok())
            .or_else(|| self.view.role.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "defaults::base_url")]
    pub base_url: String,
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// How a confirmed delete finds the record to drop locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteTargeting {
    /// Remove by stable id from every collection.
    #[default]
    ById,
    /// Remove the position captured when the delete was requested.
    CapturedIndex,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub role: Option<String>,
    /// Artificial pause before a grown page is appended
    #[serde(default = "defaults::page_delay")]
    pub page_delay_ms: u64,
    #[serde(default)]
    pub delete_targeting: DeleteTargeting,
}

impl ViewConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            role: None,
            page_delay_ms: defaults::page_delay(),
            delete_targeting: DeleteTargeting::default(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "http://localhost:8080/api/".to_string()
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn user_agent() -> String {
        concat!("deptlist/", env!("CARGO_PKG_VERSION")).to_string()
    }

    pub fn page_delay() -> u64 {
        500
    }
}
