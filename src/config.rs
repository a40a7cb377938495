//! Configuration
//!
//! Defaults, `.env`/environment overrides, and optional JSON config files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;

use crate::engine::SearchLimits;
use crate::error::ConfigError;

pub const DEFAULT_API_BASE: &str = "https://d30r5p5favh3z8.cloudfront.net";
pub const DEFAULT_USER_AGENT: &str = "Brick-Builder-Catalogue/1.0";

/// Configuration for the catalogue client and analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Root URL of the catalogue API
    pub api_base: String,
    pub user_agent: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Maximum fetches in flight per operation
    pub fetch_concurrency: usize,
    /// Default bounds for collaboration search
    pub collaboration: SearchLimits,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            fetch_concurrency: 8,
            collaboration: SearchLimits::default(),
        }
    }
}

impl CatalogueConfig {
    /// Defaults overridden by `BRICK_*` variables (a `.env` file is honoured)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `BRICK_*` key
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base) = lookup("BRICK_API_BASE") {
            config.api_base = base;
        }
        if let Some(agent) = lookup("BRICK_USER_AGENT") {
            config.user_agent = agent;
        }
        parse_into(&lookup, "BRICK_REQUEST_TIMEOUT_SECS", &mut config.request_timeout_secs)?;
        parse_into(&lookup, "BRICK_FETCH_CONCURRENCY", &mut config.fetch_concurrency)?;
        parse_into(&lookup, "BRICK_ROSTER_CAP", &mut config.collaboration.roster_cap)?;
        parse_into(&lookup, "BRICK_PLAN_CAP", &mut config.collaboration.plan_cap)?;
        parse_into(
            &lookup,
            "BRICK_PAIR_SEARCH_THRESHOLD",
            &mut config.collaboration.pair_search_threshold,
        )?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file; a missing file yields the defaults
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, value: usize| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        };
        if self.fetch_concurrency == 0 {
            return Err(invalid("fetch_concurrency", self.fetch_concurrency));
        }
        self.collaboration.validate()
    }
}

fn parse_into<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
) -> Result<(), ConfigError>
where
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        *slot = raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}
