//! Error types for the catalogue engine
//!
//! Boundary failures (`CatalogueError`) are wrapped into operation-level
//! failures (`AnalysisError`) whenever an identity cannot be resolved.
//! Per-candidate failures during collaboration search are recovered and
//! reported as `CandidateFetchError` values inside the result instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for the three analysis operations
pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

/// Failures at the data-retrieval boundary
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogueError {
    #[error("{resource} '{identifier}' not found")]
    NotFound {
        resource: String,
        identifier: String,
    },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("malformed {context} record: {message}")]
    Parse { context: String, message: String },

    #[error("colour identifier '{raw}' is not a numeric colour code")]
    InvalidColor { raw: String },
}

impl CatalogueError {
    pub fn not_found(resource: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            identifier: identifier.into(),
        }
    }

    pub fn parse(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Operation-level failure surfaced to callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// An identity could not be resolved or the data source failed
    #[error("'{identifier}' could not be resolved: {source}")]
    Resolution {
        identifier: String,
        #[source]
        source: CatalogueError,
    },

    /// Search bounds supplied for one call were unusable
    #[error("invalid search limits: {0}")]
    InvalidLimits(String),
}

impl AnalysisError {
    pub fn resolution(identifier: impl Into<String>, source: CatalogueError) -> Self {
        Self::Resolution {
            identifier: identifier.into(),
            source,
        }
    }

    /// The identity that failed to resolve, if any
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Resolution { identifier, .. } => Some(identifier),
            Self::InvalidLimits(_) => None,
        }
    }
}

/// A roster member whose data failed to resolve during collaboration search
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("candidate '{username}' ({collector_id}) skipped: {source}")]
pub struct CandidateFetchError {
    pub collector_id: String,
    pub username: String,
    #[source]
    pub source: CatalogueError,
}

impl CandidateFetchError {
    pub fn new(collector_id: impl Into<String>, username: impl Into<String>, source: CatalogueError) -> Self {
        Self {
            collector_id: collector_id.into(),
            username: username.into(),
            source,
        }
    }
}

/// Invalid configuration values
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}
