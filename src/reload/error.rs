use serde::{Deserialize, Serialize};

use crate::content::{LoadError, ValidationError};
use crate::routing::RouteError;
use crate::snapshot::BuildError;

/// Why a reload was abandoned.
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("reload task aborted: {0}")]
    Aborted(String),
}

impl ReloadError {
    /// Coarse error class reported to operators.
    pub fn category(&self) -> &'static str {
        match self {
            ReloadError::Load(_) | ReloadError::Validation(_) => "validation",
            ReloadError::Build(_) => "build",
            ReloadError::Route(_) => "route",
            ReloadError::Aborted(_) => "internal",
        }
    }

    /// The file, slug, feed or path the error is about.
    pub fn identifier(&self) -> String {
        match self {
            ReloadError::Load(e) => e.path().display().to_string(),
            ReloadError::Validation(e) => e.identifier(),
            ReloadError::Build(e) => e.identifier(),
            ReloadError::Route(e) => e.path().to_string(),
            ReloadError::Aborted(_) => "reload".to_string(),
        }
    }
}

/// Serializable record of the most recent failed reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadFailure {
    pub category: String,
    pub identifier: String,
    pub message: String,
}

impl From<&ReloadError> for ReloadFailure {
    fn from(err: &ReloadError) -> Self {
        Self {
            category: err.category().to_string(),
            identifier: err.identifier(),
            message: err.to_string(),
        }
    }
}
