use std::fmt;

use thiserror::Error;

use crate::http::RequestError;

/// The two resource kinds this crate reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Zone,
    Team,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zone => f.write_str("zone"),
            Self::Team => f.write_str("team"),
        }
    }
}

/// Core error types for reconciliation
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Platform returned {kind} '{name}' without an id")]
    MissingId { kind: ResourceKind, name: String },

    /// One zone or team failed; the rest of the pass continues.
    #[error("Failed to reconcile {kind} '{name}': {source}")]
    PartialOperation {
        kind: ResourceKind,
        name: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a new MissingId error
    pub fn missing_id(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::MissingId {
            kind,
            name: name.into(),
        }
    }

    /// Wrap `source` as the failure of a single resource
    pub fn partial(kind: ResourceKind, name: impl Into<String>, source: Error) -> Self {
        Self::PartialOperation {
            kind,
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// The request-layer error at the root of this error, if any
    pub fn request_error(&self) -> Option<&RequestError> {
        match self {
            Self::Request(e) => Some(e),
            Self::PartialOperation { source, .. } => source.request_error(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
