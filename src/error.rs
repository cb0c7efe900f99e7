//! Error types for the provider.

use thiserror::Error;

use crate::db::DbError;
use crate::resources::id::IdError;
use crate::snowflake::DecodeError;

/// Errors returned by provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The resource configuration failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// State or configuration JSON could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The resource identifier is malformed.
    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Warehouse output could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A statement failed. `context` names the operation and target object.
    #[error("{context}: {source}")]
    Database {
        /// What was being done, e.g. "error creating file format my_format".
        context: String,
        /// The underlying failure.
        #[source]
        source: DbError,
    },

    /// An update failed after some properties were already applied.
    #[error("update partially applied (committed: {}): {source}", .committed.join(", "))]
    PartialUpdate {
        /// Attributes whose ALTER statements succeeded before the failure.
        committed: Vec<String>,
        /// The failure that stopped the update.
        #[source]
        source: Box<ProviderError>,
    },

    /// Operation not implemented.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),
}

impl ProviderError {
    /// Wrap a database error with the operation and object it concerned.
    pub fn database(context: impl Into<String>, source: DbError) -> Self {
        Self::Database {
            context: context.into(),
            source,
        }
    }

    /// Get the error message as a string.
    ///
    /// Variants that wrap another error return a fixed description; use
    /// `Display` for the full chain.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg) => msg,
            Self::UnknownResource(msg) => msg,
            Self::Serialization(_) => "serialization error (see Debug output)",
            Self::InvalidId(_) => "invalid identifier (see Debug output)",
            Self::Decode(_) => "decode error (see Debug output)",
            Self::Database { context, .. } => context,
            Self::PartialUpdate { source, .. } => source.message(),
            Self::Unimplemented(msg) => msg,
        }
    }

    /// Attributes already applied when an update failed, if any.
    pub fn committed(&self) -> &[String] {
        match self {
            Self::PartialUpdate { committed, .. } => committed,
            _ => &[],
        }
    }
}
