use std::result;

use crate::identifier::IdentifierKind;
use thiserror::Error;

/// Error types for Altmetric client operations
#[derive(Error, Debug)]
pub enum AltmetricError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// None of the identifier slots carried a value
    #[error("No identifier supplied")]
    NoIdentifier,

    /// More than one identifier slot carried a value
    #[error(
        "Only one identifier can be queried at a time (got {count}); call once per identifier for batches"
    )]
    MultipleIdentifiers { count: usize },

    /// An identifier slot was present but empty
    #[error("Empty {kind} identifier")]
    EmptyIdentifier { kind: IdentifierKind },

    /// The identifier tag is not one the API understands
    #[error("Unknown identifier type: {tag}")]
    UnknownIdentifierType { tag: String },

    /// The API has no record for the object
    #[error("No metrics found for object {identifier}")]
    NotFound { identifier: String },

    /// A value handed to the table projection was not a metrics result
    #[error("Expected an Altmetric metrics result, found {found}")]
    NotAMetricsResult { found: String },

    /// CSV export failed
    #[error("CSV export failed: {message}")]
    CsvError { message: String },

    /// Client or request configuration is invalid
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// IO error, such as failing to start the blocking runtime
    #[error("IO error: {message}")]
    IoError { message: String },
}

pub type Result<T> = result::Result<T, AltmetricError>;

impl AltmetricError {
    /// Whether the error comes from how the client was called rather than
    /// from the network or the upstream API.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            AltmetricError::NoIdentifier
                | AltmetricError::MultipleIdentifiers { .. }
                | AltmetricError::EmptyIdentifier { .. }
                | AltmetricError::UnknownIdentifierType { .. }
                | AltmetricError::InvalidConfig { .. }
        )
    }

    /// Whether the upstream reported that the object does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AltmetricError::NotFound { .. })
    }
}

impl From<csv::Error> for AltmetricError {
    fn from(err: csv::Error) -> Self {
        AltmetricError::CsvError {
            message: err.to_string(),
        }
    }
}
