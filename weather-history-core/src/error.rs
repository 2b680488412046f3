use crate::model::RecordId;

/// Result type alias for weather history operations.
pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Typed failures returned across the service boundary.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No record exists under the requested key.
    #[error("Weather record not found: {key}")]
    NotFound { key: RecordId },

    /// Criteria or arguments supplied by the caller are malformed.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// The insight generator returned an error.
    #[error("Insight generation failed: {message}")]
    GenerationFailed {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The export encoder could not produce a file.
    #[error("Export failed: {message}")]
    ExportFailed {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The record store adapter failed (I/O, serialization, backend error).
    #[error("Record store error: {message}")]
    Store {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl Error {
    pub fn not_found(key: impl Into<RecordId>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::GenerationFailed {
            message: message.into(),
            source: None,
        }
    }

    pub fn generation_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::GenerationFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::ExportFailed {
            message: message.into(),
            source: None,
        }
    }

    pub fn export_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ExportFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    pub fn store_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Short machine-friendly name of the failure kind, for transport-layer mapping.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "NotFound",
            Error::ValidationFailed { .. } => "ValidationFailed",
            Error::GenerationFailed { .. } => "GenerationFailed",
            Error::ExportFailed { .. } => "ExportFailed",
            Error::Store { .. } => "StoreFailed",
        }
    }
}
