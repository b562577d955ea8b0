use thiserror::Error;

/// Convenience result type for rule registration and processor construction.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Convenience result type for ingestion adapters.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned when configuring a pipeline.
///
/// Processing itself never fails: unknown rules and malformed parameters degrade to no-ops.
/// These variants only cover registration-time contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A dynamically described rule does not resolve to a [`crate::rules::Rule`] implementation.
    #[error("rule '{name}' does not conform to the rule contract: {message}")]
    TypeConstraintViolation { name: String, message: String },

    /// Rule names must contain at least one non-whitespace character.
    #[error("invalid rule name '{name}': rule names must not be blank")]
    InvalidRuleName { name: String },
}

/// Error type returned by the ingestion adapters.
///
/// A single error enum shared by the JSON/NDJSON and CSV loaders.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON syntax error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input parsed, but is not shaped like a collection of flat records.
    #[error("shape mismatch: {message}")]
    ShapeMismatch { message: String },
}
