//! Error types for edgeguard

use thiserror::Error;

/// Result type alias for edgeguard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(
        "Scan found {non_compliant} non-compliant resource(s) and {errors} scan error(s)"
    )]
    PolicyViolation { non_compliant: usize, errors: usize },

    #[error("{failed} of {requested} account(s) could not be scanned")]
    AccountsFailed { failed: usize, requested: usize },
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Errors returned by the cloud collaborators.
///
/// Every variant is recoverable from the scanner's point of view: a failed
/// call is recorded against its region and resource type and the scan goes on.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Request throttled by {service}. Reduce --concurrency or retry later.")]
    Throttled { service: String },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("{service} error {code}: {message}")]
    Service {
        service: String,
        code: String,
        message: String,
    },

    #[cfg_attr(not(feature = "aws"), allow(dead_code))]
    #[error("Network error: {0}")]
    Network(String),

    #[cfg_attr(not(feature = "aws"), allow(dead_code))]
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    /// Whether this error indicates the caller is being rate limited.
    pub fn is_throttled(&self) -> bool {
        matches!(self, ApiError::Throttled { .. })
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found. Run `edgeguard init` to set up.")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Failed to read inventory snapshot {path}: {reason}")]
    Inventory { path: String, reason: String },

    #[error(
        "No inventory source configured. Pass --inventory <FILE> or build with `--features aws` for live scans."
    )]
    NoSource,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// A cloud identifier that could not be decomposed.
///
/// Never surfaces as a scan error; callers degrade to "no policy" or "no match".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identifier '{0}' has too few ':' separated fields")]
    MissingFields(String),

    #[error("identifier '{0}' has too few '/' separated segments")]
    MissingSegments(String),

    #[error("identifier '{0}' has an empty name or id")]
    EmptyComponent(String),

    #[error("identifier '{id}' has no '{marker}' marker")]
    MissingMarker { id: String, marker: &'static str },
}
