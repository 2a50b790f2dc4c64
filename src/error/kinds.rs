use std::{fmt, io};

/// Crate-wide `Result` type using [`MongoxError`] as the error.
pub type Result<T> = std::result::Result<T, MongoxError>;

/// Top-level error type for mongox operations.
///
/// Driver and decode failures are carried verbatim so callers can match on
/// the original driver error.
#[derive(Debug)]
pub enum MongoxError {
    /// A required argument was not supplied (e.g. no pipeline before execution).
    InvalidArgument(String),

    /// Error returned by the MongoDB driver, either from the aggregate call
    /// itself or while iterating the cursor.
    Driver(mongodb::error::Error),

    /// A result document could not be decoded into the requested type.
    Decode(bson::de::Error),

    /// The execution context was cancelled.
    Cancelled,

    /// The execution context deadline expired.
    DeadlineExceeded,

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),
}

/// Classification of [`MongoxError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller error detected before touching the database.
    InvalidArgument,

    /// Anything that failed at or below the driver, including cancellation.
    Upstream,

    /// Configuration loading or validation failed.
    Configuration,
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

impl MongoxError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        MongoxError::InvalidArgument(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MongoxError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            MongoxError::Driver(_)
            | MongoxError::Decode(_)
            | MongoxError::Cancelled
            | MongoxError::DeadlineExceeded => ErrorKind::Upstream,
            MongoxError::Config(_) | MongoxError::Io(_) => ErrorKind::Configuration,
        }
    }

    /// The wrapped driver error, if this is one.
    pub fn as_driver_error(&self) -> Option<&mongodb::error::Error> {
        match self {
            MongoxError::Driver(e) => Some(e),
            _ => None,
        }
    }
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for MongoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MongoxError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            MongoxError::Driver(e) => write!(f, "{e}"),
            MongoxError::Decode(e) => write!(f, "{e}"),
            MongoxError::Cancelled => write!(f, "context cancelled"),
            MongoxError::DeadlineExceeded => write!(f, "context deadline exceeded"),
            MongoxError::Config(e) => write!(f, "Configuration error: {e}"),
            MongoxError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for MongoxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MongoxError::Driver(e) => Some(e),
            MongoxError::Decode(e) => Some(e),
            MongoxError::Config(e) => Some(e),
            MongoxError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}

/* ========================= Conversions to MongoxError ========================= */

impl From<mongodb::error::Error> for MongoxError {
    fn from(err: mongodb::error::Error) -> Self {
        MongoxError::Driver(err)
    }
}

impl From<bson::de::Error> for MongoxError {
    fn from(err: bson::de::Error) -> Self {
        MongoxError::Decode(err)
    }
}

impl From<io::Error> for MongoxError {
    fn from(err: io::Error) -> Self {
        MongoxError::Io(err)
    }
}

impl From<ConfigError> for MongoxError {
    fn from(err: ConfigError) -> Self {
        MongoxError::Config(err)
    }
}
