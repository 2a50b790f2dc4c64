//! Error handling module.
//!
//! Terminal aggregation operations fail in two ways only: an
//! [`ErrorKind::InvalidArgument`] when the caller forgot to supply a pipeline,
//! or an [`ErrorKind::Upstream`] failure that carries the driver (or decode)
//! error untouched.
//!
//! # Example
//!
//! ```rust
//! use mongox::error::{ErrorKind, MongoxError};
//!
//! let err = MongoxError::invalid_argument("pipeline must be set before aggregating");
//! assert_eq!(err.kind(), ErrorKind::InvalidArgument);
//! ```

pub mod kinds;

pub use kinds::{ConfigError, ErrorKind, MongoxError, Result};
