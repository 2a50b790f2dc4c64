//! mongox
//!
//! Typed aggregation pipeline execution on top of the MongoDB Rust driver.
//! An [`Aggregator`] binds a collection and a result type, takes a pipeline
//! and options, and either decodes every result or hands the cursor to a
//! caller-supplied handler.
//!
//! # Modules
//!
//! - `aggregator`: the typed aggregation builder and its terminal operations
//! - `config`: configuration management
//! - `error`: error types and handling
//! - `executor`: execution context, cursors, option merging and the driver seam
//! - `logging`: tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use mongodb::Client;
//! use mongodb::bson::{Document, doc};
//! use mongox::{Aggregator, Config, Context};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     mongox::logging::init(&config.logging);
//!
//!     let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//!     let users = client.database("app").collection::<Document>("users");
//!
//!     let adults = Aggregator::<Document>::new(&users)
//!         .pipeline([doc! { "$match": { "age": { "$gte": 18 } } }])
//!         .aggregate(&Context::from_config(&config.execution))
//!         .await?;
//!
//!     println!("{} adults", adults.len());
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;

// Re-export commonly used types
pub use aggregator::{Aggregator, HandlerFuture};
pub use config::Config;
pub use error::{ErrorKind, MongoxError, Result};
pub use executor::{AggregateSource, Context, ResultCursor, merge_options};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
