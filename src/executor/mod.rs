//! Execution plumbing shared by terminal operations
//!
//! - `context`: cancellation and deadlines
//! - `cursor`: the result cursor handed to consumers
//! - `options`: merging of caller-supplied aggregate options
//! - `source`: the driver seam aggregations run against

pub mod context;
pub mod cursor;
pub mod options;
pub mod source;

pub use context::Context;
pub use cursor::ResultCursor;
pub use options::merge_options;
pub use source::AggregateSource;
