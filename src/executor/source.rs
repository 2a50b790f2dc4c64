//! Aggregation targets
//!
//! [`AggregateSource`] is the seam between the aggregator and the driver:
//! anything that can run a pipeline and hand back a cursor. The driver's
//! `Collection` and `Database` implement it; tests substitute fakes.

use async_trait::async_trait;
use mongodb::bson::Document;
use mongodb::options::AggregateOptions;
use mongodb::{Collection, Database};

use super::cursor::ResultCursor;

/// Something an aggregation pipeline can run against
#[async_trait]
pub trait AggregateSource: Send + Sync {
    /// Run `pipeline` with the given options and return the result cursor.
    ///
    /// Errors are the driver's own and must not be rewrapped.
    async fn aggregate(
        &self,
        pipeline: Vec<Document>,
        options: Option<AggregateOptions>,
    ) -> mongodb::error::Result<ResultCursor>;

    /// Human readable name of the target, for logs.
    fn target(&self) -> String;
}

#[async_trait]
impl<D> AggregateSource for Collection<D>
where
    D: Send + Sync,
{
    async fn aggregate(
        &self,
        pipeline: Vec<Document>,
        options: Option<AggregateOptions>,
    ) -> mongodb::error::Result<ResultCursor> {
        let cursor = Collection::aggregate(self, pipeline)
            .with_options(options)
            .await?;
        Ok(ResultCursor::from(cursor))
    }

    fn target(&self) -> String {
        self.namespace().to_string()
    }
}

#[async_trait]
impl AggregateSource for Database {
    async fn aggregate(
        &self,
        pipeline: Vec<Document>,
        options: Option<AggregateOptions>,
    ) -> mongodb::error::Result<ResultCursor> {
        let cursor = Database::aggregate(self, pipeline)
            .with_options(options)
            .await?;
        Ok(ResultCursor::from(cursor))
    }

    fn target(&self) -> String {
        self.name().to_string()
    }
}
