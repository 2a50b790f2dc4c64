//! Typed aggregation pipeline execution
//!
//! An [`Aggregator`] borrows a collection, takes a pipeline and options, and
//! runs the aggregation in one of two modes:
//! - [`Aggregator::aggregate`] drains the cursor into a `Vec<T>`
//! - [`Aggregator::aggregate_with_callback`] hands the live cursor to a handler
//!
//! # Example
//!
//! ```no_run
//! use mongodb::bson::{Document, doc};
//! use mongox::{Aggregator, Context};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     name: String,
//!     age: i64,
//! }
//!
//! # async fn example(collection: mongodb::Collection<Document>) -> mongox::Result<()> {
//! let users = Aggregator::<User>::new(&collection)
//!     .pipeline([doc! { "$sort": { "age": -1 } }])
//!     .aggregate(&Context::background())
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::marker::PhantomData;

use futures::future::BoxFuture;
use mongodb::bson::Document;
use mongodb::options::AggregateOptions;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{MongoxError, Result};
use crate::executor::{AggregateSource, Context, ResultCursor, merge_options};



/// Future returned by a result handler.
pub type HandlerFuture<'c, R, E> = BoxFuture<'c, std::result::Result<R, E>>;

/// Aggregation over a borrowed collection, decoding results into `T`
pub struct Aggregator<'a, T> {
    source: &'a dyn AggregateSource,
    pipeline: Option<Vec<Document>>,
    options: Vec<AggregateOptions>,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> Aggregator<'a, T> {
    /// Bind a new aggregator to `source`.
    pub fn new(source: &'a dyn AggregateSource) -> Self {
        Self {
            source,
            pipeline: None,
            options: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Set the pipeline to run. An empty pipeline is valid and returns the
    /// whole collection.
    pub fn pipeline<P>(&mut self, pipeline: P) -> &mut Self
    where
        P: IntoIterator<Item = Document>,
    {
        self.pipeline = Some(pipeline.into_iter().collect());
        self
    }

    /// Set the aggregate options, replacing any set before.
    ///
    /// Later entries override earlier ones field by field.
    pub fn options<O>(&mut self, options: O) -> &mut Self
    where
        O: IntoIterator<Item = AggregateOptions>,
    {
        self.options = options.into_iter().collect();
        self
    }

    /// The pipeline, if one has been set.
    pub fn get_pipeline(&self) -> Option<&[Document]> {
        self.pipeline.as_deref()
    }

    pub fn get_options(&self) -> &[AggregateOptions] {
        &self.options
    }

    fn require_pipeline(&self) -> Result<Vec<Document>> {
        self.pipeline.clone().ok_or_else(|| {
            MongoxError::invalid_argument("pipeline must be set before aggregating")
        })
    }

    async fn open(&self, pipeline: Vec<Document>) -> Result<ResultCursor> {
        debug!(
            "Executing aggregate on '{}' with {} pipeline stages",
            self.source.target(),
            pipeline.len()
        );

        let cursor = self
            .source
            .aggregate(pipeline, merge_options(&self.options))
            .await?;
        Ok(cursor)
    }

    /// Run the aggregation and decode every result into `T`.
    ///
    /// Results keep the order the server returned them in. Driver and decode
    /// errors are returned unchanged; on error no results are returned. The
    /// cursor is released before this returns.
    pub async fn aggregate(&self, ctx: &Context) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let pipeline = self.require_pipeline()?;
        ctx.run(self.collect(pipeline)).await
    }

    /// Run the aggregation and let `handler` consume the cursor.
    ///
    /// Whatever the handler returns is returned as-is. `ctx` governs opening
    /// the cursor only; once the handler runs it is driven to completion. The
    /// cursor is released after the handler finishes, whether it succeeded or
    /// not.
    ///
    /// ```no_run
    /// # use mongodb::bson::{Document, doc};
    /// # use mongox::{Aggregator, Context, MongoxError};
    /// # async fn example(collection: mongodb::Collection<Document>) -> mongox::Result<()> {
    /// let count = Aggregator::<Document>::new(&collection)
    ///     .pipeline([doc! { "$match": { "active": true } }])
    ///     .aggregate_with_callback(&Context::background(), |cursor| {
    ///         Box::pin(async move {
    ///             let mut count = 0;
    ///             while cursor.next_document().await?.is_some() {
    ///                 count += 1;
    ///             }
    ///             Ok::<_, MongoxError>(count)
    ///         })
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn aggregate_with_callback<F, R, E>(
        &self,
        ctx: &Context,
        handler: F,
    ) -> std::result::Result<R, E>
    where
        F: for<'c> FnOnce(&'c mut ResultCursor) -> HandlerFuture<'c, R, E> + Send,
        E: From<MongoxError>,
    {
        let pipeline = self.require_pipeline()?;

        // Only opening the cursor is bound to the context
        let mut cursor = ctx.run(self.open(pipeline)).await?;
        let outcome = handler(&mut cursor).await;
        cursor.close();
        outcome
    }

    async fn collect(&self, pipeline: Vec<Document>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut cursor = self.open(pipeline).await?;
        let items = cursor.collect_all::<T>().await;
        cursor.close();

        let items = items?;
        debug!("Aggregation returned {} documents", items.len());
        Ok(items)
    }
}

impl<T> std::fmt::Debug for Aggregator<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("target", &self.source.target())
            .field("pipeline", &self.pipeline)
            .field("options", &self.options.len())
            .finish()
    }
}
