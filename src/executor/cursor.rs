//! Result cursor handed to aggregation consumers
//!
//! [`ResultCursor`] owns the stream of raw documents produced by an aggregate
//! call. It can be drained into typed values in one go, decoded one document
//! at a time, or read in batches for streaming consumers.

use futures::stream::{self, BoxStream, Stream, TryStreamExt};
use mongodb::Cursor;
use mongodb::bson::Document;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Result;

/// Server-side result set, consumed once and then released
pub struct ResultCursor {
    stream: Option<BoxStream<'static, mongodb::error::Result<Document>>>,
    fetched: u64,
    closed: bool,
}

impl ResultCursor {
    /// Wrap any stream of driver results.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = mongodb::error::Result<Document>> + Send + 'static,
    {
        Self {
            stream: Some(Box::pin(stream)),
            fetched: 0,
            closed: false,
        }
    }

    /// A cursor over documents already in memory.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self::new(stream::iter(documents.into_iter().map(Ok)))
    }

    /// Fetch the next raw document, or `None` once the cursor is exhausted.
    ///
    /// A driver error closes the cursor.
    pub async fn next_document(&mut self) -> Result<Option<Document>> {
        if self.closed {
            return Ok(None);
        }

        let stream = match self.stream.as_mut() {
            Some(s) => s,
            None => return Ok(None),
        };

        match stream.try_next().await {
            Ok(Some(doc)) => {
                self.fetched += 1;
                Ok(Some(doc))
            }
            Ok(None) => {
                debug!("Cursor exhausted after {} documents", self.fetched);
                self.close();
                Ok(None)
            }
            Err(e) => {
                self.close();
                Err(e.into())
            }
        }
    }

    /// Fetch and decode the next document.
    pub async fn next_decoded<T>(&mut self) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.next_document().await? {
            Some(doc) => Ok(Some(bson::from_document(doc)?)),
            None => Ok(None),
        }
    }

    /// Fetch up to `batch_size` documents.
    ///
    /// Returns `None` once nothing is left.
    pub async fn next_batch(&mut self, batch_size: usize) -> Result<Option<Vec<Document>>> {
        let mut batch = Vec::with_capacity(batch_size);

        while batch.len() < batch_size {
            match self.next_document().await? {
                Some(doc) => batch.push(doc),
                None => break,
            }
        }

        if batch.is_empty() {
            Ok(None)
        } else {
            debug!(
                "Fetched batch of {} documents (total: {})",
                batch.len(),
                self.fetched
            );
            Ok(Some(batch))
        }
    }

    /// Drain the remaining documents, decoding each into `T`.
    ///
    /// Order is the order the server returned. The first decode or driver
    /// failure aborts the drain and nothing is returned.
    pub async fn collect_all<T>(&mut self) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        while let Some(doc) = self.next_document().await? {
            items.push(bson::from_document(doc)?);
        }
        Ok(items)
    }

    /// Number of documents read so far.
    pub fn fetched(&self) -> u64 {
        self.fetched
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Release the underlying cursor. Further reads return `None`.
    pub fn close(&mut self) {
        if !self.closed {
            // Dropping the driver cursor kills it on the server
            self.stream = None;
            self.closed = true;
            debug!("Closed cursor after fetching {} documents", self.fetched);
        }
    }
}

impl From<Cursor<Document>> for ResultCursor {
    fn from(cursor: Cursor<Document>) -> Self {
        Self::new(cursor)
    }
}

impl std::fmt::Debug for ResultCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCursor")
            .field("fetched", &self.fetched)
            .field("closed", &self.closed)
            .finish()
    }
}

impl Drop for ResultCursor {
    fn drop(&mut self) {
        if !self.closed {
            debug!("ResultCursor dropped without explicit close");
            self.stream = None;
        }
    }
}
