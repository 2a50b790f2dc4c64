//! Execution context
//!
//! A [`Context`] carries the cancellation signal and optional deadline that
//! govern a single terminal operation. Contexts form a tree: a child created
//! with [`Context::with_cancel`] or [`Context::with_timeout`] is cancelled when
//! its parent is, and never outlives the parent's deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::ExecutionConfig;
use crate::error::MongoxError;

/// Cancellation and deadline scope for an operation
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A background context with the configured timeout applied, if any.
    pub fn from_config(config: &ExecutionConfig) -> Self {
        match config.timeout() {
            Some(timeout) => Self::background().with_timeout(timeout),
            None => Self::background(),
        }
    }

    /// Child context that can be cancelled independently of this one.
    pub fn with_cancel(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Child context whose deadline is `timeout` from now, or the parent's
    /// deadline if that is earlier.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Child context with the earlier of `deadline` and the parent's deadline.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        };

        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Cancel this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why this context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<MongoxError> {
        if self.token.is_cancelled() {
            return Some(MongoxError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(MongoxError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `fut` to completion unless this context is cancelled or its
    /// deadline passes first.
    ///
    /// When the context wins, `fut` is dropped, releasing anything it owns.
    pub async fn run<F, T, E>(&self, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<MongoxError>,
    {
        if let Some(err) = self.err() {
            return Err(err.into());
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = fut => result,
            _ = self.token.cancelled() => Err(MongoxError::Cancelled.into()),
            _ = expired => Err(MongoxError::DeadlineExceeded.into()),
        }
    }
}
