//! Cancellable call context
//!
//! Every blocking call the adapter makes (metadata requests, store reads and
//! writes, the final handoff) takes a [`Context`]. A context is done when its
//! shutdown signal flips to `true` or when its deadline elapses, whichever
//! comes first.
//!
//! The shutdown signal is the same `watch::Receiver<bool>` the servers race
//! against in their `tokio::select!` loops, so a caller that already owns a
//! shutdown channel can hand it straight in:
//!
//! ```
//! use cirrus_common::Context;
//! use std::time::Duration;
//!
//! let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let ctx = Context::new(shutdown_rx).with_timeout(Duration::from_secs(30));
//! assert!(ctx.check().is_ok());
//!
//! shutdown_tx.send(true).unwrap();
//! assert!(ctx.check().is_err());
//! ```

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

/// Why a context is done
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context canceled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation signal plus optional deadline
#[derive(Debug, Clone, Default)]
pub struct Context {
    shutdown: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never done
    pub fn background() -> Self {
        Self::default()
    }

    /// Follow a shutdown channel; `true` means cancelled
    pub fn new(shutdown: watch::Receiver<bool>) -> Self {
        Self {
            shutdown: Some(shutdown),
            deadline: None,
        }
    }

    /// Add a deadline `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Add a deadline. An earlier deadline already set is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The reason this context is done, if it is
    pub fn err(&self) -> Option<ContextError> {
        if self.shutdown.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Some(ContextError::Cancelled);
        }

        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(ContextError::DeadlineExceeded);
        }

        None
    }

    pub fn check(&self) -> Result<(), ContextError> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Resolve once the context is done
    ///
    /// A dropped shutdown sender can no longer cancel, so it is treated as
    /// "never cancelled" rather than as a cancellation.
    pub async fn done(&self) -> ContextError {
        let shutdown = async {
            if let Some(mut rx) = self.shutdown.clone() {
                let signalled = rx.wait_for(|cancelled| *cancelled).await.is_ok();
                if signalled {
                    return;
                }
            }
            std::future::pending::<()>().await
        };

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = shutdown => ContextError::Cancelled,
            _ = deadline => ContextError::DeadlineExceeded,
        }
    }

    /// Race `fut` against this context
    ///
    /// If both are ready at once the cancellation wins.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, ContextError>
    where
        F: Future,
    {
        self.check()?;

        tokio::select! {
            biased;
            err = self.done() => Err(err),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_never_done() {
        let ctx = Context::background();
        assert!(ctx.check().is_ok());
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_shutdown_signal_cancels() {
        let (tx, rx) = watch::channel(false);
        let ctx = Context::new(rx);
        assert_eq!(ctx.err(), None);

        tx.send(true).unwrap();
        assert_eq!(ctx.err(), Some(ContextError::Cancelled));
    }

    #[test]
    fn test_earlier_deadline_kept() {
        let now = Instant::now();
        let ctx = Context::background()
            .with_deadline(now + Duration::from_secs(5))
            .with_deadline(now + Duration::from_secs(60));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let ctx = Context::background().with_timeout(Duration::from_millis(10));
        assert_eq!(ctx.done().await, ContextError::DeadlineExceeded);
        assert_eq!(ctx.check(), Err(ContextError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_run_completes_before_cancel() {
        let (_tx, rx) = watch::channel(false);
        let ctx = Context::new(rx);
        assert_eq!(ctx.run(async { 42 }).await, Ok(42));
    }

    #[tokio::test]
    async fn test_run_aborts_on_cancel() {
        let (tx, rx) = watch::channel(false);
        let ctx = Context::new(rx);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = tx.send(true);
        });

        let result = ctx.run(std::future::pending::<()>()).await;
        assert_eq!(result, Err(ContextError::Cancelled));
    }

    #[tokio::test]
    async fn test_dropped_sender_is_not_cancellation() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let ctx = Context::new(rx).with_timeout(Duration::from_millis(20));

        assert_eq!(ctx.done().await, ContextError::DeadlineExceeded);
    }

    #[tokio::test]
    async fn test_run_refuses_done_context() {
        let (tx, rx) = watch::channel(true);
        let ctx = Context::new(rx);

        let result = ctx.run(async { 1 }).await;
        assert_eq!(result, Err(ContextError::Cancelled));
        drop(tx);
    }
}
