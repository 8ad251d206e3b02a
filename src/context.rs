// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Per-call cancellation and deadline context.
//!
//! Every Fornex API operation takes a [`CallContext`]. The context bounds the call in
//! addition to the transport's fixed per-request timeout:
//!
//! - a **deadline** after which the in-flight request is dropped, and
//! - a **cancellation signal** the caller can fire from another task.
//!
//! Dropping the request future aborts the underlying HTTP exchange, so an interrupted
//! call never hangs waiting for the provider.
//!
//! # Example
//!
//! ```rust
//! use fornex_webhook::context::{CallContext, Interrupted};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let (ctx, handle) = CallContext::background()
//!     .with_timeout(Duration::from_secs(30))
//!     .cancellable();
//!
//! handle.cancel();
//! let outcome = ctx.run(std::future::pending::<()>()).await;
//! assert_eq!(outcome, Err(Interrupted::Cancelled));
//! # }
//! ```

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Why a call guarded by a [`CallContext`] did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    /// [`CancelHandle::cancel`] was called
    Cancelled,
    /// The context deadline elapsed
    DeadlineExceeded,
}

/// Cancellation and deadline carried through one Present/CleanUp call.
///
/// Cloning is cheap; clones observe the same cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Fires the cancellation signal of the context it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel every call running under the associated context.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl CallContext {
    /// A context with no deadline and no cancellation.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Set an absolute deadline, keeping the earlier one if a deadline is already set.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Set a deadline relative to now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Attach a fresh cancellation signal and return its handle.
    #[must_use]
    pub fn cancellable(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(rx);
        (self, CancelHandle { tx })
    }

    /// The deadline of this context, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true once the cancellation signal has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Drive `fut` to completion unless the context is cancelled or its deadline passes.
    ///
    /// Cancellation wins over a simultaneously elapsed deadline, and both win over a
    /// future that is ready on the same poll.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupted`] when the future was dropped before completing.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        let mut cancel = self.cancel.clone();
        let cancelled = async move {
            if let Some(rx) = cancel.as_mut() {
                // A dropped handle can never cancel.
                if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                    return;
                }
            }
            std::future::pending::<()>().await;
        };

        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = cancelled => Err(Interrupted::Cancelled),
            () = expired => Err(Interrupted::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;
