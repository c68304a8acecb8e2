// crates/secrets-manager-core/src/context.rs
// ============================================================================
// Module: Call Context
// Description: Per-call cancellation token and deadline.
// Purpose: Let callers abort in-flight transport calls and retry sleeps.
// Dependencies: tokio, tokio-util
// ============================================================================

//! ## Overview
//! A [`CallContext`] travels with one call. Both suspension points of the
//! pipeline (the transport call and the sleep between attempts) run inside
//! [`CallContext::guard`], so cancellation and deadlines are observed there
//! and nowhere else.
//! Invariants:
//! - Cancellation wins over deadline expiry, which wins over completion.
//! - A deadline surfaces as [`SdkError::DeadlineExceeded`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::SdkError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Cancellation scope for a single call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Token observed at every suspension point.
    token: CancellationToken,
    /// Absolute deadline, if any.
    deadline: Option<Instant>,
}

impl CallContext {
    /// Context that never cancels.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Context expiring `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Context expiring at `deadline`.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Context cancelled through `token`.
    #[must_use]
    pub const fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Attaches a cancellation token to this context.
    #[must_use]
    pub fn cancelled_by(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Returns the cancellation token.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels the context.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Fails when the context is already cancelled or expired.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Cancelled`] or [`SdkError::DeadlineExceeded`].
    pub fn check(&self) -> Result<(), SdkError> {
        if self.token.is_cancelled() {
            return Err(SdkError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(SdkError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Runs `future` until it completes, the token fires, or the deadline passes.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Cancelled`] or [`SdkError::DeadlineExceeded`] when
    /// the future is abandoned.
    pub async fn guard<T, F>(&self, future: F) -> Result<T, SdkError>
    where
        F: Future<Output = T>,
    {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    () = self.token.cancelled() => Err(SdkError::Cancelled),
                    () = tokio::time::sleep_until(deadline) => Err(SdkError::DeadlineExceeded),
                    value = future => Ok(value),
                }
            }
            None => {
                tokio::select! {
                    biased;
                    () = self.token.cancelled() => Err(SdkError::Cancelled),
                    value = future => Ok(value),
                }
            }
        }
    }

    /// Sleeps for `delay` unless cancelled first.
    ///
    /// # Errors
    ///
    /// See [`CallContext::guard`].
    pub async fn sleep(&self, delay: Duration) -> Result<(), SdkError> {
        self.guard(tokio::time::sleep(delay)).await
    }
}
