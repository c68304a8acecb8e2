// crates/secrets-manager-core/src/retry.rs
// ============================================================================
// Module: Retry Policy
// Description: Retry classification, exponential backoff, and Retry-After parsing.
// Purpose: Decide whether and how long to wait before the next attempt.
// Dependencies: rand, time
// ============================================================================

//! ## Overview
//! The service handle drives attempts; this module only answers two
//! questions: is a status retryable, and how long should the next sleep be.
//! Invariants:
//! - Retryable statuses are `429` and `5xx` except `501`.
//! - Computed delays never exceed [`RetryPolicy::max_interval`], including
//!   server-supplied `Retry-After` values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use rand::Rng;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::response::DetailedResponse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 4;

/// Default base delay between attempts.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(500);

/// Default upper bound on a single delay.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(30);

/// IMF-fixdate layout used by `Retry-After`.
const HTTP_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Retry configuration attached to a service handle.
///
/// # Invariants
/// - `min_interval <= max_interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Base delay for the first retry.
    pub min_interval: Duration,
    /// Upper bound on any single delay.
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            min_interval: DEFAULT_MIN_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
        }
    }
}

impl RetryPolicy {
    /// Builds a policy; zero values select the defaults.
    #[must_use]
    pub fn new(max_retries: u32, max_interval: Duration) -> Self {
        let defaults = Self::default();
        let max_interval = if max_interval.is_zero() { defaults.max_interval } else { max_interval };
        Self {
            max_retries: if max_retries == 0 { defaults.max_retries } else { max_retries },
            min_interval: defaults.min_interval.min(max_interval),
            max_interval,
        }
    }

    /// Overrides the base delay, clamped to `max_interval`.
    #[must_use]
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval.min(self.max_interval);
        self
    }

    /// Total attempts including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Full-jitter exponential delay before retry number `retry` (zero-based).
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let ceiling = self.ceiling(retry);
        let ceiling_ms = u64::try_from(ceiling.as_millis()).unwrap_or(u64::MAX);
        if ceiling_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=ceiling_ms))
    }

    /// Upper bound of the jitter window for retry number `retry`.
    #[must_use]
    pub fn ceiling(&self, retry: u32) -> Duration {
        let factor = 1_u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.min_interval.saturating_mul(factor).min(self.max_interval)
    }

    /// Delay before retry number `retry`, preferring a server `Retry-After`.
    #[must_use]
    pub fn delay(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.map_or_else(|| self.backoff(retry), |delay| delay.min(self.max_interval))
    }
}

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Returns true for `429` and `5xx` except `501`.
#[must_use]
pub const fn is_retryable_status(status: u16) -> bool {
    status == 429 || (status >= 500 && status < 600 && status != 501)
}

/// Reads the `Retry-After` header of a response.
#[must_use]
pub fn retry_after(response: &DetailedResponse) -> Option<Duration> {
    response.header("retry-after").and_then(|value| parse_retry_after(value, OffsetDateTime::now_utc()))
}

/// Parses a `Retry-After` value as delta-seconds or an HTTP-date.
///
/// Dates in the past yield a zero delay.
#[must_use]
pub fn parse_retry_after(value: &str, now: OffsetDateTime) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    let at = PrimitiveDateTime::parse(value, HTTP_DATE).ok()?.assume_utc();
    let delta = at - now;
    Some(if delta.is_positive() { delta.unsigned_abs() } else { Duration::ZERO })
}
