// crates/secrets-manager-core/tests/retry_policy.rs
// ============================================================================
// Module: Retry Policy Tests
// Description: Status classification, backoff bounds, and Retry-After parsing.
// Purpose: Validate retry timing decisions without running a service.
// Dependencies: secrets-manager-core, proptest, time
// ============================================================================
//! ## Overview
//! Checks the retryable status set, the full-jitter window, and both
//! `Retry-After` forms.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::time::Duration;

use proptest::prelude::*;
use secrets_manager_core::RetryPolicy;
use secrets_manager_core::retry::DEFAULT_MAX_INTERVAL;
use secrets_manager_core::retry::DEFAULT_MAX_RETRIES;
use secrets_manager_core::retry::is_retryable_status;
use secrets_manager_core::retry::parse_retry_after;
use time::macros::datetime;

#[test]
fn retryable_statuses() {
    for status in [429_u16, 500, 502, 503, 504, 599] {
        assert!(is_retryable_status(status), "{status}");
    }
    for status in [200_u16, 204, 301, 400, 401, 403, 404, 409, 501] {
        assert!(!is_retryable_status(status), "{status}");
    }
}

#[test]
fn zero_values_select_defaults() {
    let policy = RetryPolicy::new(0, Duration::ZERO);
    assert_eq!(policy, RetryPolicy::default());
    assert_eq!(policy.max_retries, DEFAULT_MAX_RETRIES);
    assert_eq!(policy.max_interval, DEFAULT_MAX_INTERVAL);
    assert_eq!(policy.max_attempts(), DEFAULT_MAX_RETRIES + 1);
}

#[test]
fn ceiling_grows_exponentially_then_caps() {
    let policy = RetryPolicy::new(10, Duration::from_secs(4));
    assert_eq!(policy.ceiling(0), Duration::from_millis(500));
    assert_eq!(policy.ceiling(1), Duration::from_secs(1));
    assert_eq!(policy.ceiling(2), Duration::from_secs(2));
    assert_eq!(policy.ceiling(3), Duration::from_secs(4));
    assert_eq!(policy.ceiling(40), Duration::from_secs(4));
}

#[test]
fn retry_after_is_capped_by_max_interval() {
    let policy = RetryPolicy::new(3, Duration::from_secs(2));
    assert_eq!(policy.delay(0, Some(Duration::from_secs(60))), Duration::from_secs(2));
    assert_eq!(policy.delay(0, Some(Duration::from_millis(10))), Duration::from_millis(10));
}

#[test]
fn parses_delta_seconds() {
    let now = datetime!(2026-10-19 12:00:00 UTC);
    assert_eq!(parse_retry_after(" 12 ", now), Some(Duration::from_secs(12)));
}

#[test]
fn parses_http_dates() {
    let now = datetime!(2026-10-19 12:00:00 UTC);
    assert_eq!(parse_retry_after("Mon, 19 Oct 2026 12:00:30 GMT", now), Some(Duration::from_secs(30)));
    assert_eq!(parse_retry_after("Mon, 19 Oct 2026 11:00:00 GMT", now), Some(Duration::ZERO));
    assert_eq!(parse_retry_after("soon", now), None);
}

proptest! {
    #[test]
    fn backoff_stays_within_window(retry in 0u32..64, max_ms in 1u64..60_000) {
        let policy = RetryPolicy::new(5, Duration::from_millis(max_ms));
        let delay = policy.backoff(retry);
        prop_assert!(delay <= policy.ceiling(retry));
        prop_assert!(delay <= policy.max_interval);
    }
}
