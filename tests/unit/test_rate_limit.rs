//! Unit tests for the fixed-window rate limiter

use std::time::{Duration, Instant};

use visual_metaphor_api::middleware::rate_limit::FixedWindowLimiter;

#[test]
fn test_ceiling_enforced_within_window() {
    let limiter = FixedWindowLimiter::new(10);
    let now = Instant::now();

    for _ in 0..10 {
        assert!(limiter.check_at("198.51.100.7", now));
    }
    assert!(!limiter.check_at("198.51.100.7", now));
}

#[test]
fn test_window_expiry_resets_the_counter() {
    let limiter = FixedWindowLimiter::new(3);
    let now = Instant::now();

    for _ in 0..3 {
        assert!(limiter.check_at("198.51.100.7", now));
    }
    assert!(!limiter.check_at("198.51.100.7", now));

    // 61 seconds later the entry is expired and replaced, not
    // incremented: the full ceiling is available again.
    let later = now + Duration::from_secs(61);
    for _ in 0..3 {
        assert!(limiter.check_at("198.51.100.7", later));
    }
    assert!(!limiter.check_at("198.51.100.7", later));
}

#[test]
fn test_denial_does_not_extend_the_window() {
    let limiter = FixedWindowLimiter::new(1);
    let now = Instant::now();

    assert!(limiter.check_at("198.51.100.7", now));
    assert!(!limiter.check_at("198.51.100.7", now + Duration::from_secs(59)));
    assert!(limiter.check_at("198.51.100.7", now + Duration::from_secs(61)));
}

#[test]
fn test_callers_are_bucketed_independently() {
    let limiter = FixedWindowLimiter::new(1);
    let now = Instant::now();

    assert!(limiter.check_at("198.51.100.7", now));
    assert!(limiter.check_at("203.0.113.9", now));
    assert!(!limiter.check_at("198.51.100.7", now));
    assert!(!limiter.check_at("203.0.113.9", now));
}
