//! Timing comparators.
//!
//! Two independent measurements over the subject proxy:
//! - `concurrency`: the same URL set fetched serially and in parallel
//!   against two disposable instances, compared by wall clock
//! - `caching`: one URL fetched twice against one instance, cold vs warm
//!
//! Both judge fetches crudely on purpose: a response counts as live when
//! it contains the literal text `HTTP`, and ratios are reported raw for a
//! human to read.

pub mod caching;
pub mod concurrency;

pub use caching::{compare_caching, CacheReport};
pub use concurrency::{compare_concurrency, fetch_parallel, fetch_serial, ConcurrencyReport, TimedRun};

use std::time::Duration;

/// Wall-clock speedup of `fast` relative to `slow`.
pub(crate) fn speedup_ratio(slow: Duration, fast: Duration) -> f64 {
    let fast_secs = fast.as_secs_f64();
    if fast_secs == 0.0 {
        return f64::INFINITY;
    }
    slow.as_secs_f64() / fast_secs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_slow_over_fast() {
        let ratio = speedup_ratio(Duration::from_secs(4), Duration::from_secs(2));
        assert!((ratio - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_denominator_does_not_divide() {
        assert!(speedup_ratio(Duration::from_secs(1), Duration::ZERO).is_infinite());
    }
}
