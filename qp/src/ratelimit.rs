//! Per-call-site gates: once, rate limiters and rate counters.
//!
//! Each macro that needs state declares a `static` built from one of the
//! `const fn` constructors below, so every call site owns its own state and
//! nothing is allocated.
//!
//! ```
//! use qp::ratelimit::RateLimiter;
//!
//! static LIMIT: RateLimiter = RateLimiter::new();
//! assert!(LIMIT.check_at(10_000, 1000).is_some()); // first call fires
//! assert!(LIMIT.check_at(10_500, 1000).is_none());
//! assert_eq!(LIMIT.check_at(11_001, 1000), Some(1001));
//! ```

use std::fmt;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::time::militime_now;

/// True for the first caller only.
#[derive(Debug)]
pub struct Once {
    fired: AtomicBool,
}

impl Once {
    /// A gate that has not fired.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// Whether this is the first call.
    pub fn first(&self) -> bool {
        !self.fired.swap(true, Ordering::Relaxed)
    }
}

impl Default for Once {
    fn default() -> Self {
        Self::new()
    }
}

/// Lets one caller through per interval.
#[derive(Debug)]
pub struct RateLimiter {
    last_ms: AtomicU64,
}

impl RateLimiter {
    /// A limiter whose first check fires.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_ms: AtomicU64::new(0),
        }
    }

    /// Check against the wall clock.
    pub fn check(&self, interval_ms: u64) -> Option<u64> {
        self.check_at(militime_now(), interval_ms)
    }

    /// Fire when more than `interval_ms` passed since the last firing.
    ///
    /// Returns the elapsed milliseconds when firing. Of several threads racing
    /// for the same window exactly one wins.
    pub fn check_at(&self, now_ms: u64, interval_ms: u64) -> Option<u64> {
        let last = self.last_ms.load(Ordering::Relaxed);
        let elapsed = now_ms.saturating_sub(last);
        if last != 0 && elapsed <= interval_ms {
            return None;
        }
        self.last_ms
            .compare_exchange(last, now_ms, Ordering::Relaxed, Ordering::Relaxed)
            .ok()
            .map(|_| elapsed.max(1))
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Call count and rate since the previous report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateReport {
    /// Total calls so far.
    pub count: u64,
    /// Calls per second since the previous report, times 1000.
    pub rate_milli: u64,
}

impl RateReport {
    /// Compute a report from a call delta over `elapsed_ms`.
    #[must_use]
    pub const fn new(count: u64, delta: u64, elapsed_ms: u64) -> Self {
        let elapsed_ms = if elapsed_ms == 0 { 1 } else { elapsed_ms };
        Self {
            count,
            rate_milli: delta.saturating_mul(1_000_000) / elapsed_ms,
        }
    }
}

impl fmt::Display for RateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cnt={} rate={}.{:03}/s",
            self.count,
            self.rate_milli / 1000,
            self.rate_milli % 1000
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Counts {
    count: u64,
    last_count: u64,
    last_ms: u64,
}

/// Counts calls and reports the rate once per interval.
#[derive(Debug)]
pub struct RateCounter {
    counts: Mutex<Counts>,
}

impl RateCounter {
    /// A counter with no calls.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: Mutex::new(Counts {
                count: 0,
                last_count: 0,
                last_ms: 0,
            }),
        }
    }

    /// Count a call against the wall clock.
    pub fn tick(&self, interval_ms: u64) -> Option<RateReport> {
        self.tick_at(militime_now(), interval_ms)
    }

    /// Count a call; report when more than `interval_ms` passed since the last report.
    pub fn tick_at(&self, now_ms: u64, interval_ms: u64) -> Option<RateReport> {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        counts.count += 1;
        let elapsed = now_ms.saturating_sub(counts.last_ms);
        if counts.last_ms != 0 && elapsed <= interval_ms {
            return None;
        }
        let report = RateReport::new(counts.count, counts.count - counts.last_count, elapsed);
        counts.last_count = counts.count;
        counts.last_ms = now_ms;
        Some(report)
    }

    /// Calls counted so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count
    }
}

impl Default for RateCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Histogram slot of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistSlot {
    /// A value inside `0..N`.
    Value(usize),
    /// A value outside the histogram range.
    Overflow(i128),
}

impl fmt::Display for HistSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "val={value}"),
            Self::Overflow(value) => write!(f, "val=overflow({value})"),
        }
    }
}

/// Rate counters for the values `0..N`, plus one shared by everything else.
#[derive(Debug)]
pub struct HistRateLimiter<const N: usize> {
    slots: [RateCounter; N],
    overflow: RateCounter,
}

impl<const N: usize> HistRateLimiter<N> {
    /// Counters with no calls.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { RateCounter::new() }; N],
            overflow: RateCounter::new(),
        }
    }

    /// Count `value` against the wall clock.
    pub fn record(&self, value: i128, interval_ms: u64) -> Option<(HistSlot, RateReport)> {
        self.record_at(value, militime_now(), interval_ms)
    }

    /// Count `value`; each slot is rate limited independently.
    pub fn record_at(
        &self,
        value: i128,
        now_ms: u64,
        interval_ms: u64,
    ) -> Option<(HistSlot, RateReport)> {
        let slot = usize::try_from(value)
            .ok()
            .and_then(|index| self.slots.get(index).map(|counter| (index, counter)));
        let (slot, counter) = match slot {
            Some((index, counter)) => (HistSlot::Value(index), counter),
            None => (HistSlot::Overflow(value), &self.overflow),
        };
        counter
            .tick_at(now_ms, interval_ms)
            .map(|report| (slot, report))
    }
}

impl<const N: usize> Default for HistRateLimiter<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Integers accepted by `qp_print_hist_ratelimit!`.
#[doc(hidden)]
pub trait HistValue: Copy {
    /// Value as a histogram key; values beyond `i128` saturate.
    fn hist_key(self) -> i128;
}

macro_rules! hist_value_lossless {
    ($($t:ty),*) => {$(
        impl HistValue for $t {
            fn hist_key(self) -> i128 {
                i128::from(self)
            }
        }
    )*};
}

macro_rules! hist_value_saturating {
    ($($t:ty),*) => {$(
        impl HistValue for $t {
            fn hist_key(self) -> i128 {
                i128::try_from(self).unwrap_or(i128::MAX)
            }
        }
    )*};
}

hist_value_lossless!(u8, u16, u32, u64, i8, i16, i32, i64, i128, bool);
hist_value_saturating!(u128, usize, isize);
