// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Time source for velocity checks.
//!
//! All instants are Unix epoch milliseconds.  [`SystemClock`] reads the wall
//! clock and is only available with the `std` feature; [`FixedClock`] pins
//! "now" for deterministic evaluation and replay.

use core::sync::atomic::{AtomicU64, Ordering};

/// Milliseconds in one hour, the rate-limit window.
pub const HOUR_MS: u64 = 3_600_000;

/// Milliseconds in one UTC day.
pub const DAY_MS: u64 = 86_400_000;

/// A source of the current evaluation instant.
pub trait Clock: Send + Sync {
    /// Current Unix epoch milliseconds.
    fn now_ms(&self) -> u64;
}

/// Wall-clock time.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        current_time_ms()
    }
}

/// A manually driven clock.
///
/// # Examples
///
/// ```rust
/// use fagf_governance_core::clock::{Clock, FixedClock};
///
/// let clock = FixedClock::new(1_000);
/// clock.advance_secs(59);
/// assert_eq!(clock.now_ms(), 60_000);
/// ```
#[derive(Debug, Default)]
pub struct FixedClock {
    now_ms: AtomicU64,
}

impl FixedClock {
    pub fn new(now_ms: u64) -> Self {
        Self { now_ms: AtomicU64::new(now_ms) }
    }

    /// Pin the clock to `now_ms`.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, seconds: u64) {
        self.advance_ms(seconds.saturating_mul(1_000));
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

#[cfg(feature = "std")]
impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Return current Unix epoch milliseconds.
#[cfg(feature = "std")]
pub fn current_time_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Start of the UTC day containing `instant_ms`.
pub fn utc_day_start(instant_ms: u64) -> u64 {
    instant_ms - instant_ms % DAY_MS
}
