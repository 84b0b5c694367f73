//! Outbound call pacing.
//!
//! # Modes
//! - `PerCall`: sleep a fixed interval before every call. Each request paces
//!   only its own sequential chain, so N concurrent requests produce N times
//!   the configured rate upstream.
//! - `Shared`: a single leaky bucket for the whole process. Every caller
//!   reserves the next free slot, slots are `interval` apart, and the upstream
//!   rate stays at one call per interval regardless of concurrency.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::{PacingMode, UpstreamConfig};

/// Rate limiter injected into the upstream client.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    mode: PacingMode,
    /// Earliest instant the next shared slot may start.
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    pub fn new(interval: Duration, mode: PacingMode) -> Self {
        Self {
            interval,
            mode,
            next_slot: Mutex::new(None),
        }
    }

    /// Build from upstream config, picking the interval by credential presence.
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(Duration::from_millis(config.pacing_interval_ms()), config.pacing)
    }

    /// A pacer that never waits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, PacingMode::PerCall)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn mode(&self) -> PacingMode {
        self.mode
    }

    /// Wait until the caller may issue its next upstream call.
    pub async fn wait(&self) {
        let delay = self.reserve(Instant::now());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Claim a slot and return how long to wait for it.
    fn reserve(&self, now: Instant) -> Duration {
        match self.mode {
            PacingMode::PerCall => self.interval,
            PacingMode::Shared => {
                let mut next = self.next_slot.lock().expect("pacer mutex poisoned");
                let slot = match *next {
                    Some(t) if t > now => t,
                    _ => now,
                };
                *next = Some(slot + self.interval);
                slot - now
            }
        }
    }
}
