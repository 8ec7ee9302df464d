//! # Jitter for reconnect delays.
//!
//! [`JitterPolicy`] randomizes a computed delay so that several processes
//! pointed at the same chat gateway do not reconnect in lockstep.
//!
//! - [`JitterPolicy::None`] — exact delay, predictable (tests)
//! - [`JitterPolicy::Full`] — random in `[0, delay]`
//! - [`JitterPolicy::Equal`] — `delay/2 + random[0, delay/2]` (default)

use std::time::Duration;

use rand::Rng;

/// Randomization applied to a reconnect delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Use the exact computed delay.
    None,
    /// Random delay in `[0, delay]`.
    Full,
    /// Keep at least half the delay, randomize the rest.
    Equal,
}

impl Default for JitterPolicy {
    fn default() -> Self {
        JitterPolicy::Equal
    }
}

impl JitterPolicy {
    /// Applies this policy to `delay`.
    pub fn apply(&self, delay: Duration) -> Duration {
        let ms = delay.as_millis() as u64;
        if ms == 0 {
            return Duration::ZERO;
        }
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => {
                let mut rng = rand::rng();
                Duration::from_millis(rng.random_range(0..=ms))
            }
            JitterPolicy::Equal => {
                let half = ms / 2;
                let jitter = if half == 0 {
                    0
                } else {
                    rand::rng().random_range(0..=half)
                };
                Duration::from_millis(half + jitter)
            }
        }
    }
}
