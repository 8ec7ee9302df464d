//! # Reconnect backoff for the inbound chat stream.
//!
//! The message worker owns its own reconnection: whenever the current
//! connection is absent or dead it dials again, waiting
//! `first * factor^(attempt-1)` (capped at `max`, then jittered) between
//! attempts. A successful connect resets the attempt counter.

use std::time::Duration;

use crate::policies::JitterPolicy;

/// Exponential backoff between chat stream connection attempts.
#[derive(Clone, Copy, Debug)]
pub struct ReconnectPolicy {
    /// Delay before the second attempt (the first happens immediately).
    pub first: Duration,
    /// Upper bound for the computed delay, pre-jitter.
    pub max: Duration,
    /// Multiplier per failed attempt; values below 1.0 are treated as 1.0.
    pub factor: f64,
    /// Randomization applied to the computed delay.
    pub jitter: JitterPolicy,
}

impl Default for ReconnectPolicy {
    /// 1s doubling up to 60s, equal jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_secs(1),
            max: Duration::from_secs(60),
            factor: 2.0,
            jitter: JitterPolicy::default(),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before the given attempt (1-based), jitter applied.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.jitter.apply(self.raw(attempt))
    }

    /// Delay before the given attempt (1-based), without jitter.
    fn raw(&self, attempt: u32) -> Duration {
        // Exponent capped so the f64 math cannot overflow into infinity.
        let exp = attempt.saturating_sub(1).min(32);
        let factor = self.factor.max(1.0);
        let ms = (self.first.as_millis() as f64) * factor.powi(exp as i32);
        let capped = ms.min(self.max.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> ReconnectPolicy {
        ReconnectPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn grows_exponentially() {
        let p = plain();
        assert_eq!(p.delay(1), Duration::from_millis(100));
        assert_eq!(p.delay(2), Duration::from_millis(200));
        assert_eq!(p.delay(3), Duration::from_millis(400));
        assert_eq!(p.delay(4), Duration::from_millis(800));
    }

    #[test]
    fn caps_at_max() {
        let p = plain();
        assert_eq!(p.delay(30), Duration::from_secs(30));
    }

    #[test]
    fn factor_below_one_is_constant() {
        let p = ReconnectPolicy {
            factor: 0.5,
            ..plain()
        };
        assert_eq!(p.delay(1), p.delay(5));
    }
}
