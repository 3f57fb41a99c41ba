//! One-shot timers delivered through the bridge's event queue
//!
//! Arming a timer never blocks. The scheduler is expected to post
//! [`crate::BridgeEvent::TimerFired`] with the same token once the delay has
//! elapsed, in arrival order with every other event.

use std::fmt;
use std::time::Duration;

/// Identifies one armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Schedules one-shot timer events
pub trait TimerScheduler {
    fn schedule(&mut self, delay: Duration, token: TimerToken);
}

/// Hands out increasing tokens
#[derive(Debug, Default)]
pub struct TokenSequence {
    next: u64,
}

impl TokenSequence {
    pub fn next_token(&mut self) -> TimerToken {
        self.next += 1;
        TimerToken(self.next)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;

    /// Records scheduled timers without ever firing them
    #[derive(Debug, Default)]
    pub struct ManualTimers {
        pub scheduled: Vec<(Duration, TimerToken)>,
    }

    impl TimerScheduler for ManualTimers {
        fn schedule(&mut self, delay: Duration, token: TimerToken) {
            self.scheduled.push((delay, token));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique_and_increasing() {
        let mut seq = TokenSequence::default();
        let a = seq.next_token();
        let b = seq.next_token();
        assert_ne!(a, b);
        assert!(b > a);
        assert_eq!(a.to_string(), "timer#1");
    }
}
