//! Position polling fallback
//!
//! Some resources report position changes irregularly. The poller ticks on a
//! fixed interval so the session can sample the resource directly. Dropping
//! the poller cancels it.

use std::time::Duration;
use tokio::time::{self, Interval, MissedTickBehavior};

/// Fixed-interval position sampler
#[derive(Debug)]
pub struct PositionPoller {
    interval: Interval,
}

impl PositionPoller {
    /// Poll every `period`
    ///
    /// The first tick fires one full period after creation. Ticks missed while
    /// the caller was busy are skipped rather than bunched up.
    pub fn new(period: Duration) -> Self {
        let mut interval = time::interval_at(time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    /// Poller from a millisecond setting; `None` or `0` disables polling
    pub fn from_millis(millis: Option<u64>) -> Option<Self> {
        match millis {
            Some(ms) if ms > 0 => Some(Self::new(Duration::from_millis(ms))),
            _ => None,
        }
    }

    /// Wait for the next tick
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Configured period
    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let start = time::Instant::now();
        let mut poller = PositionPoller::new(Duration::from_millis(200));

        poller.tick().await;
        assert!(start.elapsed() >= Duration::from_millis(200));

        poller.tick().await;
        assert!(start.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn disabled_settings() {
        assert!(PositionPoller::from_millis(None).is_none());
        assert!(PositionPoller::from_millis(Some(0)).is_none());
        assert_eq!(
            PositionPoller::from_millis(Some(250)).unwrap().period(),
            Duration::from_millis(250)
        );
    }
}
