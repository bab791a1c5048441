//! Periodic tick task with cancellable arming.
//!
//! A [`Ticker`] owns at most one background task. Arming a new schedule
//! always aborts the previous one first, so there is never more than one
//! live timer per session. The first fire happens one full period after
//! arming, never immediately.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Handle to the currently armed tick task, if any.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
    epoch: u64,
    period: Duration,
}

impl Ticker {
    /// Create a disarmed ticker.
    pub const fn new() -> Self {
        Self {
            handle: None,
            epoch: 0,
            period: Duration::ZERO,
        }
    }

    /// Arm a task that calls `on_tick(epoch)` every `period`.
    ///
    /// Any previously armed task is aborted. The task exits on its own
    /// once `on_tick` returns `false`. Must be called from within a tokio
    /// runtime.
    pub fn arm<F, Fut>(&mut self, epoch: u64, period: Duration, on_tick: F)
    where
        F: Fn(u64) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.disarm();
        // interval_at panics on a zero period.
        let period = period.max(Duration::from_millis(1));
        // Anchored at arming time, not at the task's first poll.
        let first = Instant::now()
            .checked_add(period)
            .unwrap_or_else(Instant::now);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !on_tick(epoch).await {
                    debug!(epoch, "ticker exiting");
                    break;
                }
            }
        });

        debug!(epoch, period_ms = period.as_millis(), "ticker armed");
        self.handle = Some(handle);
        self.epoch = epoch;
        self.period = period;
    }

    /// Abort the armed task. Does nothing when already disarmed.
    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!(epoch = self.epoch, "ticker disarmed");
        }
    }

    /// Whether a task is armed and still running.
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Epoch of the most recent arming.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Period of the most recent arming.
    pub const fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    fn counting(counter: Arc<AtomicU64>) -> impl Fn(u64) -> std::future::Ready<bool> {
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(true)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_fire_waits_one_period() {
        let fired = Arc::new(AtomicU64::new(0));
        let mut ticker = Ticker::new();
        ticker.arm(1, Duration::from_millis(1000), counting(Arc::clone(&fired)));

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_is_anchored_at_arming() {
        let fired = Arc::new(AtomicU64::new(0));
        let mut ticker = Ticker::new();
        ticker.arm(1, Duration::from_millis(250), counting(Arc::clone(&fired)));

        // Move the clock before the spawned task gets its first poll.
        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_replaces_previous_task() {
        let slow = Arc::new(AtomicU64::new(0));
        let fast = Arc::new(AtomicU64::new(0));
        let mut ticker = Ticker::new();

        ticker.arm(1, Duration::from_millis(1000), counting(Arc::clone(&slow)));
        tokio::time::sleep(Duration::from_millis(500)).await;
        ticker.arm(2, Duration::from_millis(250), counting(Arc::clone(&fast)));
        assert_eq!(ticker.epoch(), 2);
        assert_eq!(ticker.period(), Duration::from_millis(250));

        tokio::time::sleep(Duration::from_millis(1010)).await;
        assert_eq!(slow.load(Ordering::SeqCst), 0);
        assert_eq!(fast.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_stops_firing() {
        let fired = Arc::new(AtomicU64::new(0));
        let mut ticker = Ticker::new();
        ticker.arm(1, Duration::from_millis(100), counting(Arc::clone(&fired)));
        assert!(ticker.is_armed());

        tokio::time::sleep(Duration::from_millis(150)).await;
        ticker.disarm();
        assert!(!ticker.is_armed());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn task_exits_when_callback_declines() {
        let mut ticker = Ticker::new();
        ticker.arm(1, Duration::from_millis(100), |_| std::future::ready(false));
        tokio::time::sleep(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;
        assert!(!ticker.is_armed());
    }
}
