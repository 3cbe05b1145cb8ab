//! Browser-style timers on top of tokio.
//!
//! Each timer is a spawned task; the returned [`TimerGuard`] aborts it when cleared or dropped.
//! Must be called from within a tokio runtime.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::trace;

static NEXT_TIMER: AtomicUsize = AtomicUsize::new(1);

/// Shortest interval period; tokio intervals reject zero
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerId(usize);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "#{}", self.0) }
}

/// Cancels its timer when cleared or dropped
pub struct TimerGuard {
    id: TimerId,
    task: Option<JoinHandle<()>>,
}

impl TimerGuard {
    pub fn id(&self) -> TimerId { self.id }

    /// True while the timer may still fire
    pub fn is_active(&self) -> bool { self.task.as_ref().is_some_and(|task| !task.is_finished()) }

    pub fn clear(&mut self) {
        if let Some(task) = self.task.take() {
            trace!("timer {}: cleared", self.id);
            task.abort();
        }
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) { self.clear() }
}

impl std::fmt::Debug for TimerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerGuard").field("id", &self.id).field("active", &self.is_active()).finish()
    }
}

/// Call `thunk` every `period`, first one period from now. Periods below [`MIN_PERIOD`] are raised
/// to it, so a zero period repeats as fast as the runtime allows.
pub fn set_interval<F>(period: Duration, thunk: F) -> TimerGuard
where F: Fn() + Send + 'static {
    let id = next_id();
    let period = period.max(MIN_PERIOD);
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            trace!("timer {id}: interval fired");
            thunk();
        }
    });
    TimerGuard { id, task: Some(task) }
}

/// Call `thunk` once after `delay`
pub fn set_timeout<F>(delay: Duration, thunk: F) -> TimerGuard
where F: FnOnce() + Send + 'static {
    let id = next_id();
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        trace!("timer {id}: timeout fired");
        thunk();
    });
    TimerGuard { id, task: Some(task) }
}

fn next_id() -> TimerId { TimerId(NEXT_TIMER.fetch_add(1, Ordering::Relaxed)) }

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_interval_fires_each_period_until_cleared() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut guard = {
            let count = count.clone();
            set_interval(Duration::from_millis(100), move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        guard.clear();
        assert!(!guard.is_active());
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_interval_keeps_firing() {
        let count = Arc::new(AtomicUsize::new(0));
        let guard = {
            let count = count.clone();
            set_interval(Duration::ZERO, move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(guard.is_active());
        assert!(count.load(Ordering::SeqCst) >= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_timeout_never_fires() {
        let fired = Arc::new(AtomicUsize::new(0));
        let guard = {
            let fired = fired.clone();
            set_timeout(Duration::from_millis(100), move || {
                fired.fetch_add(1, Ordering::SeqCst);
            })
        };
        drop(guard);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        let _kept = {
            let fired = fired.clone();
            set_timeout(Duration::from_millis(100), move || {
                fired.fetch_add(1, Ordering::SeqCst);
            })
        };
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
