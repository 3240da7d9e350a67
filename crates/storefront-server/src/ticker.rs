//! One-second countdown ticker backed by a tokio task.
//!
//! The task publishes each [`CountdownState`] on a `watch` channel and stops
//! on its own after publishing `Expired`. Dropping the [`CountdownTicker`]
//! aborts the task, so a closed stream never leaves a timer running.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use storefront_core::{Clock, CountdownState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct CountdownTicker {
    rx: watch::Receiver<CountdownState>,
    task: JoinHandle<()>,
    delivered_initial: bool,
}

impl CountdownTicker {
    /// Starts ticking towards `target`. The initial state is computed
    /// immediately; an already-expired target never spawns a timer loop.
    pub fn spawn(target: DateTime<Utc>, clock: Arc<dyn Clock>) -> Self {
        let initial = CountdownState::at(target, clock.now());
        let (tx, rx) = watch::channel(initial);
        let task = tokio::spawn(run(target, clock, tx, initial));
        Self {
            rx,
            task,
            delivered_initial: false,
        }
    }

    /// Yields the current state first, then each published tick. Returns
    /// `None` once the task has stopped and every state has been seen.
    pub async fn next(&mut self) -> Option<CountdownState> {
        if !self.delivered_initial {
            self.delivered_initial = true;
            return Some(*self.rx.borrow_and_update());
        }
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    target: DateTime<Utc>,
    clock: Arc<dyn Clock>,
    tx: watch::Sender<CountdownState>,
    mut state: CountdownState,
) {
    if state.is_expired() {
        return;
    }

    let mut interval = tokio::time::interval(TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // First tick completes immediately; the initial state is already published.
    interval.tick().await;

    loop {
        interval.tick().await;
        state = state.tick(target, clock.now());
        if tx.send(state).is_err() {
            return;
        }
        if state.is_expired() {
            tracing::debug!(%target, "countdown expired");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use chrono::TimeDelta;
    use storefront_core::Remaining;

    use super::*;

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
        reads: AtomicUsize,
    }

    impl ManualClock {
        fn new(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(now),
                reads: AtomicUsize::new(0),
            })
        }

        fn advance(&self, by: TimeDelta) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            *self.now.lock().unwrap()
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn running(seconds: u32) -> CountdownState {
        CountdownState::Running(Remaining {
            seconds,
            ..Remaining::ZERO
        })
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_down_then_stops_after_expiry() {
        let clock = ManualClock::new(start());
        let mut ticker = CountdownTicker::spawn(start() + TimeDelta::seconds(2), clock.clone());

        assert_eq!(ticker.next().await, Some(running(2)));

        clock.advance(TimeDelta::seconds(1));
        assert_eq!(ticker.next().await, Some(running(1)));

        clock.advance(TimeDelta::seconds(1));
        assert_eq!(ticker.next().await, Some(CountdownState::Expired));

        assert_eq!(ticker.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn past_target_yields_expired_once() {
        let clock = ManualClock::new(start());
        let mut ticker = CountdownTicker::spawn(start() - TimeDelta::minutes(5), clock);

        assert_eq!(ticker.next().await, Some(CountdownState::Expired));
        assert_eq!(ticker.next().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_ticker_stops_the_timer() {
        let clock = ManualClock::new(start());
        let mut ticker = CountdownTicker::spawn(start() + TimeDelta::hours(1), clock.clone());
        assert!(ticker.next().await.is_some());
        drop(ticker);
        tokio::task::yield_now().await;

        let reads_after_drop = clock.reads();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(clock.reads(), reads_after_drop);
    }
}
