//! Countdown state computed against a fixed target instant.
//!
//! The state machine has two states. `Running` carries the time left,
//! decomposed into days/hours/minutes/seconds; `Expired` is terminal and
//! always displays as zero.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;

/// Source of "now". Injected so countdowns can be driven by tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time left until a countdown target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Remaining {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Remaining {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Decomposes a millisecond delta. Non-positive deltas clamp to zero;
    /// sub-second remainders are truncated.
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        if millis <= 0 {
            return Self::ZERO;
        }
        let part = |value: i64| u32::try_from(value).unwrap_or(u32::MAX);
        Self {
            days: part(millis / MS_PER_DAY),
            hours: part((millis % MS_PER_DAY) / MS_PER_HOUR),
            minutes: part((millis % MS_PER_HOUR) / MS_PER_MINUTE),
            seconds: part((millis % MS_PER_MINUTE) / MS_PER_SECOND),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CountdownState {
    Running(Remaining),
    Expired,
}

impl CountdownState {
    /// Computes the state for `target` as seen at `now`.
    #[must_use]
    pub fn at(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let millis = (target - now).num_milliseconds();
        if millis <= 0 {
            CountdownState::Expired
        } else {
            CountdownState::Running(Remaining::from_millis(millis))
        }
    }

    /// Next state on a tick. `Expired` never transitions back to `Running`,
    /// even if the clock moves backwards.
    #[must_use]
    pub fn tick(self, target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        match self {
            CountdownState::Expired => CountdownState::Expired,
            CountdownState::Running(_) => Self::at(target, now),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> Remaining {
        match self {
            CountdownState::Running(remaining) => *remaining,
            CountdownState::Expired => Remaining::ZERO,
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, CountdownState::Expired)
    }
}

/// The end of the deal window containing `now`, with windows aligned to the
/// Unix epoch. A one-day window ends at the next UTC midnight.
#[must_use]
pub fn next_window_boundary(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    let window_secs = i64::try_from(window.as_secs()).unwrap_or(i64::MAX).max(1);
    now.timestamp()
        .div_euclid(window_secs)
        .checked_add(1)
        .and_then(|n| n.checked_mul(window_secs))
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn instant(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn ninety_seconds_ahead_is_one_minute_thirty() {
        let now = instant("2026-03-01T10:00:00Z");
        let state = CountdownState::at(now + TimeDelta::seconds(90), now);
        assert_eq!(
            state,
            CountdownState::Running(Remaining {
                days: 0,
                hours: 0,
                minutes: 1,
                seconds: 30,
            })
        );
    }

    #[test]
    fn decomposes_days_hours_minutes_seconds() {
        let now = instant("2026-03-01T10:00:00Z");
        let target = now + TimeDelta::days(2) + TimeDelta::hours(3) + TimeDelta::minutes(4)
            + TimeDelta::seconds(5)
            + TimeDelta::milliseconds(999);
        let remaining = CountdownState::at(target, now).remaining();
        assert_eq!(
            remaining,
            Remaining {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5,
            }
        );
    }

    #[test]
    fn past_and_present_targets_are_expired_at_zero() {
        let now = instant("2026-03-01T10:00:00Z");
        for target in [now, now - TimeDelta::seconds(1), now - TimeDelta::days(30)] {
            let state = CountdownState::at(target, now);
            assert!(state.is_expired());
            assert_eq!(state.remaining(), Remaining::ZERO);
        }
    }

    #[test]
    fn sub_second_remainder_is_running_with_zero_display() {
        let now = instant("2026-03-01T10:00:00Z");
        let state = CountdownState::at(now + TimeDelta::milliseconds(400), now);
        assert!(!state.is_expired());
        assert_eq!(state.remaining(), Remaining::ZERO);
    }

    #[test]
    fn expired_never_restarts() {
        let target = instant("2026-03-01T10:00:00Z");
        let state = CountdownState::at(target, target + TimeDelta::seconds(1));
        assert!(state.is_expired());
        let after_clock_skew = state.tick(target, target - TimeDelta::hours(1));
        assert!(after_clock_skew.is_expired());
    }

    #[test]
    fn running_ticks_down_then_expires() {
        let target = instant("2026-03-01T10:00:02Z");
        let mut state = CountdownState::at(target, instant("2026-03-01T10:00:00Z"));
        assert_eq!(state.remaining().seconds, 2);
        state = state.tick(target, instant("2026-03-01T10:00:01Z"));
        assert_eq!(state.remaining().seconds, 1);
        state = state.tick(target, instant("2026-03-01T10:00:02Z"));
        assert!(state.is_expired());
    }

    #[test]
    fn negative_millis_clamp_to_zero() {
        assert_eq!(Remaining::from_millis(-5_000), Remaining::ZERO);
    }

    #[test]
    fn serializes_with_state_tag() {
        let running = serde_json::to_value(CountdownState::Running(Remaining {
            days: 0,
            hours: 1,
            minutes: 2,
            seconds: 3,
        }))
        .unwrap();
        assert_eq!(running["state"], "running");
        assert_eq!(running["minutes"], 2);

        let expired = serde_json::to_value(CountdownState::Expired).unwrap();
        assert_eq!(expired, serde_json::json!({"state": "expired"}));
    }

    #[test]
    fn one_day_window_ends_at_next_utc_midnight() {
        let now = instant("2026-03-01T10:15:00Z");
        let end = next_window_boundary(now, Duration::from_secs(86_400));
        assert_eq!(end, instant("2026-03-02T00:00:00Z"));
    }

    #[test]
    fn window_boundary_is_strictly_after_now() {
        let now = instant("2026-03-02T00:00:00Z");
        let end = next_window_boundary(now, Duration::from_secs(86_400));
        assert_eq!(end, instant("2026-03-03T00:00:00Z"));
    }

    #[test]
    fn hourly_window() {
        let now = instant("2026-03-01T10:15:00Z");
        let end = next_window_boundary(now, Duration::from_secs(3_600));
        assert_eq!(end, instant("2026-03-01T11:00:00Z"));
    }
}
