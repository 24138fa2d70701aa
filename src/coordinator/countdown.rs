//! Lesson countdowns.
//!
//! A countdown tracks one target instant (next lesson start or current lesson
//! end). Each tick recomputes the remaining time until it reaches zero, at
//! which point it reports expiry once and stops recomputing.

use chrono::{DateTime, Duration, Utc};

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;

/// Which boundary a countdown runs towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownKind {
    /// Time until the next lesson starts. Shows days.
    LessonStart,
    /// Time until the current lesson ends. Hours are not folded into days.
    LessonEnd,
}

/// Remaining time split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    /// Whole days (always 0 for [`CountdownKind::LessonEnd`]).
    pub days: i64,
    /// Whole hours after days.
    pub hours: i64,
    /// Whole minutes after hours.
    pub minutes: i64,
    /// Whole seconds after minutes.
    pub seconds: i64,
}

impl Remaining {
    /// Splits a positive duration. Sub-second remainders are truncated.
    pub fn split(kind: CountdownKind, remaining: Duration) -> Self {
        let total = remaining.num_seconds().max(0);
        let (days, rest) = match kind {
            CountdownKind::LessonStart => (total / SECS_PER_DAY, total % SECS_PER_DAY),
            CountdownKind::LessonEnd => (0, total),
        };
        Self {
            days,
            hours: rest / SECS_PER_HOUR,
            minutes: (rest % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: rest % SECS_PER_MINUTE,
        }
    }

    /// Compact text where the largest nonzero unit sets the granularity:
    /// `"2d 3h 4m"`, `"3h 4m 5s"`, `"4m 5s"` or `"5s"`.
    pub fn compact(&self) -> String {
        if self.days > 0 {
            format!("{}d {}h {}m", self.days, self.hours, self.minutes)
        } else if self.hours > 0 {
            format!("{}h {}m {}s", self.hours, self.minutes, self.seconds)
        } else if self.minutes > 0 {
            format!("{}m {}s", self.minutes, self.seconds)
        } else {
            format!("{}s", self.seconds)
        }
    }
}

/// Display state of a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    /// Not yet computed; the widget shows a placeholder.
    Pending,
    /// Counting down.
    Running(Remaining),
    /// Target reached; the widget shows its terminal message.
    Finished,
}

/// What a tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Remaining time was recomputed.
    Updated,
    /// The target was reached on this tick.
    Expired,
    /// Already finished; nothing recomputed.
    Idle,
}

/// A countdown towards one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    kind: CountdownKind,
    target: DateTime<Utc>,
    state: CountdownState,
}

impl Countdown {
    /// Creates a pending countdown.
    pub fn new(kind: CountdownKind, target: DateTime<Utc>) -> Self {
        Self {
            kind,
            target,
            state: CountdownState::Pending,
        }
    }

    /// Boundary kind.
    pub fn kind(&self) -> CountdownKind {
        self.kind
    }

    /// Target instant.
    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Current display state.
    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Recomputes the remaining time against `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> CountdownTick {
        if self.state == CountdownState::Finished {
            return CountdownTick::Idle;
        }
        let remaining = self.target - now;
        if remaining <= Duration::zero() {
            self.state = CountdownState::Finished;
            return CountdownTick::Expired;
        }
        self.state = CountdownState::Running(Remaining::split(self.kind, remaining));
        CountdownTick::Updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 14, h, m, s)
            .single()
            .expect("test: valid time")
    }

    fn compact(kind: CountdownKind, secs: i64) -> String {
        Remaining::split(kind, Duration::seconds(secs)).compact()
    }

    #[test]
    fn test_compact_days_show_hours_and_minutes() {
        let secs = 2 * SECS_PER_DAY + 3 * SECS_PER_HOUR + 4 * 60 + 5;
        assert_eq!(compact(CountdownKind::LessonStart, secs), "2d 3h 4m");
    }

    #[test]
    fn test_compact_hours_show_minutes_and_seconds() {
        assert_eq!(compact(CountdownKind::LessonStart, 3 * 3600 + 4 * 60 + 5), "3h 4m 5s");
    }

    #[test]
    fn test_compact_minutes_show_seconds() {
        assert_eq!(compact(CountdownKind::LessonStart, 4 * 60 + 5), "4m 5s");
    }

    #[test]
    fn test_compact_seconds_only() {
        assert_eq!(compact(CountdownKind::LessonStart, 5), "5s");
    }

    #[test]
    fn test_compact_zero_units_inside_granularity_are_shown() {
        assert_eq!(compact(CountdownKind::LessonStart, 3600), "1h 0m 0s");
        assert_eq!(compact(CountdownKind::LessonStart, SECS_PER_DAY), "1d 0h 0m");
    }

    #[test]
    fn test_lesson_end_never_folds_into_days() {
        assert_eq!(compact(CountdownKind::LessonEnd, 26 * 3600 + 60), "26h 1m 0s");
    }

    #[test]
    fn test_sub_second_remainder_truncates() {
        let r = Remaining::split(CountdownKind::LessonStart, Duration::milliseconds(1999));
        assert_eq!(r.compact(), "1s");
    }

    #[test]
    fn test_new_countdown_is_pending() {
        let cd = Countdown::new(CountdownKind::LessonStart, at(8, 0, 0));
        assert_eq!(cd.state(), CountdownState::Pending);
    }

    #[test]
    fn test_tick_before_target_updates() {
        let mut cd = Countdown::new(CountdownKind::LessonStart, at(8, 0, 0));
        assert_eq!(cd.tick(at(7, 50, 30)), CountdownTick::Updated);
        assert_eq!(
            cd.state(),
            CountdownState::Running(Remaining {
                days: 0,
                hours: 0,
                minutes: 9,
                seconds: 30
            })
        );
    }

    #[test]
    fn test_tick_at_target_expires_exactly_once() {
        let mut cd = Countdown::new(CountdownKind::LessonEnd, at(8, 45, 0));
        assert_eq!(cd.tick(at(8, 44, 59)), CountdownTick::Updated);
        assert_eq!(cd.tick(at(8, 45, 0)), CountdownTick::Expired);
        assert_eq!(cd.state(), CountdownState::Finished);
        assert_eq!(cd.tick(at(8, 45, 1)), CountdownTick::Idle);
        assert_eq!(cd.tick(at(9, 0, 0)), CountdownTick::Idle);
    }

    #[test]
    fn test_finished_countdown_ignores_clock_going_back() {
        let mut cd = Countdown::new(CountdownKind::LessonStart, at(8, 0, 0));
        cd.tick(at(8, 0, 1));
        assert_eq!(cd.tick(at(7, 0, 0)), CountdownTick::Idle);
        assert_eq!(cd.state(), CountdownState::Finished);
    }
}
