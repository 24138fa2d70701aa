//! Named recurring tasks.
//!
//! ## Responsibility
//! Track which refresh tasks are running and when each is next due. The UI
//! loop asks [`Scheduler::due`] once per frame and runs whatever it returns.
//!
//! ## Guarantees
//! - Starting a task that is already running is a no-op, so intervals are
//!   never duplicated
//! - A one-shot task fires once and then stops itself
//! - Missed periods collapse into one firing; the next due time is realigned
//!   to `now + period`
//!
//! ## NOT Responsible For
//! - Running the work (the coordinator maps task names to actions)

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

/// Refresh tasks the dashboard runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskName {
    /// Clock and countdown redraw.
    Tick,
    /// Lesson boundary check.
    BoundaryWatch,
    /// Timetable poll.
    TimetablePoll,
    /// Weather poll.
    WeatherPoll,
    /// Deferred live timetable fetch after the snapshot.
    FullLoad,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    period: Option<Duration>,
    next_due: Instant,
}

/// Named task table.
#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: HashMap<TaskName, Entry>,
}

impl Scheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a recurring task whose first run is one `period` from `now`.
    ///
    /// # Returns
    /// `false` if the task was already running (nothing changed).
    pub fn start(&mut self, name: TaskName, period: Duration, now: Instant) -> bool {
        self.insert(name, Some(period), now + period)
    }

    /// Starts a recurring task that is due immediately.
    pub fn start_now(&mut self, name: TaskName, period: Duration, now: Instant) -> bool {
        self.insert(name, Some(period), now)
    }

    /// Starts a one-shot task due `delay` from `now`.
    pub fn start_once(&mut self, name: TaskName, delay: Duration, now: Instant) -> bool {
        self.insert(name, None, now + delay)
    }

    fn insert(&mut self, name: TaskName, period: Option<Duration>, next_due: Instant) -> bool {
        if self.tasks.contains_key(&name) {
            debug!(?name, "task already running");
            return false;
        }
        self.tasks.insert(name, Entry { period, next_due });
        true
    }

    /// Stops a task. Stopping a stopped task is a no-op.
    pub fn stop(&mut self, name: TaskName) -> bool {
        self.tasks.remove(&name).is_some()
    }

    /// Whether `name` is scheduled.
    pub fn is_running(&self, name: TaskName) -> bool {
        self.tasks.contains_key(&name)
    }

    /// When `name` next fires.
    pub fn next_due(&self, name: TaskName) -> Option<Instant> {
        self.tasks.get(&name).map(|e| e.next_due)
    }

    /// Number of scheduled tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns every task due at `now`, in a stable order, and advances them.
    pub fn due(&mut self, now: Instant) -> Vec<TaskName> {
        let mut fired = Vec::new();
        let mut finished = Vec::new();

        for (name, entry) in self.tasks.iter_mut() {
            if entry.next_due > now {
                continue;
            }
            fired.push(*name);
            match entry.period {
                Some(period) => entry.next_due = now + period,
                None => finished.push(*name),
            }
        }

        for name in finished {
            self.tasks.remove(&name);
        }
        fired.sort();
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn test_start_is_idempotent() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        assert!(s.start(TaskName::Tick, SEC, now));
        assert!(!s.start(TaskName::Tick, SEC * 5, now));
        assert_eq!(s.len(), 1);
        assert_eq!(s.next_due(TaskName::Tick), Some(now + SEC));
    }

    #[test]
    fn test_nothing_due_before_period() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        s.start(TaskName::WeatherPoll, SEC * 600, now);
        assert!(s.due(now + SEC * 599).is_empty());
        assert_eq!(s.due(now + SEC * 600), vec![TaskName::WeatherPoll]);
    }

    #[test]
    fn test_recurring_task_rearms() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        s.start(TaskName::Tick, SEC, now);
        assert_eq!(s.due(now + SEC), vec![TaskName::Tick]);
        assert!(s.due(now + SEC).is_empty());
        assert_eq!(s.due(now + SEC * 2), vec![TaskName::Tick]);
    }

    #[test]
    fn test_missed_periods_fire_once() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        s.start(TaskName::Tick, SEC, now);
        assert_eq!(s.due(now + SEC * 10), vec![TaskName::Tick]);
        assert_eq!(s.next_due(TaskName::Tick), Some(now + SEC * 11));
    }

    #[test]
    fn test_one_shot_fires_once_then_stops() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        s.start_once(TaskName::FullLoad, SEC * 2, now);
        assert_eq!(s.due(now + SEC * 2), vec![TaskName::FullLoad]);
        assert!(!s.is_running(TaskName::FullLoad));
        assert!(s.due(now + SEC * 10).is_empty());
    }

    #[test]
    fn test_start_now_is_due_immediately() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        s.start_now(TaskName::BoundaryWatch, SEC, now);
        assert_eq!(s.due(now), vec![TaskName::BoundaryWatch]);
    }

    #[test]
    fn test_stop_removes_task() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        s.start(TaskName::TimetablePoll, SEC, now);
        assert!(s.stop(TaskName::TimetablePoll));
        assert!(!s.stop(TaskName::TimetablePoll));
        assert!(s.due(now + SEC * 5).is_empty());
        assert!(s.start(TaskName::TimetablePoll, SEC, now));
    }

    #[test]
    fn test_due_order_is_stable() {
        let now = Instant::now();
        let mut s = Scheduler::new();
        s.start(TaskName::WeatherPoll, SEC, now);
        s.start(TaskName::Tick, SEC, now);
        s.start(TaskName::BoundaryWatch, SEC, now);
        assert_eq!(
            s.due(now + SEC),
            vec![
                TaskName::Tick,
                TaskName::BoundaryWatch,
                TaskName::WeatherPoll
            ]
        );
    }
}
