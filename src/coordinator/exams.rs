//! Exam reminders.
//!
//! After each applied timetable, every exam is checked against the reminder
//! thresholds. A reminder for one `(subject, start, threshold)` fires at most
//! once per process; the record is not persisted, so a restart may repeat it.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};

use crate::api::types::Lesson;

const SECS_PER_DAY: i64 = 86_400;

/// A reminder to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamNotification {
    /// Exam subject.
    pub subject: String,
    /// Exam start.
    pub start: DateTime<FixedOffset>,
    /// Threshold that matched.
    pub days: i64,
}

/// Whole days until `start`, rounded up. An exam 25 hours away is 2 days
/// away; one that has started is 0 or negative.
pub fn days_until(start: &DateTime<FixedOffset>, now: DateTime<Utc>) -> i64 {
    let ms = start.with_timezone(&Utc).signed_duration_since(now).num_milliseconds();
    let day_ms = SECS_PER_DAY * 1000;
    let whole = ms.div_euclid(day_ms);
    if ms.rem_euclid(day_ms) == 0 {
        whole
    } else {
        whole + 1
    }
}

/// Emits each reminder once.
#[derive(Debug, Clone)]
pub struct ExamNotifier {
    thresholds: Vec<i64>,
    fired: HashSet<(String, DateTime<FixedOffset>, i64)>,
}

impl ExamNotifier {
    /// Creates a notifier for the given day thresholds (e.g. `[7, 3, 1]`).
    pub fn new(thresholds: Vec<i64>) -> Self {
        Self {
            thresholds,
            fired: HashSet::new(),
        }
    }

    /// Returns reminders due at `now` that have not fired yet.
    pub fn check(&mut self, exams: &[Lesson], now: DateTime<Utc>) -> Vec<ExamNotification> {
        let mut out = Vec::new();
        for exam in exams {
            let days = days_until(&exam.start, now);
            if !self.thresholds.contains(&days) {
                continue;
            }
            let subject = exam.subject().to_string();
            if self.fired.insert((subject.clone(), exam.start, days)) {
                out.push(ExamNotification {
                    subject,
                    start: exam.start,
                    days,
                });
            }
        }
        out
    }

    /// Number of reminders fired so far.
    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }
}
