//! Lesson boundary watcher.
//!
//! Holds the next lesson start and the current lesson end. Once either instant
//! has passed, the watcher clears it and asks for one timetable refetch. A
//! cleared boundary stays cleared until a new timetable sets fresh windows,
//! even if that refetch fails.

use chrono::{DateTime, Utc};

/// Start and optional end of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonWindow {
    /// Lesson start.
    pub start: DateTime<Utc>,
    /// Lesson end, if known.
    pub end: Option<DateTime<Utc>>,
}

/// What one check found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundaryCheck {
    /// The next lesson has started.
    pub next_started: bool,
    /// The current lesson has ended.
    pub current_ended: bool,
}

impl BoundaryCheck {
    /// Whether the timetable must be fetched again. Both boundaries crossing
    /// in one check still means one fetch.
    pub fn needs_refetch(&self) -> bool {
        self.next_started || self.current_ended
    }
}

/// The active pair of lesson windows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryWatcher {
    next: Option<LessonWindow>,
    current: Option<LessonWindow>,
}

impl BoundaryWatcher {
    /// Creates a watcher with no windows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces both windows with the ones from a fresh timetable.
    pub fn set_windows(&mut self, next: Option<LessonWindow>, current: Option<LessonWindow>) {
        self.next = next;
        self.current = current;
    }

    /// Window of the next lesson.
    pub fn next(&self) -> Option<&LessonWindow> {
        self.next.as_ref()
    }

    /// Window of the running lesson.
    pub fn current(&self) -> Option<&LessonWindow> {
        self.current.as_ref()
    }

    /// Checks both boundaries against `now`, clearing any that were crossed.
    pub fn check(&mut self, now: DateTime<Utc>) -> BoundaryCheck {
        let mut result = BoundaryCheck::default();

        if self.next.is_some_and(|w| now >= w.start) {
            self.next = None;
            result.next_started = true;
        }
        if self
            .current
            .and_then(|w| w.end)
            .is_some_and(|end| now >= end)
        {
            self.current = None;
            result.current_ended = true;
        }
        result
    }
}
