//! Per-feed request sequencing.
//!
//! Every fetch is tagged with a number from a monotonic counter. A result is
//! applied only if its number is greater than the last one applied for the
//! same feed, so a slow response can never overwrite a fresher one.

use std::collections::HashMap;

/// A stream of results that replace each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    /// Timetable snapshot and live fetches share one feed.
    Timetable,
    /// Weekly schedule.
    Weekly,
    /// Weather conditions.
    Weather,
    /// ISY message list (any folder).
    IsyMessages,
    /// Opened ISY message.
    IsyDetail,
}

/// Sequence numbers handed out and accepted per feed.
#[derive(Debug, Default)]
pub struct Sequencer {
    next: u64,
    applied: HashMap<Feed, u64>,
}

impl Sequencer {
    /// Creates a sequencer with nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next sequence number for `feed`.
    ///
    /// Numbers are unique across feeds, which keeps log lines unambiguous.
    pub fn issue(&mut self, _feed: Feed) -> u64 {
        self.next += 1;
        self.next
    }

    /// Records `seq` as applied if it is newer than the last applied result.
    ///
    /// # Returns
    /// `false` if the result is stale and must be discarded.
    pub fn accept(&mut self, feed: Feed, seq: u64) -> bool {
        let last = self.applied.entry(feed).or_insert(0);
        if seq <= *last {
            return false;
        }
        *last = seq;
        true
    }

    /// Last applied sequence number for `feed` (0 if none).
    pub fn last_applied(&self, feed: Feed) -> u64 {
        self.applied.get(&feed).copied().unwrap_or(0)
    }
}
