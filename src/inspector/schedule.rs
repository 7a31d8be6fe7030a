//! Single-flight scheduling for the periodic scan
//!
//! The scan is triggered by a timer and by document-changed notifications.
//! There is no cancellation and no queue: one scan runs to completion, and
//! at most one follow-up pass is owed if the document was dirtied while the
//! scan was in flight.

use std::sync::{Mutex, PoisonError};

/// Scheduler phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scanning,
}

#[derive(Debug)]
struct Flags {
    state: SchedulerState,
    dirty: bool,
}

/// Explicit `{Idle, Scanning}` state machine with a pending-rescan flag
///
/// Usage: call [`mark_dirty`](Self::mark_dirty) whenever the document
/// changes; on each timer tick call [`try_begin`](Self::try_begin) and, if
/// it returns true, run the scan and then call [`finish`](Self::finish).
/// A true return from `finish` means the document changed mid-scan and one
/// more pass is owed.
#[derive(Debug)]
pub struct ScanScheduler {
    flags: Mutex<Flags>,
}

impl ScanScheduler {
    pub fn new() -> Self {
        Self {
            flags: Mutex::new(Flags {
                state: SchedulerState::Idle,
                dirty: false,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Flags> {
        self.flags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record that the source text changed since the last scan
    pub fn mark_dirty(&self) {
        self.lock().dirty = true;
    }

    pub fn state(&self) -> SchedulerState {
        self.lock().state
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().dirty
    }

    /// Try to start a scan. Returns false when there is nothing to do or a
    /// scan is already in flight.
    pub fn try_begin(&self) -> bool {
        let mut flags = self.lock();
        if flags.state == SchedulerState::Scanning {
            tracing::trace!("scan already in flight, skipping tick");
            return false;
        }
        if !flags.dirty {
            return false;
        }
        flags.dirty = false;
        flags.state = SchedulerState::Scanning;
        true
    }

    /// End the in-flight scan. Returns true when another pass is owed.
    pub fn finish(&self) -> bool {
        let mut flags = self.lock();
        flags.state = SchedulerState::Idle;
        flags.dirty
    }
}

impl Default for ScanScheduler {
    fn default() -> Self {
        Self::new()
    }
}
