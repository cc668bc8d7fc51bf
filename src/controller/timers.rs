//! Cancellable deferred actions keyed by category.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;

use crate::dataset::RegionId;

/// Category of a deferred action. At most one timer per category is pending.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// Wrong-guess feedback stops being visible.
    FeedbackFade,
    /// Wrong-guess feedback text is removed.
    FeedbackClear,
    /// A region's correct/wrong flash ends.
    Flash(RegionId),
    /// City markers start growing.
    MarkerReveal,
    /// City markers start accepting clicks.
    MarkersInteractive,
}

/// Handle for one scheduled timer.
///
/// Ids are never reused, so a stale handle can be checked for liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    id: TimerId,
    deadline: Duration,
}

/// A timer that has come due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired {
    /// What to do.
    pub kind: TimerKind,
    /// When it was due, which may be earlier than the tick that fired it.
    pub deadline: Duration,
}

/// Pending deferred actions; the latest schedule of a kind wins.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: BTreeMap<TimerKind, Pending>,
    next_id: u64,
}

impl Timers {
    /// Create an empty timer set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` at `deadline`, cancelling the pending timer of the same kind.
    pub fn schedule(&mut self, kind: TimerKind, deadline: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        if let Some(old) = self.pending.insert(kind.clone(), Pending { id, deadline }) {
            debug!(?kind, old = ?old.id, "timer replaced");
        }
        id
    }

    /// Cancel the pending timer of a kind. Returns whether one was pending.
    pub fn cancel(&mut self, kind: &TimerKind) -> bool {
        let cancelled = self.pending.remove(kind).is_some();
        if cancelled {
            debug!(?kind, "timer cancelled");
        }
        cancelled
    }

    /// Cancel a timer by handle, if it is still the pending one for its kind.
    pub fn cancel_id(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|_, p| p.id != id);
        before != self.pending.len()
    }

    /// Cancel everything.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            debug!(count = self.pending.len(), "all timers cancelled");
        }
        self.pending.clear();
    }

    /// Whether a handle still refers to a pending timer.
    #[must_use]
    pub fn is_live(&self, id: TimerId) -> bool {
        self.pending.values().any(|p| p.id == id)
    }

    /// Whether a kind has a pending timer.
    #[must_use]
    pub fn is_pending(&self, kind: &TimerKind) -> bool {
        self.pending.contains_key(kind)
    }

    /// Deadline of the pending timer of a kind.
    #[must_use]
    pub fn deadline(&self, kind: &TimerKind) -> Option<Duration> {
        self.pending.get(kind).map(|p| p.deadline)
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every timer due at `now`, earliest first.
    ///
    /// Timers with equal deadlines fire in scheduling order.
    pub fn take_due(&mut self, now: Duration) -> Vec<Fired> {
        let due: Vec<TimerKind> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(kind, _)| kind.clone())
            .collect();

        let mut fired: Vec<(Pending, TimerKind)> = due
            .into_iter()
            .filter_map(|kind| self.pending.remove(&kind).map(|p| (p, kind)))
            .collect();
        fired.sort_by_key(|(p, _)| (p.deadline, p.id));

        fired
            .into_iter()
            .map(|(p, kind)| Fired {
                kind,
                deadline: p.deadline,
            })
            .collect()
    }
}
