//! Pending work tracking
//!
//! Outstanding fetches and extractions are counted under one lock and published
//! through a `watch` channel, so an observer always sees both counters from the same
//! moment. Work is represented by [`WorkTicket`]s that decrement their counter when
//! dropped, including when the task holding them panics or is cancelled.
//!
//! Callers keep the ordering that makes joint-zero a safe completion signal:
//! a ticket for follow-up work is issued before the ticket of the work producing it
//! is dropped.

use std::sync::Arc;
use tokio::sync::watch;

/// The two kinds of tracked work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkKind {
    Fetch,
    Extraction,
}

/// Counters observed at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingSnapshot {
    /// Fetches scheduled and not yet finished
    pub fetches: usize,

    /// Extractions queued or running
    pub extractions: usize,

    /// Total fetches ever scheduled; only grows
    pub scheduled: u64,
}

impl PendingSnapshot {
    /// Returns true when no work of either kind is outstanding
    pub fn is_idle(&self) -> bool {
        self.fetches == 0 && self.extractions == 0
    }
}

/// Shared tracker for outstanding work
#[derive(Debug)]
pub struct PendingWork {
    state: watch::Sender<PendingSnapshot>,
}

impl PendingWork {
    /// Creates a tracker with no outstanding work
    pub fn new() -> Arc<Self> {
        let (state, _) = watch::channel(PendingSnapshot::default());
        Arc::new(Self { state })
    }

    /// Registers one unit of work; it stays outstanding until the ticket is dropped
    pub fn begin(self: &Arc<Self>, kind: WorkKind) -> WorkTicket {
        self.state.send_modify(|snapshot| match kind {
            WorkKind::Fetch => {
                snapshot.fetches += 1;
                snapshot.scheduled += 1;
            }
            WorkKind::Extraction => snapshot.extractions += 1,
        });

        WorkTicket {
            pending: Arc::clone(self),
            kind,
        }
    }

    fn finish(&self, kind: WorkKind) {
        self.state.send_modify(|snapshot| match kind {
            WorkKind::Fetch => snapshot.fetches = snapshot.fetches.saturating_sub(1),
            WorkKind::Extraction => {
                snapshot.extractions = snapshot.extractions.saturating_sub(1)
            }
        });
    }

    /// Returns the current counters
    pub fn snapshot(&self) -> PendingSnapshot {
        *self.state.borrow()
    }

    /// Subscribes to counter changes
    pub fn subscribe(&self) -> watch::Receiver<PendingSnapshot> {
        self.state.subscribe()
    }
}

/// One outstanding unit of work
///
/// Dropping the ticket marks the work finished.
#[derive(Debug)]
pub struct WorkTicket {
    pending: Arc<PendingWork>,
    kind: WorkKind,
}

impl Drop for WorkTicket {
    fn drop(&mut self) {
        self.pending.finish(self.kind);
    }
}
