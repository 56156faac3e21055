/// Crawl phase definitions for tracking run progress
///
/// This module defines the phases a single crawl run moves through.
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Initial phase: the seed URL is being fetched
    Seeding,

    /// Fetches are in flight and new fetches may still be scheduled
    Running,

    /// No fetch is outstanding and nothing was newly scheduled since the last
    /// observation, but extractions in flight may still produce work
    Draining,

    /// Terminal: no fetch and no extraction outstanding
    Done,
}

impl CrawlPhase {
    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Staying in the same phase is always allowed. `Draining` may fall back to
    /// `Running` when a finishing extraction schedules more fetches.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        if *self == next {
            return true;
        }

        matches!(
            (self, next),
            (Self::Seeding, Self::Running)
                | (Self::Seeding, Self::Done)
                | (Self::Running, Self::Draining)
                | (Self::Running, Self::Done)
                | (Self::Draining, Self::Running)
                | (Self::Draining, Self::Done)
        )
    }

    /// Derives the phase of a run past seeding from one observation of pending work
    ///
    /// # Arguments
    ///
    /// * `fetches` - Outstanding fetches
    /// * `extractions` - Outstanding extractions
    /// * `newly_scheduled` - Whether any fetch was scheduled since the previous observation
    pub fn observe(fetches: usize, extractions: usize, newly_scheduled: bool) -> Self {
        if fetches == 0 && extractions == 0 {
            Self::Done
        } else if fetches == 0 && !newly_scheduled {
            Self::Draining
        } else {
            Self::Running
        }
    }

    /// Returns the lowercase name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
