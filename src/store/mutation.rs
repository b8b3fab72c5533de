//! Receipts for optimistic changes
//!
//! Every mutation of the conversation cache is applied locally first and
//! returns an [`Applied`] receipt. Once the backend answers, the receipt is
//! settled: committed on success, compensated on failure. Whether a
//! failure actually undoes anything is decided when the change is applied
//! and carried in the receipt as a [`Compensation`].

use chrono::{DateTime, Utc};

/// A local change to the conversation cache
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Set the star flag of one conversation
    Star { id: String, starred: bool },
    /// Replace the title of one conversation
    Rename { id: String, title: String },
    /// Drop one conversation
    Remove { id: String },
    /// Drop every conversation
    RemoveAll,
}

impl Change {
    /// Id of the affected conversation, `None` for bulk changes
    pub fn id(&self) -> Option<&str> {
        match self {
            Change::Star { id, .. } | Change::Rename { id, .. } | Change::Remove { id } => {
                Some(id)
            }
            Change::RemoveAll => None,
        }
    }

    /// Whether the affected record is still in the cache afterwards and
    /// should be shown as pending
    pub(crate) fn marks_pending(&self) -> bool {
        matches!(self, Change::Star { .. } | Change::Rename { .. })
    }
}

/// What to do with a change if the backend rejects it
#[derive(Debug, Clone, PartialEq)]
pub enum Compensation {
    /// Put the star flag and its timestamp back
    RestoreStar {
        starred: bool,
        starred_at: Option<DateTime<Utc>>,
    },
    /// Leave the local change in place; the failure is only reported
    Keep,
}

/// Receipt for a change already applied to the cache
#[derive(Debug, Clone, PartialEq)]
#[must_use = "an applied change must be committed or compensated"]
pub struct Applied {
    pub(crate) change: Change,
    pub(crate) compensation: Compensation,
}

impl Applied {
    pub(crate) fn new(change: Change, compensation: Compensation) -> Self {
        Self {
            change,
            compensation,
        }
    }

    /// The change this receipt covers
    pub fn change(&self) -> &Change {
        &self.change
    }

    /// Whether a failure will undo the change
    pub fn is_reversible(&self) -> bool {
        !matches!(self.compensation, Compensation::Keep)
    }
}

/// How a receipt was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Backend accepted the change
    Committed,
    /// Backend rejected it and the local change was undone
    Compensated,
    /// Backend rejected it and the local change was kept
    Kept,
}
