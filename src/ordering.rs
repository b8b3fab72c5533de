//! Visible order of the conversation list
//!
//! The order is never stored: it is recomputed from the record set each
//! time the list is rendered.
//!
//! 1. Starred before unstarred.
//! 2. Starred records by `starred_at`, newest first; a starred record
//!    without a timestamp goes after every starred record that has one.
//! 3. Everything else, and ties, by `created_at`, newest first.

use std::cmp::Ordering;

use crate::models::Conversation;

/// Total order over conversations used by the sidebar
pub fn compare(a: &Conversation, b: &Conversation) -> Ordering {
    b.starred
        .cmp(&a.starred)
        .then_with(|| {
            if a.starred && b.starred {
                match (a.starred_at, b.starred_at) {
                    (Some(x), Some(y)) => y.cmp(&x),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Sort `records` into display order
///
/// Stable: records with equal keys keep their relative input order.
pub fn order(records: &[Conversation]) -> Vec<&Conversation> {
    let mut sorted: Vec<&Conversation> = records.iter().collect();
    sorted.sort_by(|a, b| compare(a, b));
    sorted
}
