//! Title search over the conversation list

use crate::models::Conversation;

/// Conversations whose title contains `query`, ignoring case
///
/// Keeps the input order. A blank query matches everything.
pub fn filter<'a>(records: &[&'a Conversation], query: &str) -> Vec<&'a Conversation> {
    if query.trim().is_empty() {
        return records.to_vec();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .copied()
        .filter(|c| c.title.to_lowercase().contains(&needle))
        .collect()
}
