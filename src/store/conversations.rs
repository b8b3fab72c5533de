//! In-memory mirror of the remote conversation list

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::ConversationApi;
use crate::error::Result;
use crate::models::Conversation;
use crate::ordering;
use crate::store::mutation::{Applied, Change, Compensation, Settlement};

/// Conversation cache shared by the sidebar and the search dialog
///
/// Local mutations are synchronous and optimistic; they never wait for the
/// backend. The owner issues the network call and settles the returned
/// [`Applied`] receipt with [`commit`](Self::commit) or
/// [`compensate`](Self::compensate).
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chrono::{TimeZone, Utc};
/// use tomo_sidebar::config::ApiConfig;
/// use tomo_sidebar::store::{ConversationStore, Settlement};
/// use tomo_sidebar::{Conversation, ConversationKind, HttpApi};
///
/// let api = Arc::new(HttpApi::new(&ApiConfig::default()).unwrap());
/// let mut store = ConversationStore::new(api);
/// let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// store.replace_all(vec![Conversation::new("a", "Draft", ConversationKind::Chat, created)]);
///
/// let applied = store.set_starred("a", true, Utc::now()).unwrap();
/// assert!(store.get("a").unwrap().pending);
///
/// // The backend refused: the star goes back to what it was.
/// assert_eq!(store.compensate(applied), Settlement::Compensated);
/// let a = store.get("a").unwrap();
/// assert!(!a.starred);
/// assert!(!a.pending);
/// ```
#[derive(Debug)]
pub struct ConversationStore {
    api: Arc<dyn ConversationApi>,
    records: Vec<Conversation>,
    loading: bool,
    in_flight: HashMap<String, usize>,
}

impl ConversationStore {
    /// Create an empty store backed by `api`
    ///
    /// # Arguments
    ///
    /// * `api` - Backend used by [`mount`](Self::mount) and
    ///   [`refresh`](Self::refresh); mutations never call it
    pub fn new(api: Arc<dyn ConversationApi>) -> Self {
        Self {
            api,
            records: Vec::new(),
            loading: false,
            in_flight: HashMap::new(),
        }
    }

    /// Initial fetch when the sidebar appears
    pub async fn mount(&mut self) -> Result<()> {
        self.refresh().await
    }

    /// Drop everything when the sidebar goes away
    pub fn unmount(&mut self) {
        self.records.clear();
        self.in_flight.clear();
        self.loading = false;
    }

    /// Fetch the full list and replace the cache wholesale
    ///
    /// Responses are not coalesced: whichever one is applied last wins. On
    /// failure the cache is left as it was.
    pub async fn refresh(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.api.list_conversations().await;
        self.loading = false;

        match result {
            Ok(records) => {
                self.replace_all(records);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to fetch conversations: {:#}", e);
                Err(e)
            }
        }
    }

    /// Replace the cache with `records`, keeping one entry per id
    ///
    /// The last occurrence of a duplicated id wins outright: its contents
    /// and its position in arrival order replace the earlier entry's.
    pub fn replace_all(&mut self, records: Vec<Conversation>) {
        let mut slots: Vec<Option<Conversation>> = Vec::with_capacity(records.len());
        let mut index: HashMap<String, usize> = HashMap::new();

        for mut record in records {
            record.pending = self.in_flight.contains_key(&record.id);
            if let Some(earlier) = index.insert(record.id.clone(), slots.len()) {
                tracing::warn!(id = %record.id, "Duplicate conversation id in list, keeping last");
                slots[earlier] = None;
            }
            slots.push(Some(record));
        }

        let deduped: Vec<Conversation> = slots.into_iter().flatten().collect();
        tracing::debug!(count = deduped.len(), "Conversation cache replaced");
        self.records = deduped;
    }

    /// Whether a refresh is outstanding
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Records in arrival order
    pub fn list(&self) -> &[Conversation] {
        &self.records
    }

    /// Records in display order
    pub fn ordered(&self) -> Vec<&Conversation> {
        ordering::order(&self.records)
    }

    /// Cached record with `id`
    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.records.iter().find(|c| c.id == id)
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of cached conversations
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Apply `change` locally
    ///
    /// Returns `None` when the change targets an id that is not cached;
    /// nothing is modified in that case.
    pub fn apply(&mut self, change: Change, now: DateTime<Utc>) -> Option<Applied> {
        let compensation = match &change {
            Change::Star { id, starred } => {
                let record = self.records.iter_mut().find(|c| &c.id == id)?;
                let previous = Compensation::RestoreStar {
                    starred: record.starred,
                    starred_at: record.starred_at,
                };
                record.starred = *starred;
                record.starred_at = starred.then_some(now);
                previous
            }
            Change::Rename { id, title } => {
                let record = self.records.iter_mut().find(|c| &c.id == id)?;
                record.title = title.clone();
                Compensation::Keep
            }
            Change::Remove { id } => {
                let position = self.records.iter().position(|c| &c.id == id)?;
                self.records.remove(position);
                Compensation::Keep
            }
            Change::RemoveAll => {
                self.records.clear();
                Compensation::Keep
            }
        };

        if change.marks_pending() {
            if let Some(id) = change.id() {
                *self.in_flight.entry(id.to_string()).or_insert(0) += 1;
                self.set_pending(id, true);
            }
        }

        tracing::debug!(?change, "Applied optimistic change");
        Some(Applied::new(change, compensation))
    }

    /// Optimistically drop one conversation
    pub fn remove(&mut self, id: &str, now: DateTime<Utc>) -> Option<Applied> {
        self.apply(Change::Remove { id: id.to_string() }, now)
    }

    /// Optimistically drop every conversation
    pub fn remove_all(&mut self) -> Applied {
        self.records.clear();
        tracing::debug!("Applied optimistic change: remove all");
        Applied::new(Change::RemoveAll, Compensation::Keep)
    }

    /// Optimistically retitle one conversation
    pub fn rename(&mut self, id: &str, title: &str, now: DateTime<Utc>) -> Option<Applied> {
        self.apply(
            Change::Rename {
                id: id.to_string(),
                title: title.to_string(),
            },
            now,
        )
    }

    /// Optimistically star or unstar one conversation
    ///
    /// Starring stamps `starred_at` with `now`; unstarring clears it.
    pub fn set_starred(&mut self, id: &str, starred: bool, now: DateTime<Utc>) -> Option<Applied> {
        self.apply(
            Change::Star {
                id: id.to_string(),
                starred,
            },
            now,
        )
    }

    /// The backend accepted the change
    pub fn commit(&mut self, applied: Applied) -> Settlement {
        self.finish(&applied.change);
        Settlement::Committed
    }

    /// The backend rejected the change
    pub fn compensate(&mut self, applied: Applied) -> Settlement {
        self.finish(&applied.change);
        match (&applied.change, applied.compensation) {
            (
                Change::Star { id, .. },
                Compensation::RestoreStar {
                    starred,
                    starred_at,
                },
            ) => {
                if let Some(record) = self.records.iter_mut().find(|c| &c.id == id) {
                    record.starred = starred;
                    record.starred_at = starred_at;
                    tracing::debug!(%id, starred, "Compensated star change");
                }
                Settlement::Compensated
            }
            _ => Settlement::Kept,
        }
    }

    /// Settle by outcome: commit on success, compensate otherwise
    pub fn settle(&mut self, applied: Applied, succeeded: bool) -> Settlement {
        if succeeded {
            self.commit(applied)
        } else {
            self.compensate(applied)
        }
    }

    fn finish(&mut self, change: &Change) {
        if !change.marks_pending() {
            return;
        }
        let Some(id) = change.id() else {
            return;
        };
        let remaining = match self.in_flight.get_mut(id) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        };
        if remaining == 0 {
            self.in_flight.remove(id);
            self.set_pending(id, false);
        }
    }

    fn set_pending(&mut self, id: &str, pending: bool) {
        if let Some(record) = self.records.iter_mut().find(|c| c.id == id) {
            record.pending = pending;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{ApiOp, FakeApi};
    use crate::models::ConversationKind;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn conv(id: &str, created: i64) -> Conversation {
        Conversation::new(id, format!("title {}", id), ConversationKind::Chat, t(created))
    }

    fn store_with(records: Vec<Conversation>) -> ConversationStore {
        let mut store = ConversationStore::new(Arc::new(FakeApi::new()));
        store.replace_all(records);
        store
    }

    #[tokio::test]
    async fn test_mount_fetches_list() {
        let api = Arc::new(FakeApi::with_conversations(vec![conv("a", 1), conv("b", 2)]));
        let mut store = ConversationStore::new(api);
        store.mount().await.unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_cache() {
        let api = Arc::new(FakeApi::with_conversations(vec![conv("a", 1)]));
        let mut store = ConversationStore::new(api.clone());
        store.refresh().await.unwrap();

        api.set_conversations(vec![]);
        api.fail(ApiOp::List);
        assert!(store.refresh().await.is_err());
        assert_eq!(store.len(), 1);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let api = Arc::new(FakeApi::with_conversations(vec![conv("a", 1), conv("b", 2)]));
        let mut store = ConversationStore::new(api.clone());
        store.refresh().await.unwrap();

        api.set_conversations(vec![conv("c", 3)]);
        store.refresh().await.unwrap();
        let ids: Vec<&str> = store.list().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn test_unmount_clears() {
        let mut store = store_with(vec![conv("a", 1)]);
        store.unmount();
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_all_dedupes_last_wins() {
        let mut second = conv("a", 5);
        second.title = "second".to_string();
        let store = store_with(vec![conv("a", 1), conv("b", 2), second]);
        assert_eq!(store.len(), 2);
        let ids: Vec<&str> = store.list().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(store.get("a").unwrap().title, "second");
        assert_eq!(store.get("a").unwrap().created_at, t(5));
    }

    #[test]
    fn test_duplicate_position_follows_last_occurrence_in_ties() {
        // Equal sort keys: arrival order decides, and the duplicate arrives last.
        let store = store_with(vec![conv("a", 1), conv("b", 1), conv("a", 1)]);
        let ordered: Vec<&str> = store.ordered().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ordered, vec!["b", "a"]);
    }

    #[test]
    fn test_set_starred_stamps_and_clears_timestamp() {
        let mut store = store_with(vec![conv("a", 1)]);
        let applied = store.set_starred("a", true, t(50)).unwrap();
        assert!(store.get("a").unwrap().starred);
        assert_eq!(store.get("a").unwrap().starred_at, Some(t(50)));
        assert!(store.get("a").unwrap().pending);
        assert_eq!(store.commit(applied), Settlement::Committed);
        assert!(!store.get("a").unwrap().pending);

        let applied = store.set_starred("a", false, t(60)).unwrap();
        assert_eq!(store.get("a").unwrap().starred_at, None);
        let _ = store.commit(applied);
    }

    #[test]
    fn test_star_compensation_restores_prior_value() {
        let mut store = store_with(vec![conv("a", 1)]);
        let applied = store.set_starred("a", true, t(50)).unwrap();
        assert!(applied.is_reversible());
        assert_eq!(store.compensate(applied), Settlement::Compensated);

        let record = store.get("a").unwrap();
        assert!(!record.starred);
        assert_eq!(record.starred_at, None);
        assert!(!record.pending);
    }

    #[test]
    fn test_unstar_compensation_restores_original_timestamp() {
        let mut store = store_with(vec![conv("a", 1).with_starred_at(Some(t(10)))]);
        let applied = store.set_starred("a", false, t(50)).unwrap();
        let _ = store.compensate(applied);
        assert_eq!(store.get("a").unwrap().starred_at, Some(t(10)));
    }

    #[test]
    fn test_rename_is_kept_on_failure() {
        let mut store = store_with(vec![conv("a", 1)]);
        let applied = store.rename("a", "New", t(5)).unwrap();
        assert!(!applied.is_reversible());
        assert_eq!(store.compensate(applied), Settlement::Kept);
        assert_eq!(store.get("a").unwrap().title, "New");
        assert!(!store.get("a").unwrap().pending);
    }

    #[test]
    fn test_remove_and_remove_all() {
        let mut store = store_with(vec![conv("a", 1), conv("b", 2)]);
        let applied = store.remove("a", t(5)).unwrap();
        assert_eq!(store.compensate(applied), Settlement::Kept);
        assert!(store.get("a").is_none());

        let applied = store.remove_all();
        assert_eq!(applied.change(), &Change::RemoveAll);
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut store = store_with(vec![conv("a", 1)]);
        assert!(store.set_starred("zzz", true, t(1)).is_none());
        assert!(store.rename("zzz", "x", t(1)).is_none());
        assert!(store.remove("zzz", t(1)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_overlapping_changes_keep_pending_until_last_settles() {
        let mut store = store_with(vec![conv("a", 1)]);
        let first = store.set_starred("a", true, t(1)).unwrap();
        let second = store.set_starred("a", false, t(2)).unwrap();

        let _ = store.commit(first);
        assert!(store.get("a").unwrap().pending);
        let _ = store.commit(second);
        assert!(!store.get("a").unwrap().pending);
        assert!(!store.get("a").unwrap().starred);
    }

    #[test]
    fn test_pending_survives_refresh() {
        let mut store = store_with(vec![conv("a", 1)]);
        let applied = store.rename("a", "x", t(1)).unwrap();
        store.replace_all(vec![conv("a", 1)]);
        assert!(store.get("a").unwrap().pending);
        let _ = store.commit(applied);
        assert!(!store.get("a").unwrap().pending);
    }
}
