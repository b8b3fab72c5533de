//! In-process fake backend for unit tests
//!
//! [`FakeApi`] keeps a conversation list and a session user in memory,
//! records every call it receives, and fails any operation that the test
//! marks with [`FakeApi::fail`]. Failing calls leave the fake's own state
//! untouched, mirroring a backend that rejected the request.
//!
//! # Example
//!
//! ```ignore
//! let api = FakeApi::with_conversations(vec![conv("a")]);
//! api.fail(ApiOp::Star);
//! assert!(api.set_starred("a", true).await.is_err());
//! assert_eq!(api.calls(), vec![ApiCall::SetStarred("a".into(), true)]);
//! ```

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::ConversationApi;
use crate::error::{Result, SidebarError};
use crate::models::{Conversation, User};

/// Operation selector used to script failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOp {
    List,
    Me,
    Star,
    Rename,
    Delete,
    DeleteAll,
    Logout,
}

/// A call observed by the fake, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    List,
    Me,
    SetStarred(String, bool),
    Rename(String, String),
    Delete(String),
    DeleteAll,
    Logout,
}

#[derive(Debug, Default)]
struct FakeState {
    conversations: Vec<Conversation>,
    user: Option<User>,
    failing: HashSet<ApiOp>,
    calls: Vec<ApiCall>,
}

/// In-memory [`ConversationApi`] for tests
#[derive(Debug, Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conversations(conversations: Vec<Conversation>) -> Self {
        let api = Self::new();
        api.state.lock().unwrap().conversations = conversations;
        api
    }

    pub fn set_user(&self, user: Option<User>) {
        self.state.lock().unwrap().user = user;
    }

    pub fn set_conversations(&self, conversations: Vec<Conversation>) {
        self.state.lock().unwrap().conversations = conversations;
    }

    /// Make every subsequent call of `op` fail with a 500
    pub fn fail(&self, op: ApiOp) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn recover(&self, op: ApiOp) {
        self.state.lock().unwrap().failing.remove(&op);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn remote_conversations(&self) -> Vec<Conversation> {
        self.state.lock().unwrap().conversations.clone()
    }

    fn record(&self, op: ApiOp, call: ApiCall) -> Result<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing.contains(&op) {
            return Err(SidebarError::Network {
                operation: format!("{:?}", op),
                status: 500,
            }
            .into());
        }
        Ok(state)
    }
}

#[async_trait]
impl ConversationApi for FakeApi {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let state = self.record(ApiOp::List, ApiCall::List)?;
        Ok(state.conversations.clone())
    }

    async fn current_user(&self) -> Result<Option<User>> {
        let state = self.record(ApiOp::Me, ApiCall::Me)?;
        Ok(state.user.clone())
    }

    async fn set_starred(&self, id: &str, starred: bool) -> Result<()> {
        let mut state = self.record(ApiOp::Star, ApiCall::SetStarred(id.to_string(), starred))?;
        if let Some(conv) = state.conversations.iter_mut().find(|c| c.id == id) {
            conv.starred = starred;
        }
        Ok(())
    }

    async fn rename(&self, id: &str, title: &str) -> Result<()> {
        let mut state = self.record(
            ApiOp::Rename,
            ApiCall::Rename(id.to_string(), title.to_string()),
        )?;
        if let Some(conv) = state.conversations.iter_mut().find(|c| c.id == id) {
            conv.title = title.to_string();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut state = self.record(ApiOp::Delete, ApiCall::Delete(id.to_string()))?;
        state.conversations.retain(|c| c.id != id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let mut state = self.record(ApiOp::DeleteAll, ApiCall::DeleteAll)?;
        state.conversations.clear();
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        let mut state = self.record(ApiOp::Logout, ApiCall::Logout)?;
        state.user = None;
        Ok(())
    }
}
