//! Remote conversation store abstraction
//!
//! This module defines the [`ConversationApi`] trait through which the
//! stores and the controller reach the chat/auth backend. Concrete
//! implementations live in submodules:
//!
//! - [`http::HttpApi`] -- REST client over `reqwest`.
//! - [`fake::FakeApi`] -- in-process fake with scriptable failures
//!   (cfg(test) only).
//!
//! # Contract
//!
//! Every mutating call resolves to `Ok(())` on a 2xx response and to an
//! error for anything else; callers do not distinguish status codes. The
//! session lookup is the exception: a non-2xx answer means "anonymous" and
//! resolves to `Ok(None)`.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Conversation, User};

/// Abstraction over the backend that owns conversations and sessions.
///
/// Used polymorphically through `Arc<dyn ConversationApi>` so the
/// controller can be driven by [`http::HttpApi`] in production and by a
/// fake in tests.
#[async_trait]
pub trait ConversationApi: Send + Sync + std::fmt::Debug {
    /// `GET /api/conversations`
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// `GET /api/auth/me`; `Ok(None)` when there is no session
    async fn current_user(&self) -> Result<Option<User>>;

    /// `PUT /api/conversations/{id}/star` with `{"starred": bool}`
    async fn set_starred(&self, id: &str, starred: bool) -> Result<()>;

    /// `PUT /api/conversations/{id}/rename` with `{"alias": title}`
    async fn rename(&self, id: &str, title: &str) -> Result<()>;

    /// `DELETE /api/conversations/{id}`
    async fn delete(&self, id: &str) -> Result<()>;

    /// `DELETE /api/conversations/all`
    async fn delete_all(&self) -> Result<()>;

    /// `POST /api/auth/logout` with `{}`
    async fn logout(&self) -> Result<()>;
}

pub mod http;

#[cfg(test)]
pub mod fake;

pub use http::HttpApi;
