//! Client-side stores
//!
//! Two independent stores are injected into the controller rather than
//! living as globals:
//!
//! - [`ConversationStore`] -- optimistic mirror of the conversation list.
//! - [`SessionStore`] -- the signed-in user.
//!
//! Both have an explicit `mount` (initial fetch) and `unmount` (teardown).

pub mod conversations;
pub mod mutation;
pub mod session;

pub use conversations::ConversationStore;
pub use mutation::{Applied, Change, Compensation, Settlement};
pub use session::SessionStore;
