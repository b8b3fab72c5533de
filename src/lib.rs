//! tomo-sidebar - headless conversation sidebar
//!
//! This library holds the state and behavior behind the conversation sidebar
//! of a chat front-end: an optimistic cache of conversations kept in sync
//! with the backend, the order rows are shown in, touch and pointer gesture
//! handling, transient notifications and navigation. A UI shell forwards raw
//! input events with explicit timestamps and renders what the controller
//! exposes.
//!
//! # Architecture
//!
//! - `api`: backend abstraction and its HTTP implementation
//! - `models`: conversation and user records
//! - `store`: optimistic conversation cache and session store
//! - `ordering`: row order policy
//! - `gesture`: tap / long-press / context-menu / rename state machine
//! - `notify`: single-slot auto-dismissing notifications
//! - `route`: front-end routes and the router
//! - `search`: title search
//! - `composer`: chat input Enter handling
//! - `thread`: message thread open states and loading indicator
//! - `codeblock`: code block download names and copy feedback
//! - `controller`: the sidebar itself, composing all of the above
//! - `config`, `error`, `cli`, `commands`: ambient plumbing and the CLI
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tomo_sidebar::{Config, HttpApi, SidebarController};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let api = Arc::new(HttpApi::new(&config.api)?);
//!     let mut sidebar = SidebarController::new(api, &config);
//!     sidebar.mount().await;
//!     for row in sidebar.rows() {
//!         println!("{} {}", row.id, row.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod codeblock;
pub mod commands;
pub mod composer;
pub mod config;
pub mod controller;
pub mod error;
pub mod gesture;
pub mod models;
pub mod notify;
pub mod ordering;
pub mod route;
pub mod search;
pub mod store;
pub mod thread;

// Re-export commonly used types
pub use api::{ConversationApi, HttpApi};
pub use config::Config;
pub use controller::{ActionOutcome, RowView, SidebarController};
pub use error::{Result, SidebarError};
pub use models::{Conversation, ConversationKind, User};
pub use route::Route;
