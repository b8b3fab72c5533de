//! Sidebar controller
//!
//! Composes the conversation cache, the session store, the gesture state
//! machine, the notification slot and the router into the behavior of the
//! conversation sidebar. Every user action follows the same shape: apply
//! the change locally, call the backend, then commit or compensate. Failures
//! never propagate to the caller; they end up as a notification and an
//! [`ActionOutcome`].

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::api::ConversationApi;
use crate::config::Config;
use crate::error::{Result, SidebarError};
use crate::gesture::{
    ContextMenu, Disambiguator, GestureEffect, MenuAction, Point, Rename, RowState, TouchEnd,
};
use crate::models::{Conversation, ConversationKind, User};
use crate::notify::{Notification, Notifier};
use crate::route::{Route, Router};
use crate::search;
use crate::store::{Applied, ConversationStore, SessionStore, Settlement};

const NOT_FOUND_MESSAGE: &str = "Conversation does not exist.";

/// What became of a user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Applied locally and accepted by the backend
    Committed,
    /// A local interaction began (the title editor opened); nothing was
    /// sent to the backend yet
    Started,
    /// Backend rejected it; the local change was undone
    Compensated,
    /// Backend rejected it; the local change stays
    Kept,
    /// Nothing was changed (unknown id, blank input, not allowed)
    Aborted,
}

impl From<Settlement> for ActionOutcome {
    fn from(settlement: Settlement) -> Self {
        match settlement {
            Settlement::Committed => ActionOutcome::Committed,
            Settlement::Compensated => ActionOutcome::Compensated,
            Settlement::Kept => ActionOutcome::Kept,
        }
    }
}

/// Bulk actions that need an explicit confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    DeleteAll,
    Logout,
}

/// Open confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub kind: ConfirmKind,
    pub message: &'static str,
}

impl ConfirmDialog {
    fn new(kind: ConfirmKind) -> Self {
        let message = match kind {
            ConfirmKind::DeleteAll => "Are you sure you want to delete all conversations?",
            ConfirmKind::Logout => "Are you sure you want to logout?",
        };
        Self { kind, message }
    }
}

/// One rendered row of the conversation list
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: String,
    pub title: String,
    pub kind: ConversationKind,
    pub starred: bool,
    pub pending: bool,
    pub active: bool,
    pub state: RowState,
}

/// A star toggle that has been applied locally and awaits the backend
#[derive(Debug)]
#[must_use = "finish the toggle once the backend answers"]
pub struct StarToggle {
    id: String,
    starred: bool,
    applied: Applied,
}

impl StarToggle {
    /// Conversation being toggled
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The value that was applied locally and sent to the backend
    pub fn starred(&self) -> bool {
        self.starred
    }
}

/// Headless conversation sidebar
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tomo_sidebar::config::Config;
/// use tomo_sidebar::{HttpApi, Route, SidebarController};
///
/// # tokio_test::block_on(async {
/// let mut config = Config::default();
/// config.api.base_url = "http://127.0.0.1:9".to_string();
/// config.api.timeout_seconds = 1;
/// let api = Arc::new(HttpApi::new(&config.api).unwrap());
///
/// let mut sidebar = SidebarController::new(api, &config);
/// sidebar.mount().await;
///
/// // Unreachable backend: empty list, anonymous session, still usable.
/// assert!(sidebar.rows().is_empty());
/// sidebar.new_chat();
/// assert_eq!(sidebar.route(), &Route::Home);
/// # });
/// ```
#[derive(Debug)]
pub struct SidebarController {
    api: Arc<dyn ConversationApi>,
    conversations: ConversationStore,
    session: SessionStore,
    gestures: Disambiguator,
    notifier: Notifier,
    router: Router,
    dialog: Option<ConfirmDialog>,
}

impl SidebarController {
    /// Build a controller over `api`; nothing is fetched until
    /// [`mount`](Self::mount)
    pub fn new(api: Arc<dyn ConversationApi>, config: &Config) -> Self {
        Self {
            conversations: ConversationStore::new(api.clone()),
            session: SessionStore::new(api.clone()),
            gestures: Disambiguator::new(config.gestures.clone()),
            notifier: Notifier::new(config.notifications.dismiss_after()),
            router: Router::default(),
            dialog: None,
            api,
        }
    }

    /// Fetch the conversation list and the session user together
    pub async fn mount(&mut self) {
        let (conversations, _) =
            futures::join!(self.conversations.mount(), self.session.mount());
        if conversations.is_err() {
            tracing::warn!("Sidebar mounted without a conversation list");
        }
        tracing::info!(
            conversations = self.conversations.len(),
            signed_in = self.session.user().is_some(),
            "Sidebar mounted"
        );
    }

    /// Tear both stores down and forget transient UI state
    pub fn unmount(&mut self) {
        self.conversations.unmount();
        self.session.unmount();
        self.gestures.reset();
        self.notifier.dismiss();
        self.dialog = None;
    }

    /// Start over as if the page had been reloaded
    pub async fn reload(&mut self) {
        self.unmount();
        self.mount().await;
    }

    /// Re-fetch the conversation list only
    pub async fn refresh_conversations(&mut self) -> Result<()> {
        self.conversations.refresh().await
    }

    /// Re-fetch the session user only
    pub async fn refresh_user(&mut self) -> Option<&User> {
        self.session.refresh().await
    }

    // ---------------------------------------------------------------------
    // Read side
    // ---------------------------------------------------------------------

    /// Whether the first conversation fetch is still running
    pub fn is_loading(&self) -> bool {
        self.conversations.is_loading()
    }

    /// Signed-in user, `None` when anonymous
    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    /// The conversation cache in arrival order
    pub fn conversations(&self) -> &ConversationStore {
        &self.conversations
    }

    /// Page currently shown
    pub fn route(&self) -> &Route {
        self.router.current()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Confirmation dialog waiting for an answer
    pub fn dialog(&self) -> Option<&ConfirmDialog> {
        self.dialog.as_ref()
    }

    /// Open context menu, if any
    pub fn menu(&self) -> Option<&ContextMenu> {
        self.gestures.menu()
    }

    /// Row whose title is being edited and its draft
    pub fn renaming(&self) -> Option<&Rename> {
        self.gestures.renaming()
    }

    /// Notification still on screen at `now`
    pub fn notification(&self, now: Instant) -> Option<&Notification> {
        self.notifier.visible(now)
    }

    /// The list as it should be drawn
    pub fn rows(&self) -> Vec<RowView> {
        self.to_rows(self.conversations.ordered())
    }

    /// Rows whose title contains `query` (search dialog)
    pub fn search(&self, query: &str) -> Vec<RowView> {
        let ordered = self.conversations.ordered();
        self.to_rows(search::filter(&ordered, query))
    }

    fn to_rows(&self, records: Vec<&Conversation>) -> Vec<RowView> {
        let active = self.router.active_conversation();
        records
            .into_iter()
            .map(|c| RowView {
                id: c.id.clone(),
                title: c.title.clone(),
                kind: c.kind,
                starred: c.starred,
                pending: c.pending,
                active: active == Some(c.id.as_str()),
                state: self.gestures.row_state(&c.id),
            })
            .collect()
    }

    /// The shell reports the page it is showing
    pub fn set_route(&mut self, path: &str) {
        self.router.set_current(Route::parse(path));
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    /// Open conversation `id`
    ///
    /// Returns false, with a notification, when the id is not cached.
    pub fn navigate(&mut self, id: &str, now: Instant) -> bool {
        let Some(conv) = self.conversations.get(id) else {
            tracing::warn!(%id, "Navigation to unknown conversation");
            self.notifier.error(NOT_FOUND_MESSAGE, now);
            return false;
        };
        let route = Route::conversation(conv.kind, id);
        self.router.push(route);
        true
    }

    /// Mouse click on a row; ignored on the row being renamed
    pub fn click(&mut self, id: &str, now: Instant) -> bool {
        if self.gestures.is_renaming(id) {
            return false;
        }
        self.navigate(id, now)
    }

    /// "New chat" button
    pub fn new_chat(&mut self) {
        self.router.push(Route::Home);
    }

    pub fn open_realtime(&mut self) {
        self.router.push(Route::Realtime);
    }

    pub fn open_image_generation(&mut self) {
        self.router.push(Route::ImageGeneration);
    }

    /// User management; only offered to admins
    pub fn open_admin(&mut self) -> bool {
        if !self.session.is_admin() {
            tracing::debug!("Admin page requested without admin session");
            return false;
        }
        self.router.push(Route::Admin);
        true
    }

    // ---------------------------------------------------------------------
    // Gestures
    // ---------------------------------------------------------------------

    /// Finger down on row `id`; closes any open menu
    ///
    /// # Arguments
    ///
    /// * `id` - Row under the finger
    /// * `at` - Page coordinates where the menu would open
    /// * `now` - Event time
    pub fn touch_start(&mut self, id: &str, at: Point, now: Instant) {
        self.gestures.touch_start(id, at, now);
    }

    /// Finger moved; cancels the long-press
    pub fn touch_move(&mut self, now: Instant) {
        self.gestures.touch_move(now);
    }

    /// Finger lifted; navigates on a tap
    ///
    /// The shell must suppress the event's default action when this returns
    /// [`TouchEnd::Consumed`].
    pub fn touch_end(&mut self, id: &str, now: Instant) -> TouchEnd {
        let outcome = self.gestures.touch_end(id, now);
        if let TouchEnd::Navigate(target) = &outcome {
            let target = target.clone();
            self.navigate(&target, now);
        }
        outcome
    }

    /// Advance timers: long-press, notification expiry
    ///
    /// Returns the effects the shell must perform. Calling it right after
    /// any event delivers that event's effects without delay.
    pub fn tick(&mut self, now: Instant) -> Vec<GestureEffect> {
        self.notifier.tick(now);
        self.gestures.tick(now)
    }

    /// Desktop context-menu event on row `id`
    pub fn right_click(&mut self, id: &str, at: Point) -> bool {
        self.gestures.context_menu(id, at)
    }

    /// Click anywhere in the document
    pub fn outside_click(&mut self, now: Instant) -> bool {
        self.gestures.outside_click(now)
    }

    /// Escape key: close the menu and abandon any rename
    pub fn escape(&mut self) {
        self.gestures.escape();
    }

    /// Keystroke in the title field
    pub fn set_rename_draft(&mut self, draft: &str) {
        self.gestures.set_rename_draft(draft);
    }

    /// Pick an entry from the open context menu
    ///
    /// Star and Delete settle like [`toggle_star`](Self::toggle_star) and
    /// [`delete`](Self::delete). Rename only opens the title editor and
    /// returns [`ActionOutcome::Started`]; the backend is called when the
    /// draft is submitted.
    ///
    /// # Arguments
    ///
    /// * `action` - Entry picked by the user
    /// * `now` - Event time, used for notifications
    pub async fn menu_action(&mut self, action: MenuAction, now: Instant) -> ActionOutcome {
        let Some(id) = self.gestures.take_menu_target() else {
            tracing::debug!(?action, "Menu action without an open menu");
            return ActionOutcome::Aborted;
        };

        match action {
            MenuAction::Star => self.toggle_star(&id, now).await,
            MenuAction::Rename => {
                let Some(title) = self.conversations.get(&id).map(|c| c.title.clone()) else {
                    self.notifier.error(NOT_FOUND_MESSAGE, now);
                    return ActionOutcome::Aborted;
                };
                self.gestures.begin_rename(&id, &title);
                ActionOutcome::Started
            }
            MenuAction::Delete => self.delete(&id, now).await,
        }
    }

    /// Enter in the title field
    pub async fn submit_rename(&mut self, now: Instant) -> ActionOutcome {
        match self.gestures.submit_rename() {
            Some((id, title)) => self.rename(&id, &title, now).await,
            None => ActionOutcome::Aborted,
        }
    }

    /// Title field lost focus
    pub async fn blur_rename(&mut self, now: Instant) -> ActionOutcome {
        match self.gestures.blur_rename() {
            Some((id, title)) => self.rename(&id, &title, now).await,
            None => ActionOutcome::Aborted,
        }
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Flip the star locally; the backend call is made by the caller
    pub fn begin_toggle_star(&mut self, id: &str, now: Instant) -> Option<StarToggle> {
        let Some(current) = self.conversations.get(id).map(|c| c.starred) else {
            tracing::warn!(%id, "Star toggle on unknown conversation");
            self.notifier.error(NOT_FOUND_MESSAGE, now);
            return None;
        };
        let starred = !current;
        let applied = self.conversations.set_starred(id, starred, Utc::now())?;
        Some(StarToggle {
            id: id.to_string(),
            starred,
            applied,
        })
    }

    /// Settle a star toggle with the backend's answer
    pub fn finish_toggle_star(
        &mut self,
        toggle: StarToggle,
        result: &Result<()>,
        now: Instant,
    ) -> ActionOutcome {
        let settlement = self.conversations.settle(toggle.applied, result.is_ok());
        if let Err(e) = result {
            tracing::warn!(id = %toggle.id, "Failed to toggle star: {:#}", e);
            self.notifier.error("Failed to toggle star.", now);
        }
        settlement.into()
    }

    /// Star or unstar `id`, undoing the flip if the backend refuses
    pub async fn toggle_star(&mut self, id: &str, now: Instant) -> ActionOutcome {
        let Some(toggle) = self.begin_toggle_star(id, now) else {
            return ActionOutcome::Aborted;
        };
        let result = self.api.set_starred(&toggle.id, toggle.starred).await;
        self.finish_toggle_star(toggle, &result, now)
    }

    /// Retitle `id`
    ///
    /// The new title stays even if the backend refuses; the failure is
    /// only reported.
    pub async fn rename(&mut self, id: &str, title: &str, now: Instant) -> ActionOutcome {
        if title.trim().is_empty() {
            let err = SidebarError::InvalidInput("title is blank".to_string());
            tracing::debug!(%id, "Rename rejected: {}", err);
            return ActionOutcome::Aborted;
        }

        let Some(applied) = self.conversations.rename(id, title, Utc::now()) else {
            tracing::warn!(%id, "Rename of unknown conversation");
            self.notifier.error(NOT_FOUND_MESSAGE, now);
            return ActionOutcome::Aborted;
        };
        if self.gestures.is_renaming(id) {
            self.gestures.cancel_rename();
        }

        let result = self.api.rename(id, title).await;
        let settlement = self.conversations.settle(applied, result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(%id, "Failed to rename conversation: {:#}", e);
            self.notifier.error("Failed to rename conversation.", now);
        }
        settlement.into()
    }

    /// Delete `id`; leaves its page if it was open
    pub async fn delete(&mut self, id: &str, now: Instant) -> ActionOutcome {
        let Some(applied) = self.conversations.remove(id, Utc::now()) else {
            tracing::warn!(%id, "Delete of unknown conversation");
            self.notifier.error(NOT_FOUND_MESSAGE, now);
            return ActionOutcome::Aborted;
        };
        if self.gestures.is_renaming(id) {
            self.gestures.cancel_rename();
        }
        if self.router.active_conversation() == Some(id) {
            self.router.push(Route::Home);
        }

        let result = self.api.delete(id).await;
        let settlement = self.conversations.settle(applied, result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(%id, "Failed to delete conversation: {:#}", e);
            self.notifier.error("Failed to delete conversation.", now);
        }
        settlement.into()
    }

    // ---------------------------------------------------------------------
    // Confirmed bulk actions
    // ---------------------------------------------------------------------

    /// "Delete all conversations": ask first
    pub fn request_delete_all(&mut self) {
        self.dialog = Some(ConfirmDialog::new(ConfirmKind::DeleteAll));
    }

    /// "Logout": ask first
    pub fn request_logout(&mut self) {
        self.dialog = Some(ConfirmDialog::new(ConfirmKind::Logout));
    }

    /// Dismiss the dialog without running its action
    pub fn cancel_dialog(&mut self) {
        self.dialog = None;
    }

    /// Run the action behind the open dialog and close it
    pub async fn confirm_dialog(&mut self, now: Instant) -> ActionOutcome {
        let Some(dialog) = self.dialog.take() else {
            return ActionOutcome::Aborted;
        };
        match dialog.kind {
            ConfirmKind::DeleteAll => self.delete_all(now).await,
            ConfirmKind::Logout => self.logout(now).await,
        }
    }

    async fn delete_all(&mut self, now: Instant) -> ActionOutcome {
        let applied = self.conversations.remove_all();
        self.gestures.reset();
        self.router.push(Route::Home);

        let result = self.api.delete_all().await;
        let settlement = self.conversations.settle(applied, result.is_ok());
        if let Err(e) = &result {
            tracing::warn!("Failed to delete conversations: {:#}", e);
            self.notifier.error("Failed to delete conversations.", now);
        }
        settlement.into()
    }

    async fn logout(&mut self, now: Instant) -> ActionOutcome {
        match self.api.logout().await {
            Ok(()) => {
                self.session.clear();
                self.router.push(Route::Login);
                tracing::info!("Logged out");
                ActionOutcome::Committed
            }
            Err(e) => {
                tracing::warn!("Failed to logout: {:#}", e);
                self.notifier.error("Failed to logout.", now);
                ActionOutcome::Kept
            }
        }
    }
}
