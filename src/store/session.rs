//! Current session user

use std::sync::Arc;

use crate::api::ConversationApi;
use crate::models::User;

/// Holds the signed-in user, if any
///
/// A failed or rejected lookup is not an error: the session is simply
/// anonymous until the next refresh.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tomo_sidebar::config::ApiConfig;
/// use tomo_sidebar::store::SessionStore;
/// use tomo_sidebar::HttpApi;
///
/// # tokio_test::block_on(async {
/// let mut config = ApiConfig::default();
/// config.base_url = "http://127.0.0.1:9".to_string();
/// config.timeout_seconds = 1;
/// let mut session = SessionStore::new(Arc::new(HttpApi::new(&config).unwrap()));
///
/// // Nobody answers: anonymous, not an error.
/// assert!(session.refresh().await.is_none());
/// assert!(!session.is_admin());
/// # });
/// ```
#[derive(Debug)]
pub struct SessionStore {
    api: Arc<dyn ConversationApi>,
    user: Option<User>,
    loading: bool,
}

impl SessionStore {
    /// Create an anonymous session backed by `api`
    ///
    /// # Arguments
    ///
    /// * `api` - Backend asked for the current user
    pub fn new(api: Arc<dyn ConversationApi>) -> Self {
        Self {
            api,
            user: None,
            loading: false,
        }
    }

    /// Initial lookup when the sidebar appears
    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    /// Forget the user and any lookup state
    pub fn unmount(&mut self) {
        self.clear();
        self.loading = false;
    }

    /// Look the session up again
    pub async fn refresh(&mut self) -> Option<&User> {
        self.loading = true;
        let result = self.api.current_user().await;
        self.loading = false;

        self.user = match result {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Failed to fetch user, continuing anonymously: {:#}", e);
                None
            }
        };
        match &self.user {
            Some(user) => tracing::debug!(user_id = %user.id, "Session refreshed"),
            None => tracing::debug!("Session is anonymous"),
        }
        self.user.as_ref()
    }

    /// Forget the user (logout)
    pub fn clear(&mut self) {
        self.user = None;
    }

    /// Signed-in user, `None` when anonymous
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the signed-in user may manage users
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }
}
