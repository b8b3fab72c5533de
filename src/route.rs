//! Front-end routes the sidebar navigates between

use std::sync::OnceLock;

use regex::Regex;

use crate::models::ConversationKind;

/// A page of the chat front-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`, a fresh chat
    Home,
    /// `/chat/{id}`
    Chat(String),
    /// `/image/{id}`
    Image(String),
    /// `/image`, new image generation
    ImageGeneration,
    /// `/realtime`
    Realtime,
    /// `/admin`, user management
    Admin,
    /// `/login`
    Login,
    /// Anything else the shell reports
    Other(String),
}

fn conversation_path() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^/(chat|image)/([^/]+)").expect("static regex is valid"))
}

impl Route {
    /// Page showing conversation `id` of the given kind
    pub fn conversation(kind: ConversationKind, id: &str) -> Self {
        match kind {
            ConversationKind::Chat => Route::Chat(id.to_string()),
            ConversationKind::Image => Route::Image(id.to_string()),
        }
    }

    /// Parse a path reported by the shell
    pub fn parse(path: &str) -> Self {
        if let Some(caps) = conversation_path().captures(path) {
            let id = caps[2].to_string();
            return if &caps[1] == "image" {
                Route::Image(id)
            } else {
                Route::Chat(id)
            };
        }
        match path {
            "" | "/" => Route::Home,
            "/image" | "/image/" => Route::ImageGeneration,
            "/realtime" => Route::Realtime,
            "/admin" => Route::Admin,
            "/login" => Route::Login,
            other => Route::Other(other.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Chat(id) => format!("/chat/{}", id),
            Route::Image(id) => format!("/image/{}", id),
            Route::ImageGeneration => "/image".to_string(),
            Route::Realtime => "/realtime".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::Login => "/login".to_string(),
            Route::Other(path) => path.clone(),
        }
    }

    /// Id of the conversation this page shows, if any
    pub fn conversation_id(&self) -> Option<&str> {
        match self {
            Route::Chat(id) | Route::Image(id) => Some(id),
            _ => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Current route plus the navigations requested so far
///
/// The shell performs the actual page change; the router only records
/// what was asked for so the controller can reason about the active
/// conversation.
#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Router {
    pub fn new(current: Route) -> Self {
        Self {
            current,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Id of the conversation currently open, if any
    pub fn active_conversation(&self) -> Option<&str> {
        self.current.conversation_id()
    }

    /// Record a navigation to `route`
    pub fn push(&mut self, route: Route) {
        tracing::debug!(route = %route, "Navigate");
        self.history.push(route.clone());
        self.current = route;
    }

    /// The shell reports that the page changed by other means
    pub fn set_current(&mut self, route: Route) {
        self.current = route;
    }

    /// Navigations requested through [`push`](Self::push), oldest first
    pub fn history(&self) -> &[Route] {
        &self.history
    }
}
