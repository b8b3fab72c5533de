//! Conversation and session user records exchanged with the backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a conversation holds; decides where navigation goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    /// Text chat thread
    Chat,
    /// Image generation thread
    Image,
}

impl std::fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationKind::Chat => write!(f, "chat"),
            ConversationKind::Image => write!(f, "image"),
        }
    }
}

/// A single conversation as listed by `GET /api/conversations`
///
/// Field names follow the backend's JSON; `pending` is local only and is
/// never sent or expected on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Opaque id assigned by the backend
    #[serde(rename = "conversation_id")]
    pub id: String,
    /// Display title
    #[serde(rename = "alias")]
    pub title: String,
    /// Chat or image thread
    #[serde(rename = "type")]
    pub kind: ConversationKind,
    /// Creation time; default sort key
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Whether the user pinned this conversation
    #[serde(default)]
    pub starred: bool,
    /// When it was starred; `None` when unstarred or unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starred_at: Option<DateTime<Utc>>,
    /// Set while an optimistic mutation on this record is in flight
    #[serde(skip)]
    pub pending: bool,
}

impl Conversation {
    /// Build an unstarred conversation created and updated at `created_at`
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: ConversationKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            created_at,
            updated_at: created_at,
            starred: false,
            starred_at: None,
            pending: false,
        }
    }

    /// Mark as starred at `at` (builder style, mostly for fixtures)
    pub fn with_starred_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.starred = true;
        self.starred_at = at;
        self
    }
}

/// The signed-in user as returned by `GET /api/auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend user id
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Remaining billing balance
    #[serde(rename = "billing", default)]
    pub billing_balance: f64,
    /// Whether the user may open the admin page
    #[serde(rename = "admin", default)]
    pub is_admin: bool,
}

impl User {
    /// Single uppercase letter for the avatar fallback
    pub fn initials(&self) -> String {
        self.name
            .chars()
            .chain(self.email.chars())
            .find(|c| c.is_alphanumeric())
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_conversation_deserializes_backend_shape() {
        let json = r#"{
            "conversation_id": "c1",
            "alias": "Trip planning",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-02T10:00:00Z",
            "starred": true,
            "starred_at": "2024-05-03T10:00:00Z",
            "type": "image"
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conv.id, "c1");
        assert_eq!(conv.title, "Trip planning");
        assert_eq!(conv.kind, ConversationKind::Image);
        assert!(conv.starred);
        assert_eq!(
            conv.starred_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 3, 10, 0, 0).unwrap())
        );
        assert!(!conv.pending);
    }

    #[test]
    fn test_conversation_missing_star_fields_default() {
        let json = r#"{
            "conversation_id": "c2",
            "alias": "Hello",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
            "type": "chat"
        }"#;
        let conv: Conversation = serde_json::from_str(json).unwrap();
        assert!(!conv.starred);
        assert_eq!(conv.starred_at, None);
    }

    #[test]
    fn test_pending_is_never_serialized() {
        let mut conv = Conversation::new(
            "c3",
            "x",
            ConversationKind::Chat,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        conv.pending = true;
        let value = serde_json::to_value(&conv).unwrap();
        assert!(value.get("pending").is_none());
        assert_eq!(value["conversation_id"], "c3");
        assert_eq!(value["type"], "chat");
    }

    #[test]
    fn test_user_wire_names() {
        let json = r#"{"id":"u1","name":"ana","email":"ana@example.org","billing":12.5,"admin":true}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.billing_balance, 12.5);
        assert!(user.is_admin);
        assert_eq!(user.initials(), "A");
    }

    #[test]
    fn test_user_initials_fallbacks() {
        let mut user = User {
            id: "u2".to_string(),
            name: String::new(),
            email: "zed@example.org".to_string(),
            billing_balance: 0.0,
            is_admin: false,
        };
        assert_eq!(user.initials(), "Z");
        user.email = String::new();
        assert_eq!(user.initials(), "?");
    }
}
