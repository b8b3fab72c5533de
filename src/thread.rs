//! Message thread presentation state
//!
//! A chat thread is shown as sections: one user message followed by the
//! assistant messages that answered it. Every collapsible block in the
//! thread (a tool call, a list of related questions) has an open state.
//! Blocks nobody has touched follow a default: tool calls start open, and
//! any other block starts open only if it belongs to the latest exchange.
//!
//! The thread also decides when to show a loading indicator and when to
//! render the tool call announced by the stream before any assistant
//! message exists (the "manual" tool section).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key of the tool section rendered from stream data
pub const MANUAL_TOOL_CALL_ID: &str = "manual-tool-call";

/// Suffix of the related-questions block attached to a message
pub const RELATED_SUFFIX: &str = "-related";

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Data,
}

/// One message of the thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: String,
}

impl Message {
    /// Creates a message
    ///
    /// # Arguments
    ///
    /// * `id` - Message id, also the key of its collapsible blocks
    /// * `role` - Author
    /// * `content` - Text
    ///
    /// # Examples
    ///
    /// ```
    /// use tomo_sidebar::thread::{Message, Role};
    ///
    /// let msg = Message::new("m1", Role::User, "What is a borrow?");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn new(id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
        }
    }
}

/// A user message and the assistant messages answering it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSection {
    pub id: String,
    pub user_message: Message,
    #[serde(default)]
    pub assistant_messages: Vec<Message>,
}

/// Tool call announced by the stream's data channel
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub tool_call_id: String,
    pub tool_name: String,
    /// Parsed arguments; `None` when absent or not valid JSON
    pub args: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolCallData {
    tool_call_id: String,
    tool_name: String,
    #[serde(default)]
    args: Option<String>,
}

/// The tool call carried by the last data item, if that item is one
///
/// Data items look like `{"type": "tool_call", "data": {"toolCallId": ...,
/// "toolName": ..., "args": "<json string>"}}`. Only the last item counts.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tomo_sidebar::thread::last_tool_call;
///
/// let data = vec![json!({
///     "type": "tool_call",
///     "data": { "toolCallId": "t1", "toolName": "search", "args": "{\"q\":\"rust\"}" }
/// })];
/// let call = last_tool_call(&data).unwrap();
/// assert_eq!(call.tool_name, "search");
/// assert_eq!(call.args, Some(json!({ "q": "rust" })));
/// ```
pub fn last_tool_call(data: &[Value]) -> Option<ToolCall> {
    let last = data.last()?;
    if last.get("type").and_then(Value::as_str) != Some("tool_call") {
        return None;
    }

    let raw = last.get("data")?.clone();
    let parsed: ToolCallData = match serde_json::from_value(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Malformed tool call data: {}", e);
            return None;
        }
    };

    let args = match parsed.args.as_deref().filter(|a| !a.is_empty()) {
        Some(raw) => match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(tool = %parsed.tool_name, "Tool call arguments are not JSON: {}", e);
                None
            }
        },
        None => None,
    };

    Some(ToolCall {
        tool_call_id: parsed.tool_call_id,
        tool_name: parsed.tool_name,
        args,
    })
}

/// Whether the thread shows its loading indicator
///
/// Only while a reply is loading and the latest section has no assistant
/// message yet.
pub fn show_loading(sections: &[ChatSection], is_loading: bool) -> bool {
    is_loading
        && sections
            .last()
            .is_some_and(|s| s.assistant_messages.is_empty())
}

/// The tool call to render on its own below the thread
pub fn manual_tool_section(
    sections: &[ChatSection],
    data: &[Value],
    is_loading: bool,
) -> Option<ToolCall> {
    if !show_loading(sections, is_loading) {
        return None;
    }
    last_tool_call(data)
}

/// Open state of every collapsible block in a thread
///
/// # Examples
///
/// ```
/// use tomo_sidebar::thread::{ChatSection, Message, Role, SectionStates};
///
/// let sections = vec![ChatSection {
///     id: "s1".to_string(),
///     user_message: Message::new("u1", Role::User, "hi"),
///     assistant_messages: vec![Message::new("a1", Role::Assistant, "hello")],
/// }];
///
/// let mut states = SectionStates::default();
/// assert!(states.is_open(&sections, "a1-related"));
///
/// states.set_open("a1-related", false);
/// assert!(!states.is_open(&sections, "a1-related"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SectionStates {
    open: HashMap<String, bool>,
}

impl SectionStates {
    /// The section list changed
    ///
    /// When the latest section starts with a user message every explicit
    /// choice is forgotten and only the manual tool section is held open.
    pub fn sections_changed(&mut self, sections: &[ChatSection]) {
        let Some(last) = sections.last() else {
            return;
        };
        if last.user_message.role == Role::User {
            self.open.clear();
            self.open.insert(MANUAL_TOOL_CALL_ID.to_string(), true);
            tracing::debug!(section = %last.id, "Section open states reset");
        }
    }

    /// The user expanded or collapsed block `id`
    pub fn set_open(&mut self, id: &str, open: bool) {
        self.open.insert(id.to_string(), open);
    }

    /// Whether block `id` is expanded
    ///
    /// An explicit choice wins. Otherwise ids containing `call` are open,
    /// and any other block is open when its message (with a trailing
    /// `-related` removed) sits at or after the last user message. Blocks
    /// of unknown messages are closed.
    ///
    /// # Arguments
    ///
    /// * `sections` - The thread as currently shown
    /// * `id` - Block key: a message id, a tool call id, or `<id>-related`
    pub fn is_open(&self, sections: &[ChatSection], id: &str) -> bool {
        if let Some(open) = self.open.get(id) {
            return *open;
        }
        if id.contains("call") {
            return true;
        }

        let base = id.strip_suffix(RELATED_SUFFIX).unwrap_or(id);
        let messages: Vec<&Message> = flatten(sections).collect();
        let last_user = messages
            .iter()
            .rposition(|m| m.role == Role::User)
            .unwrap_or(messages.len());

        messages
            .iter()
            .position(|m| m.id == base)
            .is_some_and(|index| index >= last_user)
    }
}

/// Every message in display order
fn flatten(sections: &[ChatSection]) -> impl Iterator<Item = &Message> {
    sections
        .iter()
        .flat_map(|s| std::iter::once(&s.user_message).chain(s.assistant_messages.iter()))
}
