//! Chat input state for the message panel
//!
//! Decides what Enter means. While an IME composition is running, and for
//! a short guard period after it ends, Enter belongs to the input method
//! and must not submit. Shift+Enter always inserts a newline. A blank input
//! never submits.

use std::time::Instant;

use crate::config::ComposerConfig;

/// Starter prompts shown under an empty chat
pub const EMPTY_SCREEN_SUGGESTIONS: &[&str] = &[
    "What is DeepSeek R1?",
    "Why is Nvidia growing rapidly?",
    "Tesla vs Rivian",
    "Summary: https://arxiv.org/pdf/2501.05707",
];

/// What an Enter key press should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterOutcome {
    /// Send the message; carries the text that was in the input
    Submit(String),
    /// Let the key through (newline or IME commit)
    PassThrough,
    /// Swallow the key
    Suppress,
}

/// Send/stop button state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryButton {
    Send { enabled: bool },
    Stop { enabled: bool },
}

/// Chat input panel state
#[derive(Debug, Clone)]
pub struct Composer {
    config: ComposerConfig,
    input: String,
    composing: bool,
    guard_until: Option<Instant>,
    suggestions_visible: bool,
}

impl Composer {
    pub fn new(config: ComposerConfig) -> Self {
        Self {
            config,
            input: String::new(),
            composing: false,
            guard_until: None,
            suggestions_visible: false,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The text changed; suggestions show again once the input is emptied
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.suggestions_visible = text.is_empty();
    }

    pub fn focus(&mut self) {
        self.suggestions_visible = true;
    }

    pub fn blur(&mut self) {
        self.suggestions_visible = false;
    }

    /// Whether the starter prompts should be shown for a chat with
    /// `message_count` messages
    pub fn show_suggestions(&self, message_count: usize) -> bool {
        message_count == 0 && self.suggestions_visible
    }

    /// Fill the input with starter prompt `index`
    pub fn pick_suggestion(&mut self, index: usize) -> Option<&str> {
        let text = EMPTY_SCREEN_SUGGESTIONS.get(index)?;
        self.set_input(text);
        Some(self.input.as_str())
    }

    pub fn composition_start(&mut self) {
        self.composing = true;
    }

    /// IME composition finished; Enter stays ignored for the guard period
    pub fn composition_end(&mut self, now: Instant) {
        self.composing = false;
        self.guard_until = Some(now + self.config.enter_guard());
    }

    fn enter_guarded(&self, now: Instant) -> bool {
        self.composing || self.guard_until.map(|until| now < until).unwrap_or(false)
    }

    /// Enter was pressed (with or without Shift)
    pub fn key_enter(&mut self, shift: bool, now: Instant) -> EnterOutcome {
        if shift || self.enter_guarded(now) {
            return EnterOutcome::PassThrough;
        }
        if self.input.trim().is_empty() {
            return EnterOutcome::Suppress;
        }
        let text = std::mem::take(&mut self.input);
        tracing::debug!(chars = text.len(), "Chat input submitted");
        EnterOutcome::Submit(text)
    }

    /// Input is read-only while a reply streams or a tool call waits
    pub fn is_disabled(&self, loading: bool, tool_call_pending: bool) -> bool {
        loading || tool_call_pending
    }

    /// Send button, or stop button while a reply streams
    pub fn primary_button(&self, loading: bool, tool_call_pending: bool) -> PrimaryButton {
        if loading {
            PrimaryButton::Stop {
                enabled: !tool_call_pending,
            }
        } else {
            PrimaryButton::Send {
                enabled: !self.input.is_empty() && !tool_call_pending,
            }
        }
    }
}
