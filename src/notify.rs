//! Transient user notifications
//!
//! One slot, no queue: showing a notification replaces whatever is
//! visible, and it disappears on its own after the configured delay.

use std::time::{Duration, Instant};

/// Visual weight of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

/// A visible notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
    pub variant: Variant,
    shown_at: Instant,
}

impl Notification {
    /// When it appeared; it is hidden once the dismiss delay has passed
    pub fn shown_at(&self) -> Instant {
        self.shown_at
    }
}

/// Single-slot auto-dismissing notification channel
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use tomo_sidebar::notify::{Notifier, Variant};
///
/// let mut notifier = Notifier::new(Duration::from_secs(3));
/// let t0 = Instant::now();
///
/// notifier.error("Failed to toggle star.", t0);
/// notifier.error("Failed to delete conversation.", t0 + Duration::from_secs(1));
///
/// // Only the latest one is shown, for three seconds.
/// let visible = notifier.visible(t0 + Duration::from_secs(2)).unwrap();
/// assert_eq!(visible.variant, Variant::Destructive);
/// assert_eq!(visible.description.as_deref(), Some("Failed to delete conversation."));
/// assert!(notifier.visible(t0 + Duration::from_secs(4)).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Notifier {
    dismiss_after: Duration,
    current: Option<Notification>,
}

impl Notifier {
    /// Create an empty notifier
    ///
    /// # Arguments
    ///
    /// * `dismiss_after` - How long each notification stays visible
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            dismiss_after,
            current: None,
        }
    }

    /// Show a notification, replacing the visible one
    pub fn show(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        variant: Variant,
        now: Instant,
    ) {
        let notification = Notification {
            title: title.into(),
            description,
            variant,
            shown_at: now,
        };
        tracing::debug!(title = %notification.title, "Notification shown");
        self.current = Some(notification);
    }

    /// Destructive "Error" notification with `description`
    pub fn error(&mut self, description: &str, now: Instant) {
        self.show("Error", Some(description.to_string()), Variant::Destructive, now);
    }

    /// The notification visible at `now`, if any
    pub fn visible(&self, now: Instant) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.shown_at) < self.dismiss_after)
    }

    /// Drop the notification once its time is up
    pub fn tick(&mut self, now: Instant) {
        if self.current.is_some() && self.visible(now).is_none() {
            self.current = None;
        }
    }

    /// Close it early (user dismissed)
    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
