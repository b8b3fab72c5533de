//! Touch and pointer disambiguation for conversation rows
//!
//! Raw row events are classified into one of three intents: navigate to
//! the conversation, open its context menu, or edit its title. Time is an
//! input: every event carries the caller's `Instant`, and the long-press
//! timer is a stored deadline that fires from [`Disambiguator::tick`] (or
//! from the next event that arrives after it). Cancelling a timer is
//! dropping the deadline.
//!
//! ```text
//! idle --touch_start--> pressing --deadline--> menu-armed
//!                          |  \--touch_end--> navigating
//!                          \--touch_move--> idle
//! menu-armed --action Rename--> renaming
//! ```

use std::time::{Duration, Instant};

use crate::config::GestureConfig;

/// Page coordinates of a touch or click
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a point from page coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where a single row stands in the gesture state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Idle,
    Pressing,
    MenuArmed,
    Navigating,
    Renaming,
}

/// Side effects the shell must perform after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum GestureEffect {
    /// Show the context menu for `id` at `at`
    OpenMenu { id: String, at: Point },
    /// Vibrate, if the device can
    Haptic(Duration),
}

/// Outcome of a touch ending on a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchEnd {
    /// It was a tap: open the conversation
    Navigate(String),
    /// The context menu is open; swallow the event and its default action
    Consumed,
    /// Nothing to do (scroll, cancelled press, row being renamed)
    Ignored,
}

/// Actions offered by the row context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Star,
    Rename,
    Delete,
}

/// Visible context menu
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub id: String,
    pub at: Point,
    protected_until: Option<Instant>,
}

impl ContextMenu {
    /// Whether outside clicks are still ignored at `now`
    pub fn is_protected(&self, now: Instant) -> bool {
        self.protected_until.map(|until| now < until).unwrap_or(false)
    }
}

/// Row whose title is being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub id: String,
    pub draft: String,
}

#[derive(Debug, Clone)]
struct Press {
    id: String,
    at: Point,
    deadline: Instant,
}

/// Gesture state machine shared by every row of the list
///
/// At most one press is tracked, at most one menu is open and at most one
/// row is being renamed.
///
/// Effects produced when the long-press deadline fires are queued and
/// handed out by [`tick`](Self::tick) or [`take_effects`](Self::take_effects).
/// A queued [`GestureEffect::OpenMenu`] always refers to the menu that is
/// currently open: whenever the menu closes or is replaced, effects still
/// waiting for it are dropped.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use tomo_sidebar::config::GestureConfig;
/// use tomo_sidebar::gesture::{Disambiguator, GestureEffect, Point, TouchEnd};
///
/// let mut gestures = Disambiguator::new(GestureConfig::default());
/// let t0 = Instant::now();
///
/// // A quick tap navigates.
/// gestures.touch_start("a", Point::new(4.0, 8.0), t0);
/// assert_eq!(
///     gestures.touch_end("a", t0 + Duration::from_millis(120)),
///     TouchEnd::Navigate("a".to_string())
/// );
///
/// // Holding for the long-press threshold opens the menu instead.
/// gestures.touch_start("b", Point::new(4.0, 8.0), t0);
/// let effects = gestures.tick(t0 + Duration::from_millis(500));
/// assert!(matches!(&effects[0], GestureEffect::OpenMenu { id, .. } if id == "b"));
/// ```
#[derive(Debug, Clone)]
pub struct Disambiguator {
    config: GestureConfig,
    press: Option<Press>,
    menu: Option<ContextMenu>,
    rename: Option<Rename>,
    navigating: Option<String>,
    effects: Vec<GestureEffect>,
}

impl Disambiguator {
    /// Create an idle machine using the timings in `config`
    ///
    /// # Arguments
    ///
    /// * `config` - Long-press threshold, protection window and haptic pulse
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            press: None,
            menu: None,
            rename: None,
            navigating: None,
            effects: Vec::new(),
        }
    }

    /// State of row `id`
    ///
    /// Renaming outranks an open menu, which outranks a press in progress.
    pub fn row_state(&self, id: &str) -> RowState {
        if self.rename.as_ref().is_some_and(|r| r.id == id) {
            RowState::Renaming
        } else if self.menu.as_ref().is_some_and(|m| m.id == id) {
            RowState::MenuArmed
        } else if self.press.as_ref().is_some_and(|p| p.id == id) {
            RowState::Pressing
        } else if self.navigating.as_deref() == Some(id) {
            RowState::Navigating
        } else {
            RowState::Idle
        }
    }

    /// The open context menu, if any
    pub fn menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    /// The rename in progress, if any
    pub fn renaming(&self) -> Option<&Rename> {
        self.rename.as_ref()
    }

    /// Whether row `id` is the one being renamed
    pub fn is_renaming(&self, id: &str) -> bool {
        self.rename.as_ref().is_some_and(|r| r.id == id)
    }

    /// Finger down on a row: close any menu and arm the long-press timer
    ///
    /// A press whose deadline already passed (its touch was cancelled and
    /// never ended) opens and immediately loses its menu here; nothing is
    /// left queued for it.
    ///
    /// # Arguments
    ///
    /// * `id` - Row under the finger
    /// * `at` - Page coordinates, reused as the menu anchor
    /// * `now` - Event time
    pub fn touch_start(&mut self, id: &str, at: Point, now: Instant) {
        self.fire_due(now);
        if self.dismiss_menu().is_some() {
            tracing::debug!("Context menu closed by new touch");
        }
        self.navigating = None;
        self.press = Some(Press {
            id: id.to_string(),
            at,
            deadline: now + self.config.long_press(),
        });
        tracing::debug!(%id, "Long-press armed");
    }

    /// Finger moved: it is a scroll, not a tap
    pub fn touch_move(&mut self, now: Instant) {
        self.fire_due(now);
        if let Some(press) = self.press.take() {
            tracing::debug!(id = %press.id, "Long-press cancelled by move");
        }
    }

    /// Finger lifted from row `id`
    ///
    /// Returns [`TouchEnd::Consumed`] while a menu is open, including one
    /// opened by this very call because the deadline passed without a
    /// tick. Its effects are then available from
    /// [`take_effects`](Self::take_effects) straight away.
    pub fn touch_end(&mut self, id: &str, now: Instant) -> TouchEnd {
        self.fire_due(now);

        if self.menu.is_some() {
            return TouchEnd::Consumed;
        }

        let Some(press) = self.press.take() else {
            return TouchEnd::Ignored;
        };
        if press.id != id {
            tracing::debug!(pressed = %press.id, released = %id, "Touch ended on another row");
            return TouchEnd::Ignored;
        }
        if self.is_renaming(id) {
            return TouchEnd::Ignored;
        }

        self.navigating = Some(press.id.clone());
        TouchEnd::Navigate(press.id)
    }

    /// Run due timers and hand back the effects produced since the last call
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, Instant};
    /// use tomo_sidebar::config::GestureConfig;
    /// use tomo_sidebar::gesture::{Disambiguator, Point};
    ///
    /// let mut gestures = Disambiguator::new(GestureConfig::default());
    /// let t0 = Instant::now();
    /// gestures.touch_start("a", Point::default(), t0);
    /// assert!(gestures.tick(t0 + Duration::from_millis(499)).is_empty());
    /// assert_eq!(gestures.tick(t0 + Duration::from_millis(500)).len(), 2);
    /// ```
    pub fn tick(&mut self, now: Instant) -> Vec<GestureEffect> {
        self.fire_due(now);
        self.take_effects()
    }

    /// Drain queued effects without running timers
    ///
    /// Lets the shell deliver an effect produced by an event (a late
    /// `touch_end`, an `outside_click` inside the protection window)
    /// without waiting for the next tick.
    pub fn take_effects(&mut self) -> Vec<GestureEffect> {
        std::mem::take(&mut self.effects)
    }

    fn fire_due(&mut self, now: Instant) {
        let due = self.press.as_ref().is_some_and(|p| p.deadline <= now);
        if !due {
            return;
        }
        let Some(press) = self.press.take() else {
            return;
        };

        if let Some(rename) = &self.rename {
            tracing::debug!(
                id = %press.id,
                renaming = %rename.id,
                "Long-press ignored while renaming"
            );
            return;
        }

        let fired_at = press.deadline;
        self.menu = Some(ContextMenu {
            id: press.id.clone(),
            at: press.at,
            protected_until: Some(fired_at + self.config.protection_window()),
        });
        tracing::debug!(id = %press.id, "Context menu opened by long-press");
        self.effects.push(GestureEffect::OpenMenu {
            id: press.id,
            at: press.at,
        });
        self.effects
            .push(GestureEffect::Haptic(self.config.haptic_pulse()));
    }

    /// Close the menu and forget the effects announcing it
    fn dismiss_menu(&mut self) -> Option<ContextMenu> {
        let menu = self.menu.take()?;
        if !self.effects.is_empty() {
            tracing::debug!(id = %menu.id, "Dropping undelivered menu effects");
            self.effects.clear();
        }
        Some(menu)
    }

    /// Desktop right-click: open the menu at once unless a rename is active
    ///
    /// Returns whether the menu opened. No effect is queued; the shell
    /// shows the menu itself on `true`.
    pub fn context_menu(&mut self, id: &str, at: Point) -> bool {
        if self.rename.is_some() {
            tracing::debug!(%id, "Context menu ignored while renaming");
            return false;
        }
        self.press = None;
        self.navigating = None;
        self.dismiss_menu();
        self.menu = Some(ContextMenu {
            id: id.to_string(),
            at,
            protected_until: None,
        });
        tracing::debug!(%id, "Context menu opened by right-click");
        true
    }

    /// Click anywhere in the document
    ///
    /// Closes the menu unless it is still inside its protection window.
    /// Returns whether the menu closed.
    pub fn outside_click(&mut self, now: Instant) -> bool {
        self.fire_due(now);
        match &self.menu {
            Some(menu) if menu.is_protected(now) => {
                tracing::debug!(id = %menu.id, "Outside click ignored during protection window");
                false
            }
            Some(_) => {
                self.dismiss_menu();
                true
            }
            None => false,
        }
    }

    /// Close the menu regardless of its protection window
    pub fn close_menu(&mut self) {
        self.dismiss_menu();
    }

    /// Escape key: close the menu and abandon any rename
    pub fn escape(&mut self) {
        self.close_menu();
        self.cancel_rename();
    }

    /// Close the menu and return the row it was opened for
    pub fn take_menu_target(&mut self) -> Option<String> {
        self.dismiss_menu().map(|m| m.id)
    }

    /// Start editing the title of `id`, seeded with `title`
    ///
    /// Replaces any rename already in progress and closes the menu.
    ///
    /// # Arguments
    ///
    /// * `id` - Row to rename
    /// * `title` - Current title, used as the initial draft
    pub fn begin_rename(&mut self, id: &str, title: &str) {
        if let Some(previous) = &self.rename {
            tracing::debug!(previous = %previous.id, next = %id, "Replacing active rename");
        }
        self.dismiss_menu();
        self.rename = Some(Rename {
            id: id.to_string(),
            draft: title.to_string(),
        });
    }

    /// Replace the draft text; ignored when nothing is being renamed
    pub fn set_rename_draft(&mut self, draft: &str) {
        if let Some(rename) = &mut self.rename {
            rename.draft = draft.to_string();
        }
    }

    /// Enter in the title field
    ///
    /// Returns the row and its new title and leaves renaming. A blank draft
    /// is not submitted and editing continues.
    ///
    /// # Examples
    ///
    /// ```
    /// use tomo_sidebar::config::GestureConfig;
    /// use tomo_sidebar::gesture::Disambiguator;
    ///
    /// let mut gestures = Disambiguator::new(GestureConfig::default());
    /// gestures.begin_rename("a", "Old title");
    /// gestures.set_rename_draft("  ");
    /// assert_eq!(gestures.submit_rename(), None);
    /// assert!(gestures.is_renaming("a"));
    ///
    /// gestures.set_rename_draft("New title");
    /// assert_eq!(
    ///     gestures.submit_rename(),
    ///     Some(("a".to_string(), "New title".to_string()))
    /// );
    /// ```
    pub fn submit_rename(&mut self) -> Option<(String, String)> {
        if self.rename.as_ref()?.draft.trim().is_empty() {
            return None;
        }
        self.rename.take().map(|r| (r.id, r.draft))
    }

    /// Title field lost focus: submit a non-blank draft, drop a blank one
    pub fn blur_rename(&mut self) -> Option<(String, String)> {
        let rename = self.rename.take()?;
        if rename.draft.trim().is_empty() {
            tracing::debug!(id = %rename.id, "Blank rename discarded on blur");
            return None;
        }
        Some((rename.id, rename.draft))
    }

    /// Leave renaming without submitting
    pub fn cancel_rename(&mut self) {
        self.rename = None;
    }

    /// Forget every transient state
    pub fn reset(&mut self) {
        self.press = None;
        self.menu = None;
        self.rename = None;
        self.navigating = None;
        self.effects.clear();
    }
}
