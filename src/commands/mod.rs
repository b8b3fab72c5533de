/*!
Command handlers for the CLI

Each handler builds a [`SidebarController`] over the HTTP client, performs
one sidebar action and prints the result:

- `conversations` -- list, search, star, rename, delete, delete-all
- `session`       -- whoami, logout

A notification raised by the controller is turned into an error so the
process exits non-zero.
*/

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use crate::api::HttpApi;
use crate::config::Config;
use crate::controller::{ActionOutcome, SidebarController};
use crate::error::Result;

pub mod conversations;
pub mod session;

/// Controller wired to the configured backend, conversations not yet loaded
pub fn build_controller(config: &Config) -> Result<SidebarController> {
    let api = HttpApi::new(&config.api)?;
    tracing::debug!(base_url = %api.base_url(), "Using backend");
    Ok(SidebarController::new(Arc::new(api), config))
}

/// Controller with the conversation list loaded; a failed fetch is an error
pub async fn load_controller(config: &Config) -> Result<SidebarController> {
    let mut controller = build_controller(config)?;
    controller.refresh_conversations().await?;
    Ok(controller)
}

/// Map an action outcome to the process result
///
/// Anything but a commit is reported with the notification text if the
/// controller raised one.
pub(crate) fn check_outcome(
    controller: &SidebarController,
    outcome: ActionOutcome,
    what: &str,
    now: Instant,
) -> Result<()> {
    if outcome == ActionOutcome::Committed {
        return Ok(());
    }
    let message = controller
        .notification(now)
        .and_then(|n| n.description.clone())
        .unwrap_or_else(|| format!("{} was not applied", what));
    tracing::debug!(?outcome, "{} did not commit", what);
    Err(anyhow::anyhow!(message))
}

/// Ask a yes/no question on stdin; anything but y/yes declines
pub(crate) fn confirm(message: &str) -> Result<bool> {
    print!("{} [y/N] ", message);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Shorten `title` to at most `max` characters, marking the cut with "..."
pub(crate) fn truncate_title(title: &str, max: usize) -> String {
    if title.chars().count() <= max {
        return title.to_string();
    }
    let kept: String = title.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_title_short_is_untouched() {
        assert_eq!(truncate_title("Short", 40), "Short");
    }

    #[test]
    fn test_truncate_title_long_is_cut_on_chars() {
        let title = "é".repeat(50);
        let cut = truncate_title(&title, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_build_controller_rejects_bad_cookie() {
        let mut config = Config::default();
        config.api.session_cookie = Some("bad\ncookie".to_string());
        assert!(build_controller(&config).is_err());
    }
}
