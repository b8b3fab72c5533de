//! Conversation commands: list, search, star, rename, delete

use std::time::Instant;

use colored::Colorize;
use prettytable::{format, Table};

use crate::commands::{check_outcome, confirm, load_controller, truncate_title};
use crate::config::Config;
use crate::controller::{RowView, SidebarController};
use crate::error::{Result, SidebarError};
use crate::models::Conversation;

const TITLE_WIDTH: usize = 40;

/// Print the conversation list in sidebar order
///
/// # Examples
///
/// ```no_run
/// use tomo_sidebar::config::Config;
/// use tomo_sidebar::commands::conversations::list;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::load("config/config.yaml", &Default::default())?;
/// list(&config, true).await?;
/// # Ok(())
/// # }
/// ```
pub async fn list(config: &Config, json: bool) -> Result<()> {
    let controller = load_controller(config).await?;
    let ordered: Vec<&Conversation> = controller.conversations().ordered();
    tracing::info!(count = ordered.len(), "Listing conversations");

    if json {
        println!("{}", serde_json::to_string_pretty(&ordered)?);
        return Ok(());
    }

    print_rows(&controller.rows(), "No conversations yet.");
    Ok(())
}

/// Print conversations whose title contains `query`
pub async fn search(config: &Config, query: &str) -> Result<()> {
    let controller = load_controller(config).await?;
    let rows = controller.search(query);
    tracing::info!(query, hits = rows.len(), "Searched conversations");
    print_rows(&rows, &format!("No conversations match \"{}\".", query));
    Ok(())
}

/// Toggle the star on `id`
pub async fn star(config: &Config, id: &str) -> Result<()> {
    let mut controller = load_controller(config).await?;
    let now = Instant::now();
    ensure_known(&controller, id)?;

    let outcome = controller.toggle_star(id, now).await;
    check_outcome(&controller, outcome, "Star toggle", now)?;

    let starred = controller
        .conversations()
        .get(id)
        .map(|c| c.starred)
        .unwrap_or(false);
    if starred {
        println!("{}", format!("Starred {}", id).green());
    } else {
        println!("{}", format!("Unstarred {}", id).green());
    }
    Ok(())
}

/// Give `id` a new title
pub async fn rename(config: &Config, id: &str, title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(SidebarError::InvalidInput("title must not be blank".to_string()).into());
    }
    let mut controller = load_controller(config).await?;
    let now = Instant::now();
    ensure_known(&controller, id)?;

    let outcome = controller.rename(id, title, now).await;
    check_outcome(&controller, outcome, "Rename", now)?;
    println!("{}", format!("Renamed {} to \"{}\"", id, title).green());
    Ok(())
}

/// Delete `id`
pub async fn delete(config: &Config, id: &str) -> Result<()> {
    let mut controller = load_controller(config).await?;
    let now = Instant::now();
    ensure_known(&controller, id)?;

    let outcome = controller.delete(id, now).await;
    check_outcome(&controller, outcome, "Delete", now)?;
    println!("{}", format!("Deleted conversation {}", id).green());
    Ok(())
}

/// Delete every conversation, asking first unless `yes`
pub async fn delete_all(config: &Config, yes: bool) -> Result<()> {
    let mut controller = load_controller(config).await?;
    let now = Instant::now();

    controller.request_delete_all();
    let message = controller.dialog().map(|d| d.message).unwrap_or_default();
    if !yes && !confirm(message)? {
        controller.cancel_dialog();
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    let count = controller.conversations().len();
    let outcome = controller.confirm_dialog(now).await;
    check_outcome(&controller, outcome, "Delete all", now)?;
    println!("{}", format!("Deleted {} conversations", count).green());
    Ok(())
}

fn ensure_known(controller: &SidebarController, id: &str) -> Result<()> {
    if controller.conversations().get(id).is_none() {
        return Err(SidebarError::NotFound(id.to_string()).into());
    }
    Ok(())
}

fn print_rows(rows: &[RowView], empty_message: &str) {
    if rows.is_empty() {
        println!("{}", empty_message.yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "".bold(),
        "ID".bold(),
        "Title".bold(),
        "Type".bold()
    ]);

    for row in rows {
        let marker = if row.starred { "★" } else { " " };
        table.add_row(prettytable::row![
            marker.yellow(),
            row.id.cyan(),
            truncate_title(&row.title, TITLE_WIDTH),
            row.kind
        ]);
    }

    println!();
    table.printstd();
    println!();
}
