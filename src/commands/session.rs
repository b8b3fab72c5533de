//! Session commands: whoami, logout

use std::time::Instant;

use colored::Colorize;

use crate::commands::{build_controller, check_outcome, confirm};
use crate::config::Config;
use crate::error::Result;

/// Show the signed-in user, or say the session is anonymous
pub async fn whoami(config: &Config) -> Result<()> {
    let mut controller = build_controller(config)?;
    match controller.refresh_user().await {
        Some(user) => {
            println!("{} {}", user.initials().cyan().bold(), user.name.bold());
            println!("  Email:   {}", user.email);
            println!("  Balance: {:.2}", user.billing_balance);
            if user.is_admin {
                println!("  Role:    {}", "admin".magenta());
            }
        }
        None => println!("{}", "Not signed in.".yellow()),
    }
    Ok(())
}

/// End the session, asking first unless `yes`
pub async fn logout(config: &Config, yes: bool) -> Result<()> {
    let mut controller = build_controller(config)?;
    let now = Instant::now();

    controller.request_logout();
    let message = controller.dialog().map(|d| d.message).unwrap_or_default();
    if !yes && !confirm(message)? {
        controller.cancel_dialog();
        println!("{}", "Cancelled.".yellow());
        return Ok(());
    }

    let outcome = controller.confirm_dialog(now).await;
    check_outcome(&controller, outcome, "Logout", now)?;
    println!("{}", "Logged out.".green());
    Ok(())
}
