//! Command-line interface definition for tomo-sidebar
//!
//! The CLI drives the same sidebar controller a UI shell would, against a
//! live backend.

use clap::{Parser, Subcommand};

/// tomo-sidebar - conversation sidebar for the chat front-end
///
/// List, search, star, rename and delete conversations from the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "tomo-sidebar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Backend base URL (overrides config and TOMO_API_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List conversations in sidebar order
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Find conversations whose title contains a string
    Search {
        /// Case-insensitive text to look for
        query: String,
    },

    /// Toggle the star on a conversation
    Star {
        /// Conversation id
        id: String,
    },

    /// Give a conversation a new title
    Rename {
        /// Conversation id
        id: String,

        /// New title
        title: String,
    },

    /// Delete one conversation
    Delete {
        /// Conversation id
        id: String,
    },

    /// Delete every conversation
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the signed-in user
    Whoami,

    /// End the session
    Logout {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            base_url: None,
            verbose: false,
            command: Commands::List { json: false },
        }
    }
}
