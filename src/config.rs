//! Configuration management for the sidebar core
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SidebarError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
///
/// Holds the backend location plus the timings used by the gesture
/// disambiguator, the notification channel and the chat input composer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Touch and pointer gesture timings
    #[serde(default)]
    pub gestures: GestureConfig,
    /// Notification channel settings
    #[serde(default)]
    pub notifications: NotifyConfig,
    /// Chat input settings
    #[serde(default)]
    pub composer: ComposerConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the chat/auth backend; any path prefix is kept
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,

    /// Optional session cookie forwarded with every request
    #[serde(default)]
    pub session_cookie: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_api_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_api_timeout(),
            session_cookie: None,
        }
    }
}

/// Gesture timings for the interaction disambiguator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// How long a touch must be held before it opens the context menu
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,

    /// How long outside clicks are ignored after a long-press opened the menu
    #[serde(default = "default_protection_window_ms")]
    pub protection_window_ms: u64,

    /// Length of the haptic pulse requested when the menu opens
    #[serde(default = "default_haptic_pulse_ms")]
    pub haptic_pulse_ms: u64,
}

fn default_long_press_ms() -> u64 {
    500
}

fn default_protection_window_ms() -> u64 {
    500
}

fn default_haptic_pulse_ms() -> u64 {
    100
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_ms: default_long_press_ms(),
            protection_window_ms: default_protection_window_ms(),
            haptic_pulse_ms: default_haptic_pulse_ms(),
        }
    }
}

impl GestureConfig {
    /// Long-press threshold as a [`Duration`]
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    /// Protection window as a [`Duration`]
    pub fn protection_window(&self) -> Duration {
        Duration::from_millis(self.protection_window_ms)
    }

    /// Haptic pulse length as a [`Duration`]
    pub fn haptic_pulse(&self) -> Duration {
        Duration::from_millis(self.haptic_pulse_ms)
    }
}

/// Notification channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Time after which a visible notification is dismissed
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u64,
}

fn default_dismiss_after_ms() -> u64 {
    3000
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            dismiss_after_ms: default_dismiss_after_ms(),
        }
    }
}

impl NotifyConfig {
    /// Dismiss delay as a [`Duration`]
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }
}

/// Chat input composer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Enter is ignored for this long after an IME composition ends
    #[serde(default = "default_enter_guard_ms")]
    pub enter_guard_ms: u64,
}

fn default_enter_guard_ms() -> u64 {
    300
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            enter_guard_ms: default_enter_guard_ms(),
        }
    }
}

impl ComposerConfig {
    /// Enter guard as a [`Duration`]
    pub fn enter_guard(&self) -> Duration {
        Duration::from_millis(self.enter_guard_ms)
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SidebarError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SidebarError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("TOMO_API_BASE_URL") {
            tracing::debug!(base_url = %base_url, "Env override: TOMO_API_BASE_URL");
            self.api.base_url = base_url;
        }

        if let Ok(cookie) = std::env::var("TOMO_SESSION_COOKIE") {
            tracing::debug!("Env override: TOMO_SESSION_COOKIE");
            self.api.session_cookie = Some(cookie);
        }

        override_u64("TOMO_API_TIMEOUT_SECONDS", &mut self.api.timeout_seconds);
        override_u64("TOMO_LONG_PRESS_MS", &mut self.gestures.long_press_ms);
        override_u64(
            "TOMO_PROTECTION_WINDOW_MS",
            &mut self.gestures.protection_window_ms,
        );
        override_u64(
            "TOMO_NOTIFY_DISMISS_MS",
            &mut self.notifications.dismiss_after_ms,
        );
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            tracing::debug!(base_url = %base_url, "CLI override: --base-url");
            self.api.base_url = base_url.clone();
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not an absolute http(s) URL or any
    /// timing is zero
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(SidebarError::Config("api.base_url cannot be empty".to_string()).into());
        }

        let parsed = url::Url::parse(&self.api.base_url).map_err(|e| {
            SidebarError::Config(format!(
                "api.base_url is not a valid URL ({}): {}",
                self.api.base_url, e
            ))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(SidebarError::Config(format!(
                "api.base_url must use http or https, got: {}",
                parsed.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(SidebarError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.gestures.long_press_ms == 0 {
            return Err(SidebarError::Config(
                "gestures.long_press_ms must be greater than 0".to_string(),
            )
            .into());
        }

        if self.gestures.protection_window_ms == 0 {
            return Err(SidebarError::Config(
                "gestures.protection_window_ms must be greater than 0".to_string(),
            )
            .into());
        }

        if self.notifications.dismiss_after_ms == 0 {
            return Err(SidebarError::Config(
                "notifications.dismiss_after_ms must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn override_u64(var: &str, target: &mut u64) {
    if let Ok(raw) = std::env::var(var) {
        match raw.parse() {
            Ok(value) => {
                tracing::debug!(value, "Env override: {}", var);
                *target = value;
            }
            Err(_) => tracing::warn!("Invalid {}: {}", var, raw),
        }
    }
}
