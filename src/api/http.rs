//! REST client for the chat/auth backend
//!
//! Issues plain JSON requests with `reqwest`. Conversation ids are inserted
//! as percent-encoded path segments, never formatted into the URL string.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::json;
use url::Url;

use crate::api::ConversationApi;
use crate::config::ApiConfig;
use crate::error::{Result, SidebarError};
use crate::models::{Conversation, User};

/// HTTP implementation of [`ConversationApi`]
///
/// # Examples
///
/// ```
/// use tomo_sidebar::api::HttpApi;
/// use tomo_sidebar::config::ApiConfig;
///
/// let api = HttpApi::new(&ApiConfig::default());
/// assert!(api.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// Create a client for the backend described by `config`
    ///
    /// # Errors
    ///
    /// Returns error if the base URL does not parse, the session cookie is
    /// not a valid header value, or the HTTP client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            SidebarError::Config(format!("Invalid api.base_url {}: {}", config.base_url, e))
        })?;

        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie).map_err(|e| {
                SidebarError::Config(format!("Invalid session cookie header: {}", e))
            })?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("tomo-sidebar/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| SidebarError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized backend client: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    /// The backend base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                SidebarError::Config(format!("Base URL cannot have a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, %url, "Backend request");
        Ok(self.client.request(method, url))
    }
}

/// Map any non-2xx status to [`SidebarError::Network`]
fn ensure_success(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    tracing::warn!(operation, status = status.as_u16(), "Backend request failed");
    Err(SidebarError::Network {
        operation: operation.to_string(),
        status: status.as_u16(),
    }
    .into())
}

#[async_trait]
impl ConversationApi for HttpApi {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let response = self
            .request(Method::GET, &["api", "conversations"])?
            .send()
            .await?;
        let response = ensure_success(response, "list")?;
        let conversations: Vec<Conversation> = response.json().await?;
        tracing::debug!(count = conversations.len(), "Fetched conversations");
        Ok(conversations)
    }

    async fn current_user(&self) -> Result<Option<User>> {
        let response = self
            .request(Method::GET, &["api", "auth", "me"])?
            .send()
            .await?;
        if !response.status().is_success() {
            tracing::debug!(
                status = response.status().as_u16(),
                "No active session, continuing anonymously"
            );
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    async fn set_starred(&self, id: &str, starred: bool) -> Result<()> {
        let response = self
            .request(Method::PUT, &["api", "conversations", id, "star"])?
            .json(&json!({ "starred": starred }))
            .send()
            .await?;
        ensure_success(response, "star")?;
        Ok(())
    }

    async fn rename(&self, id: &str, title: &str) -> Result<()> {
        let response = self
            .request(Method::PUT, &["api", "conversations", id, "rename"])?
            .json(&json!({ "alias": title }))
            .send()
            .await?;
        ensure_success(response, "rename")?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &["api", "conversations", id])?
            .send()
            .await?;
        ensure_success(response, "delete")?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let response = self
            .request(Method::DELETE, &["api", "conversations", "all"])?
            .send()
            .await?;
        ensure_success(response, "delete_all")?;
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        let response = self
            .request(Method::POST, &["api", "auth", "logout"])?
            .json(&json!({}))
            .send()
            .await?;
        ensure_success(response, "logout")?;
        Ok(())
    }
}
