//! Authentication handling for the Mealie API.
//!
//! Mealie accepts either a long-lived API token created in the user profile,
//! or a session token obtained by posting a username and password to
//! `/api/auth/token`. Both end up as a `Bearer` token on every request.

use std::time::Duration;

use reqwest::Client;
use tokio::sync::{Mutex, RwLock};

use crate::client::types::{AuthToken, LoginForm};
use crate::config::{ClientConfig, Credentials};
use crate::error::{MealieError, Result};

/// # Mealie Authentication Manager
///
/// Owns the credentials and the current token.
///
/// ## Refresh
///
/// Logins are serialised behind a single guard. When several requests see
/// the same token rejected at once, the first one to take the guard logs
/// in again and the rest pick up its token instead of logging in
/// themselves. Static API tokens cannot be refreshed; a 401 with one is
/// final.
pub struct AuthManager {
    /// Base URL of the Mealie server, without the `/api` suffix
    base_url: String,
    /// HTTP client shared with the transport layer
    client: Client,
    credentials: Credentials,
    timeout: Duration,
    /// Token attached to outgoing requests
    token: RwLock<Option<String>>,
    login_guard: Mutex<()>,
}

impl AuthManager {
    pub fn new(config: &ClientConfig, client: Client) -> Self {
        let token = match config.credentials() {
            Credentials::Token(token) => Some(token.clone()),
            Credentials::Password { .. } => None,
        };

        Self {
            base_url: config.base_url().to_string(),
            client,
            credentials: config.credentials().clone(),
            timeout: config.timeout(),
            token: RwLock::new(token),
            login_guard: Mutex::new(()),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Resolves the credentials into a token and stores it. A static token
    /// is passed through without contacting the server.
    pub async fn authenticate(&self) -> Result<String> {
        let _guard = self.login_guard.lock().await;
        self.authenticate_locked().await
    }

    pub async fn current_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Returns the stored token, logging in first if there is none yet.
    pub async fn ensure_token(&self) -> Result<String> {
        if let Some(token) = self.current_token().await {
            return Ok(token);
        }

        let _guard = self.login_guard.lock().await;
        // Another task may have logged in while we waited.
        if let Some(token) = self.current_token().await {
            return Ok(token);
        }
        self.authenticate_locked().await
    }

    /// Replaces a token the server rejected. If another task already
    /// replaced `stale`, its token is reused and no login happens.
    pub async fn refresh(&self, stale: &str) -> Result<String> {
        if !self.credentials.can_refresh() {
            return Err(MealieError::Authentication {
                status: Some(401),
                message: "API token was rejected by the server".to_string(),
            });
        }

        let _guard = self.login_guard.lock().await;
        if let Some(current) = self.current_token().await {
            if current != stale {
                tracing::debug!("Reusing token refreshed by a concurrent request");
                return Ok(current);
            }
        }

        tracing::info!("Stored token was rejected, re-authenticating");
        self.authenticate_locked().await
    }

    /// Forgets the stored token. The next request logs in again.
    pub async fn logout(&self) {
        *self.token.write().await = None;
        tracing::debug!("Cleared stored authentication token");
    }

    async fn authenticate_locked(&self) -> Result<String> {
        let token = match &self.credentials {
            Credentials::Token(token) => token.clone(),
            Credentials::Password { username, password } => self.login(username, password).await?,
        };

        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    async fn login(&self, username: &str, password: &str) -> Result<String> {
        tracing::info!("Attempting authentication for user: {}", username);

        let auth_url = format!("{}/api/auth/token", self.base_url);
        tracing::debug!("Making authentication request to: {}", auth_url);

        let response = self
            .client
            .post(&auth_url)
            .form(&LoginForm { username, password })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Network error during authentication: {}", e);
                if e.is_timeout() {
                    MealieError::Timeout { attempts: 1 }
                } else {
                    MealieError::Network { attempts: 1, source: e }
                }
            })?;

        let status = response.status();
        tracing::debug!("Authentication response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| MealieError::Network { attempts: 1, source: e })?;

        if !status.is_success() {
            tracing::error!("Authentication failed with status {}: {}", status, body);

            let message = match status.as_u16() {
                400 | 401 => "Invalid username or password".to_string(),
                403 => "Access denied: user account may be locked or disabled".to_string(),
                404 => format!("Login endpoint not found. Check your base URL: {}", self.base_url),
                423 => "User account is locked".to_string(),
                _ => format!("Login failed with status {}: {}", status, body),
            };
            return Err(MealieError::Authentication {
                status: Some(status.as_u16()),
                message,
            });
        }

        let auth_token: AuthToken = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse authentication response: {}", e);
            MealieError::Authentication {
                status: Some(status.as_u16()),
                message: format!("Invalid token response from Mealie server: {}", e),
            }
        })?;

        if auth_token.access_token.trim().is_empty() {
            return Err(MealieError::Authentication {
                status: Some(status.as_u16()),
                message: "Mealie server returned an empty access token".to_string(),
            });
        }

        tracing::info!("Authentication successful for user: {}", username);
        tracing::debug!("Received token: {}", token_preview(&auth_token.access_token));

        Ok(auth_token.access_token)
    }
}

/// First characters of a token, safe for logs.
pub(crate) fn token_preview(token: &str) -> String {
    format!("{}...", token.chars().take(10).collect::<String>())
}
