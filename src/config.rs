//! Client configuration.
//!
//! A [`ClientConfig`] is built once, either through [`ClientConfig::builder`]
//! or from `MEALIE_*` environment variables with [`ClientConfig::from_env`],
//! and then shared by the auth manager and transport layer.

use std::fmt;
use std::time::Duration;

use crate::error::{MealieError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAX_BACKOFF_DELAY: Duration = Duration::from_secs(30);

pub const ENV_BASE_URL: &str = "MEALIE_BASE_URL";
pub const ENV_API_TOKEN: &str = "MEALIE_API_TOKEN";
pub const ENV_USERNAME: &str = "MEALIE_USERNAME";
pub const ENV_PASSWORD: &str = "MEALIE_PASSWORD";
pub const ENV_TIMEOUT: &str = "MEALIE_TIMEOUT";
pub const ENV_RETRY_ATTEMPTS: &str = "MEALIE_RETRY_ATTEMPTS";
pub const ENV_RETRY_DELAY: &str = "MEALIE_RETRY_DELAY";
pub const ENV_RETRY_BACKOFF: &str = "MEALIE_RETRY_BACKOFF";
pub const ENV_VERIFY_SSL: &str = "MEALIE_VERIFY_SSL";

/// How the SDK proves its identity to Mealie.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// A long-lived API token issued from the Mealie UI. Used as-is.
    Token(String),
    /// Username and password, exchanged for a session token at
    /// `/api/auth/token`.
    Password { username: String, password: String },
}

impl Credentials {
    pub fn token(token: impl Into<String>) -> Self {
        Credentials::Token(token.into())
    }

    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Only password credentials can obtain a fresh token after a 401.
    pub fn can_refresh(&self) -> bool {
        matches!(self, Credentials::Password { .. })
    }
}

// Secrets never reach log output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Delay shape between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Wait the base delay before every retry.
    Fixed,
    /// Multiply the base delay by `factor` for every retry already made,
    /// capped at `max_delay`.
    Exponential { factor: f64, max_delay: Duration },
}

impl Backoff {
    pub fn exponential() -> Self {
        Backoff::Exponential {
            factor: 2.0,
            max_delay: DEFAULT_MAX_BACKOFF_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first one. Never below 1.
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
    /// Whether the retry that follows a 401 re-authentication counts
    /// against `max_attempts`.
    pub reauth_consumes_attempt: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
            backoff: Backoff::Fixed,
            reauth_consumes_attempt: false,
        }
    }
}

impl RetryPolicy {
    /// A policy that sends every request exactly once.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1 for the first retry).
    pub fn delay_for(&self, retry: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential { factor, max_delay } => {
                let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
                let secs = self.delay.as_secs_f64() * factor.powi(exponent);
                if !secs.is_finite() || secs >= max_delay.as_secs_f64() {
                    max_delay
                } else {
                    Duration::from_secs_f64(secs.max(0.0))
                }
            }
        }
    }
}

/// Connection settings for a Mealie server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    credentials: Credentials,
    timeout: Duration,
    retry: RetryPolicy,
    verify_ssl: bool,
}

impl ClientConfig {
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url.into())
    }

    /// Reads the `MEALIE_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup. An API token
    /// takes precedence over a username/password pair.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get(ENV_BASE_URL)
            .ok_or_else(|| MealieError::Config(format!("{} is not set", ENV_BASE_URL)))?;
        let mut builder = Self::builder(base_url);

        if let Some(token) = get(ENV_API_TOKEN) {
            builder = builder.token(token);
        } else if let (Some(username), Some(password)) = (get(ENV_USERNAME), get(ENV_PASSWORD)) {
            builder = builder.password(username, password);
        }

        if let Some(raw) = get(ENV_TIMEOUT) {
            builder = builder.timeout(parse_seconds(ENV_TIMEOUT, &raw)?);
        }
        if let Some(raw) = get(ENV_RETRY_ATTEMPTS) {
            let attempts = raw.trim().parse::<u32>().map_err(|_| {
                MealieError::Config(format!("{} must be a whole number, got '{}'", ENV_RETRY_ATTEMPTS, raw))
            })?;
            builder = builder.max_attempts(attempts);
        }
        if let Some(raw) = get(ENV_RETRY_DELAY) {
            builder = builder.retry_delay(parse_seconds(ENV_RETRY_DELAY, &raw)?);
        }
        if let Some(raw) = get(ENV_RETRY_BACKOFF) {
            let backoff = match raw.trim().to_ascii_lowercase().as_str() {
                "fixed" => Backoff::Fixed,
                "exponential" => Backoff::exponential(),
                _ => {
                    return Err(MealieError::Config(format!(
                        "{} must be 'fixed' or 'exponential', got '{}'",
                        ENV_RETRY_BACKOFF, raw
                    )))
                }
            };
            builder = builder.backoff(backoff);
        }
        if let Some(raw) = get(ENV_VERIFY_SSL) {
            builder = builder.verify_ssl(parse_bool(ENV_VERIFY_SSL, &raw)?);
        }

        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    /// Absolute URL for an API path such as `recipes/my-slug`.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[derive(Debug)]
pub struct ClientConfigBuilder {
    base_url: String,
    credentials: Option<Credentials>,
    timeout: Duration,
    retry: RetryPolicy,
    verify_ssl: bool,
}

impl ClientConfigBuilder {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            verify_ssl: true,
        }
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn token(self, token: impl Into<String>) -> Self {
        self.credentials(Credentials::token(token))
    }

    pub fn password(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials(Credentials::password(username, password))
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.retry.max_attempts = attempts;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry.delay = delay;
        self
    }

    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.retry.backoff = backoff;
        self
    }

    pub fn reauth_consumes_attempt(mut self, consumes: bool) -> Self {
        self.retry.reauth_consumes_attempt = consumes;
        self
    }

    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let base_url = normalize_base_url(&self.base_url)?;

        let credentials = self.credentials.ok_or_else(|| {
            MealieError::Config(format!(
                "no credentials: set {} or {}/{}",
                ENV_API_TOKEN, ENV_USERNAME, ENV_PASSWORD
            ))
        })?;
        match &credentials {
            Credentials::Token(token) if token.trim().is_empty() => {
                return Err(MealieError::Config("API token is empty".to_string()));
            }
            Credentials::Password { username, .. } if username.trim().is_empty() => {
                return Err(MealieError::Config("username is empty".to_string()));
            }
            _ => {}
        }

        if self.retry.max_attempts == 0 {
            return Err(MealieError::Config(
                "retry attempts must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(MealieError::Config("timeout must be positive".to_string()));
        }

        Ok(ClientConfig {
            base_url,
            credentials,
            timeout: self.timeout,
            retry: self.retry,
            verify_ssl: self.verify_ssl,
        })
    }
}

/// Validates the server URL and strips trailing slashes and a trailing
/// `/api` segment, so both `https://host` and `https://host/api/` work.
fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| MealieError::Config(format!("invalid base URL '{}': {}", trimmed, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(MealieError::Config(format!(
            "base URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }

    let mut base = trimmed.trim_end_matches('/').to_string();
    if base.ends_with("/api") {
        base.truncate(base.len() - "/api".len());
    }
    Ok(base)
}

fn parse_seconds(key: &str, raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| MealieError::Config(format!("{} must be a number of seconds, got '{}'", key, raw)))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(MealieError::Config(format!("{} must be true or false, got '{}'", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn token_wins_over_password() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://mealie.example.com/"),
            (ENV_API_TOKEN, "tok"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "secret"),
        ]))
        .unwrap();

        assert_eq!(config.base_url(), "https://mealie.example.com");
        assert_eq!(config.credentials(), &Credentials::token("tok"));
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.retry(), &RetryPolicy::default());
        assert!(config.verify_ssl());
    }

    #[test]
    fn reads_tuning_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "http://localhost:9000/api"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "secret"),
            (ENV_TIMEOUT, "2.5"),
            (ENV_RETRY_ATTEMPTS, "5"),
            (ENV_RETRY_DELAY, "0.25"),
            (ENV_RETRY_BACKOFF, "exponential"),
            (ENV_VERIFY_SSL, "false"),
        ]))
        .unwrap();

        assert_eq!(config.base_url(), "http://localhost:9000");
        assert!(config.credentials().can_refresh());
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.retry().max_attempts, 5);
        assert_eq!(config.retry().delay, Duration::from_millis(250));
        assert_eq!(config.retry().backoff, Backoff::exponential());
        assert!(!config.verify_ssl());
        assert_eq!(
            config.api_url("recipes/pasta"),
            "http://localhost:9000/api/recipes/pasta"
        );
    }

    #[test]
    fn rejects_bad_values() {
        let base = (ENV_BASE_URL, "https://mealie.example.com");
        let token = (ENV_API_TOKEN, "tok");

        assert!(ClientConfig::from_lookup(lookup(&[token])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[base])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_BASE_URL, "ftp://host"), token])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[base, token, (ENV_RETRY_ATTEMPTS, "0")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[base, token, (ENV_TIMEOUT, "soon")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[base, token, (ENV_TIMEOUT, "1e30")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[base, token, (ENV_RETRY_DELAY, "-1")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[base, token, (ENV_RETRY_DELAY, "inf")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[base, token, (ENV_VERIFY_SSL, "maybe")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[base, token, (ENV_RETRY_BACKOFF, "linear")])).is_err());
    }

    #[test]
    fn exponential_backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            delay: Duration::from_millis(100),
            backoff: Backoff::Exponential {
                factor: 2.0,
                max_delay: Duration::from_millis(500),
            },
            reauth_consumes_attempt: false,
        };

        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
        assert_eq!(policy.delay_for(4), Duration::from_millis(500));
        assert_eq!(policy.delay_for(200), Duration::from_millis(500));

        let fixed = RetryPolicy::default();
        assert_eq!(fixed.delay_for(1), fixed.delay_for(7));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", Credentials::password("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
        assert!(!format!("{:?}", Credentials::token("tok-123")).contains("tok-123"));
    }
}
