//! Authenticated, retried HTTP exchanges with the Mealie API.
//!
//! Resource managers describe a call as an [`ApiRequest`] and hand it to
//! [`Transport::send`]. The transport attaches the bearer token, applies the
//! configured [`RetryPolicy`](crate::config::RetryPolicy) and decodes the
//! body into the expected record.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::auth::AuthManager;
use crate::config::ClientConfig;
use crate::error::{is_retryable_status, MealieError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Kept as owned parts so the form can be rebuilt for each attempt.
    Multipart(Vec<MultipartField>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MultipartField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime_type: String,
        data: Vec<u8>,
    },
}

/// One API call: method, path relative to `/api/`, query pairs and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| MealieError::InvalidRequest(format!("cannot encode request body: {}", e)))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, fields: Vec<MultipartField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }
}

/// Shared HTTP layer. Holds no per-call state; the only mutable state is
/// the token inside the [`AuthManager`].
pub struct Transport {
    config: Arc<ClientConfig>,
    client: Client,
    auth: Arc<AuthManager>,
}

impl Transport {
    pub fn new(config: Arc<ClientConfig>, client: Client, auth: Arc<AuthManager>) -> Self {
        Self {
            config,
            client,
            auth,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }

    /// Sends the request and decodes a successful body into `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let body = self.execute(request).await?;
        decode(request, &body)
    }

    /// Sends the request and returns the undecoded JSON value (`Null` for an
    /// empty body).
    pub async fn send_value(&self, request: &ApiRequest) -> Result<serde_json::Value> {
        self.send(request).await
    }

    /// Sends the request and discards the response body.
    pub async fn send_empty(&self, request: &ApiRequest) -> Result<()> {
        self.execute(request).await.map(|_| ())
    }

    #[tracing::instrument(
        name = "mealie_request",
        skip(self, request),
        fields(method = %request.method(), path = %request.path())
    )]
    async fn execute(&self, request: &ApiRequest) -> Result<Vec<u8>> {
        let policy = self.config.retry();
        let url = self.config.api_url(request.path());
        let mut attempts: u32 = 0;
        let mut reauthenticated = false;

        loop {
            attempts += 1;
            let token = self.auth.ensure_token().await?;
            tracing::debug!("Sending request to {} (attempt {})", url, attempts);

            let response = match self.build(request, &url, &token)?.send().await {
                Ok(response) => response,
                Err(e) => {
                    let timed_out = e.is_timeout();
                    let transient = timed_out || e.is_connect() || e.is_request();
                    if transient && attempts < policy.max_attempts {
                        tracing::warn!("Request to {} failed: {}; retrying", url, e);
                        tokio::time::sleep(policy.delay_for(attempts)).await;
                        continue;
                    }
                    tracing::error!("Request to {} failed after {} attempt(s): {}", url, attempts, e);
                    return Err(if timed_out {
                        MealieError::Timeout { attempts }
                    } else {
                        MealieError::Network { attempts, source: e }
                    });
                }
            };

            let status = response.status();
            tracing::debug!("Response status: {}", status);

            if status.is_success() {
                match response.bytes().await {
                    Ok(body) => return Ok(body.to_vec()),
                    Err(e) if attempts < policy.max_attempts => {
                        tracing::warn!("Reading response body from {} failed: {}; retrying", url, e);
                        tokio::time::sleep(policy.delay_for(attempts)).await;
                        continue;
                    }
                    Err(e) => {
                        tracing::error!("Reading response body from {} failed after {} attempt(s): {}", url, attempts, e);
                        return Err(if e.is_timeout() {
                            MealieError::Timeout { attempts }
                        } else {
                            MealieError::Network { attempts, source: e }
                        });
                    }
                }
            }

            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            match status.as_u16() {
                401 if !reauthenticated && self.auth.credentials().can_refresh() => {
                    if policy.reauth_consumes_attempt && attempts >= policy.max_attempts {
                        return Err(MealieError::Authentication {
                            status: Some(401),
                            message: "Token rejected and no attempts left to re-authenticate".to_string(),
                        });
                    }
                    reauthenticated = true;
                    self.auth.refresh(&token).await?;
                    if !policy.reauth_consumes_attempt {
                        attempts -= 1;
                    }
                }
                401 => {
                    tracing::error!("Authentication rejected for {}: {}", url, message);
                    let message = if reauthenticated {
                        "Token rejected again after re-authentication".to_string()
                    } else {
                        format!("Authentication expired or invalid: {}", message)
                    };
                    return Err(MealieError::Authentication {
                        status: Some(401),
                        message,
                    });
                }
                403 => {
                    return Err(MealieError::Authentication {
                        status: Some(403),
                        message: format!("Access denied to {}: {}", request.path(), message),
                    });
                }
                404 => {
                    return Err(MealieError::NotFound {
                        resource_type: "resource".to_string(),
                        resource_id: request.path().to_string(),
                    });
                }
                code if is_retryable_status(code) && attempts < policy.max_attempts => {
                    tracing::warn!("Mealie server error ({}) for {}; retrying", status, url);
                    tokio::time::sleep(policy.delay_for(attempts)).await;
                }
                code => {
                    tracing::error!("Request to {} failed with status {}: {}", url, status, message);
                    return Err(MealieError::Api {
                        status: code,
                        message,
                    });
                }
            }
        }
    }

    fn build(&self, request: &ApiRequest, url: &str, token: &str) -> Result<RequestBuilder> {
        let mut builder = self
            .client
            .request(request.method().clone(), url)
            .bearer_auth(token)
            .timeout(self.config.timeout());

        if !request.query_params().is_empty() {
            builder = builder.query(request.query_params());
        }

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(fields) => builder.multipart(build_form(fields)?),
        };
        Ok(builder)
    }
}

fn build_form(fields: &[MultipartField]) -> Result<Form> {
    let mut form = Form::new();
    for field in fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name.clone(), value.clone()),
            MultipartField::File {
                name,
                file_name,
                mime_type,
                data,
            } => {
                let part = Part::bytes(data.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime_type)
                    .map_err(|e| MealieError::InvalidRequest(format!("invalid MIME type '{}': {}", mime_type, e)))?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

/// Decodes a 2xx body. Failures are validation errors and never partial
/// records.
fn decode<T: DeserializeOwned>(request: &ApiRequest, body: &[u8]) -> Result<T> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|source| {
        tracing::error!("Failed to parse response for {} {}: {}", request.method(), request.path(), source);
        MealieError::Validation {
            context: format!("{} {}", request.method(), request.path()),
            source,
        }
    })
}
