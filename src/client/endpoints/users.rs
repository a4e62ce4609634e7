//! # User Operations
//!
//! Account management under `/api/users`. Listing, creating and deleting
//! other users needs an admin token; [`UsersManager::current`] works for
//! any authenticated user.

use std::sync::Arc;

use super::segment;
use crate::client::transport::{ApiRequest, Transport};
use crate::client::types::{
    ListQuery, Listing, Paginated, PasswordChangeRequest, PasswordResetRequest, User,
    UserCreateRequest, UserSummary, UserUpdateRequest,
};
use crate::error::Result;

const RESOURCE: &str = "user";

pub struct UsersManager {
    transport: Arc<Transport>,
}

impl UsersManager {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_all(&self, query: &ListQuery) -> Result<Vec<UserSummary>> {
        Ok(self.get_page(query).await?.items)
    }

    pub async fn get_page(&self, query: &ListQuery) -> Result<Paginated<UserSummary>> {
        let request = ApiRequest::get("users").query_pairs(query.to_params());
        let listing: Listing<UserSummary> = self.transport.send(&request).await?;
        Ok(listing.into_page())
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        self.transport
            .send(&ApiRequest::get(user_path(id)))
            .await
            .map_err(|e| e.for_resource(RESOURCE, id))
    }

    /// The user the client is authenticated as.
    pub async fn current(&self) -> Result<User> {
        self.transport.send(&ApiRequest::get("users/self")).await
    }

    pub async fn create(&self, user: &UserCreateRequest) -> Result<User> {
        tracing::info!("Creating user: {}", user.username);
        let request = ApiRequest::post("users").json(user)?;
        self.transport.send(&request).await
    }

    pub async fn update(&self, id: &str, user: &UserUpdateRequest) -> Result<User> {
        let request = ApiRequest::put(user_path(id)).json(user)?;
        self.transport
            .send(&request)
            .await
            .map_err(|e| e.for_resource(RESOURCE, id))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting user: {}", id);
        self.transport
            .send_empty(&ApiRequest::delete(user_path(id)))
            .await
            .map_err(|e| e.for_resource(RESOURCE, id))
    }

    /// Changes the authenticated user's password.
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<()> {
        let body = PasswordChangeRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        let request = ApiRequest::put("users/password").json(&body)?;
        self.transport.send_empty(&request).await
    }

    /// Asks the server to email a reset link to `email`.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let body = PasswordResetRequest {
            email: email.to_string(),
        };
        let request = ApiRequest::post("users/forgot-password").json(&body)?;
        self.transport.send_empty(&request).await
    }
}

fn user_path(id: &str) -> String {
    format!("users/{}", segment(id))
}
