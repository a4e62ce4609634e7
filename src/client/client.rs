use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;

use crate::client::auth::{token_preview, AuthManager};
use crate::client::endpoints::{
    GroupsManager, MealPlansManager, RecipesManager, ShoppingListsManager, UsersManager,
};
use crate::client::transport::Transport;
use crate::config::ClientConfig;
use crate::error::{MealieError, Result};

/// Entry point to the Mealie API.
///
/// Cloning is cheap and every clone shares the same connection pool and
/// token, so one client can be handed to many tasks.
#[derive(Clone)]
pub struct MealieClient {
    config: Arc<ClientConfig>,
    auth: Arc<AuthManager>,
    transport: Arc<Transport>,
}

impl MealieClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = Arc::new(config);
        let http = build_http_client(&config)?;
        let auth = Arc::new(AuthManager::new(&config, http.clone()));
        let transport = Arc::new(Transport::new(config.clone(), http, auth.clone()));

        tracing::debug!("Created Mealie client for {}", config.base_url());
        Ok(Self {
            config,
            auth,
            transport,
        })
    }

    /// Builds a client from the `MEALIE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Logs in (or installs the static token) ahead of the first request.
    /// Requests authenticate lazily, so calling this is optional.
    pub async fn authenticate(&self) -> Result<()> {
        let token = self.auth.authenticate().await?;
        tracing::info!("Authenticated with Mealie at {}", self.config.base_url());
        tracing::debug!("Using token: {}", token_preview(&token));
        Ok(())
    }

    pub async fn logout(&self) {
        self.auth.logout().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated().await
    }

    pub async fn current_token(&self) -> Option<String> {
        self.auth.current_token().await
    }

    pub async fn token_preview(&self) -> Option<String> {
        self.auth.current_token().await.map(|t| token_preview(&t))
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.transport.clone())
    }

    pub fn meal_plans(&self) -> MealPlansManager {
        MealPlansManager::new(self.transport.clone())
    }

    pub fn shopping_lists(&self) -> ShoppingListsManager {
        ShoppingListsManager::new(self.transport.clone())
    }

    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.transport.clone())
    }

    pub fn groups(&self) -> GroupsManager {
        GroupsManager::new(self.transport.clone())
    }
}

fn build_http_client(config: &ClientConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if !config.verify_ssl() {
        tracing::warn!("TLS certificate verification is disabled");
    }

    Client::builder()
        .user_agent(format!("mealie-sdk-rust/{}", crate::VERSION))
        .default_headers(headers)
        .timeout(config.timeout())
        .danger_accept_invalid_certs(!config.verify_ssl())
        .build()
        .map_err(|e| MealieError::Config(format!("failed to build HTTP client: {}", e)))
}
