//! # Mealie HTTP Client
//!
//! Async client for the Mealie REST API: authentication, retrying
//! transport and one manager per resource family.
//!
//! ## Modules
//!
//! - [`auth`] - Token handling, password login and refresh
//! - [`transport`] - Authenticated requests with retry and decoding
//! - [`endpoints`] - Recipe, meal plan, shopping list, user and group managers
//! - [`types`] - Records, request payloads and list queries
//!
//! ## Quick Start
//!
//! ```no_run
//! use mealie_sdk::client::{MealieClient, RecipeQuery};
//! use mealie_sdk::config::ClientConfig;
//!
//! # async fn example() -> mealie_sdk::Result<()> {
//! let config = ClientConfig::builder("https://mealie.example.com")
//!     .token("my-api-token")
//!     .build()?;
//! let client = MealieClient::new(config)?;
//!
//! let recipes = client.recipes().get_all(&RecipeQuery::new().search("pasta")).await?;
//! println!("Found {} recipes", recipes.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
#[allow(clippy::module_inception)]
pub mod client;
pub mod endpoints;
pub mod transport;
pub mod types;

pub use client::MealieClient;
pub use endpoints::{GroupsManager, MealPlansManager, RecipesManager, ShoppingListsManager, UsersManager};
pub use types::*;
