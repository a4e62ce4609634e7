//! # Mealie SDK
//!
//! Async Rust client for [Mealie](https://mealie.io), the self-hosted recipe
//! manager.
//!
//! ## Client Module
//!
//! The [`client`] module holds [`MealieClient`] and the resource managers
//! for recipes, meal plans, shopping lists, users and groups.
//!
//! ## Configuration
//!
//! [`ClientConfig`](config::ClientConfig) is built in code or read from the
//! `MEALIE_*` environment variables. It carries the credentials, timeout and
//! retry policy.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mealie_sdk::MealieClient;
//!
//! # async fn example() -> mealie_sdk::Result<()> {
//! let client = MealieClient::from_env()?;
//! let me = client.users().current().await?;
//! println!("Signed in as {}", me.display_name());
//! # Ok(())
//! # }
//! ```
//!
//! The SDK logs through `tracing` and stays silent unless the application
//! installs a subscriber.

pub mod client;
pub mod config;
pub mod error;

pub use client::MealieClient;
pub use config::{Backoff, ClientConfig, Credentials, RetryPolicy};
pub use error::{MealieError, Result};

/// Version of this SDK, sent in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
