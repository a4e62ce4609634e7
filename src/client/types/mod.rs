//! Type definitions for the Mealie API.
//!
//! Records are decoded from Mealie's camelCase JSON. Every list endpoint goes
//! through [`Listing`], which accepts both the paginated envelope and a bare
//! array.
//!
//! ## Key Types
//!
//! - [`Recipe`] / [`RecipeSummary`] - full recipe and its list-view form
//! - [`MealPlan`] - one dated meal plan entry
//! - [`ShoppingList`] / [`ShoppingListItem`] - shopping lists and their items
//! - [`User`] / [`Group`] - accounts and households
//! - [`Paginated`] - the standard pagination envelope
//!
//! ## API Compatibility
//!
//! - Timestamps go through a lenient decoder that accepts RFC 3339, naive
//!   datetimes and bare dates, since Mealie emits all three.
//! - Mealie names the modification timestamp `updateAt`; it is exposed as
//!   `updated_at`.
//! - Create and update payloads never send unset fields.

pub mod common;
pub mod group;
pub mod meal_plan;
pub mod recipe;
pub mod shopping_list;
pub mod user;

pub use common::*;
pub use group::*;
pub use meal_plan::*;
pub use recipe::*;
pub use shopping_list::*;
pub use user::*;
