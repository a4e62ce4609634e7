//! Resource managers, one per Mealie resource family.
//!
//! Managers are thin: they build an [`ApiRequest`](super::transport::ApiRequest),
//! hand it to the shared [`Transport`](super::transport::Transport) and tag a
//! 404 with the resource that was asked for.

pub mod groups;
pub mod meal_plans;
pub mod recipes;
pub mod shopping_lists;
pub mod users;

pub use groups::GroupsManager;
pub use meal_plans::MealPlansManager;
pub use recipes::RecipesManager;
pub use shopping_lists::ShoppingListsManager;
pub use users::UsersManager;

use serde::de::DeserializeOwned;

use crate::error::{MealieError, Result};

/// Percent-encodes a slug or id so it stays a single path segment.
pub(crate) fn segment(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

/// Decodes a value already fetched through [`Transport::send_value`](super::transport::Transport::send_value).
pub(crate) fn from_value<T: DeserializeOwned>(context: &str, value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| MealieError::Validation {
        context: context.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_become_single_segments() {
        assert_eq!(segment("tomato-soup"), "tomato-soup");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }
}
