//! Shopping lists under `/api/groups/shopping/lists` and their items under
//! `/api/groups/shopping/items`.

use std::sync::Arc;

use serde_json::Value;

use super::{from_value, segment};
use crate::client::transport::{ApiRequest, Transport};
use crate::client::types::{
    ListQuery, Listing, Paginated, ShoppingList, ShoppingListCreateRequest, ShoppingListItem,
    ShoppingListItemCreateRequest, ShoppingListItemUpdateRequest, ShoppingListSummary,
    ShoppingListUpdateRequest,
};
use crate::error::{MealieError, Result};

const LISTS: &str = "groups/shopping/lists";
const ITEMS: &str = "groups/shopping/items";

pub struct ShoppingListsManager {
    transport: Arc<Transport>,
}

impl ShoppingListsManager {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_all(&self, query: &ListQuery) -> Result<Vec<ShoppingListSummary>> {
        Ok(self.get_page(query).await?.items)
    }

    pub async fn get_page(&self, query: &ListQuery) -> Result<Paginated<ShoppingListSummary>> {
        let request = ApiRequest::get(LISTS).query_pairs(query.to_params());
        let listing: Listing<ShoppingListSummary> = self.transport.send(&request).await?;
        Ok(listing.into_page())
    }

    pub async fn get(&self, id: &str) -> Result<ShoppingList> {
        self.transport
            .send(&ApiRequest::get(list_path(id)))
            .await
            .map_err(|e| e.for_resource("shopping list", id))
    }

    pub async fn create(&self, list: &ShoppingListCreateRequest) -> Result<ShoppingList> {
        tracing::info!("Creating shopping list: {}", list.name);
        let request = ApiRequest::post(LISTS).json(list)?;
        self.transport.send(&request).await
    }

    pub async fn update(&self, id: &str, list: &ShoppingListUpdateRequest) -> Result<ShoppingList> {
        let request = ApiRequest::put(list_path(id)).json(list)?;
        self.transport
            .send(&request)
            .await
            .map_err(|e| e.for_resource("shopping list", id))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.transport
            .send_empty(&ApiRequest::delete(list_path(id)))
            .await
            .map_err(|e| e.for_resource("shopping list", id))
    }

    /// Adds an item to the list `list_id`. Any list id already set on `item`
    /// is overridden.
    pub async fn add_item(
        &self,
        list_id: &str,
        item: &ShoppingListItemCreateRequest,
    ) -> Result<ShoppingListItem> {
        let mut item = item.clone();
        item.shopping_list_id = Some(list_id.to_string());

        tracing::debug!("Adding item to shopping list {}", list_id);
        let request = ApiRequest::post(ITEMS).json(&item)?;
        let response = self
            .transport
            .send_value(&request)
            .await
            .map_err(|e| e.for_resource("shopping list", list_id))?;
        single_item(response, "createdItems", "POST groups/shopping/items")
    }

    pub async fn update_item(
        &self,
        item_id: &str,
        item: &ShoppingListItemUpdateRequest,
    ) -> Result<ShoppingListItem> {
        let request = ApiRequest::put(item_path(item_id)).json(item)?;
        let response = self
            .transport
            .send_value(&request)
            .await
            .map_err(|e| e.for_resource("shopping list item", item_id))?;
        single_item(response, "updatedItems", "PUT groups/shopping/items")
    }

    pub async fn delete_item(&self, item_id: &str) -> Result<()> {
        self.transport
            .send_empty(&ApiRequest::delete(item_path(item_id)))
            .await
            .map_err(|e| e.for_resource("shopping list item", item_id))
    }

    /// Adds the ingredients of `recipe_id` to the list and returns the
    /// updated list.
    pub async fn add_recipe(&self, list_id: &str, recipe_id: &str) -> Result<ShoppingList> {
        tracing::info!("Adding recipe {} to shopping list {}", recipe_id, list_id);
        let path = format!("{}/recipe/{}", list_path(list_id), segment(recipe_id));
        self.transport
            .send(&ApiRequest::post(path))
            .await
            .map_err(|e| e.for_resource("shopping list", list_id))
    }
}

/// Item writes answer either with the item itself or with a change set such
/// as `{"createdItems": [...], "updatedItems": [...]}`.
fn single_item(response: Value, change_key: &str, context: &str) -> Result<ShoppingListItem> {
    let Some(changed) = response.get(change_key) else {
        return from_value(context, response);
    };

    let items: Vec<ShoppingListItem> = from_value(context, changed.clone())?;
    items.into_iter().next().ok_or_else(|| MealieError::Validation {
        context: context.to_string(),
        source: serde::de::Error::custom(format!("no entries in {}", change_key)),
    })
}

fn list_path(id: &str) -> String {
    format!("{}/{}", LISTS, segment(id))
}

fn item_path(id: &str) -> String {
    format!("{}/{}", ITEMS, segment(id))
}
