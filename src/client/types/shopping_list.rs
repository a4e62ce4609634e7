//! Shopping lists and their items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{deserialize_optional_datetime, NamedReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShoppingListItemStatus {
    Checked,
    Unchecked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub id: String,
    #[serde(default)]
    pub shopping_list_id: Option<String>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub is_food: bool,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<NamedReference>,
    #[serde(default)]
    pub food: Option<NamedReference>,
    #[serde(default)]
    pub label: Option<NamedReference>,
    #[serde(default)]
    pub recipe_references: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updateAt", alias = "updatedAt")]
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ShoppingListItem {
    pub fn status(&self) -> ShoppingListItemStatus {
        if self.checked {
            ShoppingListItemStatus::Checked
        } else {
            ShoppingListItemStatus::Unchecked
        }
    }

    /// Human readable line such as `2 cup flour (sifted)`.
    pub fn display_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(quantity) = self.quantity.filter(|q| *q != 0.0) {
            parts.push(quantity.to_string());
        }
        if let Some(unit) = &self.unit {
            parts.push(unit.name.clone());
        }
        if let Some(food) = self.food.as_ref().or(self.label.as_ref()) {
            parts.push(food.name.clone());
        }

        let mut display = parts.join(" ");
        if let Some(note) = self.note.as_deref().filter(|n| !n.is_empty()) {
            if display.is_empty() {
                display = note.to_string();
            } else {
                display.push_str(&format!(" ({})", note));
            }
        }
        display
    }

    pub fn has_recipe_references(&self) -> bool {
        !self.recipe_references.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub list_items: Vec<ShoppingListItem>,
    #[serde(default)]
    pub recipe_references: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updateAt", alias = "updatedAt")]
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ShoppingList {
    pub fn item_count(&self) -> usize {
        self.list_items.len()
    }

    pub fn checked_count(&self) -> usize {
        self.list_items.iter().filter(|i| i.checked).count()
    }

    pub fn unchecked_count(&self) -> usize {
        self.item_count() - self.checked_count()
    }

    /// Percentage of checked items, 0 for an empty list.
    pub fn completion_percentage(&self) -> f64 {
        if self.list_items.is_empty() {
            return 0.0;
        }
        self.checked_count() as f64 / self.item_count() as f64 * 100.0
    }

    pub fn items_by_status(&self, status: ShoppingListItemStatus) -> Vec<&ShoppingListItem> {
        self.list_items.iter().filter(|i| i.status() == status).collect()
    }

    pub fn is_complete(&self) -> bool {
        !self.list_items.is_empty() && self.unchecked_count() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListSummary {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updateAt", alias = "updatedAt")]
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListCreateRequest {
    pub name: String,
}

impl ShoppingListCreateRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_items: Option<Vec<ShoppingListItem>>,
}

/// New list item. `shopping_list_id` is filled in by
/// `ShoppingListsManager::add_item`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItemCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopping_list_id: Option<String>,
    pub checked: bool,
    pub position: i32,
    pub is_food: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_id: Option<String>,
}

impl ShoppingListItemCreateRequest {
    pub fn note(text: impl Into<String>) -> Self {
        Self {
            note: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItemUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopping_list_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_food: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_id: Option<String>,
}
