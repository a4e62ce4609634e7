//! Meal plan entries. Mealie stores a meal plan as a series of dated
//! entries, each optionally pointing at a recipe.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::common::{deserialize_optional_datetime, DEFAULT_PER_PAGE};
use super::recipe::RecipeSummary;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum MealPlanType {
    Breakfast,
    Lunch,
    #[default]
    Dinner,
    Side,
    Snack,
    Drink,
    Dessert,
    /// An entry type this client does not know, kept verbatim so it survives
    /// a read-modify-write.
    Other(String),
}

impl MealPlanType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Side => "side",
            Self::Snack => "snack",
            Self::Drink => "drink",
            Self::Dessert => "dessert",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for MealPlanType {
    fn from(raw: &str) -> Self {
        match raw {
            "breakfast" => Self::Breakfast,
            "lunch" => Self::Lunch,
            "dinner" => Self::Dinner,
            "side" => Self::Side,
            "snack" => Self::Snack,
            "drink" => Self::Drink,
            "dessert" => Self::Dessert,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MealPlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MealPlanType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MealPlanType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub entry_type: MealPlanType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub recipe_id: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeSummary>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updateAt", alias = "updatedAt")]
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MealPlan {
    pub fn has_recipe(&self) -> bool {
        self.recipe_id.is_some()
    }

    /// The linked recipe's name, falling back to the entry's own title.
    pub fn display_title(&self) -> &str {
        self.recipe
            .as_ref()
            .map(|r| r.name.as_str())
            .or(self.title.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanCreateRequest {
    pub date: NaiveDate,
    pub entry_type: MealPlanType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
}

impl MealPlanCreateRequest {
    pub fn new(date: NaiveDate, entry_type: MealPlanType) -> Self {
        Self {
            date,
            entry_type,
            title: None,
            text: None,
            recipe_id: None,
        }
    }

    pub fn recipe(mut self, recipe_id: impl Into<String>) -> Self {
        self.recipe_id = Some(recipe_id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<MealPlanType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
}

/// Date window and pagination for `GET /api/groups/mealplans`.
#[derive(Debug, Clone, PartialEq)]
pub struct MealPlanQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: u32,
    pub per_page: u32,
}

impl Default for MealPlanQuery {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl MealPlanQuery {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Self::default()
        }
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("perPage".to_string(), self.per_page.to_string()),
        ];
        if let Some(start) = self.start_date {
            params.push(("start_date".to_string(), start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("end_date".to_string(), end.format("%Y-%m-%d").to_string()));
        }
        params
    }
}
