//! Recipe records and the payloads used to create, update and query them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{
    deserialize_optional_datetime, parse_duration_minutes, NamedReference, OrderDirection,
    DEFAULT_PER_PAGE, MAX_PER_PAGE,
};

/// A complete recipe as returned by `GET /api/recipes/{slug}`.
///
/// `name` is the only field Mealie always populates; a body without it is
/// rejected as a validation error rather than producing an empty recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recipe_yield: Option<String>,
    #[serde(default)]
    pub recipe_yield_quantity: Option<f64>,
    #[serde(default)]
    pub recipe_servings: Option<f64>,
    #[serde(default)]
    pub recipe_ingredient: Vec<RecipeIngredient>,
    #[serde(default)]
    pub recipe_instructions: Vec<RecipeInstruction>,
    /// ISO 8601 durations such as `PT15M`, or free text.
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub perform_time: Option<String>,
    #[serde(default)]
    pub total_time: Option<String>,
    #[serde(default)]
    pub recipe_category: Vec<RecipeCategory>,
    #[serde(default)]
    pub tags: Vec<RecipeTag>,
    #[serde(default)]
    pub tools: Vec<RecipeTool>,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
    #[serde(default)]
    pub assets: Vec<RecipeAsset>,
    #[serde(default)]
    pub settings: Option<RecipeSettings>,
    #[serde(rename = "orgURL", default)]
    pub org_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub date_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extras: HashMap<String, serde_json::Value>,
}

impl Recipe {
    pub fn total_time_minutes(&self) -> Option<u32> {
        self.total_time.as_deref().and_then(parse_duration_minutes)
    }

    pub fn prep_time_minutes(&self) -> Option<u32> {
        self.prep_time.as_deref().and_then(parse_duration_minutes)
    }

    pub fn cook_time_minutes(&self) -> Option<u32> {
        self.cook_time.as_deref().and_then(parse_duration_minutes)
    }

    pub fn is_public(&self) -> bool {
        self.settings.as_ref().map_or(false, |s| s.public)
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.recipe_category.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn ingredient_count(&self) -> usize {
        self.recipe_ingredient.len()
    }

    pub fn instruction_count(&self) -> usize {
        self.recipe_instructions.len()
    }
}

/// Recipe as it appears in list responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recipe_category: Vec<RecipeCategory>,
    #[serde(default)]
    pub tags: Vec<RecipeTag>,
    #[serde(default)]
    pub tools: Vec<RecipeTool>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub date_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<NamedReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food: Option<NamedReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_amount: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

impl RecipeIngredient {
    /// Free-text ingredient line, the form Mealie uses when no parser ran.
    pub fn note(text: impl Into<String>) -> Self {
        Self {
            note: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInstruction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub text: String,
}

impl RecipeInstruction {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

macro_rules! organizer {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub id: Option<String>,
            pub name: String,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub slug: Option<String>,
        }

        impl $name {
            pub fn named(name: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    ..Self::default()
                }
            }
        }
    };
}

organizer!(
    /// Recipe category, e.g. "Dinner".
    RecipeCategory
);
organizer!(
    /// Free-form recipe tag.
    RecipeTag
);
organizer!(
    /// Kitchen tool required by a recipe.
    RecipeTool
);

/// Nutrition facts. Mealie stores these as free-text strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    #[serde(default)]
    pub calories: Option<String>,
    #[serde(default)]
    pub fat_content: Option<String>,
    #[serde(default)]
    pub protein_content: Option<String>,
    #[serde(default)]
    pub carbohydrate_content: Option<String>,
    #[serde(default)]
    pub fiber_content: Option<String>,
    #[serde(default)]
    pub sodium_content: Option<String>,
    #[serde(default)]
    pub sugar_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeAsset {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeSettings {
    pub public: bool,
    pub show_nutrition: bool,
    pub show_assets: bool,
    pub landscape_view: bool,
    pub disable_comments: bool,
    pub disable_amount: bool,
    pub locked: bool,
}

/// Payload for `POST /api/recipes`. Unset fields are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_yield: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipe_ingredient: Vec<RecipeIngredient>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipe_instructions: Vec<RecipeInstruction>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recipe_category: Vec<RecipeCategory>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<RecipeTag>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<RecipeTool>,
}

impl RecipeCreateRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Payload for `PUT`/`PATCH /api/recipes/{slug}`. Only the fields that are
/// set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_yield: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_ingredient: Option<Vec<RecipeIngredient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_instructions: Option<Vec<RecipeInstruction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_category: Option<Vec<RecipeCategory>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<RecipeTag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<RecipeTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<RecipeSettings>,
}

/// Body for `POST /api/recipes/create-url`.
#[derive(Debug, Serialize)]
pub struct RecipeImportRequest {
    pub url: String,
    pub include_tags: bool,
}

/// Filters for recipe listings.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeQuery {
    pub page: u32,
    pub per_page: u32,
    pub order_by: Option<String>,
    pub order_direction: OrderDirection,
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub tools: Vec<String>,
    /// Raw Mealie query-filter expression, e.g. `tags.name CONTAINS "vegan"`.
    pub query_filter: Option<String>,
}

impl Default for RecipeQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            order_by: None,
            order_direction: OrderDirection::Asc,
            search: None,
            categories: Vec::new(),
            tags: Vec::new(),
            tools: Vec::new(),
            query_filter: None,
        }
    }
}

impl RecipeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by = Some(field.into());
        self.order_direction = direction;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.tools.push(tool.into());
        self
    }

    pub fn query_filter(mut self, filter: impl Into<String>) -> Self {
        self.query_filter = Some(filter.into());
        self
    }

    /// Query pairs for `GET /api/recipes`. `perPage` is clamped to the
    /// server maximum and list filters repeat their key once per value.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            (
                "perPage".to_string(),
                self.per_page.min(MAX_PER_PAGE).to_string(),
            ),
        ];
        if let Some(order_by) = &self.order_by {
            params.push(("orderBy".to_string(), order_by.clone()));
            params.push((
                "orderDirection".to_string(),
                self.order_direction.as_str().to_string(),
            ));
        }
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        for (key, values) in [
            ("categories", &self.categories),
            ("tags", &self.tags),
            ("tools", &self.tools),
        ] {
            params.extend(values.iter().map(|v| (key.to_string(), v.clone())));
        }
        if let Some(filter) = &self.query_filter {
            params.push(("queryFilter".to_string(), filter.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_mealie_recipe_body() {
        let recipe: Recipe = serde_json::from_value(serde_json::json!({
            "id": "5f0c",
            "name": "Tomato Soup",
            "slug": "tomato-soup",
            "recipeIngredient": [{"note": "4 tomatoes", "unit": null, "food": {"id": "f1", "name": "tomato"}}],
            "recipeInstructions": [{"text": "Simmer"}],
            "totalTime": "PT1H15M",
            "tags": [{"name": "soup", "slug": "soup"}],
            "settings": {"public": true},
            "orgURL": "https://example.com/soup",
            "dateAdded": "2024-02-10",
            "dateUpdated": "2024-02-11T08:00:00.512000"
        }))
        .unwrap();

        assert_eq!(recipe.total_time_minutes(), Some(75));
        assert_eq!(recipe.tag_names(), vec!["soup"]);
        assert_eq!(recipe.ingredient_count(), 1);
        assert_eq!(recipe.recipe_ingredient[0].food.as_ref().unwrap().name, "tomato");
        assert!(recipe.is_public());
        assert_eq!(recipe.org_url.as_deref(), Some("https://example.com/soup"));
        assert!(recipe.date_added.is_some());
    }

    #[test]
    fn recipe_without_name_is_rejected() {
        let result: Result<Recipe, _> = serde_json::from_str(r#"{"slug": "nameless"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn create_request_omits_unset_fields() {
        let mut request = RecipeCreateRequest::new("Pancakes");
        request.recipe_ingredient.push(RecipeIngredient::note("2 eggs"));

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "name": "Pancakes",
                "recipeIngredient": [{"note": "2 eggs"}]
            })
        );
    }

    #[test]
    fn query_clamps_page_size_and_repeats_filters() {
        let params = RecipeQuery::new()
            .per_page(500)
            .tag("vegan")
            .tag("quick")
            .query_filter("rating >= 4")
            .to_params();

        assert!(params.contains(&("perPage".to_string(), "100".to_string())));
        assert_eq!(params.iter().filter(|(k, _)| k == "tags").count(), 2);
        assert!(params.contains(&("queryFilter".to_string(), "rating >= 4".to_string())));
    }
}
