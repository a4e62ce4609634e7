//! # Recipe Operations
//!
//! Everything under `/api/recipes`: listing and search, CRUD, URL import,
//! image handling and a few conveniences built on top (duplicate, random).
//!
//! Recipes are addressed by slug or id; Mealie accepts either in the path.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use super::{from_value, segment};
use crate::client::transport::{ApiRequest, MultipartField, Transport};
use crate::client::types::{
    Listing, Paginated, Recipe, RecipeCreateRequest, RecipeImportRequest, RecipeQuery,
    RecipeSummary, RecipeUpdateRequest,
};
use crate::error::{MealieError, Result};

const RESOURCE: &str = "recipe";

/// Fields Mealie assigns to a new recipe; a copy must not carry them.
const IDENTITY_FIELDS: [&str; 5] = ["id", "slug", "userId", "dateAdded", "dateUpdated"];

pub struct RecipesManager {
    transport: Arc<Transport>,
}

impl RecipesManager {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Lists recipe summaries matching `query`, in the order the server
    /// returns them.
    pub async fn get_all(&self, query: &RecipeQuery) -> Result<Vec<RecipeSummary>> {
        Ok(self.get_page(query).await?.items)
    }

    /// Same as [`get_all`](Self::get_all) but keeps the pagination envelope.
    pub async fn get_page(&self, query: &RecipeQuery) -> Result<Paginated<RecipeSummary>> {
        tracing::debug!("Listing recipes (page {}, perPage {})", query.page, query.per_page);
        let request = ApiRequest::get("recipes").query_pairs(query.to_params());
        let listing: Listing<RecipeSummary> = self.transport.send(&request).await?;
        Ok(listing.into_page())
    }

    pub async fn get(&self, key: &str) -> Result<Recipe> {
        self.transport
            .send(&ApiRequest::get(recipe_path(key)))
            .await
            .map_err(|e| e.for_resource(RESOURCE, key))
    }

    /// Creates a recipe. Mealie answers with the new slug, in which case the
    /// full record is fetched before returning.
    pub async fn create(&self, recipe: &RecipeCreateRequest) -> Result<Recipe> {
        tracing::info!("Creating recipe: {}", recipe.name);
        let request = ApiRequest::post("recipes").json(recipe)?;
        let created = self.transport.send_value(&request).await?;
        self.resolve(created, "POST recipes").await
    }

    /// Replaces the recipe with `PUT`.
    pub async fn update(&self, key: &str, recipe: &RecipeUpdateRequest) -> Result<Recipe> {
        let request = ApiRequest::put(recipe_path(key)).json(recipe)?;
        self.transport
            .send(&request)
            .await
            .map_err(|e| e.for_resource(RESOURCE, key))
    }

    /// Partial update with `PATCH`; only the fields set on `recipe` change.
    pub async fn patch(&self, key: &str, recipe: &RecipeUpdateRequest) -> Result<Recipe> {
        let request = ApiRequest::patch(recipe_path(key)).json(recipe)?;
        self.transport
            .send(&request)
            .await
            .map_err(|e| e.for_resource(RESOURCE, key))
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        tracing::info!("Deleting recipe: {}", key);
        self.transport
            .send_empty(&ApiRequest::delete(recipe_path(key)))
            .await
            .map_err(|e| e.for_resource(RESOURCE, key))
    }

    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<RecipeSummary>> {
        self.get_all(&RecipeQuery::new().search(query).per_page(limit))
            .await
    }

    pub async fn get_by_category(&self, category: &str, limit: u32) -> Result<Vec<RecipeSummary>> {
        self.get_all(&RecipeQuery::new().category(category).per_page(limit))
            .await
    }

    pub async fn get_by_tag(&self, tag: &str, limit: u32) -> Result<Vec<RecipeSummary>> {
        self.get_all(&RecipeQuery::new().tag(tag).per_page(limit))
            .await
    }

    /// Asks the server to scrape a recipe from `url`.
    pub async fn import_from_url(&self, url: &str, include_tags: bool) -> Result<Recipe> {
        tracing::info!("Importing recipe from URL: {}", url);
        let body = RecipeImportRequest {
            url: url.to_string(),
            include_tags,
        };
        let request = ApiRequest::post("recipes/create-url").json(&body)?;
        let created = self.transport.send_value(&request).await?;
        self.resolve(created, "POST recipes/create-url").await
    }

    /// URL of the recipe image. No request is made.
    pub fn image_url(&self, key: &str, extension: &str) -> String {
        format!(
            "{}?extension={}",
            self.transport.config().api_url(&format!("{}/image", recipe_path(key))),
            urlencoding::encode(extension)
        )
    }

    /// Uploads `path` as the recipe image. `extension` defaults to the
    /// file's own extension.
    pub async fn upload_image(
        &self,
        key: &str,
        path: impl AsRef<Path>,
        extension: Option<&str>,
    ) -> Result<()> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;

        let file_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg")
            .to_ascii_lowercase();
        let extension = extension.map(str::to_string).unwrap_or_else(|| file_ext.clone());
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        tracing::info!("Uploading image {} ({} bytes) for recipe {}", file_name, data.len(), key);

        let request = ApiRequest::put(format!("{}/image", recipe_path(key))).multipart(vec![
            MultipartField::File {
                name: "image".to_string(),
                file_name,
                mime_type: mime_for_extension(&file_ext).to_string(),
                data,
            },
            MultipartField::Text {
                name: "extension".to_string(),
                value: extension,
            },
        ]);

        self.transport
            .send_empty(&request)
            .await
            .map_err(|e| e.for_resource(RESOURCE, key))
    }

    pub async fn delete_image(&self, key: &str) -> Result<()> {
        self.transport
            .send_empty(&ApiRequest::delete(format!("{}/image", recipe_path(key))))
            .await
            .map_err(|e| e.for_resource(RESOURCE, key))
    }

    /// Copies a recipe under a new name (`"<name> (Copy)"` by default).
    /// Every field is carried over except the ones the server assigns.
    pub async fn duplicate(&self, key: &str, new_name: Option<&str>) -> Result<Recipe> {
        let original = self.get(key).await?;
        let name = new_name
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} (Copy)", original.name));
        tracing::info!("Duplicating recipe '{}' as '{}'", key, name);

        let mut copy = serde_json::to_value(&original)
            .map_err(|e| MealieError::InvalidRequest(format!("cannot encode recipe copy: {}", e)))?;
        if let Value::Object(fields) = &mut copy {
            for identity in IDENTITY_FIELDS {
                fields.remove(identity);
            }
            fields.insert("name".to_string(), Value::String(name));
        }

        let request = ApiRequest::post("recipes").json(&copy)?;
        let created = self.transport.send_value(&request).await?;
        self.resolve(created, "POST recipes").await
    }

    pub async fn random(&self, limit: u32) -> Result<Vec<RecipeSummary>> {
        let request = ApiRequest::get("recipes/random").query("limit", limit);
        match self.transport.send_value(&request).await? {
            Value::Null => Ok(Vec::new()),
            single @ Value::Object(_) if single.get("items").is_none() => {
                Ok(vec![from_value("GET recipes/random", single)?])
            }
            listing => Ok(from_value::<Listing<RecipeSummary>>("GET recipes/random", listing)?.into_items()),
        }
    }

    async fn resolve(&self, created: Value, context: &str) -> Result<Recipe> {
        match created {
            Value::String(slug) => {
                tracing::debug!("Server returned slug '{}', fetching full recipe", slug);
                self.get(&slug).await
            }
            record => from_value(context, record),
        }
    }
}

fn recipe_path(key: &str) -> String {
    format!("recipes/{}", segment(key))
}

fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}
