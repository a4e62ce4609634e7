//! Meal plan entries under `/api/groups/mealplans`.

use std::sync::Arc;

use crate::client::transport::{ApiRequest, Transport};
use crate::client::types::{
    Listing, MealPlan, MealPlanCreateRequest, MealPlanQuery, MealPlanUpdateRequest,
};
use crate::error::Result;

const RESOURCE: &str = "meal plan";

pub struct MealPlansManager {
    transport: Arc<Transport>,
}

impl MealPlansManager {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Entries in the query's date window, as ordered by the server.
    pub async fn get_all(&self, query: &MealPlanQuery) -> Result<Vec<MealPlan>> {
        let request = ApiRequest::get("groups/mealplans").query_pairs(query.to_params());
        let listing: Listing<MealPlan> = self.transport.send(&request).await?;
        Ok(listing.into_items())
    }

    pub async fn get(&self, id: i64) -> Result<MealPlan> {
        self.transport
            .send(&ApiRequest::get(plan_path(id)))
            .await
            .map_err(|e| e.for_resource(RESOURCE, &id.to_string()))
    }

    pub async fn create(&self, entry: &MealPlanCreateRequest) -> Result<MealPlan> {
        tracing::info!("Creating {} meal plan entry for {}", entry.entry_type, entry.date);
        let request = ApiRequest::post("groups/mealplans").json(entry)?;
        self.transport.send(&request).await
    }

    pub async fn update(&self, id: i64, entry: &MealPlanUpdateRequest) -> Result<MealPlan> {
        let request = ApiRequest::put(plan_path(id)).json(entry)?;
        self.transport
            .send(&request)
            .await
            .map_err(|e| e.for_resource(RESOURCE, &id.to_string()))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.transport
            .send_empty(&ApiRequest::delete(plan_path(id)))
            .await
            .map_err(|e| e.for_resource(RESOURCE, &id.to_string()))
    }
}

fn plan_path(id: i64) -> String {
    format!("groups/mealplans/{}", id)
}
