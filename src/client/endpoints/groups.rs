use std::sync::Arc;

use super::segment;
use crate::client::transport::{ApiRequest, Transport};
use crate::client::types::{Group, GroupCreateRequest, GroupSummary, GroupUpdateRequest, ListQuery, Listing};
use crate::error::Result;

const RESOURCE: &str = "group";

/// Household groups under `/api/groups`. Most of these calls need an admin
/// account.
pub struct GroupsManager {
    transport: Arc<Transport>,
}

impl GroupsManager {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn get_all(&self, query: &ListQuery) -> Result<Vec<GroupSummary>> {
        let request = ApiRequest::get("groups").query_pairs(query.to_params());
        let listing: Listing<GroupSummary> = self.transport.send(&request).await?;
        Ok(listing.into_items())
    }

    pub async fn get(&self, id: &str) -> Result<Group> {
        self.transport
            .send(&ApiRequest::get(group_path(id)))
            .await
            .map_err(|e| e.for_resource(RESOURCE, id))
    }

    pub async fn create(&self, group: &GroupCreateRequest) -> Result<Group> {
        tracing::info!("Creating group: {}", group.name);
        let request = ApiRequest::post("groups").json(group)?;
        self.transport.send(&request).await
    }

    pub async fn update(&self, id: &str, group: &GroupUpdateRequest) -> Result<Group> {
        let request = ApiRequest::put(group_path(id)).json(group)?;
        self.transport
            .send(&request)
            .await
            .map_err(|e| e.for_resource(RESOURCE, id))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.transport
            .send_empty(&ApiRequest::delete(group_path(id)))
            .await
            .map_err(|e| e.for_resource(RESOURCE, id))
    }
}

fn group_path(id: &str) -> String {
    format!("groups/{}", segment(id))
}
