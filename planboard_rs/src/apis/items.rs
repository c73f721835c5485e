use planboard_core::{Item, ItemId, NewItem, OrgId, PlanId};
use reqwest::Method;
use serde::Serialize;

use crate::{PlanboardClient, PlanboardError};

#[derive(Debug, Clone)]
pub struct ItemsApi {
    client: PlanboardClient,
}

impl ItemsApi {
    pub(crate) fn new(client: PlanboardClient) -> Self {
        Self { client }
    }

    /// All items on the organization's plan.
    pub async fn list(&self) -> Result<Vec<Item>, PlanboardError> {
        self.client
            .request_json(Method::GET, "/api/v1/plan/items", None::<&()>, None::<&()>)
            .await
    }

    pub async fn fetch(&self, item_id: ItemId) -> Result<Item, PlanboardError> {
        self.client
            .request_json(
                Method::GET,
                &format!("/api/v1/items/{item_id}"),
                None::<&()>,
                None::<&()>,
            )
            .await
    }

    /// Bulk create. The payload carries the plan and organization ids in
    /// addition to the header scope.
    pub async fn bulk_create(
        &self,
        plan_id: PlanId,
        items: &[NewItem],
    ) -> Result<(), PlanboardError> {
        #[derive(Serialize)]
        struct Body<'a> {
            plan_id: PlanId,
            org_id: OrgId,
            items: &'a [NewItem],
        }
        let body = Body {
            plan_id,
            org_id: self.client.org_id(),
            items,
        };
        self.client
            .request_empty(Method::POST, "/api/v1/plan/items/bulk", Some(&body))
            .await
    }

    /// Full-representation update.
    pub async fn update(&self, item: &Item) -> Result<(), PlanboardError> {
        self.client
            .request_empty(Method::PUT, &format!("/api/v1/items/{}", item.id), Some(item))
            .await
    }

    pub async fn delete(&self, item_id: ItemId) -> Result<(), PlanboardError> {
        self.client
            .request_empty(
                Method::DELETE,
                &format!("/api/v1/items/{item_id}"),
                None::<&()>,
            )
            .await
    }
}
