use planboard_core::{Bucket, BucketKey, Item, PlanId};
use reqwest::Method;
use serde::Serialize;

use crate::{PlanboardClient, PlanboardError};

#[derive(Debug, Clone)]
pub struct BucketsApi {
    client: PlanboardClient,
}

impl BucketsApi {
    pub(crate) fn new(client: PlanboardClient) -> Self {
        Self { client }
    }

    /// Bucket list for the plan. Bucket CRUD lives elsewhere; this client
    /// only reads them.
    pub async fn list(&self) -> Result<Vec<Bucket>, PlanboardError> {
        self.client
            .request_json(Method::GET, "/api/v1/plan/buckets", None::<&()>, None::<&()>)
            .await
    }

    /// Replace one bucket's ordered item list. The unassigned column goes
    /// out under its reserved wire id.
    pub async fn save_items(
        &self,
        plan_id: PlanId,
        bucket: BucketKey,
        items: &[Item],
    ) -> Result<(), PlanboardError> {
        #[derive(Serialize)]
        struct Body<'a> {
            plan_id: PlanId,
            items: &'a [Item],
        }
        let body = Body { plan_id, items };
        self.client
            .request_empty(
                Method::PUT,
                &format!("/api/v1/plan/buckets/{}/items", bucket.wire_id()),
                Some(&body),
            )
            .await
    }
}
