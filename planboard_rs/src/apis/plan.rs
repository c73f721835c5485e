use planboard_core::Plan;
use reqwest::Method;

use crate::{PlanboardClient, PlanboardError};

#[derive(Debug, Clone)]
pub struct PlanApi {
    client: PlanboardClient,
}

impl PlanApi {
    pub(crate) fn new(client: PlanboardClient) -> Self {
        Self { client }
    }

    /// Fetch the organization's plan; the server creates it on first view.
    pub async fn fetch(&self) -> Result<Plan, PlanboardError> {
        self.client
            .request_json(Method::GET, "/api/v1/plan", None::<&()>, None::<&()>)
            .await
    }
}
