use async_trait::async_trait;
use planboard_core::{
    Bucket, BucketKey, Error as CoreError, Item, ItemId, NewItem, OrgId, Plan, PlanId,
    PlanTransport,
};

use crate::PlanboardClient;

impl PlanboardClient {
    /// The client authenticates as one organization; calls scoped to any
    /// other are a caller bug, not something to send upstream.
    fn ensure_org(&self, org_id: OrgId) -> planboard_core::Result<()> {
        if org_id != self.org_id() {
            return Err(CoreError::invalid_input(format!(
                "client is scoped to org {}, got {org_id}",
                self.org_id()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PlanTransport for PlanboardClient {
    async fn fetch_plan(&self, org_id: OrgId) -> planboard_core::Result<Plan> {
        self.ensure_org(org_id)?;
        self.plan()
            .fetch()
            .await
            .map_err(|err| CoreError::transport("fetch plan", err))
    }

    async fn list_items(&self, org_id: OrgId, _plan_id: PlanId) -> planboard_core::Result<Vec<Item>> {
        self.ensure_org(org_id)?;
        self.items()
            .list()
            .await
            .map_err(|err| CoreError::transport("list items", err))
    }

    async fn fetch_item(&self, org_id: OrgId, item_id: ItemId) -> planboard_core::Result<Item> {
        self.ensure_org(org_id)?;
        self.items()
            .fetch(item_id)
            .await
            .map_err(|err| CoreError::transport("fetch item", err))
    }

    async fn create_items(
        &self,
        org_id: OrgId,
        plan_id: PlanId,
        items: Vec<NewItem>,
    ) -> planboard_core::Result<()> {
        self.ensure_org(org_id)?;
        self.items()
            .bulk_create(plan_id, &items)
            .await
            .map_err(|err| CoreError::transport("create items", err))
    }

    async fn update_item(&self, org_id: OrgId, item: &Item) -> planboard_core::Result<()> {
        self.ensure_org(org_id)?;
        self.items()
            .update(item)
            .await
            .map_err(|err| CoreError::transport("update item", err))
    }

    async fn save_bucket_items(
        &self,
        org_id: OrgId,
        plan_id: PlanId,
        bucket: BucketKey,
        items: &[Item],
    ) -> planboard_core::Result<()> {
        self.ensure_org(org_id)?;
        self.buckets()
            .save_items(plan_id, bucket, items)
            .await
            .map_err(|err| CoreError::transport("save bucket items", err))
    }

    async fn delete_item(&self, org_id: OrgId, item_id: ItemId) -> planboard_core::Result<()> {
        self.ensure_org(org_id)?;
        self.items()
            .delete(item_id)
            .await
            .map_err(|err| CoreError::transport("delete item", err))
    }

    async fn list_buckets(&self, org_id: OrgId, _plan_id: PlanId) -> planboard_core::Result<Vec<Bucket>> {
        self.ensure_org(org_id)?;
        self.buckets()
            .list()
            .await
            .map_err(|err| CoreError::transport("list buckets", err))
    }
}
