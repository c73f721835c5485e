use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Bucket, BucketKey, Item, ItemId, NewItem, OrgId, Plan, PlanId};

/// Persistence boundary for plan, bucket, and item operations.
///
/// Every call is scoped to one organization. Implementations do not retry;
/// a failed call is reported once and the caller decides what to do with it.
#[async_trait]
pub trait PlanTransport: Send + Sync {
    /// Fetch the organization's plan, creating it server-side on first view.
    async fn fetch_plan(&self, org_id: OrgId) -> Result<Plan>;

    /// All items on the organization's plan.
    async fn list_items(&self, org_id: OrgId, plan_id: PlanId) -> Result<Vec<Item>>;

    /// Single item by id.
    async fn fetch_item(&self, org_id: OrgId, item_id: ItemId) -> Result<Item>;

    /// Bulk create. The caller has already deduplicated by criterion.
    async fn create_items(
        &self,
        org_id: OrgId,
        plan_id: PlanId,
        items: Vec<NewItem>,
    ) -> Result<()>;

    /// Full-representation update of one item.
    async fn update_item(&self, org_id: OrgId, item: &Item) -> Result<()>;

    /// Replace one bucket's ordered item list. `bucket` may be the
    /// unassigned sentinel.
    async fn save_bucket_items(
        &self,
        org_id: OrgId,
        plan_id: PlanId,
        bucket: BucketKey,
        items: &[Item],
    ) -> Result<()>;

    async fn delete_item(&self, org_id: OrgId, item_id: ItemId) -> Result<()>;

    /// Bucket list for the plan, read-only here.
    async fn list_buckets(&self, org_id: OrgId, plan_id: PlanId) -> Result<Vec<Bucket>>;
}

pub type DynPlanTransport = Arc<dyn PlanTransport>;
