use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;

use crate::config::PlanSyncConfig;
use crate::error::{Error, Result};
use crate::feed::{ChangeFeed, FeedSubscription, ItemEvent, item_channel};
use crate::models::{BucketKey, CriterionId, Item, ItemId, NewItem, OrgId, Plan, UserId};
use crate::notify::{Debouncer, Notice};
use crate::ordering::{plan_reorder, plan_transfer};
use crate::projection::BoardProjection;
use crate::store::{BoardState, ItemAction};
use crate::transport::DynPlanTransport;

/// Owns the canonical board for one organization's plan.
///
/// All mutations are optimistic: the local state changes first, persistence
/// runs after, and a failed save is reported to the caller without touching
/// the already-applied edit (unless `revert_on_save_failure` is set). Remote
/// edits from other clients arrive through the change feed and land in the
/// same store, followed by a debounced [`Notice::RemoteChangesApplied`].
///
/// Dropping the controller aborts the feed consumer, so a late remote event
/// can never mutate state after teardown. Switching organizations means
/// dropping this controller and attaching a new one.
pub struct PlanController {
    inner: Arc<Inner>,
    consumer: JoinHandle<()>,
}

struct Inner {
    cfg: PlanSyncConfig,
    org_id: OrgId,
    plan: Plan,
    transport: DynPlanTransport,
    state: RwLock<BoardState>,
    notices: broadcast::Sender<Notice>,
}

impl PlanController {
    /// Attaches to an organization's plan: validates the config, fetches (or
    /// creates) the plan, subscribes the change feed, and performs the
    /// initial load. Plan fetch and feed subscription failures are fatal;
    /// load failures are not (the board starts empty and the error is
    /// logged).
    #[tracing::instrument(level = "debug", skip_all, fields(org_id = %org_id))]
    pub async fn attach(
        cfg: PlanSyncConfig,
        org_id: OrgId,
        transport: DynPlanTransport,
        feed: &dyn ChangeFeed,
    ) -> Result<Self> {
        cfg.validate()?;

        let plan = transport.fetch_plan(org_id).await?;
        let subscription = feed.subscribe(&item_channel(org_id)).await?;

        let (notices, _) = broadcast::channel(cfg.notice_buffer);
        let inner = Arc::new(Inner {
            cfg,
            org_id,
            plan,
            transport,
            state: RwLock::new(BoardState::new()),
            notices,
        });

        inner.load().await;

        let consumer = tokio::spawn(Arc::clone(&inner).consume_feed(subscription));
        Ok(Self { inner, consumer })
    }

    pub fn org_id(&self) -> OrgId {
        self.inner.org_id
    }

    pub fn plan(&self) -> &Plan {
        &self.inner.plan
    }

    /// Current bucket projection. The same `Arc` comes back until the store
    /// changes.
    pub async fn board(&self) -> Arc<BoardProjection> {
        self.inner.state.write().await.board()
    }

    /// Flat copy of the item collection, in store order.
    pub async fn items(&self) -> Vec<Item> {
        self.inner.state.read().await.items().to_vec()
    }

    /// Notices emitted by the feed consumer. Subscribers that lag past the
    /// configured buffer miss the oldest notices.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    /// Re-fetches buckets and items. Same failure semantics as the initial
    /// load: a failed fetch logs a warning and leaves that collection empty.
    #[tracing::instrument(level = "debug", skip_all, fields(org_id = %self.inner.org_id))]
    pub async fn reload(&self) {
        self.inner.load().await;
    }

    /// Moves the item at `from` within one column to `to`, renumbering the
    /// whole column, then persists that column. Out-of-range indices leave
    /// the state untouched.
    #[tracing::instrument(level = "debug", skip_all, fields(org_id = %self.inner.org_id, bucket = %bucket))]
    pub async fn reorder_bucket(&self, bucket: BucketKey, from: usize, to: usize) -> Result<()> {
        let (updated, snapshot) = {
            let mut state = self.inner.state.write().await;
            let board = state.board();
            let updated = plan_reorder(board.items_in(bucket), from, to)?;
            let snapshot = self.inner.snapshot(&state);
            state.apply(ItemAction::Add(updated.clone()));
            (updated, snapshot)
        };

        let result = self
            .inner
            .transport
            .save_bucket_items(self.inner.org_id, self.inner.plan.id, bucket, &updated)
            .await;
        self.inner.settle_save(result, snapshot, "reorder_bucket").await
    }

    /// Moves the item at `source[from]` into `dest` at `to`. The destination
    /// column is renumbered and persisted; the item leaves the source column
    /// when the projection recomputes. A same-column move is a reorder.
    #[tracing::instrument(level = "debug", skip_all, fields(org_id = %self.inner.org_id, source = %source, dest = %dest))]
    pub async fn move_item(
        &self,
        source: BucketKey,
        from: usize,
        dest: BucketKey,
        to: usize,
    ) -> Result<()> {
        if source == dest {
            return self.reorder_bucket(source, from, to).await;
        }

        let (updated, snapshot) = {
            let mut state = self.inner.state.write().await;
            let board = state.board();
            let updated = plan_transfer(
                board.items_in(source),
                board.items_in(dest),
                from,
                to,
                dest.as_assignment(),
            )?;
            let snapshot = self.inner.snapshot(&state);
            state.apply(ItemAction::Add(updated.clone()));
            (updated, snapshot)
        };

        let result = self
            .inner
            .transport
            .save_bucket_items(self.inner.org_id, self.inner.plan.id, dest, &updated)
            .await;
        self.inner.settle_save(result, snapshot, "move_item").await
    }

    /// Reassigns one item to a bucket directly (no target position): the
    /// weight resets to zero and a single-item update is issued rather than
    /// a bucket save.
    #[tracing::instrument(level = "debug", skip_all, fields(org_id = %self.inner.org_id, item_id = %item_id))]
    pub async fn assign_bucket(&self, item_id: ItemId, bucket: BucketKey) -> Result<()> {
        let (updated, snapshot) = {
            let mut state = self.inner.state.write().await;
            let Some(existing) = state.item(item_id) else {
                return Err(Error::not_found(format!("item {item_id}")));
            };
            let mut updated = existing.clone();
            updated.bucket_id = bucket.as_assignment();
            updated.weight = 0.0;
            let snapshot = self.inner.snapshot(&state);
            state.apply(ItemAction::Add(vec![updated.clone()]));
            (updated, snapshot)
        };

        let result = self
            .inner
            .transport
            .update_item(self.inner.org_id, &updated)
            .await;
        self.inner.settle_save(result, snapshot, "assign_bucket").await
    }

    /// Bulk-creates items, deduplicated by criterion against both the batch
    /// itself and items already on the board. Candidates without a criterion
    /// always pass. Returns the number submitted; zero means no request was
    /// made. The store is not touched; created items arrive via the feed or
    /// an explicit reload.
    #[tracing::instrument(level = "debug", skip_all, fields(org_id = %self.inner.org_id))]
    pub async fn create_items(&self, candidates: Vec<NewItem>) -> Result<usize> {
        let batch: Vec<NewItem> = {
            let state = self.inner.state.read().await;
            let mut seen: HashSet<CriterionId> = state
                .items()
                .iter()
                .filter_map(|item| item.criterion_id)
                .collect();
            candidates
                .into_iter()
                .filter(|candidate| match candidate.criterion_id {
                    Some(criterion) => seen.insert(criterion),
                    None => true,
                })
                .collect()
        };

        if batch.is_empty() {
            return Ok(0);
        }
        let submitted = batch.len();
        self.inner
            .transport
            .create_items(self.inner.org_id, self.inner.plan.id, batch)
            .await?;
        Ok(submitted)
    }

    /// Marks the item completed by `user`. The server is updated first; the
    /// local copy changes only via the feed or `refresh_item`.
    #[tracing::instrument(level = "debug", skip_all, fields(org_id = %self.inner.org_id, item_id = %item_id))]
    pub async fn complete_item(&self, item_id: ItemId, user: UserId) -> Result<()> {
        let mut item = self.current_item(item_id).await?;
        item.completed_at = Some(Utc::now());
        item.completed_by = Some(user);
        self.inner
            .transport
            .update_item(self.inner.org_id, &item)
            .await
    }

    /// Clears the item's completion state. Same update-first semantics as
    /// `complete_item`.
    #[tracing::instrument(level = "debug", skip_all, fields(org_id = %self.inner.org_id, item_id = %item_id))]
    pub async fn reopen_item(&self, item_id: ItemId) -> Result<()> {
        let mut item = self.current_item(item_id).await?;
        item.completed_at = None;
        item.completed_by = None;
        self.inner
            .transport
            .update_item(self.inner.org_id, &item)
            .await
    }

    /// Deletes the item server-side. No optimistic removal; the caller
    /// reloads, or the feed reports the deletion.
    #[tracing::instrument(level = "debug", skip_all, fields(org_id = %self.inner.org_id, item_id = %item_id))]
    pub async fn delete_item(&self, item_id: ItemId) -> Result<()> {
        self.inner
            .transport
            .delete_item(self.inner.org_id, item_id)
            .await
    }

    /// Fetches one item and folds it into the board. The explicit
    /// single-item reload used after complete/reopen.
    #[tracing::instrument(level = "debug", skip_all, fields(org_id = %self.inner.org_id, item_id = %item_id))]
    pub async fn refresh_item(&self, item_id: ItemId) -> Result<()> {
        let item = self
            .inner
            .transport
            .fetch_item(self.inner.org_id, item_id)
            .await?;
        self.inner.state.write().await.apply(ItemAction::Add(vec![item]));
        Ok(())
    }

    /// Detaches from the plan: stops the feed consumer so no further remote
    /// change can land. Dropping the controller does the same.
    pub fn detach(self) {}

    async fn current_item(&self, item_id: ItemId) -> Result<Item> {
        self.inner
            .state
            .read()
            .await
            .item(item_id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("item {item_id}")))
    }
}

impl Drop for PlanController {
    fn drop(&mut self) {
        self.consumer.abort();
    }
}

impl Inner {
    #[tracing::instrument(level = "debug", skip_all, fields(org_id = %self.org_id))]
    async fn load(&self) {
        let buckets = match self.transport.list_buckets(self.org_id, self.plan.id).await {
            Ok(buckets) => buckets,
            Err(err) => {
                tracing::warn!(org_id = %self.org_id, error = %err, "bucket load failed, starting empty");
                Vec::new()
            }
        };
        let items = match self.transport.list_items(self.org_id, self.plan.id).await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(org_id = %self.org_id, error = %err, "item load failed, starting empty");
                Vec::new()
            }
        };

        let mut state = self.state.write().await;
        state.set_buckets(buckets);
        state.apply(ItemAction::Replace(items));
    }

    fn snapshot(&self, state: &BoardState) -> Option<Vec<Item>> {
        self.cfg
            .revert_on_save_failure
            .then(|| state.items().to_vec())
    }

    /// Resolves an optimistic mutation against its persistence result. On
    /// failure the error goes back to the caller; the local edit stays
    /// unless a snapshot was taken.
    async fn settle_save(
        &self,
        result: Result<()>,
        snapshot: Option<Vec<Item>>,
        op: &'static str,
    ) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(org_id = %self.org_id, op, error = %err, "persistence failed");
                if let Some(items) = snapshot {
                    self.state.write().await.apply(ItemAction::Replace(items));
                }
                Err(err)
            }
        }
    }

    async fn consume_feed(self: Arc<Self>, mut subscription: FeedSubscription) {
        let mut debouncer = Debouncer::from_millis(self.cfg.notice_debounce_ms);
        tracing::info!(org_id = %self.org_id, "change feed attached");

        while let Some(event) = subscription.next_event().await {
            match event {
                ItemEvent::Added(item_id) | ItemEvent::Updated(item_id) => {
                    match self.transport.fetch_item(self.org_id, item_id).await {
                        Ok(item) => {
                            self.state.write().await.apply(ItemAction::Add(vec![item]));
                            self.notify_remote_change(&mut debouncer);
                        }
                        Err(err) => {
                            // The item's current representation is unknown;
                            // keeping a stale copy would show wrong data.
                            tracing::warn!(
                                org_id = %self.org_id,
                                item_id = %item_id,
                                error = %err,
                                "item refetch failed, dropping from board"
                            );
                            self.state
                                .write()
                                .await
                                .apply(ItemAction::Remove(vec![item_id]));
                        }
                    }
                }
                ItemEvent::Removed(ids) => {
                    self.state.write().await.apply(ItemAction::Remove(ids));
                    self.notify_remote_change(&mut debouncer);
                }
            }
        }

        tracing::info!(org_id = %self.org_id, "change feed closed");
    }

    fn notify_remote_change(&self, debouncer: &mut Debouncer) {
        if debouncer.try_fire() {
            let _ = self.notices.send(Notice::RemoteChangesApplied);
        }
    }
}
