use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::models::{ItemId, OrgId};

/// Remote change to the organization's plan items, as delivered by the feed.
///
/// Added/updated payloads carry the item id only; the current representation
/// is always re-fetched rather than trusted from the push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemEvent {
    Added(ItemId),
    Updated(ItemId),
    Removed(Vec<ItemId>),
}

impl ItemEvent {
    /// Wire name of the event kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Added(_) => "items-added",
            Self::Updated(_) => "items-updated",
            Self::Removed(_) => "items-removed",
        }
    }
}

/// Feed channel for an organization's plan items. Deterministic in the
/// organization id so every client watching the same organization lands on
/// the same channel.
pub fn item_channel(org_id: OrgId) -> String {
    format!("plan_items:{org_id}")
}

/// Queue of feed events for one channel.
///
/// Delivery is decoupled from handling: the feed pushes into the queue, the
/// consumer drains it at its own pace. `None` from `next_event` means the
/// feed is gone. Dropping the subscription aborts the pump task, when the
/// implementation spawned one.
#[derive(Debug)]
pub struct FeedSubscription {
    rx: mpsc::Receiver<ItemEvent>,
    pump: Option<JoinHandle<()>>,
}

impl FeedSubscription {
    pub const DEFAULT_CAPACITY: usize = 64;

    /// A subscription fed directly through the returned sender.
    pub fn channel(capacity: usize) -> (mpsc::Sender<ItemEvent>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx, pump: None })
    }

    /// Attaches the task feeding this subscription so it stops with it.
    pub fn with_pump(mut self, pump: JoinHandle<()>) -> Self {
        self.pump = Some(pump);
        self
    }

    pub async fn next_event(&mut self) -> Option<ItemEvent> {
        self.rx.recv().await
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}

/// Source of remote item events, one logical channel per organization.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Subscribe to a channel (see `item_channel`). Reconnection policy is
    /// the implementation's concern; the queue closing signals permanent
    /// disconnect.
    async fn subscribe(&self, channel: &str) -> Result<FeedSubscription>;
}

pub type DynChangeFeed = Arc<dyn ChangeFeed>;

/// In-process feed hub for tests and local development.
///
/// Publishing fans out to every live subscription on the channel. A
/// subscriber whose queue is full misses the event rather than blocking the
/// publisher.
#[derive(Debug)]
pub struct MemoryFeed {
    channels: DashMap<String, Vec<mpsc::Sender<ItemEvent>>>,
    capacity: usize,
}

impl MemoryFeed {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
            capacity: FeedSubscription::DEFAULT_CAPACITY,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity,
        }
    }

    /// Delivers an event to current subscribers of the channel; returns how
    /// many of them received it.
    pub fn publish(&self, channel: &str, event: ItemEvent) -> usize {
        let Some(mut senders) = self.channels.get_mut(channel) else {
            return 0;
        };
        senders.retain(|tx| !tx.is_closed());
        let mut delivered = 0;
        for tx in senders.iter() {
            if tx.try_send(event.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}

impl Default for MemoryFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangeFeed for MemoryFeed {
    #[tracing::instrument(level = "debug", skip_all)]
    async fn subscribe(&self, channel: &str) -> Result<FeedSubscription> {
        let (tx, sub) = FeedSubscription::channel(self.capacity);
        self.channels.entry(channel.to_string()).or_default().push(tx);
        Ok(sub)
    }
}
