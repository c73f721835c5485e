//! Planboard core: the action-plan board synchronization engine.
//!
//! An in-memory item store with optimistic drag-and-drop mutations, a
//! derived bucket projection, asynchronous persistence behind the
//! [`PlanTransport`] seam, and reconciliation of concurrent edits via a
//! per-organization change feed with a debounced user notice.
//!
//! The engine is headless: rendering, routing, and session bootstrap live
//! elsewhere. [`PlanController`] is the entry point; [`MemoryFeed`] and the
//! transport trait keep everything testable without a server.

#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod error;
pub mod feed;
pub mod models;
pub mod notify;
pub mod ordering;
pub mod projection;
pub mod store;
pub mod transport;

pub use config::PlanSyncConfig;
pub use controller::PlanController;
pub use error::{Error, Result};
pub use feed::{ChangeFeed, DynChangeFeed, FeedSubscription, ItemEvent, MemoryFeed, item_channel};
pub use models::{
    Bucket, BucketId, BucketKey, CriterionId, Item, ItemId, NewItem, OrgId, Plan, PlanId, UserId,
};
pub use notify::{Debouncer, Notice};
pub use ordering::{plan_reorder, plan_transfer, renumber};
pub use projection::{BoardColumn, BoardProjection, project};
pub use store::{BoardState, ItemAction, apply};
pub use transport::{DynPlanTransport, PlanTransport};
