#![forbid(unsafe_code)]

mod apis;
mod client;
mod error;
mod feed;
mod transport;

pub use apis::{BucketsApi, ItemsApi, PlanApi};
pub use client::{ClientOptions, PlanboardClient};
pub use error::{PlanboardError, PlanboardErrorKind};
pub use feed::SseChangeFeed;
