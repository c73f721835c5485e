mod buckets;
mod items;
mod plan;

pub use buckets::BucketsApi;
pub use items::ItemsApi;
pub use plan::PlanApi;
