use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Organization (tenant) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(pub i64);

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for OrgId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Action-plan identifier. One plan per organization.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(pub i64);

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for PlanId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Bucket (category column) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketId(pub i64);

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for BucketId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Work item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Assessment criterion identifier (items may link back to one).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionId(pub i64);

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for CriterionId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// User identifier, recorded on completion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Bucket membership used for grouping: either the reserved "unassigned"
/// column or a concrete bucket. On the wire an unassigned item carries a
/// null bucket id; bucket-scoped calls use the reserved id `0` instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKey {
    Unassigned,
    Bucket(BucketId),
}

impl BucketKey {
    /// Reserved wire id for the unassigned column in bucket-scoped calls.
    pub const WIRE_UNASSIGNED: i64 = 0;

    pub fn from_assignment(bucket_id: Option<BucketId>) -> Self {
        match bucket_id {
            Some(id) => Self::Bucket(id),
            None => Self::Unassigned,
        }
    }

    pub fn as_assignment(self) -> Option<BucketId> {
        match self {
            Self::Bucket(id) => Some(id),
            Self::Unassigned => None,
        }
    }

    pub fn wire_id(self) -> i64 {
        match self {
            Self::Bucket(id) => id.0,
            Self::Unassigned => Self::WIRE_UNASSIGNED,
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => f.write_str("unassigned"),
            Self::Bucket(id) => id.fmt(f),
        }
    }
}

/// Organization-scoped action plan. Fetched or created on first view,
/// never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub org_id: OrgId,
}

/// Named category column. Read-mostly here; bucket CRUD lives elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: BucketId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub weight: f64,
}

impl Bucket {
    pub fn key(&self) -> BucketKey {
        BucketKey::Bucket(self.id)
    }
}

/// A unit of work on the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub plan_id: PlanId,
    #[serde(default)]
    pub criterion_id: Option<CriterionId>,
    #[serde(default)]
    pub bucket_id: Option<BucketId>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_by: Option<UserId>,
}

impl Item {
    pub fn bucket_key(&self) -> BucketKey {
        BucketKey::from_assignment(self.bucket_id)
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Payload for bulk item creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(default)]
    pub criterion_id: Option<CriterionId>,
    #[serde(default)]
    pub bucket_id: Option<BucketId>,
    #[serde(default)]
    pub weight: f64,
}
