//! Change notification model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizlens_core::{RecordId, UserId};

/// Collections that emit change notifications.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Metrics,
    Inventory,
    Notifications,
    Employees,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Metrics => "metrics",
            Collection::Inventory => "inventory",
            Collection::Notifications => "notifications",
            Collection::Employees => "employees",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A write observed on one of the user's collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataChange {
    pub user_id: UserId,
    pub collection: Collection,
    pub kind: ChangeKind,
    /// `None` for bulk writes (e.g. "mark all read").
    pub record_id: Option<RecordId>,
    pub occurred_at: DateTime<Utc>,
}

impl DataChange {
    pub fn new(user_id: UserId, collection: Collection, kind: ChangeKind, record_id: Option<RecordId>) -> Self {
        Self {
            user_id,
            collection,
            kind,
            record_id,
            occurred_at: Utc::now(),
        }
    }

    /// SSE topic name, e.g. `inventory.update`.
    pub fn topic(&self) -> String {
        let kind = match self.kind {
            ChangeKind::Insert => "insert",
            ChangeKind::Update => "update",
            ChangeKind::Delete => "delete",
        };
        format!("{}.{}", self.collection.as_str(), kind)
    }
}
