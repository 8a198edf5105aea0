//! Entity trait: identity + ownership for dashboard records.

use crate::id::{RecordId, UserId};

/// A persisted record that belongs to exactly one user.
///
/// Every collection the dashboard reads (inventory, notifications, employees,
/// period metrics) is filtered by owner, so the owner is part of the contract.
pub trait Entity {
    /// Returns the record identifier.
    fn id(&self) -> RecordId;

    /// Returns the owning user.
    fn owner_id(&self) -> UserId;
}
