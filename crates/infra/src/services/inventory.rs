use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use bizlens_core::{RecordId, UserId};
use bizlens_events::{ChangeKind, Collection, DataChange};
use bizlens_inventory::{InventoryItem, InventoryPatch, NewInventoryItem};

use super::{ChangeBus, publish};
use crate::data_source::{DataResult, DataSource};
use crate::query_cache::{QueryCache, QueryKey};

/// Inventory CRUD. Every write publishes an `inventory` change, which is
/// what drives metrics sync and stock alerts.
#[derive(Clone)]
pub struct InventoryService {
    data: Arc<dyn DataSource>,
    cache: Arc<QueryCache<Vec<InventoryItem>>>,
    bus: ChangeBus,
}

impl InventoryService {
    pub fn new(data: Arc<dyn DataSource>, cache: Arc<QueryCache<Vec<InventoryItem>>>, bus: ChangeBus) -> Self {
        Self { data, cache, bus }
    }

    pub async fn list(&self, user: UserId) -> Vec<InventoryItem> {
        let key = QueryKey::owned(Collection::Inventory.as_str(), user);
        match self.cache.get_or_fetch(key, || self.data.list_inventory(user)).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(user_id = %user, error = %err, "failed to load inventory");
                Vec::new()
            }
        }
    }

    pub async fn get(&self, user: UserId, id: RecordId) -> DataResult<InventoryItem> {
        self.data.get_inventory(user, id).await
    }

    pub async fn create(&self, user: UserId, input: NewInventoryItem) -> DataResult<InventoryItem> {
        let item = InventoryItem::from_new(user, input, Utc::now())?;
        let stored = self.data.insert_inventory(item).await?;
        self.changed(user, ChangeKind::Insert, stored.id);
        Ok(stored)
    }

    pub async fn update(&self, user: UserId, id: RecordId, patch: InventoryPatch) -> DataResult<InventoryItem> {
        patch.validate()?;
        let mut item = self.data.get_inventory(user, id).await?;
        item.apply_patch(&patch, Utc::now())?;
        let stored = self.data.update_inventory(item).await?;
        self.changed(user, ChangeKind::Update, id);
        Ok(stored)
    }

    pub async fn set_quantity(&self, user: UserId, id: RecordId, quantity: i64) -> DataResult<InventoryItem> {
        self.update(user, id, InventoryPatch::quantity(quantity)).await
    }

    /// Add `delta` (may be negative) to the on-hand quantity.
    pub async fn adjust(&self, user: UserId, id: RecordId, delta: i64) -> DataResult<InventoryItem> {
        let current = self.data.get_inventory(user, id).await?;
        let quantity = current.adjusted_quantity(delta)?;
        self.update(user, id, InventoryPatch::quantity(quantity)).await
    }

    pub async fn delete(&self, user: UserId, id: RecordId) -> DataResult<()> {
        self.data.delete_inventory(user, id).await?;
        self.changed(user, ChangeKind::Delete, id);
        Ok(())
    }

    fn changed(&self, user: UserId, kind: ChangeKind, id: RecordId) {
        self.cache.invalidate_owner(Collection::Inventory.as_str(), user);
        publish(&self.bus, DataChange::new(user, Collection::Inventory, kind, Some(id)));
    }
}
