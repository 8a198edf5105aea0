use std::sync::Arc;

use tracing::{debug, warn};

use bizlens_core::UserId;
use bizlens_events::{ChangeKind, Collection, DataChange};
use bizlens_inventory::count_low_stock;
use bizlens_notifications::Notification;

use super::{ChangeBus, publish};
use crate::data_source::DataSource;
use crate::query_cache::QueryCache;

/// Turns low-stock inventory rows into notifications.
///
/// Notification creation (and dedup) belongs to the backend procedure; this
/// side only counts breaches and triggers it.
#[derive(Clone)]
pub struct StockAlertGenerator {
    data: Arc<dyn DataSource>,
    notifications: Arc<QueryCache<Vec<Notification>>>,
    bus: ChangeBus,
}

impl StockAlertGenerator {
    pub fn new(data: Arc<dyn DataSource>, notifications: Arc<QueryCache<Vec<Notification>>>, bus: ChangeBus) -> Self {
        Self {
            data,
            notifications,
            bus,
        }
    }

    /// Number of items currently below their minimum level.
    ///
    /// A failed inventory read yields 0; a failed procedure call still
    /// returns the computed count.
    pub async fn scan(&self, user: UserId) -> usize {
        let items = match self.data.list_inventory(user).await {
            Ok(items) => items,
            Err(err) => {
                warn!(user_id = %user, error = %err, "stock scan could not read inventory");
                return 0;
            }
        };

        let low = count_low_stock(&items);

        match self.data.generate_stock_notifications(user).await {
            Ok(()) => {
                self.notifications
                    .invalidate_owner(Collection::Notifications.as_str(), user);
                publish(
                    &self.bus,
                    DataChange::new(user, Collection::Notifications, ChangeKind::Update, None),
                );
                debug!(user_id = %user, low_stock = low, "stock scan complete");
            }
            Err(err) => {
                warn!(user_id = %user, error = %err, "stock alert procedure failed");
            }
        }

        low
    }
}

#[cfg(test)]
mod tests {
    use bizlens_inventory::InventoryPatch;

    use crate::data_source::DataSource;
    use crate::services::test_support::{drain, seeded, subscribe};

    use super::*;

    #[tokio::test]
    async fn counts_breaching_items_and_creates_alerts_once() {
        let (services, data, owner) = seeded();
        let sub = subscribe(&services);

        // Demo rows: Monitor 3/8 and Mouse 1/10 are below minimum.
        assert_eq!(services.stock_alerts.scan(owner).await, 2);
        assert_eq!(services.stock_alerts.scan(owner).await, 2);

        let alerts = data.list_notifications(owner).await.unwrap();
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|n| !n.read && n.item_id.is_some()));

        let changes = drain(&sub);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.collection == Collection::Notifications));
    }

    #[tokio::test]
    async fn restocked_items_stop_counting() {
        let (services, _, owner) = seeded();
        let items = services.inventory.list(owner).await;
        for item in items.iter().filter(|i| i.quantity < i.minimum_level) {
            services
                .inventory
                .update(owner, item.id, InventoryPatch::quantity(item.minimum_level))
                .await
                .unwrap();
        }
        assert_eq!(services.stock_alerts.scan(owner).await, 0);
    }

    #[tokio::test]
    async fn scan_refreshes_cached_notifications() {
        let (services, _, owner) = seeded();
        assert!(services.notifications.list(owner).await.is_empty());

        services.stock_alerts.scan(owner).await;
        assert_eq!(services.notifications.list(owner).await.len(), 2);
    }
}
