use std::sync::Arc;

use tracing::{debug, info, warn};

use bizlens_analytics::PeriodMetric;
use bizlens_core::UserId;
use bizlens_events::{ChangeKind, Collection, DataChange};
use bizlens_inventory::total_on_hand;

use super::{ChangeBus, publish};
use crate::data_source::DataSource;
use crate::query_cache::QueryCache;

/// Keeps the newest metric row's `inventory_count` equal to on-hand stock.
#[derive(Clone)]
pub struct MetricsSync {
    data: Arc<dyn DataSource>,
    metrics: Arc<QueryCache<Vec<PeriodMetric>>>,
    bus: ChangeBus,
}

impl MetricsSync {
    pub fn new(data: Arc<dyn DataSource>, metrics: Arc<QueryCache<Vec<PeriodMetric>>>, bus: ChangeBus) -> Self {
        Self { data, metrics, bus }
    }

    /// Recompute on-hand stock for `user` and store it on the latest metric.
    ///
    /// Returns the synced total, or `None` when there was nothing to write
    /// into, the total does not fit an `i64`, or a backend call failed
    /// (failures are logged, never raised).
    pub async fn sync(&self, user: UserId) -> Option<i64> {
        let items = match self.data.list_inventory(user).await {
            Ok(items) => items,
            Err(err) => {
                warn!(user_id = %user, error = %err, "metrics sync could not read inventory");
                return None;
            }
        };
        let Some(total) = total_on_hand(&items) else {
            warn!(user_id = %user, items = items.len(), "on-hand total overflows, metrics sync skipped");
            return None;
        };

        let metrics = match self.data.list_metrics(user).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(user_id = %user, error = %err, "metrics sync could not read metrics");
                return None;
            }
        };
        let Some(latest) = metrics.last() else {
            debug!(user_id = %user, "no metric rows to sync into");
            return None;
        };

        let count = total as f64;
        if latest.inventory_count == count {
            return Some(total);
        }

        if let Err(err) = self.data.update_metric_inventory(user, latest.id, count).await {
            warn!(user_id = %user, metric_id = %latest.id, error = %err, "metrics sync write failed");
            return None;
        }

        self.metrics.invalidate_owner(Collection::Metrics.as_str(), user);
        publish(
            &self.bus,
            DataChange::new(user, Collection::Metrics, ChangeKind::Update, Some(latest.id)),
        );
        info!(user_id = %user, inventory_count = total, "synced inventory into latest metric");
        Some(total)
    }
}
