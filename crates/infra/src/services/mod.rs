//! Application services called by the HTTP layer and background workers.
//!
//! Every service reads through a shared `QueryCache`, invalidates what it
//! writes, and publishes a `DataChange` after each successful write.

use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use bizlens_analytics::PeriodMetric;
use bizlens_core::UserId;
use bizlens_employees::Employee;
use bizlens_events::{DataChange, EventBus, InMemoryEventBus};
use bizlens_inventory::InventoryItem;
use bizlens_notifications::Notification;

use crate::data_source::DataSource;
use crate::query_cache::QueryCache;

mod chart_data;
mod employees;
mod inventory;
mod metrics_sync;
mod notifications;
mod stock_alerts;

pub use chart_data::ChartDataService;
pub use employees::EmployeeService;
pub use inventory::InventoryService;
pub use metrics_sync::MetricsSync;
pub use notifications::NotificationService;
pub use stock_alerts::StockAlertGenerator;

/// In-process change bus shared by services, workers and the SSE stream.
pub type ChangeBus = Arc<InMemoryEventBus<DataChange>>;

/// One cache per cached value type, shared by every service.
#[derive(Debug, Clone)]
pub struct Caches {
    pub metrics: Arc<QueryCache<Vec<PeriodMetric>>>,
    pub inventory: Arc<QueryCache<Vec<InventoryItem>>>,
    pub notifications: Arc<QueryCache<Vec<Notification>>>,
    pub employees: Arc<QueryCache<Vec<Employee>>>,
}

impl Caches {
    pub fn new(max_age: Option<Duration>) -> Self {
        Self {
            metrics: Arc::new(QueryCache::new(max_age)),
            inventory: Arc::new(QueryCache::new(max_age)),
            notifications: Arc::new(QueryCache::new(max_age)),
            employees: Arc::new(QueryCache::new(max_age)),
        }
    }

    pub fn clear(&self) {
        self.metrics.clear();
        self.inventory.clear();
        self.notifications.clear();
        self.employees.clear();
    }
}

/// The full service set over one data source.
#[derive(Clone)]
pub struct Services {
    pub chart: ChartDataService,
    pub stock_alerts: StockAlertGenerator,
    pub metrics_sync: MetricsSync,
    pub notifications: NotificationService,
    pub inventory: InventoryService,
    pub employees: EmployeeService,
    caches: Caches,
    bus: ChangeBus,
}

impl Services {
    pub fn new(data: Arc<dyn DataSource>, cache_max_age: Option<Duration>) -> Self {
        Self::with_bus(data, cache_max_age, Arc::new(InMemoryEventBus::new()))
    }

    pub fn with_bus(data: Arc<dyn DataSource>, cache_max_age: Option<Duration>, bus: ChangeBus) -> Self {
        let caches = Caches::new(cache_max_age);
        Self {
            chart: ChartDataService::new(data.clone(), caches.metrics.clone()),
            stock_alerts: StockAlertGenerator::new(data.clone(), caches.notifications.clone(), bus.clone()),
            metrics_sync: MetricsSync::new(data.clone(), caches.metrics.clone(), bus.clone()),
            notifications: NotificationService::new(data.clone(), caches.notifications.clone(), bus.clone()),
            inventory: InventoryService::new(data.clone(), caches.inventory.clone(), bus.clone()),
            employees: EmployeeService::new(data, caches.employees.clone(), bus.clone()),
            caches,
            bus,
        }
    }

    pub fn bus(&self) -> ChangeBus {
        self.bus.clone()
    }

    pub fn caches(&self) -> &Caches {
        &self.caches
    }

    /// Startup pass for `users`: sync metrics, then scan stock.
    pub async fn mount(&self, users: &[UserId]) {
        for &user in users {
            self.metrics_sync.sync(user).await;
            self.stock_alerts.scan(user).await;
        }
    }
}

/// Best-effort publish; a dead bus never fails the write that preceded it.
pub(crate) fn publish(bus: &ChangeBus, change: DataChange) {
    debug!(user_id = %change.user_id, topic = %change.topic(), "publishing data change");
    let Ok(()) = bus.publish(change);
}
