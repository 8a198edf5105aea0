//! Backend data-source seam.
//!
//! The dashboard keeps no storage of its own: every read and write goes to a
//! managed backend (a PostgREST-style API in production, an in-memory store in
//! dev/tests). Every call is scoped to the owning user.

use async_trait::async_trait;

use bizlens_analytics::PeriodMetric;
use bizlens_core::{RecordId, UserId};
use bizlens_employees::Employee;
use bizlens_inventory::InventoryItem;
use bizlens_notifications::Notification;

pub mod error;
pub mod in_memory;
pub mod owner_table;
pub mod postgrest;

pub use error::{DataResult, DataSourceError};
pub use in_memory::InMemoryDataSource;
pub use postgrest::PostgrestDataSource;

/// Name of the backend procedure that materializes stock-alert notifications.
pub const STOCK_ALERT_PROCEDURE: &str = "generate_stock_notifications";

#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// Metric rows ordered by `period_end` ascending.
    async fn list_metrics(&self, owner: UserId) -> DataResult<Vec<PeriodMetric>>;

    async fn insert_metric(&self, metric: PeriodMetric) -> DataResult<PeriodMetric>;

    /// Overwrite `inventory_count` on one metric row.
    async fn update_metric_inventory(&self, owner: UserId, metric_id: RecordId, inventory_count: f64) -> DataResult<()>;

    /// Inventory rows ordered by name.
    async fn list_inventory(&self, owner: UserId) -> DataResult<Vec<InventoryItem>>;

    async fn get_inventory(&self, owner: UserId, id: RecordId) -> DataResult<InventoryItem>;

    async fn insert_inventory(&self, item: InventoryItem) -> DataResult<InventoryItem>;

    /// Replace a stored row (matched by id and owner).
    async fn update_inventory(&self, item: InventoryItem) -> DataResult<InventoryItem>;

    async fn delete_inventory(&self, owner: UserId, id: RecordId) -> DataResult<()>;

    /// Run the backend stock-alert procedure for `owner`.
    ///
    /// Dedup of repeated alerts is the procedure's responsibility.
    async fn generate_stock_notifications(&self, owner: UserId) -> DataResult<()>;

    /// Notifications, newest first.
    async fn list_notifications(&self, owner: UserId) -> DataResult<Vec<Notification>>;

    async fn insert_notification(&self, notification: Notification) -> DataResult<Notification>;

    async fn set_notification_read(&self, owner: UserId, id: RecordId, read: bool) -> DataResult<Notification>;

    /// Mark every unread notification read; returns how many changed.
    async fn mark_all_notifications_read(&self, owner: UserId) -> DataResult<usize>;

    /// Employees ordered by name.
    async fn list_employees(&self, owner: UserId) -> DataResult<Vec<Employee>>;

    async fn get_employee(&self, owner: UserId, id: RecordId) -> DataResult<Employee>;

    async fn insert_employee(&self, employee: Employee) -> DataResult<Employee>;

    async fn update_employee(&self, employee: Employee) -> DataResult<Employee>;

    async fn delete_employee(&self, owner: UserId, id: RecordId) -> DataResult<()>;
}
