//! In-memory backend for tests/dev.

use async_trait::async_trait;
use chrono::{Datelike, Months, NaiveDate, Utc};

use bizlens_analytics::PeriodMetric;
use bizlens_core::{RecordId, UserId};
use bizlens_employees::Employee;
use bizlens_inventory::{InventoryItem, NewInventoryItem, low_stock_items};
use bizlens_notifications::{NewNotification, Notification};

use super::error::DataResult;
use super::owner_table::OwnerTable;
use super::DataSource;

/// In-memory stand-in for the managed backend.
///
/// Implements the stock-alert procedure locally: one warning per breaching
/// item, skipped while an unread alert for that item already exists.
#[derive(Debug, Default)]
pub struct InMemoryDataSource {
    metrics: OwnerTable<PeriodMetric>,
    inventory: OwnerTable<InventoryItem>,
    notifications: OwnerTable<Notification>,
    employees: OwnerTable<Employee>,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed twelve monthly metric rows and a few inventory rows for `owner`.
    ///
    /// Deterministic: the same owner always gets the same figures.
    pub fn seed_demo(&self, owner: UserId) -> DataResult<()> {
        let today = Utc::now().date_naive();
        let first_of_month = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);

        for i in 0..12u32 {
            // Period ends on the last day of each of the 12 previous months.
            let period_end = first_of_month
                .checked_sub_months(Months::new(11 - i))
                .and_then(|d| d.pred_opt())
                .unwrap_or(today);
            let sales = 4000.0 + 250.0 * f64::from(i);
            self.metrics.insert(PeriodMetric::new(owner, period_end, sales, sales * 0.6, 150.0))?;
        }

        let demo = [
            ("Notebook", "NB-01", 12, 5, 3500.0),
            ("Monitor", "MN-02", 3, 8, 900.0),
            ("Teclado", "TC-03", 40, 10, 120.0),
            ("Mouse", "MS-04", 1, 10, 60.0),
        ];
        for (name, sku, quantity, minimum_level, unit_price) in demo {
            let input = NewInventoryItem {
                name: name.to_string(),
                sku: sku.to_string(),
                quantity,
                minimum_level,
                unit_price,
            };
            self.inventory.insert(InventoryItem::from_new(owner, input, Utc::now())?)?;
        }

        Ok(())
    }
}

#[async_trait]
impl DataSource for InMemoryDataSource {
    async fn list_metrics(&self, owner: UserId) -> DataResult<Vec<PeriodMetric>> {
        let mut rows = self.metrics.list(owner)?;
        rows.sort_by_key(|m| (m.period_end, m.id));
        Ok(rows)
    }

    async fn insert_metric(&self, metric: PeriodMetric) -> DataResult<PeriodMetric> {
        self.metrics.insert(metric)
    }

    async fn update_metric_inventory(&self, owner: UserId, metric_id: RecordId, inventory_count: f64) -> DataResult<()> {
        self.metrics
            .update(owner, metric_id, |m| m.inventory_count = inventory_count)?;
        Ok(())
    }

    async fn list_inventory(&self, owner: UserId) -> DataResult<Vec<InventoryItem>> {
        let mut rows = self.inventory.list(owner)?;
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn get_inventory(&self, owner: UserId, id: RecordId) -> DataResult<InventoryItem> {
        self.inventory.get(owner, id)
    }

    async fn insert_inventory(&self, item: InventoryItem) -> DataResult<InventoryItem> {
        self.inventory.insert(item)
    }

    async fn update_inventory(&self, item: InventoryItem) -> DataResult<InventoryItem> {
        self.inventory.replace(item)
    }

    async fn delete_inventory(&self, owner: UserId, id: RecordId) -> DataResult<()> {
        self.inventory.remove(owner, id)
    }

    async fn generate_stock_notifications(&self, owner: UserId) -> DataResult<()> {
        let items = self.inventory.list(owner)?;
        let existing = self.notifications.list(owner)?;
        let now = Utc::now();

        for item in low_stock_items(&items) {
            if existing.iter().any(|n| n.is_pending_stock_alert_for(item.id)) {
                continue;
            }
            let notification = Notification::from_new(owner, NewNotification::stock_alert(item), now)?;
            self.notifications.insert(notification)?;
        }
        Ok(())
    }

    async fn list_notifications(&self, owner: UserId) -> DataResult<Vec<Notification>> {
        let mut rows = self.notifications.list(owner)?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn insert_notification(&self, notification: Notification) -> DataResult<Notification> {
        self.notifications.insert(notification)
    }

    async fn set_notification_read(&self, owner: UserId, id: RecordId, read: bool) -> DataResult<Notification> {
        self.notifications.update(owner, id, |n| n.read = read)
    }

    async fn mark_all_notifications_read(&self, owner: UserId) -> DataResult<usize> {
        self.notifications.update_where(owner, |n| !n.read, |n| n.read = true)
    }

    async fn list_employees(&self, owner: UserId) -> DataResult<Vec<Employee>> {
        let mut rows = self.employees.list(owner)?;
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn get_employee(&self, owner: UserId, id: RecordId) -> DataResult<Employee> {
        self.employees.get(owner, id)
    }

    async fn insert_employee(&self, employee: Employee) -> DataResult<Employee> {
        self.employees.insert(employee)
    }

    async fn update_employee(&self, employee: Employee) -> DataResult<Employee> {
        self.employees.replace(employee)
    }

    async fn delete_employee(&self, owner: UserId, id: RecordId) -> DataResult<()> {
        self.employees.remove(owner, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::DataSourceError;

    fn item(owner: UserId, name: &str, quantity: i64, minimum_level: i64) -> InventoryItem {
        let input = NewInventoryItem {
            name: name.to_string(),
            sku: String::new(),
            quantity,
            minimum_level,
            unit_price: 1.0,
        };
        InventoryItem::from_new(owner, input, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn records_are_isolated_per_owner() {
        let ds = InMemoryDataSource::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let stored = ds.insert_inventory(item(alice, "Cabo", 1, 0)).await.unwrap();

        assert_eq!(ds.list_inventory(alice).await.unwrap().len(), 1);
        assert!(ds.list_inventory(bob).await.unwrap().is_empty());
        assert!(matches!(
            ds.get_inventory(bob, stored.id).await,
            Err(DataSourceError::NotFound)
        ));
        assert!(ds.delete_inventory(bob, stored.id).await.is_err());
    }

    #[tokio::test]
    async fn stock_procedure_does_not_duplicate_unread_alerts() {
        let ds = InMemoryDataSource::new();
        let owner = UserId::new();
        ds.insert_inventory(item(owner, "Cabo", 1, 5)).await.unwrap();
        ds.insert_inventory(item(owner, "Fonte", 9, 5)).await.unwrap();

        ds.generate_stock_notifications(owner).await.unwrap();
        ds.generate_stock_notifications(owner).await.unwrap();
        assert_eq!(ds.list_notifications(owner).await.unwrap().len(), 1);

        // Once read, a still-breaching item alerts again.
        ds.mark_all_notifications_read(owner).await.unwrap();
        ds.generate_stock_notifications(owner).await.unwrap();
        let all = ds.list_notifications(owner).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|n| !n.read).count(), 1);
    }

    #[tokio::test]
    async fn metrics_come_back_in_period_order() {
        let ds = InMemoryDataSource::new();
        let owner = UserId::new();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        ds.insert_metric(PeriodMetric::new(owner, feb, 2.0, 0.0, 0.0)).await.unwrap();
        ds.insert_metric(PeriodMetric::new(owner, jan, 1.0, 0.0, 0.0)).await.unwrap();

        let rows = ds.list_metrics(owner).await.unwrap();
        assert_eq!(rows.iter().map(|m| m.total_sales).collect::<Vec<_>>(), vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn seed_demo_creates_a_year_of_metrics() {
        let ds = InMemoryDataSource::new();
        let owner = UserId::new();
        ds.seed_demo(owner).unwrap();

        let metrics = ds.list_metrics(owner).await.unwrap();
        assert_eq!(metrics.len(), 12);
        assert!(metrics.windows(2).all(|w| w[0].period_end < w[1].period_end));
        assert_eq!(ds.list_inventory(owner).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn mark_all_read_counts_only_unread() {
        let ds = InMemoryDataSource::new();
        let owner = UserId::new();
        ds.insert_inventory(item(owner, "A", 0, 1)).await.unwrap();
        ds.insert_inventory(item(owner, "B", 0, 1)).await.unwrap();
        ds.generate_stock_notifications(owner).await.unwrap();

        let first = ds.list_notifications(owner).await.unwrap()[0].id;
        ds.set_notification_read(owner, first, true).await.unwrap();

        assert_eq!(ds.mark_all_notifications_read(owner).await.unwrap(), 1);
        assert_eq!(ds.mark_all_notifications_read(owner).await.unwrap(), 0);
    }
}
