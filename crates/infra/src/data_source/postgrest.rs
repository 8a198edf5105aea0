//! PostgREST-style backend adapter (Supabase REST API).
//!
//! Tables: `period_metrics`, `inventory`, `notifications`, `employees`.
//! Procedures are called through `/rest/v1/rpc/<name>`.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use bizlens_analytics::PeriodMetric;
use bizlens_core::{RecordId, UserId};
use bizlens_employees::Employee;
use bizlens_inventory::InventoryItem;
use bizlens_notifications::Notification;

use super::error::{DataResult, DataSourceError};
use super::{DataSource, STOCK_ALERT_PROCEDURE};

const METRICS: &str = "period_metrics";
const INVENTORY: &str = "inventory";
const NOTIFICATIONS: &str = "notifications";
const EMPLOYEES: &str = "employees";

pub struct PostgrestDataSource {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PostgrestDataSource {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, String)]) -> DataResult<Vec<T>> {
        let resp = self
            .request(Method::GET, self.table_url(table))
            .query(query)
            .send()
            .await?;
        decode(resp).await
    }

    async fn select_one<T: DeserializeOwned>(&self, table: &str, owner: UserId, id: RecordId) -> DataResult<T> {
        let rows: Vec<T> = self.select(table, &[("id", eq(id)), ("owner_id", eq(owner)), ("select", "*".into())]).await?;
        rows.into_iter().next().ok_or(DataSourceError::NotFound)
    }

    async fn insert<T: Serialize + DeserializeOwned>(&self, table: &str, row: &T) -> DataResult<T> {
        let resp = self
            .request(Method::POST, self.table_url(table))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let rows: Vec<T> = decode(resp).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DataSourceError::Decode("insert returned no rows".to_string()))
    }

    /// PATCH rows matching `query`; returns the updated representation.
    async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> DataResult<Vec<T>> {
        let resp = self
            .request(Method::PATCH, self.table_url(table))
            .header("Prefer", "return=representation")
            .query(query)
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }

    async fn delete(&self, table: &str, owner: UserId, id: RecordId) -> DataResult<()> {
        let resp = self
            .request(Method::DELETE, self.table_url(table))
            .header("Prefer", "return=representation")
            .query(&[("id", eq(id)), ("owner_id", eq(owner))])
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = decode(resp).await?;
        if rows.is_empty() {
            return Err(DataSourceError::NotFound);
        }
        Ok(())
    }

    async fn replace<T: Serialize + DeserializeOwned>(
        &self,
        table: &str,
        owner: UserId,
        id: RecordId,
        row: &T,
    ) -> DataResult<T> {
        let rows: Vec<T> = self.patch(table, &[("id", eq(id)), ("owner_id", eq(owner))], row).await?;
        rows.into_iter().next().ok_or(DataSourceError::NotFound)
    }
}

fn eq(value: impl core::fmt::Display) -> String {
    format!("eq.{value}")
}

async fn decode<T: DeserializeOwned>(resp: Response) -> DataResult<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "backend request failed");
        return Err(DataSourceError::Status {
            status: status.as_u16(),
            body,
        });
    }
    resp.json::<T>().await.map_err(|e| DataSourceError::Decode(e.to_string()))
}

#[async_trait]
impl DataSource for PostgrestDataSource {
    async fn list_metrics(&self, owner: UserId) -> DataResult<Vec<PeriodMetric>> {
        self.select(
            METRICS,
            &[("owner_id", eq(owner)), ("order", "period_end.asc".into()), ("select", "*".into())],
        )
        .await
    }

    async fn insert_metric(&self, metric: PeriodMetric) -> DataResult<PeriodMetric> {
        self.insert(METRICS, &metric).await
    }

    async fn update_metric_inventory(&self, owner: UserId, metric_id: RecordId, inventory_count: f64) -> DataResult<()> {
        let rows: Vec<PeriodMetric> = self
            .patch(
                METRICS,
                &[("id", eq(metric_id)), ("owner_id", eq(owner))],
                &json!({ "inventory_count": inventory_count }),
            )
            .await?;
        if rows.is_empty() {
            return Err(DataSourceError::NotFound);
        }
        Ok(())
    }

    async fn list_inventory(&self, owner: UserId) -> DataResult<Vec<InventoryItem>> {
        self.select(
            INVENTORY,
            &[("owner_id", eq(owner)), ("order", "name.asc".into()), ("select", "*".into())],
        )
        .await
    }

    async fn get_inventory(&self, owner: UserId, id: RecordId) -> DataResult<InventoryItem> {
        self.select_one(INVENTORY, owner, id).await
    }

    async fn insert_inventory(&self, item: InventoryItem) -> DataResult<InventoryItem> {
        self.insert(INVENTORY, &item).await
    }

    async fn update_inventory(&self, item: InventoryItem) -> DataResult<InventoryItem> {
        self.replace(INVENTORY, item.owner_id, item.id, &item).await
    }

    async fn delete_inventory(&self, owner: UserId, id: RecordId) -> DataResult<()> {
        self.delete(INVENTORY, owner, id).await
    }

    async fn generate_stock_notifications(&self, owner: UserId) -> DataResult<()> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, STOCK_ALERT_PROCEDURE);
        let resp = self
            .request(Method::POST, url)
            .json(&json!({ "p_user_id": owner }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DataSourceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn list_notifications(&self, owner: UserId) -> DataResult<Vec<Notification>> {
        self.select(
            NOTIFICATIONS,
            &[("owner_id", eq(owner)), ("order", "created_at.desc".into()), ("select", "*".into())],
        )
        .await
    }

    async fn insert_notification(&self, notification: Notification) -> DataResult<Notification> {
        self.insert(NOTIFICATIONS, &notification).await
    }

    async fn set_notification_read(&self, owner: UserId, id: RecordId, read: bool) -> DataResult<Notification> {
        let rows: Vec<Notification> = self
            .patch(
                NOTIFICATIONS,
                &[("id", eq(id)), ("owner_id", eq(owner))],
                &json!({ "read": read }),
            )
            .await?;
        rows.into_iter().next().ok_or(DataSourceError::NotFound)
    }

    async fn mark_all_notifications_read(&self, owner: UserId) -> DataResult<usize> {
        let rows: Vec<serde_json::Value> = self
            .patch(
                NOTIFICATIONS,
                &[("owner_id", eq(owner)), ("read", "eq.false".into())],
                &json!({ "read": true }),
            )
            .await?;
        Ok(rows.len())
    }

    async fn list_employees(&self, owner: UserId) -> DataResult<Vec<Employee>> {
        self.select(
            EMPLOYEES,
            &[("owner_id", eq(owner)), ("order", "name.asc".into()), ("select", "*".into())],
        )
        .await
    }

    async fn get_employee(&self, owner: UserId, id: RecordId) -> DataResult<Employee> {
        self.select_one(EMPLOYEES, owner, id).await
    }

    async fn insert_employee(&self, employee: Employee) -> DataResult<Employee> {
        self.insert(EMPLOYEES, &employee).await
    }

    async fn update_employee(&self, employee: Employee) -> DataResult<Employee> {
        self.replace(EMPLOYEES, employee.owner_id, employee.id, &employee).await
    }

    async fn delete_employee(&self, owner: UserId, id: RecordId) -> DataResult<()> {
        self.delete(EMPLOYEES, owner, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    };
    use chrono::NaiveDate;
    use serde_json::Value;

    #[derive(Clone, Default)]
    struct Seen {
        queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
        bodies: Arc<Mutex<Vec<Value>>>,
        api_keys: Arc<Mutex<Vec<String>>>,
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn list_metrics_filters_by_owner_and_orders_ascending() {
        let seen = Seen::default();
        let owner = UserId::new();
        let row = PeriodMetric::new(owner, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(), 4000.0, 2400.0, 150.0);
        let body = serde_json::to_value(vec![row.clone()]).unwrap();

        let router = Router::new()
            .route(
                "/rest/v1/period_metrics",
                get(
                    move |State(seen): State<Seen>, headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                        seen.queries.lock().unwrap().push(q);
                        let key = headers.get("apikey").and_then(|v| v.to_str().ok()).unwrap_or_default();
                        seen.api_keys.lock().unwrap().push(key.to_string());
                        let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or_default();
                        seen.api_keys.lock().unwrap().push(auth.to_string());
                        Json(body)
                    },
                ),
            )
            .with_state(seen.clone());
        let base = spawn(router).await;

        let ds = PostgrestDataSource::new(base, "anon-key");
        let rows = ds.list_metrics(owner).await.unwrap();

        assert_eq!(rows, vec![row]);
        let q = seen.queries.lock().unwrap()[0].clone();
        assert_eq!(q["owner_id"], format!("eq.{owner}"));
        assert_eq!(q["order"], "period_end.asc");
        assert_eq!(*seen.api_keys.lock().unwrap(), vec!["anon-key", "Bearer anon-key"]);
    }

    #[tokio::test]
    async fn stock_procedure_posts_user_id() {
        let seen = Seen::default();
        let router = Router::new()
            .route(
                "/rest/v1/rpc/generate_stock_notifications",
                post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    seen.bodies.lock().unwrap().push(body);
                    StatusCode::NO_CONTENT
                }),
            )
            .with_state(seen.clone());
        let base = spawn(router).await;

        let owner = UserId::new();
        PostgrestDataSource::new(base, "k")
            .generate_stock_notifications(owner)
            .await
            .unwrap();

        assert_eq!(seen.bodies.lock().unwrap()[0]["p_user_id"], owner.to_string());
    }

    #[tokio::test]
    async fn backend_errors_surface_status_and_body() {
        let router = Router::new().route(
            "/rest/v1/inventory",
            get(|| async { (StatusCode::UNAUTHORIZED, "JWT expired") }),
        );
        let base = spawn(router).await;

        match PostgrestDataSource::new(base, "k").list_inventory(UserId::new()).await {
            Err(DataSourceError::Status { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "JWT expired");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_on_empty_result_is_not_found() {
        let router = Router::new().route("/rest/v1/employees", get(|| async { Json(Vec::<Value>::new()) }));
        let base = spawn(router).await;

        let err = PostgrestDataSource::new(base, "k")
            .get_employee(UserId::new(), RecordId::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
