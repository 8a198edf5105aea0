use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use bizlens_inventory::{InventoryPatch, NewInventoryItem};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", patch(update_item).get(get_item).delete(delete_item))
        .route("/items/:id/adjust", post(adjust_stock))
        .route("/alerts/scan", post(scan_alerts))
        .route("/sync", post(sync_metrics))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> impl IntoResponse {
    Json(services.services.inventory.list(user.user_id()).await)
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.services.inventory.get(user.user_id(), id).await {
        Ok(item) => Json(item).into_response(),
        Err(e) => errors::data_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<NewInventoryItem>,
) -> axum::response::Response {
    match services.services.inventory.create(user.user_id(), body).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => errors::data_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    Json(body): Json<InventoryPatch>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.services.inventory.update(user.user_id(), id, body).await {
        Ok(item) => Json(item).into_response(),
        Err(e) => errors::data_error_to_response(e),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.services.inventory.adjust(user.user_id(), id, body.delta).await {
        Ok(item) => Json(item).into_response(),
        Err(e) => errors::data_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.services.inventory.delete(user.user_id(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::data_error_to_response(e),
    }
}

pub async fn scan_alerts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> impl IntoResponse {
    let low_stock = services.services.stock_alerts.scan(user.user_id()).await;
    Json(dto::ScanResponse { low_stock })
}

pub async fn sync_metrics(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> impl IntoResponse {
    let inventory_count = services.services.metrics_sync.sync(user.user_id()).await;
    Json(dto::SyncResponse { inventory_count })
}
