use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_count))
        .route("/read-all", post(mark_all_read))
        .route("/:id/read", post(mark_read))
        .route("/:id/unread", post(mark_unread))
}

pub async fn list_notifications(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> impl IntoResponse {
    Json(services.services.notifications.list(user.user_id()).await)
}

pub async fn unread_count(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> impl IntoResponse {
    let unread = services.services.notifications.unread_count(user.user_id()).await;
    Json(dto::UnreadCountResponse { unread })
}

pub async fn mark_read(
    services: Extension<Arc<AppServices>>,
    user: Extension<UserContext>,
    id: Path<String>,
) -> axum::response::Response {
    set_read(services, user, id, true).await
}

pub async fn mark_unread(
    services: Extension<Arc<AppServices>>,
    user: Extension<UserContext>,
    id: Path<String>,
) -> axum::response::Response {
    set_read(services, user, id, false).await
}

async fn set_read(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    read: bool,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.services.notifications.mark_read(user.user_id(), id, read).await {
        Ok(n) => Json(n).into_response(),
        Err(e) => errors::data_error_to_response(e),
    }
}

pub async fn mark_all_read(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> axum::response::Response {
    match services.services.notifications.mark_all_read(user.user_id()).await {
        Ok(updated) => Json(dto::MarkAllReadResponse { updated }).into_response(),
        Err(e) => errors::data_error_to_response(e),
    }
}
