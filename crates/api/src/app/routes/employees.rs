use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use bizlens_employees::{EmployeePatch, NewEmployee};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/:id", get(get_employee).patch(update_employee).delete(delete_employee))
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> impl IntoResponse {
    Json(services.services.employees.list(user.user_id()).await)
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.services.employees.get(user.user_id(), id).await {
        Ok(e) => Json(e).into_response(),
        Err(e) => errors::data_error_to_response(e),
    }
}

pub async fn create_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Json(body): Json<NewEmployee>,
) -> axum::response::Response {
    match services.services.employees.create(user.user_id(), body).await {
        Ok(e) => (StatusCode::CREATED, Json(e)).into_response(),
        Err(e) => errors::data_error_to_response(e),
    }
}

pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
    Json(body): Json<EmployeePatch>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.services.employees.update(user.user_id(), id, body).await {
        Ok(e) => Json(e).into_response(),
        Err(e) => errors::data_error_to_response(e),
    }
}

pub async fn delete_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_record_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.services.employees.delete(user.user_id(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::data_error_to_response(e),
    }
}
