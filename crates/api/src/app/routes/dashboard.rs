use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use bizlens_analytics::series_to_csv;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/chart", get(get_chart))
        .route("/summary", get(get_summary))
        .route("/export", get(export_chart))
}

pub async fn get_chart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<dto::PeriodQuery>,
) -> axum::response::Response {
    let period = match query.granularity() {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let points = services.services.chart.load(user.user_id(), period).await;
    Json(dto::ChartResponse::new(period, points)).into_response()
}

pub async fn get_summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> impl IntoResponse {
    Json(services.services.chart.summary(user.user_id()).await)
}

pub async fn export_chart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Query(query): Query<dto::PeriodQuery>,
) -> axum::response::Response {
    let period = match query.granularity() {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let points = services.services.chart.load(user.user_id(), period).await;
    match series_to_csv(&points) {
        Ok(csv) => {
            let disposition = format!("attachment; filename=\"dashboard-{}.csv\"", period.as_str());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response()
        }
        Err(e) => errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "export_error", e.to_string()),
    }
}
