use std::sync::Arc;

use axum::{
    extract::Extension,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use bizlens_ai::{AiError, ChatRequest, insight_prompt};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/insights", post(insights))
}

pub async fn chat(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ChatRequest>,
) -> axum::response::Response {
    forward(&services, &body).await
}

/// Ask the assistant about the caller's current KPIs.
pub async fn insights(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> axum::response::Response {
    let summary = services.services.chart.summary(user.user_id()).await;
    let request = ChatRequest::new(insight_prompt(&summary));
    forward(&services, &request).await
}

async fn forward(services: &AppServices, request: &ChatRequest) -> axum::response::Response {
    match services.assistant.chat(request).await {
        Ok(reply) => Json(dto::AssistantResponse::from(reply)).into_response(),
        Err(AiError::RateLimited) => Json(dto::AssistantResponse::rate_limited()).into_response(),
        Err(e) => errors::ai_error_to_response(e),
    }
}
