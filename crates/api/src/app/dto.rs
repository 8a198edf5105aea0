use serde::{Deserialize, Serialize};

use bizlens_ai::TokenUsage;
use bizlens_analytics::{DisplaySeriesPoint, Granularity};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    /// Missing period means the default (monthly) view.
    pub fn granularity(&self) -> Result<Granularity, axum::response::Response> {
        match self.period.as_deref() {
            None => Ok(Granularity::default()),
            Some(raw) => raw.parse().map_err(errors::domain_error_to_response),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i64,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub period: Granularity,
    /// `true` for the daily view, which is derived from the monthly total.
    pub approximated: bool,
    pub points: Vec<DisplaySeriesPoint>,
}

impl ChartResponse {
    pub fn new(period: Granularity, points: Vec<DisplaySeriesPoint>) -> Self {
        Self {
            period,
            approximated: period == Granularity::Diario && !points.is_empty(),
            points,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub low_stock: usize,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    /// `None` when nothing was written (no metric rows or a backend failure).
    pub inventory_count: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: usize,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}

#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    pub rate_limited: bool,
}

pub const RATE_LIMITED_MESSAGE: &str =
    "O assistente está recebendo muitas solicitações. Tente novamente em alguns instantes.";

impl AssistantResponse {
    pub fn rate_limited() -> Self {
        Self {
            text: RATE_LIMITED_MESSAGE.to_string(),
            usage: None,
            rate_limited: true,
        }
    }
}

impl From<bizlens_ai::ChatReply> for AssistantResponse {
    fn from(reply: bizlens_ai::ChatReply) -> Self {
        Self {
            text: reply.text,
            usage: Some(reply.usage),
            rate_limited: false,
        }
    }
}
