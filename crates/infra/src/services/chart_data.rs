use std::sync::Arc;

use tracing::warn;

use bizlens_analytics::{DashboardSummary, DisplaySeriesPoint, Granularity, PeriodMetric, project, summarize};
use bizlens_core::UserId;
use bizlens_events::Collection;

use crate::data_source::DataSource;
use crate::query_cache::{QueryCache, QueryKey};

/// Chart data for the dashboard.
///
/// Reads never fail: a backend error is logged and the chart renders empty.
#[derive(Clone)]
pub struct ChartDataService {
    data: Arc<dyn DataSource>,
    cache: Arc<QueryCache<Vec<PeriodMetric>>>,
}

impl ChartDataService {
    pub fn new(data: Arc<dyn DataSource>, cache: Arc<QueryCache<Vec<PeriodMetric>>>) -> Self {
        Self { data, cache }
    }

    /// Metric rows for `user`, ascending by period.
    pub async fn metrics(&self, user: UserId) -> Vec<PeriodMetric> {
        let key = QueryKey::owned(Collection::Metrics.as_str(), user);
        match self.cache.get_or_fetch(key, || self.data.list_metrics(user)).await {
            Ok(rows) => rows,
            Err(err) => {
                warn!(user_id = %user, error = %err, "failed to load metrics; rendering empty chart");
                Vec::new()
            }
        }
    }

    pub async fn load(&self, user: UserId, granularity: Granularity) -> Vec<DisplaySeriesPoint> {
        project(&self.metrics(user).await, granularity)
    }

    pub async fn summary(&self, user: UserId) -> DashboardSummary {
        summarize(&self.metrics(user).await)
    }
}
