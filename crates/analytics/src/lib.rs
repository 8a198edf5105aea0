//! Chart data shaping for the dashboard.
//!
//! Pure functions over the ordered period-metric series: projection into a
//! display series per granularity, KPI summaries, and CSV export. No IO.

pub mod export;
pub mod granularity;
pub mod metric;
pub mod projection;
pub mod summary;

pub use export::series_to_csv;
pub use granularity::Granularity;
pub use metric::PeriodMetric;
pub use projection::{DAILY_LABELS, DAILY_WEIGHTS, DisplaySeriesPoint, project};
pub use summary::{DashboardSummary, summarize};
