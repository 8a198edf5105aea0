//! Period projection: full monthly series -> display series for a granularity.

use serde::{Deserialize, Serialize};

use crate::granularity::Granularity;
use crate::metric::PeriodMetric;

/// Share of the latest period's sales/profit attributed to each weekday.
///
/// Fixed heuristic; the daily view is a deterministic approximation of the
/// latest period, not real daily data. Sums to 1.0.
pub const DAILY_WEIGHTS: [f64; 7] = [0.15, 0.18, 0.12, 0.16, 0.20, 0.12, 0.07];

pub const DAILY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const QUARTER_PERIODS: usize = 3;

/// One point of a chart series. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySeriesPoint {
    pub label: String,
    pub sales: f64,
    pub profit: f64,
    pub inventory: f64,
}

impl From<&PeriodMetric> for DisplaySeriesPoint {
    fn from(m: &PeriodMetric) -> Self {
        Self {
            label: m.label(),
            sales: m.total_sales,
            profit: m.net_profit,
            inventory: m.inventory_count,
        }
    }
}

/// Project an ascending series of period metrics for display.
///
/// - `Anual`: every period, in order
/// - `Trimestral`: the last 3 periods (fewer if unavailable)
/// - `Mensal`: the latest period only
/// - `Diario`: 7 synthesized weekday points from the latest period
///
/// Empty input yields an empty series for every granularity.
pub fn project(series: &[PeriodMetric], granularity: Granularity) -> Vec<DisplaySeriesPoint> {
    let Some(latest) = series.last() else {
        return Vec::new();
    };

    match granularity {
        Granularity::Anual => series.iter().map(DisplaySeriesPoint::from).collect(),
        Granularity::Trimestral => {
            let start = series.len().saturating_sub(QUARTER_PERIODS);
            series[start..].iter().map(DisplaySeriesPoint::from).collect()
        }
        Granularity::Mensal => vec![DisplaySeriesPoint::from(latest)],
        Granularity::Diario => daily_points(latest),
    }
}

fn daily_points(latest: &PeriodMetric) -> Vec<DisplaySeriesPoint> {
    DAILY_LABELS
        .iter()
        .zip(DAILY_WEIGHTS)
        .map(|(label, weight)| DisplaySeriesPoint {
            label: (*label).to_string(),
            sales: latest.total_sales * weight,
            profit: latest.net_profit * weight,
            inventory: latest.inventory_count,
        })
        .collect()
}
