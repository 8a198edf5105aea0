use serde::{Deserialize, Serialize};

use crate::metric::PeriodMetric;

/// Headline KPIs shown above the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_sales: f64,
    pub total_profit: f64,
    pub latest_inventory: f64,
    /// Sales change of the latest period vs the previous one, in percent.
    pub sales_growth_pct: Option<f64>,
    pub periods: usize,
}

/// Summarize an ascending series. Empty input yields the all-zero summary.
pub fn summarize(series: &[PeriodMetric]) -> DashboardSummary {
    let total_sales = series.iter().map(|m| m.total_sales).sum();
    let total_profit = series.iter().map(|m| m.net_profit).sum();
    let latest_inventory = series.last().map(|m| m.inventory_count).unwrap_or(0.0);

    let sales_growth_pct = match series {
        [.., prev, last] if prev.total_sales != 0.0 => {
            Some((last.total_sales - prev.total_sales) / prev.total_sales * 100.0)
        }
        _ => None,
    };

    DashboardSummary {
        total_sales,
        total_profit,
        latest_inventory,
        sales_growth_pct,
        periods: series.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizlens_core::UserId;
    use chrono::NaiveDate;

    fn metric(month: u32, sales: f64, profit: f64, inventory: f64) -> PeriodMetric {
        let period_end = NaiveDate::from_ymd_opt(2024, month, 28).unwrap();
        PeriodMetric::new(UserId::new(), period_end, sales, profit, inventory)
    }

    #[test]
    fn summarizes_totals_and_growth() {
        let series = vec![metric(1, 4000.0, 2400.0, 150.0), metric(2, 5000.0, 2000.0, 120.0)];
        let s = summarize(&series);
        assert_eq!(s.total_sales, 9000.0);
        assert_eq!(s.total_profit, 4400.0);
        assert_eq!(s.latest_inventory, 120.0);
        assert_eq!(s.periods, 2);
        assert!((s.sales_growth_pct.unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn growth_needs_two_periods_and_nonzero_baseline() {
        assert_eq!(summarize(&[metric(1, 10.0, 1.0, 1.0)]).sales_growth_pct, None);
        let zero_base = vec![metric(1, 0.0, 0.0, 0.0), metric(2, 10.0, 0.0, 0.0)];
        assert_eq!(summarize(&zero_base).sales_growth_pct, None);
    }

    #[test]
    fn empty_series_is_default() {
        assert_eq!(summarize(&[]), DashboardSummary::default());
    }
}
