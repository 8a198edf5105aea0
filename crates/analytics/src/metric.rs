use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bizlens_core::{Entity, RecordId, UserId};

/// Precomputed aggregate row for one business period.
///
/// One row per elapsed period, append-only. Series handed to the projection
/// are ordered by `period_end` ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMetric {
    pub id: RecordId,
    pub owner_id: UserId,
    pub period_end: NaiveDate,
    pub total_sales: f64,
    pub net_profit: f64,
    pub inventory_count: f64,
}

impl PeriodMetric {
    pub fn new(owner_id: UserId, period_end: NaiveDate, total_sales: f64, net_profit: f64, inventory_count: f64) -> Self {
        Self {
            id: RecordId::new(),
            owner_id,
            period_end,
            total_sales,
            net_profit,
            inventory_count,
        }
    }

    /// Abbreviated month of the period end (`Jan`, `Feb`, ...).
    pub fn label(&self) -> String {
        self.period_end.format("%b").to_string()
    }
}

impl Entity for PeriodMetric {
    fn id(&self) -> RecordId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn label_is_abbreviated_month() {
        let m = PeriodMetric::new(UserId::new(), date(2024, 3, 31), 1.0, 1.0, 1.0);
        assert_eq!(m.label(), "Mar");
    }
}
