//! CSV export of a display series.

use crate::projection::DisplaySeriesPoint;

/// Render points as CSV with a `label,sales,profit,inventory` header.
pub fn series_to_csv(points: &[DisplaySeriesPoint]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["label", "sales", "profit", "inventory"])?;
    for p in points {
        writer.serialize((&p.label, p.sales, p.profit, p.inventory))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_even_for_empty_series() {
        assert_eq!(series_to_csv(&[]).unwrap(), "label,sales,profit,inventory\n");
    }

    #[test]
    fn writes_one_row_per_point() {
        let points = vec![DisplaySeriesPoint {
            label: "Jan".to_string(),
            sales: 4000.0,
            profit: 2400.5,
            inventory: 150.0,
        }];
        let csv = series_to_csv(&points).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Jan,4000.0,2400.5,150.0");
    }
}
