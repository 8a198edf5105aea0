use bizlens_analytics::DashboardSummary;

/// Prompt asking the assistant for short business insights on the KPIs.
pub fn insight_prompt(summary: &DashboardSummary) -> String {
    let growth = match summary.sales_growth_pct {
        Some(pct) => format!("{pct:.1}%"),
        None => "n/d".to_string(),
    };
    format!(
        "Analise os indicadores abaixo e sugira até 3 ações práticas.\n\
         Períodos: {}\n\
         Vendas totais: {:.2}\n\
         Lucro líquido total: {:.2}\n\
         Estoque atual: {:.0}\n\
         Crescimento de vendas no último período: {}",
        summary.periods, summary.total_sales, summary.total_profit, summary.latest_inventory, growth
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_kpis() {
        let summary = DashboardSummary {
            total_sales: 9000.0,
            total_profit: 4400.0,
            latest_inventory: 120.0,
            sales_growth_pct: Some(25.0),
            periods: 2,
        };
        let prompt = insight_prompt(&summary);
        assert!(prompt.contains("9000.00"));
        assert!(prompt.contains("25.0%"));
        assert!(prompt.contains("Estoque atual: 120"));
    }

    #[test]
    fn missing_growth_is_marked_unavailable() {
        let prompt = insight_prompt(&DashboardSummary::default());
        assert!(prompt.contains("n/d"));
    }
}
