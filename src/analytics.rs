use crate::aggregator::margin_percent;
use crate::sales::SalesRecord;
use crate::schema::SaleItem;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Items this many points below their target margin are flagged.
pub const MARGIN_SHORTFALL_POINTS: f64 = 10.0;
/// Items with an actual margin below this are reported as low margin.
pub const LOW_MARGIN_PERCENT: f64 = 40.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: f64,
    /// Pre-tax.
    pub total_profit: f64,
    pub total_orders: f64,
    pub total_tax: f64,
    pub avg_margin: f64,
    pub record_count: usize,
}

pub fn dashboard_stats(records: &[SalesRecord]) -> DashboardStats {
    let mut stats = DashboardStats {
        record_count: records.len(),
        ..Default::default()
    };
    for record in records {
        stats.total_revenue += record.summary.total_revenue;
        stats.total_profit += record.summary.total_profit;
        stats.total_orders += record.summary.total_orders;
        stats.total_tax += record.summary.total_tax;
    }
    stats.avg_margin = margin_percent(stats.total_profit, stats.total_revenue);
    stats
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPerformance {
    pub name: String,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub orders: f64,
    pub tax: f64,
    pub margin: f64,
}

/// Per-category totals across records, in first-seen order.
pub fn category_analytics(records: &[SalesRecord]) -> Vec<CategoryPerformance> {
    let mut rows: Vec<CategoryPerformance> = Vec::new();
    for item in records.iter().flat_map(|r| r.items.iter()) {
        let idx = match rows.iter().position(|c| c.name == item.category) {
            Some(idx) => idx,
            None => {
                rows.push(CategoryPerformance {
                    name: item.category.clone(),
                    ..Default::default()
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[idx];
        row.revenue += item.net_amount;
        row.cost += item.total_cost;
        row.profit += item.profit;
        row.orders += item.quantity;
        row.tax += item.tax;
    }
    for row in &mut rows {
        row.margin = margin_percent(row.profit, row.revenue);
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub name: String,
    pub quantity: f64,
    pub revenue: f64,
    pub profit: f64,
}

/// Best sellers by revenue across all records.
pub fn top_items(records: &[SalesRecord], limit: usize) -> Vec<TopItem> {
    let mut totals: BTreeMap<&str, TopItem> = BTreeMap::new();
    for item in records.iter().flat_map(|r| r.items.iter()) {
        let entry = totals.entry(item.item_name.as_str()).or_insert_with(|| TopItem {
            name: item.item_name.clone(),
            ..Default::default()
        });
        entry.quantity += item.quantity;
        entry.revenue += item.net_amount;
        entry.profit += item.profit;
    }

    let mut ranked: Vec<TopItem> = totals.into_values().collect();
    ranked.sort_by(|a, b| b.revenue.partial_cmp(&a.revenue).unwrap_or(Ordering::Equal));
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub revenue: f64,
    pub profit: f64,
    pub orders: f64,
}

pub fn daily_trends(records: &[SalesRecord]) -> Vec<DailyTrend> {
    let mut days: BTreeMap<NaiveDate, DailyTrend> = BTreeMap::new();
    for record in records {
        let day = days.entry(record.date).or_insert(DailyTrend {
            date: record.date,
            revenue: 0.0,
            profit: 0.0,
            orders: 0.0,
        });
        day.revenue += record.summary.total_revenue;
        day.profit += record.summary.total_profit;
        day.orders += record.summary.total_orders;
    }
    days.into_values().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMargin {
    pub item_name: String,
    pub expected_margin: f64,
    pub actual_margin: f64,
    /// Actual minus expected, in percentage points.
    pub margin_diff: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginInsights {
    pub items: Vec<ItemMargin>,
    pub margin_issues: Vec<ItemMargin>,
    pub low_margin_items: Vec<ItemMargin>,
    pub top_profit_items: Vec<ItemMargin>,
}

/// Compares each item's realised margin against its inventory target.
pub fn margin_insights(items: &[SaleItem]) -> MarginInsights {
    let margins: Vec<ItemMargin> = items
        .iter()
        .map(|item| ItemMargin {
            item_name: item.item_name.clone(),
            expected_margin: item.expected_margin,
            actual_margin: item.margin_percent,
            margin_diff: item.margin_percent - item.expected_margin,
            profit: item.profit,
        })
        .collect();

    let margin_issues = margins
        .iter()
        .filter(|m| m.margin_diff < -MARGIN_SHORTFALL_POINTS)
        .cloned()
        .collect();

    let low_margin_items = margins
        .iter()
        .filter(|m| m.actual_margin < LOW_MARGIN_PERCENT)
        .cloned()
        .collect();

    let mut top_profit_items = margins.clone();
    top_profit_items.sort_by(|a, b| b.profit.partial_cmp(&a.profit).unwrap_or(Ordering::Equal));
    top_profit_items.truncate(5);

    MarginInsights {
        items: margins,
        margin_issues,
        low_margin_items,
        top_profit_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{item_profit, summarize};
    use crate::schema::CostMatch;
    use chrono::Utc;

    fn item(name: &str, category: &str, quantity: f64, net: f64, cost: f64, expected: f64) -> SaleItem {
        let figures = item_profit(cost, quantity, net);
        SaleItem {
            item_name: name.to_string(),
            category: category.to_string(),
            quantity,
            gross_amount: net,
            discount: 0.0,
            net_amount: net,
            tax: net * 0.05,
            total_sales: net * 1.05,
            cost_price: cost,
            total_cost: figures.total_cost,
            profit: figures.profit,
            margin_percent: figures.margin_percent,
            expected_margin: expected,
            cost_match: CostMatch::Exact,
        }
    }

    fn record(id: u64, day: u32, items: Vec<SaleItem>) -> SalesRecord {
        SalesRecord {
            id,
            file_name: "report.xlsx".to_string(),
            restaurant_name: "Acme Bar".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 10, day).unwrap(),
            date_range: String::new(),
            summary: summarize(&items),
            categories: Vec::new(),
            items,
            warnings: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn records() -> Vec<SalesRecord> {
        vec![
            record(
                1,
                18,
                vec![
                    item("Coke", "Bar Menu", 4.0, 400.0, 30.0, 70.0),
                    item("Chilli Chicken", "Food", 2.0, 700.0, 181.0, 48.0),
                ],
            ),
            record(2, 17, vec![item("Coke", "Bar Menu", 1.0, 100.0, 30.0, 70.0)]),
        ]
    }

    #[test]
    fn test_dashboard_stats() {
        let stats = dashboard_stats(&records());
        assert_eq!(stats.record_count, 2);
        assert_eq!(stats.total_revenue, 1200.0);
        assert_eq!(stats.total_orders, 7.0);
        // cost: 120 + 362 + 30 = 512
        assert_eq!(stats.total_profit, 688.0);
        assert_eq!(stats.avg_margin, 57.3);

        assert_eq!(dashboard_stats(&[]), DashboardStats::default());
    }

    #[test]
    fn test_category_and_item_rollups() {
        let records = records();
        let categories = category_analytics(&records);
        assert_eq!(categories[0].name, "Bar Menu");
        assert_eq!(categories[0].revenue, 500.0);
        assert_eq!(categories[0].orders, 5.0);
        assert_eq!(categories[0].margin, 70.0);

        let top = top_items(&records, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "Chilli Chicken");

        let trends = daily_trends(&records);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].date, NaiveDate::from_ymd_opt(2025, 10, 17).unwrap());
        assert_eq!(trends[1].revenue, 1100.0);
    }

    #[test]
    fn test_margin_insights_flags_shortfalls() {
        let items = vec![
            item("Coke", "Bar Menu", 1.0, 100.0, 30.0, 70.0),
            item("Prawns", "Food", 1.0, 449.0, 350.0, 42.0),
            item("Mystery Dish", "Food", 1.0, 250.0, 0.0, 45.0),
        ];
        let insights = margin_insights(&items);

        assert_eq!(insights.items.len(), 3);
        assert_eq!(insights.margin_issues.len(), 1);
        assert_eq!(insights.margin_issues[0].item_name, "Prawns");
        assert_eq!(insights.low_margin_items.len(), 1);
        assert_eq!(insights.top_profit_items[0].item_name, "Mystery Dish");
    }
}
