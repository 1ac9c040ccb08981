use crate::error::{LedgerError, Result};
use crate::schema::{CategorySummary, ParseResult, SaleItem, SalesSummary};

/// Margin as a percentage of revenue with one decimal, rounding half up on
/// the tenths-of-a-percent scale. Zero when there is no positive revenue.
pub fn margin_percent(profit: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        ((profit / revenue) * 1000.0 + 0.5).floor() / 10.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemProfit {
    pub total_cost: f64,
    pub profit: f64,
    pub margin_percent: f64,
}

pub fn item_profit(cost_price: f64, quantity: f64, net_amount: f64) -> ItemProfit {
    let total_cost = cost_price * quantity;
    let profit = net_amount - total_cost;
    ItemProfit {
        total_cost,
        profit,
        margin_percent: margin_percent(profit, net_amount),
    }
}

/// Running sums over a set of items.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub item_count: usize,
    pub quantity: f64,
    pub revenue: f64,
    pub cost: f64,
    pub tax: f64,
    pub gross_sales: f64,
    pub discount: f64,
}

impl Totals {
    pub fn add(&mut self, item: &SaleItem) {
        self.item_count += 1;
        self.quantity += item.quantity;
        self.revenue += item.net_amount;
        self.cost += item.total_cost;
        self.tax += item.tax;
        self.gross_sales += item.total_sales;
        self.discount += item.discount;
    }

    pub fn profit(&self) -> f64 {
        self.revenue - self.cost
    }

    pub fn margin(&self) -> f64 {
        margin_percent(self.profit(), self.revenue)
    }
}

impl<'a> FromIterator<&'a SaleItem> for Totals {
    fn from_iter<I: IntoIterator<Item = &'a SaleItem>>(iter: I) -> Self {
        let mut totals = Totals::default();
        for item in iter {
            totals.add(item);
        }
        totals
    }
}

pub fn summarize_category<'a>(
    name: &str,
    items: impl IntoIterator<Item = &'a SaleItem>,
) -> CategorySummary {
    let totals: Totals = items.into_iter().collect();
    CategorySummary {
        name: name.to_string(),
        item_count: totals.item_count,
        total_quantity: totals.quantity,
        total_revenue: totals.revenue,
        total_cost: totals.cost,
        total_profit: totals.profit(),
        total_tax: totals.tax,
        avg_margin: totals.margin(),
    }
}

pub fn summarize(items: &[SaleItem]) -> SalesSummary {
    let totals: Totals = items.iter().collect();
    let total_profit = totals.profit();
    SalesSummary {
        item_count: totals.item_count,
        total_quantity: totals.quantity,
        total_orders: totals.quantity,
        total_revenue: totals.revenue,
        total_cost: totals.cost,
        total_profit,
        total_tax: totals.tax,
        net_profit_after_tax: total_profit - totals.tax,
        avg_margin: totals.margin(),
        gross_sales: totals.gross_sales,
        total_discount: totals.discount,
    }
}

/// Checks that category totals add up to the global summary.
pub fn verify_totals(result: &ParseResult, tolerance: f64) -> Result<()> {
    let categories = &result.categories;
    let summary = &result.summary;

    let checks = [
        (
            "totalRevenue",
            categories.iter().map(|c| c.total_revenue).sum::<f64>(),
            summary.total_revenue,
        ),
        (
            "totalCost",
            categories.iter().map(|c| c.total_cost).sum::<f64>(),
            summary.total_cost,
        ),
        (
            "totalProfit",
            categories.iter().map(|c| c.total_profit).sum::<f64>(),
            summary.total_profit,
        ),
        (
            "totalTax",
            categories.iter().map(|c| c.total_tax).sum::<f64>(),
            summary.total_tax,
        ),
        (
            "totalQuantity",
            categories.iter().map(|c| c.total_quantity).sum::<f64>(),
            summary.total_quantity,
        ),
        (
            "itemCount",
            categories.iter().map(|c| c.item_count as f64).sum::<f64>(),
            summary.item_count as f64,
        ),
    ];

    for (field, category_sum, global) in checks {
        if (category_sum - global).abs() > tolerance {
            return Err(LedgerError::InconsistentTotals {
                field: field.to_string(),
                category_sum,
                summary: global,
            });
        }
    }

    Ok(())
}
