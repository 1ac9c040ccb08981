use anyhow::{Context, Result};
use pos_sales_ledger::*;
use std::env;
use std::fs::File;

const SAMPLE_REPORT: &str = r#"[
    ["Acme Bar"],
    ["Group Report : 17-10-2025 to 18-10-2025"],
    [],
    ["Dine In Food Menu", null],
    [null, "Chilli Chicken", 3, 1100, 53, 1047, 52.35, 1099.35],
    [null, "Crispy Corn", 2, 498, 0, 498, 24.9, 522.9],
    ["Sub Total", null, null, null, null, 1545, null, null],
    ["Bar Menu", null],
    [null, "Coke", 4, 396, 0, 396, 19.8, 415.8],
    [null, "House Special Mocktail", 1, 220, 0, 220, 11, 231],
    ["Total", "", 10, 2214, 53, 2161, 108.05, 2269.05]
]"#;

fn main() -> Result<()> {
    let rows = match env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {}", path))?;
            grid_from_reader(file).with_context(|| format!("decoding grid from {}", path))?
        }
        None => grid_from_json_str(SAMPLE_REPORT)?,
    };

    let inventory = InMemoryInventory::with_default_catalog()?;
    let store = InMemorySalesStore::new();
    let config = ParserConfig::default();

    let imported =
        SalesReportProcessor::import("sample.json", &rows, &inventory, &store, &config);
    let (id, report) = match imported {
        Ok(imported) => imported,
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&err.report())?);
            return Err(err.into());
        }
    };

    println!(
        "Record {} for {} ({})",
        id, report.restaurant_name, report.date_range
    );
    for category in &report.categories {
        println!(
            "  {:<24} revenue {:>10.2}  profit {:>10.2}  margin {:>5.1}%",
            category.name, category.total_revenue, category.total_profit, category.avg_margin
        );
    }
    println!(
        "  {:<24} revenue {:>10.2}  profit {:>10.2}  margin {:>5.1}%",
        "All",
        report.summary.total_revenue,
        report.summary.total_profit,
        report.summary.avg_margin
    );

    for warning in &report.warnings {
        println!("warning: {}", serde_json::to_string(warning)?);
    }

    let insights = margin_insights(&report.items);
    for issue in &insights.margin_issues {
        println!(
            "below target: {} ({:.1}% vs {:.1}%)",
            issue.item_name, issue.actual_margin, issue.expected_margin
        );
    }

    Ok(())
}
