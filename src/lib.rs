//! # POS Sales Ledger
//!
//! A library for turning a point-of-sale "daily item sales" export (a grid of
//! loosely typed cells) into a priced, categorized sales report.
//!
//! ## Core Concepts
//!
//! - **Grid**: Rows of [`Cell`]s (`Empty`, `Text`, `Number`) as decoded from a spreadsheet
//! - **Row Classification**: Each row is a summary row to skip, a category header, an item, or noise
//! - **Cost Resolution**: Item names are priced against an inventory snapshot through [`CostResolver`]
//! - **Aggregation**: Per-item profit and margin rolled up per category and for the whole report
//! - **Warnings**: Provisional costs and missing report dates are flagged, never fatal
//!
//! ## Example
//!
//! ```rust,ignore
//! use pos_sales_ledger::*;
//!
//! let inventory = InMemoryInventory::with_default_catalog()?;
//! let rows = grid_from_json_str(r#"[
//!     ["Acme Bar"],
//!     ["17-10-2025 to 18-10-2025"],
//!     [],
//!     ["Food", null],
//!     [null, "Chilli Chicken", 3, 1100, 53, 1047, 52.38, 1099.38]
//! ]"#)?;
//!
//! let report = parse_sales_report(&rows, &inventory.snapshot(), &ParserConfig::default())?;
//! println!("{} items, margin {}%", report.summary.item_count, report.summary.avg_margin);
//! ```

pub mod aggregator;
pub mod analytics;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod cost;
pub mod date_range;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod inventory;
pub mod sales;
pub mod schema;

pub use aggregator::{margin_percent, summarize, verify_totals};
pub use analytics::{
    category_analytics, daily_trends, dashboard_stats, margin_insights, top_items,
};
pub use classifier::{Column, RowClassifier, RowKind};
pub use config::{CostMatchPolicy, ParserConfig};
pub use cost::{CostResolution, CostResolver, InventorySnapshot};
pub use date_range::{extract_date_range, ReportPeriod};
pub use engine::{parse_grid, LedgerParser};
pub use error::{ErrorReport, LedgerError, Result};
pub use ingestion::*;
pub use inventory::{
    InMemoryInventory, InventoryItem, InventoryRepository, InventoryStats, InventoryUpdate,
    NewInventoryItem,
};
pub use sales::{InMemorySalesStore, NewSalesRecord, SalesFilter, SalesRecord, SalesRepository};
pub use schema::*;

use log::{debug, info};

pub struct SalesReportProcessor;

impl SalesReportProcessor {
    pub fn process(
        rows: &[Row],
        resolver: &dyn CostResolver,
        config: &ParserConfig,
    ) -> Result<ParseResult> {
        config.validate()?;

        info!("Processing sales report with {} rows", rows.len());

        let result = parse_grid(rows, resolver, config)?;

        for warning in &result.warnings {
            debug!("Report warning: {:?}", warning);
        }

        Ok(result)
    }

    pub fn process_with_verification(
        rows: &[Row],
        resolver: &dyn CostResolver,
        config: &ParserConfig,
        tolerance: f64,
    ) -> Result<ParseResult> {
        let result = Self::process(rows, resolver, config)?;

        verify_totals(&result, tolerance)?;

        Ok(result)
    }

    /// Parses against a fresh inventory snapshot and stores the result.
    pub fn import(
        file_name: &str,
        rows: &[Row],
        inventory: &dyn InventoryRepository,
        store: &dyn SalesRepository,
        config: &ParserConfig,
    ) -> Result<(u64, ParseResult)> {
        let snapshot = inventory.snapshot();
        let result = Self::process(rows, &snapshot, config)?;
        let id = store.save(NewSalesRecord::from_parse(file_name, result.clone()));

        info!(
            "Imported {} as sales record {} ({} items, {} warnings)",
            file_name,
            id,
            result.items.len(),
            result.warnings.len()
        );

        Ok((id, result))
    }
}

pub fn parse_sales_report(
    rows: &[Row],
    resolver: &dyn CostResolver,
    config: &ParserConfig,
) -> Result<ParseResult> {
    SalesReportProcessor::process(rows, resolver, config)
}

/// Same as [`parse_sales_report`] for a JSON array-of-arrays grid.
pub fn parse_sales_report_json(
    json: &str,
    resolver: &dyn CostResolver,
    config: &ParserConfig,
) -> Result<ParseResult> {
    let rows = grid_from_json_str(json)?;
    SalesReportProcessor::process(&rows, resolver, config)
}

pub fn process_with_verification(
    rows: &[Row],
    resolver: &dyn CostResolver,
    config: &ParserConfig,
    tolerance: f64,
) -> Result<ParseResult> {
    SalesReportProcessor::process_with_verification(rows, resolver, config, tolerance)
}
