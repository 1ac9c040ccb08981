use crate::aggregator::{item_profit, summarize, summarize_category};
use crate::classifier::{cell, Column, RowClassifier, RowKind};
use crate::config::ParserConfig;
use crate::cost::CostResolver;
use crate::date_range::{extract_date_range_or, find_date_range, ReportPeriod};
use crate::error::{LedgerError, Result};
use crate::schema::{
    Cell, CostMatch, ParseDiagnostics, ParseResult, ParseWarning, Row, SaleItem,
};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use std::collections::HashMap;

/// Single forward pass over a report grid that tracks the current category
/// and turns item rows into priced sale items.
pub struct LedgerParser<'a> {
    config: &'a ParserConfig,
    resolver: &'a dyn CostResolver,
    fallback_date: Option<NaiveDate>,
}

// Items collected under one category, in row order.
struct CategoryBucket {
    name: String,
    items: Vec<usize>,
}

#[derive(Default)]
struct RowCounts {
    inspected: usize,
    categories: usize,
    skipped: usize,
    unclassified: usize,
}

impl<'a> LedgerParser<'a> {
    pub fn new(config: &'a ParserConfig, resolver: &'a dyn CostResolver) -> Self {
        Self {
            config,
            resolver,
            fallback_date: None,
        }
    }

    /// Date used when the header has no date range. Defaults to today.
    pub fn with_fallback_date(mut self, date: NaiveDate) -> Self {
        self.fallback_date = Some(date);
        self
    }

    pub fn parse(&self, rows: &[Row]) -> Result<ParseResult> {
        if rows.len() < self.config.min_rows {
            let reason = if rows.is_empty() {
                "grid is empty".to_string()
            } else {
                format!(
                    "expected at least {} rows, got {}",
                    self.config.min_rows,
                    rows.len()
                )
            };
            return Err(LedgerError::MalformedInput {
                reason,
                row_count: rows.len(),
            });
        }

        let restaurant_name = self.restaurant_name(rows);
        info!(
            "Parsing sales report for '{}' ({} rows)",
            restaurant_name,
            rows.len()
        );

        let mut warnings = Vec::new();
        let period = self.report_period(rows);
        if !period.matched {
            warn!(
                "No date range found in report header, using {}",
                period.date
            );
            warnings.push(ParseWarning::DateRangeNotFound {
                fallback_date: period.date,
            });
        }

        let classifier = RowClassifier::new(self.config);
        let mut current_category = self.config.uncategorized_label.clone();
        let mut buckets: Vec<CategoryBucket> = Vec::new();
        let mut bucket_index: HashMap<String, usize> = HashMap::new();
        let mut items: Vec<SaleItem> = Vec::new();
        let mut counts = RowCounts::default();

        for (row_idx, row) in rows.iter().enumerate() {
            if row.is_empty() {
                continue;
            }
            counts.inspected += 1;

            match classifier.classify(row) {
                RowKind::Skip => counts.skipped += 1,
                RowKind::Unclassified => counts.unclassified += 1,
                RowKind::Category => {
                    counts.categories += 1;
                    current_category = cell(row, Column::Marker).label();
                    debug!("Row {}: category '{}'", row_idx, current_category);
                    ensure_bucket(&mut buckets, &mut bucket_index, &current_category);
                }
                RowKind::Item => {
                    let item = self.build_item(row, row_idx, &current_category, &mut warnings);
                    let bucket = ensure_bucket(&mut buckets, &mut bucket_index, &current_category);
                    buckets[bucket].items.push(items.len());
                    items.push(item);
                }
            }
        }

        if items.is_empty() {
            let diagnostics = ParseDiagnostics {
                total_rows: rows.len(),
                inspected_rows: counts.inspected,
                category_rows: counts.categories,
                skipped_rows: counts.skipped,
                unclassified_rows: counts.unclassified,
                sample_rows: sample_rows(rows, self.config.diagnostic_sample_rows),
            };
            warn!(
                "No item rows found: {} rows total, {} inspected",
                diagnostics.total_rows, diagnostics.inspected_rows
            );
            return Err(LedgerError::NoItemsFound(Box::new(diagnostics)));
        }

        let categories = buckets
            .iter()
            .filter(|bucket| !bucket.items.is_empty())
            .map(|bucket| summarize_category(&bucket.name, bucket.items.iter().map(|&i| &items[i])))
            .collect::<Vec<_>>();

        let summary = summarize(&items);

        info!(
            "Parsed {} items in {} categories (revenue {:.2}, pre-tax profit {:.2}, {} warnings)",
            items.len(),
            categories.len(),
            summary.total_revenue,
            summary.total_profit,
            warnings.len()
        );

        Ok(ParseResult {
            restaurant_name,
            date_range: period.date_range,
            date: period.date,
            items,
            categories,
            summary,
            warnings,
        })
    }

    fn build_item(
        &self,
        row: &[Cell],
        row_idx: usize,
        category: &str,
        warnings: &mut Vec<ParseWarning>,
    ) -> SaleItem {
        let item_name = cell(row, Column::ItemName).label();
        let quantity = cell(row, Column::Quantity).amount();
        let net_amount = cell(row, Column::NetAmount).amount();

        let resolution = self.resolver.resolve_cost(&item_name);
        match (&resolution.matched, &resolution.matched_name) {
            (CostMatch::Unresolved, _) => {
                warn!(
                    "Row {}: no inventory cost for '{}', profit assumes zero cost",
                    row_idx, item_name
                );
                warnings.push(ParseWarning::UnresolvedCost {
                    item_name: item_name.clone(),
                    category: category.to_string(),
                    row: row_idx,
                });
            }
            (CostMatch::Fuzzy, Some(matched_name)) => {
                warn!(
                    "Row {}: '{}' priced from fuzzy match '{}'",
                    row_idx, item_name, matched_name
                );
                warnings.push(ParseWarning::FuzzyCostMatch {
                    item_name: item_name.clone(),
                    matched_name: matched_name.clone(),
                    row: row_idx,
                });
            }
            _ => {}
        }

        let figures = item_profit(resolution.cost_price, quantity, net_amount);

        SaleItem {
            item_name,
            category: category.to_string(),
            quantity,
            gross_amount: cell(row, Column::GrossAmount).amount(),
            discount: cell(row, Column::Discount).amount(),
            net_amount,
            tax: cell(row, Column::Tax).amount(),
            total_sales: cell(row, Column::TotalSales).amount(),
            cost_price: resolution.cost_price,
            total_cost: figures.total_cost,
            profit: figures.profit,
            margin_percent: figures.margin_percent,
            expected_margin: resolution.margin_percent,
            cost_match: resolution.matched,
        }
    }

    fn restaurant_name(&self, rows: &[Row]) -> String {
        rows.first()
            .map(|row| cell(row, Column::Marker).label())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.config.unknown_restaurant_label.clone())
    }

    // Row 1 is where the export puts the range; the other header rows are
    // searched after it.
    fn report_period(&self, rows: &[Row]) -> ReportPeriod {
        let scan = self.config.header_scan_rows.min(rows.len());
        let order = std::iter::once(1).chain((0..scan).filter(|&i| i != 1));

        for idx in order.filter(|&i| i < rows.len()) {
            let found = rows[idx]
                .iter()
                .filter_map(Cell::as_text)
                .find_map(find_date_range);
            if let Some(period) = found {
                return period;
            }
        }

        let fallback = self
            .fallback_date
            .unwrap_or_else(|| Local::now().date_naive());
        extract_date_range_or("", fallback)
    }
}

fn ensure_bucket(
    buckets: &mut Vec<CategoryBucket>,
    index: &mut HashMap<String, usize>,
    name: &str,
) -> usize {
    *index.entry(name.to_string()).or_insert_with(|| {
        buckets.push(CategoryBucket {
            name: name.to_string(),
            items: Vec::new(),
        });
        buckets.len() - 1
    })
}

fn sample_rows(rows: &[Row], limit: usize) -> Vec<String> {
    rows.iter()
        .take(limit)
        .enumerate()
        .map(|(idx, row)| {
            let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            format!("Row {}: [{}]", idx, cells.join(", "))
        })
        .collect()
}

/// Parses `rows` against `resolver` with the given configuration.
pub fn parse_grid(
    rows: &[Row],
    resolver: &dyn CostResolver,
    config: &ParserConfig,
) -> Result<ParseResult> {
    LedgerParser::new(config, resolver).parse(rows)
}
