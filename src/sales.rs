//! Persistence port for parsed reports and an in-memory adapter.

use crate::error::{LedgerError, Result};
use crate::schema::{CategorySummary, ParseResult, ParseWarning, SaleItem, SalesSummary};
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSalesRecord {
    pub file_name: String,
    pub restaurant_name: String,
    pub date: NaiveDate,
    pub date_range: String,
    pub items: Vec<SaleItem>,
    pub categories: Vec<CategorySummary>,
    pub summary: SalesSummary,
    #[serde(default)]
    pub warnings: Vec<ParseWarning>,
}

impl NewSalesRecord {
    pub fn from_parse(file_name: impl Into<String>, result: ParseResult) -> Self {
        Self {
            file_name: file_name.into(),
            restaurant_name: result.restaurant_name,
            date: result.date,
            date_range: result.date_range,
            items: result.items,
            categories: result.categories,
            summary: result.summary,
            warnings: result.warnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub id: u64,
    pub file_name: String,
    pub restaurant_name: String,
    pub date: NaiveDate,
    pub date_range: String,
    pub items: Vec<SaleItem>,
    pub categories: Vec<CategorySummary>,
    pub summary: SalesSummary,
    pub warnings: Vec<ParseWarning>,
    pub created_at: DateTime<Utc>,
}

/// Listing view without line items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecordOverview {
    pub id: u64,
    pub file_name: String,
    pub restaurant_name: String,
    pub date: NaiveDate,
    pub date_range: String,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub total_tax: f64,
    pub total_orders: f64,
    pub avg_margin: f64,
    pub item_count: usize,
    pub category_count: usize,
    pub warning_count: usize,
    pub created_at: DateTime<Utc>,
}

impl SalesRecord {
    pub fn overview(&self) -> SalesRecordOverview {
        SalesRecordOverview {
            id: self.id,
            file_name: self.file_name.clone(),
            restaurant_name: self.restaurant_name.clone(),
            date: self.date,
            date_range: self.date_range.clone(),
            total_revenue: self.summary.total_revenue,
            total_cost: self.summary.total_cost,
            total_profit: self.summary.total_profit,
            total_tax: self.summary.total_tax,
            total_orders: self.summary.total_orders,
            avg_margin: self.summary.avg_margin,
            item_count: self.items.len(),
            category_count: self.categories.len(),
            warning_count: self.warnings.len(),
            created_at: self.created_at,
        }
    }
}

/// Inclusive date bounds and an optional restaurant name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalesFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub restaurant_name: Option<String>,
}

impl SalesFilter {
    pub fn between(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
            restaurant_name: None,
        }
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.start_date.map_or(true, |start| record.date >= start)
            && self.end_date.map_or(true, |end| record.date <= end)
            && self
                .restaurant_name
                .as_ref()
                .map_or(true, |name| record.restaurant_name.eq_ignore_ascii_case(name))
    }
}

pub trait SalesRepository: Send + Sync {
    fn save(&self, record: NewSalesRecord) -> u64;

    fn fetch(&self, id: u64) -> Result<SalesRecord>;

    /// Newest first.
    fn list(&self, filter: &SalesFilter) -> Vec<SalesRecord>;

    fn delete(&self, id: u64) -> bool;
}

pub struct InMemorySalesStore {
    records: RwLock<Vec<SalesRecord>>,
    next_id: AtomicU64,
}

impl Default for InMemorySalesStore {
    fn default() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl InMemorySalesStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<SalesRecord>> {
        self.records.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<SalesRecord>> {
        self.records.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SalesRepository for InMemorySalesStore {
    fn save(&self, record: NewSalesRecord) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        debug!(
            "Saving sales record {} for {} ({} items)",
            id,
            record.date,
            record.items.len()
        );
        self.write().push(SalesRecord {
            id,
            file_name: record.file_name,
            restaurant_name: record.restaurant_name,
            date: record.date,
            date_range: record.date_range,
            items: record.items,
            categories: record.categories,
            summary: record.summary,
            warnings: record.warnings,
            created_at: Utc::now(),
        });
        id
    }

    fn fetch(&self, id: u64) -> Result<SalesRecord> {
        self.read()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(LedgerError::RecordNotFound(id))
    }

    fn list(&self, filter: &SalesFilter) -> Vec<SalesRecord> {
        self.read()
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    fn delete(&self, id: u64) -> bool {
        let mut records = self.write();
        let before = records.len();
        records.retain(|r| r.id != id);
        records.len() != before
    }
}
