//! Inventory port and an in-memory adapter.
//!
//! The parser never reads the live store. Callers take a [`InventorySnapshot`]
//! with [`InventoryRepository::snapshot`] and hand that to the parser, so
//! edits made during a parse are not visible to it.

use crate::catalog::default_catalog;
use crate::config::CostMatchPolicy;
use crate::cost::InventorySnapshot;
use crate::error::{LedgerError, Result};
use crate::schema::InventoryEntry;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: u64,
    pub name: String,
    pub cost_price: f64,
    pub selling_price: f64,
    pub margin_percent: f64,
    pub category: String,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn to_entry(&self) -> InventoryEntry {
        InventoryEntry {
            name: self.name.clone(),
            cost_price: self.cost_price,
            selling_price: self.selling_price,
            margin_percent: self.margin_percent,
            category: self.category.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    pub cost_price: f64,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub margin_percent: f64,
    #[serde(default)]
    pub category: String,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryUpdate {
    pub name: Option<String>,
    pub cost_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub margin_percent: Option<f64>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub name: String,
    pub count: usize,
    /// Mean target margin, rounded to a whole percent.
    pub avg_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_items: usize,
    pub categories: Vec<CategoryStats>,
}

pub trait InventoryRepository: Send + Sync {
    fn list(&self) -> Vec<InventoryItem>;

    fn get(&self, id: u64) -> Option<InventoryItem>;

    /// Same matching priority as cost resolution.
    fn find_by_name(&self, name: &str) -> Option<InventoryItem>;

    fn by_category(&self, category: &str) -> Vec<InventoryItem>;

    /// Distinct categories in first-seen order.
    fn categories(&self) -> Vec<String>;

    fn add(&self, item: NewInventoryItem) -> Result<InventoryItem>;

    fn update(&self, id: u64, update: InventoryUpdate) -> Result<InventoryItem>;

    fn delete(&self, id: u64) -> bool;

    fn stats(&self) -> InventoryStats;

    /// Stable copy for one parse.
    fn snapshot(&self) -> InventorySnapshot;
}

pub struct InMemoryInventory {
    items: RwLock<Vec<InventoryItem>>,
    next_id: AtomicU64,
    policy: CostMatchPolicy,
}

impl Default for InMemoryInventory {
    fn default() -> Self {
        Self::new(CostMatchPolicy::default())
    }
}

impl InMemoryInventory {
    pub fn new(policy: CostMatchPolicy) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            policy,
        }
    }

    pub fn with_default_catalog() -> Result<Self> {
        let inventory = Self::default();
        for item in default_catalog() {
            inventory.add(item)?;
        }
        info!("Seeded inventory with {} items", inventory.read().len());
        Ok(inventory)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<InventoryItem>> {
        self.items.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<InventoryItem>> {
        self.items.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn validate(name: &str, cost_price: f64, margin_percent: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::InvalidInventoryEntry {
            name: name.to_string(),
            details: "name must not be blank".to_string(),
        });
    }
    if !cost_price.is_finite() || cost_price < 0.0 {
        return Err(LedgerError::InvalidInventoryEntry {
            name: name.to_string(),
            details: format!("cost price {} must be a non-negative number", cost_price),
        });
    }
    if !margin_percent.is_finite() {
        return Err(LedgerError::InvalidInventoryEntry {
            name: name.to_string(),
            details: "margin must be a number".to_string(),
        });
    }
    Ok(())
}

fn name_taken(items: &[InventoryItem], name: &str, except: Option<u64>) -> bool {
    let lowered = name.trim().to_lowercase();
    items
        .iter()
        .any(|i| Some(i.id) != except && i.name.to_lowercase() == lowered)
}

fn distinct_categories(items: &[InventoryItem]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for item in items {
        if !categories.contains(&item.category) {
            categories.push(item.category.clone());
        }
    }
    categories
}

impl InventoryRepository for InMemoryInventory {
    fn list(&self) -> Vec<InventoryItem> {
        self.read().clone()
    }

    fn get(&self, id: u64) -> Option<InventoryItem> {
        self.read().iter().find(|i| i.id == id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<InventoryItem> {
        let snapshot = self.snapshot();
        let (entry, _) = snapshot.find(name)?;
        self.read().iter().find(|i| i.name == entry.name).cloned()
    }

    fn by_category(&self, category: &str) -> Vec<InventoryItem> {
        self.read()
            .iter()
            .filter(|i| i.category == category)
            .cloned()
            .collect()
    }

    fn categories(&self) -> Vec<String> {
        distinct_categories(&self.read())
    }

    fn add(&self, item: NewInventoryItem) -> Result<InventoryItem> {
        validate(&item.name, item.cost_price, item.margin_percent)?;

        let mut items = self.write();
        if name_taken(&items, &item.name, None) {
            return Err(LedgerError::DuplicateInventoryItem(item.name));
        }

        let created = InventoryItem {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: item.name.trim().to_string(),
            cost_price: item.cost_price,
            selling_price: item.selling_price,
            margin_percent: item.margin_percent,
            category: item.category,
            updated_at: Utc::now(),
        };
        debug!("Added inventory item {} '{}'", created.id, created.name);
        items.push(created.clone());
        Ok(created)
    }

    fn update(&self, id: u64, update: InventoryUpdate) -> Result<InventoryItem> {
        let mut items = self.write();
        let position = items
            .iter()
            .position(|i| i.id == id)
            .ok_or(LedgerError::InventoryItemNotFound(id))?;

        let mut updated = items[position].clone();
        if let Some(name) = update.name {
            if name_taken(&items, &name, Some(id)) {
                return Err(LedgerError::DuplicateInventoryItem(name));
            }
            updated.name = name.trim().to_string();
        }
        if let Some(cost_price) = update.cost_price {
            updated.cost_price = cost_price;
        }
        if let Some(selling_price) = update.selling_price {
            updated.selling_price = selling_price;
        }
        if let Some(margin_percent) = update.margin_percent {
            updated.margin_percent = margin_percent;
        }
        if let Some(category) = update.category {
            updated.category = category;
        }
        validate(&updated.name, updated.cost_price, updated.margin_percent)?;

        updated.updated_at = Utc::now();
        items[position] = updated.clone();
        Ok(updated)
    }

    fn delete(&self, id: u64) -> bool {
        let mut items = self.write();
        let before = items.len();
        items.retain(|i| i.id != id);
        items.len() != before
    }

    fn stats(&self) -> InventoryStats {
        let items = self.read();
        let categories = distinct_categories(&items)
            .into_iter()
            .map(|name| {
                let members: Vec<&InventoryItem> =
                    items.iter().filter(|i| i.category == name).collect();
                let mean = members.iter().map(|i| i.margin_percent).sum::<f64>()
                    / members.len() as f64;
                CategoryStats {
                    name,
                    count: members.len(),
                    avg_margin: mean.round(),
                }
            })
            .collect();

        InventoryStats {
            total_items: items.len(),
            categories,
        }
    }

    fn snapshot(&self) -> InventorySnapshot {
        self.read()
            .iter()
            .map(InventoryItem::to_entry)
            .collect::<InventorySnapshot>()
            .with_policy(self.policy.clone())
    }
}
