use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One value of the decoded report grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

pub type Row = Vec<Cell>;
pub type Grid = Vec<Row>;

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn num(value: f64) -> Self {
        Cell::Number(value)
    }

    /// Empty cells and whitespace-only text both count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Trimmed text content, if this is a non-blank text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value for amount columns. Numeric text is accepted,
    /// everything else (and non-finite numbers) reads as zero.
    pub fn amount(&self) -> f64 {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Cell::Empty => 0.0,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// Trimmed string form used for label matching.
    pub fn label(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => n.to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "null"),
            Cell::Text(s) => write!(f, "{:?}", s),
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_none(),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Cell::from(&value))
    }
}

/// How an item's cost price was found in the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum CostMatch {
    Exact,
    CaseInsensitive,
    /// Substring match in either direction. Treat the cost as provisional.
    Fuzzy,
    Unresolved,
}

impl CostMatch {
    pub fn is_reliable(&self) -> bool {
        matches!(self, CostMatch::Exact | CostMatch::CaseInsensitive)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub item_name: String,
    pub category: String,
    pub quantity: f64,
    pub gross_amount: f64,
    pub discount: f64,
    pub net_amount: f64,
    pub tax: f64,
    pub total_sales: f64,
    pub cost_price: f64,
    pub total_cost: f64,
    /// Pre-tax profit: net amount minus total cost.
    pub profit: f64,
    pub margin_percent: f64,
    /// Target margin from the inventory, or the assumed default when unresolved.
    pub expected_margin: f64,
    pub cost_match: CostMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub item_count: usize,
    pub total_quantity: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub total_tax: f64,
    /// Margin of the category totals, not the mean of item margins.
    pub avg_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub item_count: usize,
    pub total_quantity: f64,
    pub total_orders: f64,
    pub total_revenue: f64,
    pub total_cost: f64,
    /// Pre-tax profit (revenue minus cost).
    pub total_profit: f64,
    pub total_tax: f64,
    /// Post-tax figure: pre-tax profit minus tax.
    pub net_profit_after_tax: f64,
    pub avg_margin: f64,
    pub gross_sales: f64,
    pub total_discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParseWarning {
    /// No inventory entry matched; cost defaulted to zero.
    UnresolvedCost {
        #[serde(rename = "itemName")]
        item_name: String,
        category: String,
        row: usize,
    },
    FuzzyCostMatch {
        #[serde(rename = "itemName")]
        item_name: String,
        #[serde(rename = "matchedName")]
        matched_name: String,
        row: usize,
    },
    /// The header carried no date range; the report date is the fallback date.
    DateRangeNotFound {
        #[serde(rename = "fallbackDate")]
        fallback_date: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub restaurant_name: String,
    pub date_range: String,
    pub date: NaiveDate,
    pub items: Vec<SaleItem>,
    pub categories: Vec<CategorySummary>,
    pub summary: SalesSummary,
    pub warnings: Vec<ParseWarning>,
}

impl ParseResult {
    pub fn unresolved_items(&self) -> impl Iterator<Item = &SaleItem> {
        self.items
            .iter()
            .filter(|item| item.cost_match == CostMatch::Unresolved)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ParseResult)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub name: String,
    pub cost_price: f64,
    pub selling_price: f64,
    pub margin_percent: f64,
    pub category: String,
}

/// Context attached to a failed parse so the source file can be fixed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParseDiagnostics {
    pub total_rows: usize,
    /// Rows that were not empty and went through classification.
    pub inspected_rows: usize,
    pub category_rows: usize,
    pub skipped_rows: usize,
    pub unclassified_rows: usize,
    pub sample_rows: Vec<String>,
}
