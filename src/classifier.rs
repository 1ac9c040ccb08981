use crate::config::ParserConfig;
use crate::schema::Cell;
use serde::Serialize;

/// Fixed column contract of the sales report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Marker = 0,
    ItemName = 1,
    Quantity = 2,
    GrossAmount = 3,
    Discount = 4,
    NetAmount = 5,
    Tax = 6,
    TotalSales = 7,
}

impl Column {
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    /// Summary statistics or report headers.
    Skip,
    Category,
    Item,
    Unclassified,
}

pub fn cell(row: &[Cell], column: Column) -> &Cell {
    const EMPTY: &Cell = &Cell::Empty;
    row.get(column.index()).unwrap_or(EMPTY)
}

/// Tags rows by position and cell type alone. Rules are checked in order
/// and the first match wins: skip, category, item, unclassified.
pub struct RowClassifier<'a> {
    config: &'a ParserConfig,
}

impl<'a> RowClassifier<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, row: &[Cell]) -> RowKind {
        let marker = cell(row, Column::Marker);

        // Must run first: "Sub Total", "Round off" and "Group" also have the
        // category shape.
        if self.is_skip_label(&marker.label()) {
            return RowKind::Skip;
        }

        let name = cell(row, Column::ItemName);

        if marker.as_text().is_some() && name.is_blank() {
            return RowKind::Category;
        }

        let quantity = cell(row, Column::Quantity);
        let has_quantity = quantity.as_number().is_some_and(|q| q > 0.0);

        if marker.is_blank() && name.as_text().is_some() && has_quantity {
            return RowKind::Item;
        }

        RowKind::Unclassified
    }

    pub fn is_skip_label(&self, label: &str) -> bool {
        if label.is_empty() {
            return false;
        }

        if self.config.skip_labels.iter().any(|s| s == label) {
            return true;
        }

        let lowered = label.to_lowercase();
        if self
            .config
            .skip_contains_case_insensitive
            .iter()
            .any(|needle| lowered.contains(&needle.to_lowercase()))
        {
            return true;
        }

        self.config
            .skip_contains
            .iter()
            .any(|needle| label.contains(needle.as_str()))
    }
}
