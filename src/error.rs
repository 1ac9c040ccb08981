use crate::schema::ParseDiagnostics;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Malformed input: {reason} (rows: {row_count})")]
    MalformedInput { reason: String, row_count: usize },

    #[error(
        "No items found in report: {} rows total, {} inspected. Please check the file format.",
        .0.total_rows,
        .0.inspected_rows
    )]
    NoItemsFound(Box<ParseDiagnostics>),

    #[error("Category totals do not match summary for {field}: {category_sum} != {summary}")]
    InconsistentTotals {
        field: String,
        category_sum: f64,
        summary: f64,
    },

    #[error("Sales record {0} not found")]
    RecordNotFound(u64),

    #[error("Inventory item {0} not found")]
    InventoryItemNotFound(u64),

    #[error("Inventory item already exists: {0}")]
    DuplicateInventoryItem(String),

    #[error("Invalid inventory entry '{name}': {details}")]
    InvalidInventoryEntry { name: String, details: String },

    #[error("Invalid parser configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LedgerError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "malformed_input",
            Self::NoItemsFound(_) => "no_items_found",
            Self::InconsistentTotals { .. } => "inconsistent_totals",
            Self::RecordNotFound(_) => "record_not_found",
            Self::InventoryItemNotFound(_) => "inventory_item_not_found",
            Self::DuplicateInventoryItem(_) => "duplicate_inventory_item",
            Self::InvalidInventoryEntry { .. } => "invalid_inventory_entry",
            Self::InvalidConfig(_) => "invalid_config",
            Self::SerializationError(_) => "serialization_error",
            Self::IoError(_) => "io_error",
        }
    }

    /// Builds a report that can be handed to a caller over an API boundary.
    /// IO and serialization details are reduced to their kind.
    pub fn report(&self) -> ErrorReport {
        let message = match self {
            Self::SerializationError(_) => "Failed to decode or encode JSON payload".to_string(),
            Self::IoError(_) => "Failed to read input".to_string(),
            other => other.to_string(),
        };

        let diagnostics = match self {
            Self::NoItemsFound(diagnostics) => Some(diagnostics.as_ref().clone()),
            _ => None,
        };

        ErrorReport {
            kind: self.kind(),
            message,
            diagnostics,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<ParseDiagnostics>,
}

pub type Result<T> = std::result::Result<T, LedgerError>;
