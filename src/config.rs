use crate::error::{LedgerError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knobs for the row heuristics. The skip lists were tuned against a single
/// export format and are expected to grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    #[schemars(description = "Grids with fewer rows than this are rejected as malformed.")]
    pub min_rows: usize,

    #[schemars(description = "Category assigned to items that appear before any category row.")]
    pub uncategorized_label: String,

    #[schemars(description = "Exact (trimmed) first-column labels of summary rows to skip.")]
    pub skip_labels: Vec<String>,

    #[schemars(
        description = "Substrings that mark a row as skippable when found anywhere in the first column, ignoring case."
    )]
    pub skip_contains_case_insensitive: Vec<String>,

    #[schemars(description = "Case-sensitive substrings that mark a row as skippable.")]
    pub skip_contains: Vec<String>,

    #[schemars(description = "How many leading rows are searched for the reporting date range.")]
    pub header_scan_rows: usize,

    #[schemars(description = "Number of leading rows rendered into failure diagnostics.")]
    pub diagnostic_sample_rows: usize,

    #[schemars(description = "Restaurant name used when the first row has no name.")]
    pub unknown_restaurant_label: String,

    pub cost_policy: CostMatchPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_rows: 5,
            uncategorized_label: "Uncategorized".to_string(),
            skip_labels: ["Max", "Min", "Avg", "Total", "Sub Total", "Round off", "Group"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            skip_contains_case_insensitive: vec!["hotel".to_string()],
            skip_contains: vec!["Group Report".to_string()],
            header_scan_rows: 4,
            diagnostic_sample_rows: 10,
            unknown_restaurant_label: "Unknown".to_string(),
            cost_policy: CostMatchPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CostMatchPolicy {
    #[schemars(
        description = "Allow substring matches in either direction when no exact match exists. Order dependent: 'Coke' may resolve to 'Diet Coke'."
    )]
    pub allow_fuzzy: bool,

    #[schemars(description = "Assumed margin reported for items with no inventory match.")]
    pub default_margin_percent: f64,
}

impl Default for CostMatchPolicy {
    fn default() -> Self {
        Self {
            allow_fuzzy: true,
            default_margin_percent: 45.0,
        }
    }
}

impl ParserConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ParserConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_rows == 0 {
            return Err(LedgerError::InvalidConfig(
                "minRows must be at least 1".to_string(),
            ));
        }

        let margin = self.cost_policy.default_margin_percent;
        if !(0.0..=100.0).contains(&margin) {
            return Err(LedgerError::InvalidConfig(format!(
                "defaultMarginPercent {} must be between 0 and 100",
                margin
            )));
        }

        if self.uncategorized_label.trim().is_empty() {
            return Err(LedgerError::InvalidConfig(
                "uncategorizedLabel must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ParserConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
