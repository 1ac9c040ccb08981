use crate::error::{LedgerError, Result};
use crate::schema::{Cell, Grid, Row};
use serde_json::Value;
use std::io::Read;

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::String(s) => Cell::Text(s.clone()),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
            Value::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// Converts an array-of-arrays JSON payload (one inner array per sheet row)
/// into a typed grid. Non-array rows are treated as empty rows.
pub fn grid_from_values(rows: &[Value]) -> Grid {
    rows.iter()
        .map(|row| match row {
            Value::Array(cells) => cells.iter().map(Cell::from).collect::<Row>(),
            Value::Null => Vec::new(),
            other => vec![Cell::from(other)],
        })
        .collect()
}

pub fn grid_from_json_str(json: &str) -> Result<Grid> {
    let value: Value = serde_json::from_str(json)?;
    grid_from_value(&value)
}

pub fn grid_from_reader<R: Read>(reader: R) -> Result<Grid> {
    let value: Value = serde_json::from_reader(reader)?;
    grid_from_value(&value)
}

fn grid_from_value(value: &Value) -> Result<Grid> {
    match value {
        Value::Array(rows) => Ok(grid_from_values(rows)),
        _ => Err(LedgerError::MalformedInput {
            reason: "expected a JSON array of rows".to_string(),
            row_count: 0,
        }),
    }
}
