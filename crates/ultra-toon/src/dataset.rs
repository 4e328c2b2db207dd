//! Dataset extraction: turns a `{"key": [row, row, ...]}` document into a
//! validated, column-ordered table.
//!
//! Columns come from the first row in document order (serde_json is built
//! with `preserve_order`). Every later row must carry exactly the same key
//! set; cells must be scalars.

use std::fmt;

use log::{debug, warn};
use serde_json::{Map, Number, Value};

use crate::config::KeyPolicy;
use crate::error::{Result, ToonError};

/// A scalar table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Cell {
    /// Convert a JSON value, or `None` for arrays and objects.
    pub fn from_value(value: &Value) -> Option<Cell> {
        match value {
            Value::Null => Some(Cell::Null),
            Value::Bool(b) => Some(Cell::Bool(*b)),
            Value::Number(n) => Some(Cell::Number(n.clone())),
            Value::String(s) => Some(Cell::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Append the cell's text form. Strings are written verbatim.
    pub fn render(&self, out: &mut String) {
        match self {
            Cell::Null => out.push_str("null"),
            Cell::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Cell::Number(n) => out.push_str(&format_number(n)),
            Cell::String(s) => out.push_str(s),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        self.render(&mut s);
        f.write_str(&s)
    }
}

/// Format a JSON number without exponents or trailing fractional zeros.
/// Integral floats print as integers and `-0` prints as `0`.
fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            let f = if f == 0.0 { 0.0 } else { f };
            if f.fract() == 0.0 && f.abs() < (i64::MAX as f64) {
                return (f as i64).to_string();
            }
            // f64's Display never uses an exponent
            let s = format!("{}", f);
            if s.contains('.') {
                s.trim_end_matches('0').trim_end_matches('.').to_string()
            } else {
                s
            }
        }
        _ => "null".to_string(),
    }
}

/// A named, uniform table of scalar rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    key: String,
    columns: Vec<String>,
    /// Cells in `columns` order.
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Parse a JSON document and extract its dataset.
    pub fn from_json(json: &str, policy: KeyPolicy) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value, policy)
    }

    /// Extract the dataset named by the top-level key of `value`.
    ///
    /// With [`KeyPolicy::FirstKeyWins`] any further top-level keys are
    /// dropped (and logged); with [`KeyPolicy::Strict`] they are an error.
    pub fn from_value(value: &Value, policy: KeyPolicy) -> Result<Self> {
        let map = value.as_object().ok_or(ToonError::MissingKey)?;
        let key = map.keys().next().ok_or(ToonError::MissingKey)?;

        if map.len() > 1 {
            let keys: Vec<String> = map.keys().cloned().collect();
            match policy {
                KeyPolicy::Strict => return Err(ToonError::MultipleKeys { keys }),
                KeyPolicy::FirstKeyWins => {
                    warn!(
                        "using dataset '{}', ignoring top-level keys: {}",
                        key,
                        keys[1..].join(", ")
                    );
                }
            }
        }

        let rows = map[key]
            .as_array()
            .ok_or_else(|| ToonError::NotARowSet { key: key.clone() })?;
        Self::from_rows(key, rows)
    }

    /// Build a dataset from a key and its row objects.
    pub fn from_rows(key: &str, rows: &[Value]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| ToonError::EmptyDataset {
                key: key.to_string(),
            })?
            .as_object()
            .ok_or(ToonError::InvalidRow { row: 0 })?;
        let columns: Vec<String> = first.keys().cloned().collect();

        let mut table = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let obj = row.as_object().ok_or(ToonError::InvalidRow { row: i })?;
            if !same_key_set(obj, &columns) {
                return Err(ToonError::HeterogeneousRow {
                    row: i,
                    expected: columns.clone(),
                    found: obj.keys().cloned().collect(),
                });
            }
            let cells = columns
                .iter()
                .map(|column| {
                    Cell::from_value(&obj[column]).ok_or_else(|| ToonError::NonScalarCell {
                        row: i,
                        column: column.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            table.push(cells);
        }

        debug!(
            "dataset '{}': {} rows x {} columns",
            key,
            table.len(),
            columns.len()
        );
        Ok(Self {
            key: key.to_string(),
            columns,
            rows: table,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column, top to bottom.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }
}

/// Key sets are compared as sets; order within a row does not matter since
/// cells are looked up by name.
fn same_key_set(obj: &Map<String, Value>, columns: &[String]) -> bool {
    obj.len() == columns.len() && columns.iter().all(|c| obj.contains_key(c))
}
