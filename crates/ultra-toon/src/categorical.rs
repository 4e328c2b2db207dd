//! Categorical value encoding for Ultra-TOON.
//!
//! Low-cardinality string columns (roles, cities, statuses) are rewritten as
//! single-letter codes, with a legend line mapping every code back to its
//! value. Three steps:
//!
//! - [`detect_categorical`] picks columns by the cardinality heuristic;
//! - [`assign_codes`] gives each distinct value a letter;
//! - [`build_code_tables`] combines both with caller overrides.
//!
//! Distinct values are always sorted before codes are handed out, so the
//! same dataset encodes to the same letters on every run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;

use crate::config::UltraConfig;
use crate::dataset::Dataset;
use crate::error::{Result, ToonError};

/// Number of single-letter codes available to one field.
pub const MAX_CODES: usize = 26;

/// The `value -> code` table of one encoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    field: String,
    /// `(value, code)` in assignment order, i.e. sorted by value.
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl CodeTable {
    fn new(field: &str, entries: Vec<(String, String)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (value, _))| (value.clone(), i))
            .collect();
        Self {
            field: field.to_string(),
            entries,
            index,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn code_for(&self, value: &str) -> Option<&str> {
        self.index.get(value).map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Columns whose values are all strings with between 2 and `max_categories`
/// distinct values, in column order.
///
/// The ceiling never exceeds [`MAX_CODES`], so a detected column always fits
/// the code alphabet.
pub fn detect_categorical(dataset: &Dataset, max_categories: usize) -> Vec<String> {
    if dataset.row_count() == 0 {
        return Vec::new();
    }
    let max_categories = max_categories.min(MAX_CODES);
    dataset
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| is_categorical(dataset, *i, max_categories))
        .map(|(_, name)| name.clone())
        .collect()
}

fn is_categorical(dataset: &Dataset, index: usize, max_categories: usize) -> bool {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for cell in dataset.column_cells(index) {
        match cell.as_str() {
            Some(s) => {
                seen.insert(s);
                if seen.len() > max_categories {
                    return false;
                }
            }
            None => return false,
        }
    }
    seen.len() > 1
}

/// The distinct text forms of one column, sorted.
pub fn distinct_values(dataset: &Dataset, index: usize) -> Vec<String> {
    dataset
        .column_cells(index)
        .map(|cell| cell.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Give each value a distinct lower-case letter.
///
/// Values are taken in the order given (callers pass them sorted). Each gets
/// the first ASCII letter of its own text, case-folded, that is still free;
/// a value with no free letter of its own gets the first free letter of
/// `a..z`.
pub fn assign_codes(field: &str, values: &[String]) -> Result<CodeTable> {
    if values.len() > MAX_CODES {
        return Err(ToonError::TooManyCategories {
            field: field.to_string(),
            count: values.len(),
        });
    }

    let mut used = [false; MAX_CODES];
    let mut entries = Vec::with_capacity(values.len());
    for value in values {
        let code = value
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .find(|c| !used[letter_slot(*c)])
            .or_else(|| ('a'..='z').find(|c| !used[letter_slot(*c)]))
            .ok_or_else(|| ToonError::TooManyCategories {
                field: field.to_string(),
                count: values.len(),
            })?;
        used[letter_slot(code)] = true;
        entries.push((value.clone(), code.to_string()));
    }
    Ok(CodeTable::new(field, entries))
}

fn letter_slot(c: char) -> usize {
    (c as u8 - b'a') as usize
}

/// Build a table from a caller-supplied mapping, keeping only the values
/// that occur in the column (`present` must be sorted).
///
/// Present values without a mapping are written as-is, so no code may equal
/// one of them.
pub fn explicit_codes(
    field: &str,
    mapping: &BTreeMap<String, String>,
    present: &[String],
) -> Result<CodeTable> {
    let mut codes: HashMap<&str, &str> = HashMap::with_capacity(mapping.len());
    for (value, code) in mapping {
        if codes.insert(code.as_str(), value.as_str()).is_some() {
            return Err(ToonError::DuplicateCode {
                field: field.to_string(),
                code: code.clone(),
            });
        }
    }

    let entries: Vec<(String, String)> = mapping
        .iter()
        .filter(|(value, _)| present.binary_search(value).is_ok())
        .map(|(value, code)| (value.clone(), code.clone()))
        .collect();

    if let Some((_, code)) = entries
        .iter()
        .find(|(_, code)| present.binary_search(code).is_ok() && !mapping.contains_key(code))
    {
        return Err(ToonError::AmbiguousCode {
            field: field.to_string(),
            code: code.clone(),
        });
    }
    Ok(CodeTable::new(field, entries))
}

/// Resolve which fields are encoded and build their tables, in column order.
///
/// A field is encoded when it is in `auto_encode_fields` (or passes the
/// heuristic when that list is absent), or when it has an entry in
/// `value_encodings`. Explicit mappings win over generated codes. Fields whose
/// table ends up empty are dropped.
pub fn build_code_tables(dataset: &Dataset, config: &UltraConfig) -> Result<Vec<CodeTable>> {
    let named = config
        .value_encodings
        .keys()
        .chain(config.auto_encode_fields.iter().flatten());
    for field in named {
        if dataset.column_index(field).is_none() {
            return Err(ToonError::UnknownField {
                field: field.clone(),
            });
        }
    }

    let auto: Vec<String> = match &config.auto_encode_fields {
        Some(fields) => fields.clone(),
        None => detect_categorical(dataset, config.max_categories),
    };
    debug!("auto-encoded fields: [{}]", auto.join(", "));

    let mut tables = Vec::new();
    for (index, name) in dataset.columns().iter().enumerate() {
        let explicit = config.value_encodings.get(name);
        if explicit.is_none() && !auto.contains(name) {
            continue;
        }
        let values = distinct_values(dataset, index);
        let table = match explicit {
            Some(mapping) => explicit_codes(name, mapping, &values)?,
            None => assign_codes(name, &values)?,
        };
        if table.is_empty() {
            debug!("field '{}' has no values covered by its mapping", name);
            continue;
        }
        tables.push(table);
    }
    Ok(tables)
}
