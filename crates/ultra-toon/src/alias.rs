//! Column aliasing: short stand-ins for column and dataset-key names.
//!
//! Under [`AliasPolicy::Resolve`] every column alias is unique:
//!
//! 1. the first character of the name, when no earlier column took it;
//! 2. else the first later alphanumeric character of the name that is free
//!    (`"name"`, `"notes"` → `n`, `o`);
//! 3. else the first free letter of `a..z`;
//! 4. else the name's first character plus the smallest free number from 2
//!    (`c2`, `c3`, ... for an empty name).
//!
//! [`AliasPolicy::FirstChar`] takes the first character of every name and
//! lets collisions through, matching first-generation Ultra-TOON output.
//!
//! The key alias is the first character of the key under both policies.

use std::collections::HashSet;

use log::debug;

use crate::config::AliasPolicy;

/// Aliases for one dataset: the key and each column, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aliases {
    key: String,
    columns: Vec<String>,
}

impl Aliases {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Column aliases, index-aligned with the dataset's columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// Derive aliases for a dataset key and its columns.
///
/// The key alias sits in its own header slot, so it is never checked
/// against column aliases.
pub fn assign_aliases(key: &str, columns: &[String], policy: AliasPolicy) -> Aliases {
    let columns = match policy {
        AliasPolicy::FirstChar => columns.iter().map(|c| first_char(c)).collect(),
        AliasPolicy::Resolve => resolve(columns),
    };
    Aliases {
        key: first_char(key),
        columns,
    }
}

fn resolve(columns: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(columns.len());
    let mut out = Vec::with_capacity(columns.len());

    for name in columns {
        let first = first_char(name);
        let later = name
            .chars()
            .skip(1)
            .filter(|c| c.is_alphanumeric())
            .map(String::from);
        let alias = std::iter::once(first.clone())
            .filter(|a| !a.is_empty())
            .chain(later)
            .find(|a| !used.contains(a))
            .or_else(|| {
                ('a'..='z')
                    .map(String::from)
                    .find(|a| !used.contains(a))
            })
            .unwrap_or_else(|| numbered(&first, &used));

        if alias != first {
            debug!("column '{}' aliased to '{}' to avoid a collision", name, alias);
        }
        used.insert(alias.clone());
        out.push(alias);
    }
    out
}

/// Suffix base for a column whose name is empty.
const EMPTY_NAME_BASE: &str = "c";

/// `base2`, `base3`, ... whichever is free first.
fn numbered(base: &str, used: &HashSet<String>) -> String {
    let base = if base.is_empty() { EMPTY_NAME_BASE } else { base };
    let mut n = 2usize;
    loop {
        let candidate = format!("{}{}", base, n);
        if !used.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn first_char(name: &str) -> String {
    name.chars().next().map(String::from).unwrap_or_default()
}
