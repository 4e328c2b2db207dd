//! Table serializer: renders a dataset as TOON or Ultra-TOON.
//!
//! **TOON** keeps column names and values verbatim:
//!
//! ```text
//! users[2]{id,name}:
//!   1,Alice
//!   2,Bob
//! ```
//!
//! **Ultra-TOON** prefixes a legend, aliases the key and columns, and swaps
//! categorical values for their codes:
//!
//! ```text
//! SCHEMA: i=id; n=name
//! ENCODE name: a=Alice; b=Bob
//! u[2]{i,n}:
//!   1,a
//!   2,b
//! ```
//!
//! # Example
//! ```
//! use ultra_toon::encode_plain;
//! let json = r#"{"users":[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}]}"#;
//! assert_eq!(encode_plain(json).unwrap(), "users[2]{id,name}:\n  1,Alice\n  2,Bob\n");
//! ```

use crate::alias::assign_aliases;
use crate::categorical::{build_code_tables, CodeTable};
use crate::config::{KeyPolicy, UltraConfig};
use crate::dataset::{Cell, Dataset};
use crate::error::Result;

const ROW_INDENT: &str = "  ";
const LEGEND_SEPARATOR: &str = "; ";

/// Encode a JSON dataset document as plain TOON.
///
/// Only the first top-level key is used; see [`KeyPolicy::FirstKeyWins`].
pub fn encode_plain(json: &str) -> Result<String> {
    let dataset = Dataset::from_json(json, KeyPolicy::FirstKeyWins)?;
    Ok(render_plain(&dataset))
}

/// Encode a JSON dataset document as Ultra-TOON.
pub fn encode_ultra(json: &str, config: &UltraConfig) -> Result<String> {
    let dataset = Dataset::from_json(json, config.key_policy)?;
    render_ultra(&dataset, config)
}

/// Render `key[N]{col,...}:` followed by one indented line per row, each
/// terminated by a newline.
pub fn render_plain(dataset: &Dataset) -> String {
    let mut out = String::new();
    push_header(dataset.key(), dataset.row_count(), dataset.columns(), &mut out);
    for row in dataset.rows() {
        out.push('\n');
        out.push_str(ROW_INDENT);
        push_row(row, &[], &mut out);
    }
    out.push('\n');
    out
}

/// Render the legend, aliased header, and coded rows.
///
/// The `ENCODE` lines appear only for fields that were actually encoded.
/// Rows are separated by newlines with none after the last.
pub fn render_ultra(dataset: &Dataset, config: &UltraConfig) -> Result<String> {
    let aliases = assign_aliases(dataset.key(), dataset.columns(), config.alias_policy);
    let tables = build_code_tables(dataset, config)?;

    let mut out = String::from("SCHEMA: ");
    let schema: Vec<String> = aliases
        .columns()
        .iter()
        .zip(dataset.columns())
        .map(|(alias, name)| format!("{}={}", alias, name))
        .collect();
    out.push_str(&schema.join(LEGEND_SEPARATOR));

    for table in &tables {
        out.push('\n');
        push_encode_legend(table, &mut out);
    }

    out.push('\n');
    push_header(aliases.key(), dataset.row_count(), aliases.columns(), &mut out);

    // Code table per column position, if that column is encoded.
    let by_column: Vec<Option<&CodeTable>> = dataset
        .columns()
        .iter()
        .map(|name| tables.iter().find(|t| t.field() == name.as_str()))
        .collect();

    for row in dataset.rows() {
        out.push('\n');
        out.push_str(ROW_INDENT);
        push_row(row, &by_column, &mut out);
    }
    Ok(out)
}

/// `name[N]{f1,f2}:`
fn push_header(name: &str, rows: usize, fields: &[String], out: &mut String) {
    out.push_str(&format!("{}[{}]{{{}}}:", name, rows, fields.join(",")));
}

/// `ENCODE field: a=first; b=second`
fn push_encode_legend(table: &CodeTable, out: &mut String) {
    out.push_str("ENCODE ");
    out.push_str(table.field());
    out.push_str(": ");
    let pairs: Vec<String> = table
        .entries()
        .iter()
        .map(|(value, code)| format!("{}={}", code, value))
        .collect();
    out.push_str(&pairs.join(LEGEND_SEPARATOR));
}

/// Comma-joined cells. A cell in an encoded column is replaced by its code;
/// values missing from the table pass through unchanged.
fn push_row(row: &[Cell], tables: &[Option<&CodeTable>], out: &mut String) {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        match tables.get(i).copied().flatten() {
            Some(table) => {
                let text = cell.to_string();
                out.push_str(table.code_for(&text).unwrap_or(&text));
            }
            None => cell.render(out),
        }
    }
}
