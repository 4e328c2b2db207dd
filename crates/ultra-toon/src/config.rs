//! Configuration for the Ultra-TOON encoder.
//!
//! All fields have defaults, so a config file only needs to name what it
//! changes:
//!
//! ```
//! use ultra_toon::config::{AliasPolicy, UltraConfig};
//!
//! let config = UltraConfig::from_json(r#"{"alias_policy":"first_char"}"#).unwrap();
//! assert_eq!(config.alias_policy, AliasPolicy::FirstChar);
//! assert_eq!(config.max_categories, 16);
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::Result;

/// Default ceiling on distinct values for a column to count as categorical.
pub const DEFAULT_MAX_CATEGORIES: usize = 16;

/// How column aliases are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasPolicy {
    /// First character of each name; colliding names share an alias.
    /// Byte-compatible with first-generation Ultra-TOON output.
    FirstChar,
    /// Collisions are resolved by trying later characters of the name, then
    /// unused letters `a..z`, then a numeric suffix.
    #[default]
    Resolve,
}

/// How an input mapping with more than one top-level key is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// The first key in document order names the dataset; the rest are
    /// dropped with a warning.
    #[default]
    FirstKeyWins,
    /// Anything other than exactly one key is an error.
    Strict,
}

/// Options for [`crate::encode_ultra`] and dataset extraction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UltraConfig {
    pub alias_policy: AliasPolicy,
    pub key_policy: KeyPolicy,
    /// A string column qualifies for value encoding when its distinct count
    /// is in `2..=max_categories`. Values above 26 act as 26, the size of the
    /// code alphabet.
    pub max_categories: usize,
    /// Caller-supplied `value -> code` tables. These replace the generated
    /// codes for their field and force the field to be encoded.
    pub value_encodings: BTreeMap<String, BTreeMap<String, String>>,
    /// When set, exactly these fields are auto-encoded and the cardinality
    /// heuristic is skipped.
    pub auto_encode_fields: Option<Vec<String>>,
}

impl Default for UltraConfig {
    fn default() -> Self {
        Self {
            alias_policy: AliasPolicy::default(),
            key_policy: KeyPolicy::default(),
            max_categories: DEFAULT_MAX_CATEGORIES,
            value_encodings: BTreeMap::new(),
            auto_encode_fields: None,
        }
    }
}

impl UltraConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_alias_policy(mut self, policy: AliasPolicy) -> Self {
        self.alias_policy = policy;
        self
    }

    pub fn with_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }

    pub fn with_max_categories(mut self, max: usize) -> Self {
        self.max_categories = max;
        self
    }

    /// Add an explicit `value -> code` table for one field, replacing any
    /// table previously set for it.
    pub fn with_value_encoding<F, I, V, C>(mut self, field: F, mapping: I) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = (V, C)>,
        V: Into<String>,
        C: Into<String>,
    {
        let table = mapping
            .into_iter()
            .map(|(v, c)| (v.into(), c.into()))
            .collect();
        self.value_encodings.insert(field.into(), table);
        self
    }

    pub fn with_auto_encode_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auto_encode_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}
