//! # ultra-toon
//!
//! Tabular **TOON** and **Ultra-TOON** encoders for LLM prompts.
//!
//! Both formats take a single named table of uniform, flat rows
//! (`{"users": [{...}, {...}]}`) and write it as a header plus one
//! comma-separated line per row. Ultra-TOON additionally aliases the key and
//! columns to single characters and replaces low-cardinality string values
//! with single-letter codes, documenting both in a legend so the original
//! names and values stay recoverable.
//!
//! ## Quick start
//!
//! ```rust
//! use ultra_toon::{encode_plain, encode_ultra, UltraConfig};
//!
//! let json = r#"{"users":[{"id":1,"name":"Alice"},{"id":2,"name":"Bob"}]}"#;
//!
//! let toon = encode_plain(json).unwrap();
//! assert_eq!(toon, "users[2]{id,name}:\n  1,Alice\n  2,Bob\n");
//!
//! let ultra = encode_ultra(json, &UltraConfig::default()).unwrap();
//! assert_eq!(
//!     ultra,
//!     "SCHEMA: i=id; n=name\nENCODE name: a=Alice; b=Bob\nu[2]{i,n}:\n  1,a\n  2,b"
//! );
//! ```
//!
//! ## Modules
//!
//! - [`dataset`]: JSON document → validated [`Dataset`]
//! - [`alias`]: column and key aliases
//! - [`categorical`]: categorical field detection and code assignment
//! - [`encoder`]: TOON / Ultra-TOON rendering
//! - [`output`]: writing rendered documents to disk
//! - [`bench`]: JSON vs TOON vs Ultra-TOON model benchmark
//! - [`config`]: encoder options
//! - [`error`]: error types

pub mod alias;
pub mod bench;
pub mod categorical;
pub mod config;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod output;

pub use alias::{assign_aliases, Aliases};
pub use categorical::{assign_codes, build_code_tables, detect_categorical, CodeTable};
pub use config::{AliasPolicy, KeyPolicy, UltraConfig};
pub use dataset::{Cell, Dataset};
pub use encoder::{encode_plain, encode_ultra, render_plain, render_ultra};
pub use error::{BenchError, ToonError};
pub use output::write_document;
