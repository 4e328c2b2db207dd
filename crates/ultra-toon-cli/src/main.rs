//! `toon` CLI: encode tabular JSON as TOON or Ultra-TOON, compare sizes, and
//! generate synthetic datasets.
//!
//! ## Usage
//!
//! ```sh
//! # Plain TOON (stdin → stdout)
//! echo '{"users":[{"id":1,"name":"Alice"}]}' | toon encode
//!
//! # Ultra-TOON from file to file
//! toon encode --ultra -i users.json -o users.toon
//!
//! # Force categorical encoding of a column, reject multi-key input
//! toon encode --ultra --encode-field role --strict-keys -i users.json
//!
//! # Size comparison of JSON, TOON and Ultra-TOON
//! toon stats -i users.json
//!
//! # 1000 synthetic users, reproducible
//! toon generate -n 1000 --seed 7 -o users.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::io::{self, Read};
use std::path::PathBuf;
use ultra_toon::{AliasPolicy, Dataset, KeyPolicy, UltraConfig};

#[derive(Parser)]
#[command(
    name = "toon",
    version,
    about = "TOON / Ultra-TOON tabular encoder CLI"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Column alias policy
#[derive(Debug, Clone, Copy, ValueEnum)]
enum AliasArg {
    /// Unique aliases, collisions resolved
    Resolve,
    /// First character of each name, collisions allowed
    FirstChar,
}

impl From<AliasArg> for AliasPolicy {
    fn from(arg: AliasArg) -> Self {
        match arg {
            AliasArg::Resolve => AliasPolicy::Resolve,
            AliasArg::FirstChar => AliasPolicy::FirstChar,
        }
    }
}

/// Options shared by commands that run the Ultra-TOON encoder.
#[derive(clap::Args)]
struct UltraArgs {
    /// JSON config file (alias_policy, key_policy, max_categories,
    /// value_encodings, auto_encode_fields)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Column alias policy (overrides the config file)
    #[arg(long, value_enum)]
    alias_policy: Option<AliasArg>,
    /// Reject input with more than one top-level key
    #[arg(long)]
    strict_keys: bool,
    /// Encode this field categorically instead of using the heuristic (repeatable)
    #[arg(long = "encode-field", value_name = "FIELD")]
    encode_fields: Vec<String>,
    /// Maximum distinct values for a column to be detected as categorical
    #[arg(long)]
    max_categories: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON dataset to TOON (or Ultra-TOON with --ultra)
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit Ultra-TOON instead of plain TOON
        #[arg(long)]
        ultra: bool,
        #[command(flatten)]
        ultra_args: UltraArgs,
    },
    /// Show JSON, TOON and Ultra-TOON sizes for a dataset
    Stats {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[command(flatten)]
        ultra_args: UltraArgs,
    },
    /// Generate a synthetic `users` dataset as JSON
    Generate {
        /// Number of rows
        #[arg(short = 'n', long, default_value_t = 1000)]
        rows: usize,
        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

const ROLES: [&str; 5] = ["developer", "designer", "manager", "analyst", "engineer"];
const CITIES: [&str; 5] = ["Delhi", "Mumbai", "Bangalore", "Hyderabad", "Chennai"];

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Encode {
            input,
            output,
            ultra,
            ultra_args,
        } => {
            let json = read_input(input.as_deref())?;
            let config = build_config(&ultra_args)?;
            let dataset = Dataset::from_json(&json, config.key_policy)
                .context("Failed to read dataset from JSON")?;

            let toon = if ultra {
                ultra_toon::render_ultra(&dataset, &config)
                    .context("Failed to encode dataset to Ultra-TOON")?
            } else {
                ultra_toon::render_plain(&dataset)
            };
            info!(
                "Encoded {} rows: {} bytes JSON -> {} bytes",
                dataset.row_count(),
                json.len(),
                toon.len()
            );
            write_output(output.as_deref(), &toon)?;
        }
        Commands::Stats { input, ultra_args } => {
            let json = read_input(input.as_deref())?;
            let config = build_config(&ultra_args)?;
            let dataset = Dataset::from_json(&json, config.key_policy)
                .context("Failed to read dataset from JSON")?;
            let toon = ultra_toon::render_plain(&dataset);
            let ultra = ultra_toon::render_ultra(&dataset, &config)
                .context("Failed to encode dataset to Ultra-TOON")?;

            let json_bytes = json.len();
            println!("Rows:        {}", dataset.row_count());
            println!("JSON size:   {} bytes", json_bytes);
            println!(
                "TOON size:   {} bytes ({:.1}% reduction)",
                toon.len(),
                reduction(json_bytes, toon.len())
            );
            println!(
                "Ultra size:  {} bytes ({:.1}% reduction)",
                ultra.len(),
                reduction(json_bytes, ultra.len())
            );
        }
        Commands::Generate { rows, seed, output } => {
            let data = generate_users(rows, seed);
            let pretty = serde_json::to_string_pretty(&data)?;
            write_output(output.as_deref(), &pretty)?;
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) {
    let log_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    debug!("Logging initialized at {} level", log_level);
}

/// Start from the config file (or defaults) and apply command-line overrides.
fn build_config(args: &UltraArgs) -> Result<UltraConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            UltraConfig::from_json(&raw)
                .with_context(|| format!("Invalid config: {}", path.display()))?
        }
        None => UltraConfig::default(),
    };

    if let Some(policy) = args.alias_policy {
        config = config.with_alias_policy(policy.into());
    }
    if args.strict_keys {
        config = config.with_key_policy(KeyPolicy::Strict);
    }
    if !args.encode_fields.is_empty() {
        config = config.with_auto_encode_fields(args.encode_fields.iter().cloned());
    }
    if let Some(max) = args.max_categories {
        config = config.with_max_categories(max);
    }
    Ok(config)
}

fn reduction(original: usize, encoded: usize) -> f64 {
    if original > 0 {
        (1.0 - (encoded as f64 / original as f64)) * 100.0
    } else {
        0.0
    }
}

/// `{"users": [{id, name, age, role, city}, ...]}` with random age, role and city.
fn generate_users(rows: usize, seed: Option<u64>) -> Value {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let users: Vec<Value> = (1..=rows)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("User_{:04}", i),
                "age": rng.random_range(18..=65),
                "role": ROLES[rng.random_range(0..ROLES.len())],
                "city": CITIES[rng.random_range(0..CITIES.len())],
            })
        })
        .collect();
    json!({ "users": users })
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            ultra_toon::write_document(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
