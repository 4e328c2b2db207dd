//! Benchmark harness: asks the same question over JSON, TOON and Ultra-TOON
//! renderings of one dataset and compares token usage, latency and answers.
//!
//! The model is reached through the [`ModelClient`] trait. Construct the
//! client once in the caller and pass it in; nothing here holds global state.
//!
//! ```
//! use serde_json::json;
//! use ultra_toon::bench::{run_benchmark, Completion, ModelClient, TokenUsage};
//! use ultra_toon::error::BenchError;
//! use ultra_toon::UltraConfig;
//!
//! struct Echo;
//! impl ModelClient for Echo {
//!     fn complete(&self, prompt: &str) -> Result<Completion, BenchError> {
//!         Ok(Completion {
//!             answer: "2 users".to_string(),
//!             usage: TokenUsage { prompt_tokens: prompt.len() as u64 / 4, completion_tokens: 2 },
//!         })
//!     }
//! }
//!
//! let data = json!({"users": [{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]});
//! let report = run_benchmark(&Echo, &data, "How many users?", &UltraConfig::default()).unwrap();
//! assert_eq!(report.quality_scores.json_vs_ultra, 1.0);
//! ```

use std::time::Instant;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::UltraConfig;
use crate::dataset::Dataset;
use crate::encoder::{render_plain, render_ultra};
use crate::error::BenchError;

/// Token accounting reported by the model service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// One model answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub answer: String,
    pub usage: TokenUsage,
}

/// A completion service.
pub trait ModelClient {
    fn complete(&self, prompt: &str) -> Result<Completion, BenchError>;
}

/// A completion together with the wall-clock time it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub answer: String,
    pub latency_seconds: f64,
    pub usage: TokenUsage,
}

/// The prompt sent for every representation.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!("DATA: \n{}\n\nQUESTION:\n{}", context, question)
}

/// Call the model once and time the call.
pub fn invoke<C: ModelClient + ?Sized>(client: &C, prompt: &str) -> Result<Invocation, BenchError> {
    let start = Instant::now();
    let completion = client.complete(prompt)?;
    let latency_seconds = start.elapsed().as_secs_f64();
    Ok(Invocation {
        answer: completion.answer,
        latency_seconds,
        usage: completion.usage,
    })
}

/// Length similarity of two answers in `[0, 1]`: `1 - |len(a) - len(b)| / len(a)`,
/// `0` when either is empty. Lengths are counted in characters.
pub fn score(a: &str, b: &str) -> f64 {
    let la = a.chars().count();
    let lb = b.chars().count();
    if la == 0 || lb == 0 {
        return 0.0;
    }
    let diff = la.abs_diff(lb) as f64;
    (1.0 - diff / la.max(1) as f64).clamp(0.0, 1.0)
}

/// Pairwise answer similarity across the three representations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityScores {
    pub json_vs_toon: f64,
    pub json_vs_ultra: f64,
    pub toon_vs_ultra: f64,
}

pub fn evaluate_quality(json: &str, toon: &str, ultra: &str) -> QualityScores {
    QualityScores {
        json_vs_toon: score(json, toon),
        json_vs_ultra: score(json, ultra),
        toon_vs_ultra: score(toon, ultra),
    }
}

/// One measurement per representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerFormat<T> {
    pub json: T,
    pub toon: T,
    pub ultra: T,
}

impl<T> PerFormat<T> {
    fn map<U>(&self, f: impl Fn(&T) -> U) -> PerFormat<U> {
        PerFormat {
            json: f(&self.json),
            toon: f(&self.toon),
            ultra: f(&self.ultra),
        }
    }
}

/// Everything measured in one benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkReport {
    /// Prompt plus completion tokens.
    pub tokens: PerFormat<u64>,
    pub prompt_tokens: PerFormat<u64>,
    pub latency: PerFormat<f64>,
    pub usage_raw: PerFormat<TokenUsage>,
    pub answers: PerFormat<String>,
    pub quality_scores: QualityScores,
}

/// Body of a benchmark request, as received by a front end.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkRequest {
    pub data: Value,
    pub question: String,
}

impl BenchmarkRequest {
    pub fn run<C: ModelClient + ?Sized>(
        &self,
        client: &C,
        config: &UltraConfig,
    ) -> Result<BenchmarkReport, BenchError> {
        run_benchmark(client, &self.data, &self.question, config)
    }
}

/// Encode `data` once per representation, ask `question` over each, and
/// collect the measurements.
pub fn run_benchmark<C: ModelClient + ?Sized>(
    client: &C,
    data: &Value,
    question: &str,
    config: &UltraConfig,
) -> Result<BenchmarkReport, BenchError> {
    let dataset = Dataset::from_value(data, config.key_policy)?;
    let contexts = PerFormat {
        json: serde_json::to_string(data)?,
        toon: render_plain(&dataset),
        ultra: render_ultra(&dataset, config)?,
    };
    debug!(
        "context sizes: json={} toon={} ultra={}",
        contexts.json.len(),
        contexts.toon.len(),
        contexts.ultra.len()
    );

    let runs = PerFormat {
        json: invoke(client, &build_prompt(&contexts.json, question))?,
        toon: invoke(client, &build_prompt(&contexts.toon, question))?,
        ultra: invoke(client, &build_prompt(&contexts.ultra, question))?,
    };

    let quality_scores = evaluate_quality(&runs.json.answer, &runs.toon.answer, &runs.ultra.answer);
    let report = BenchmarkReport {
        tokens: runs.map(|r| r.usage.total()),
        prompt_tokens: runs.map(|r| r.usage.prompt_tokens),
        latency: runs.map(|r| r.latency_seconds),
        usage_raw: runs.map(|r| r.usage),
        answers: runs.map(|r| r.answer.clone()),
        quality_scores,
    };
    info!(
        "benchmark tokens: json={} toon={} ultra={}",
        report.tokens.json, report.tokens.toon, report.tokens.ultra
    );
    Ok(report)
}
