//! Dimension facts and the providers that produce them
//!
//! A `FactProvider` is the seam between the engine and whatever gathers raw
//! data about a site (HTML extraction, header inspection, search-console or
//! analytics clients). The engine only ever sees the resulting
//! `DimensionFacts` and treats live and synthetic facts identically.
//!
//! Shipped providers:
//! - `SnapshotProvider` - replays facts recorded in a JSON snapshot file
//! - `SeededProvider` - deterministic synthetic facts from a seed

mod seeded;
mod snapshot;

pub use seeded::SeededProvider;
pub use snapshot::{FactSnapshot, SnapshotProvider};

use crate::context::RunContext;
use crate::models::Dimension;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

/// Why a provider could not produce facts for its dimension
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no facts recorded for {0}")]
    NoFacts(Dimension),

    #[error("{provider} unavailable: {message}")]
    Unavailable { provider: String, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed facts: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Produces the facts for exactly one dimension
pub trait FactProvider: Send + Sync {
    /// Dimension these facts describe
    fn dimension(&self) -> Dimension;

    /// Provider name for logs
    fn name(&self) -> &str;

    /// Gather facts for the subject of `ctx`.
    ///
    /// May block on I/O. The pipeline runs providers concurrently and
    /// enforces its own deadline, so implementations need no timeout logic.
    fn fetch(&self, ctx: &RunContext) -> Result<DimensionFacts, ProviderError>;
}

/// Structured, read-only input for one dimension scorer.
///
/// Wraps a JSON object. Accessors take dotted paths (`"headings.h1"`) and
/// return `None` when a field is absent or has an unexpected type, so
/// scorers never fail on malformed input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionFacts(Map<String, Value>);

impl DimensionFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value. Anything other than an object yields empty facts.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Builder-style insert of a top-level field
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a dotted path. Explicit `null` counts as absent.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn str_at(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    pub fn bool_at(&self, path: &str) -> Option<bool> {
        self.get(path)?.as_bool()
    }

    pub fn f64_at(&self, path: &str) -> Option<f64> {
        self.get(path)?.as_f64()
    }

    /// Non-negative integer. Floats are truncated, negatives rejected.
    pub fn u64_at(&self, path: &str) -> Option<u64> {
        let value = self.get(path)?;
        value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        })
    }

    pub fn array_at(&self, path: &str) -> Option<&Vec<Value>> {
        self.get(path)?.as_array()
    }

    pub fn object_at(&self, path: &str) -> Option<&Map<String, Value>> {
        self.get(path)?.as_object()
    }

    /// A count that may be recorded either as a number or as a list of items
    pub fn count_at(&self, path: &str) -> Option<u64> {
        match self.get(path)? {
            Value::Array(items) => Some(items.len() as u64),
            _ => self.u64_at(path),
        }
    }

    /// List of strings, skipping non-string entries
    pub fn strings_at(&self, path: &str) -> Option<Vec<&str>> {
        Some(
            self.array_at(path)?
                .iter()
                .filter_map(Value::as_str)
                .collect(),
        )
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Value> for DimensionFacts {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}
