//! Facts replayed from a recorded JSON snapshot
//!
//! Snapshot layout:
//!
//! ```text
//! {
//!   "url": "https://example.com/",
//!   "domain": "example.com",
//!   "dimensions": {
//!     "content": { "title": "...", ... },
//!     "performance": { "provider_error": "HTTP 503 from resource collector" }
//!   }
//! }
//! ```
//!
//! A dimension missing from `dimensions` is reported as a provider failure,
//! as is one whose facts consist of a `provider_error` message.

use super::{DimensionFacts, FactProvider, ProviderError};
use crate::context::RunContext;
use crate::models::Dimension;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Field that marks a recorded provider failure
const PROVIDER_ERROR_FIELD: &str = "provider_error";

#[derive(Debug, Clone, Default, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    dimensions: BTreeMap<String, Value>,
}

/// Parsed facts snapshot covering any subset of dimensions
#[derive(Debug, Clone, Default)]
pub struct FactSnapshot {
    pub url: Option<String>,
    pub domain: Option<String>,
    dimensions: BTreeMap<Dimension, Value>,
}

impl FactSnapshot {
    /// Read and parse a snapshot file
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json(&content)?;
        debug!(
            "Loaded facts snapshot {} ({} dimensions)",
            path.display(),
            snapshot.dimensions.len()
        );
        Ok(snapshot)
    }

    /// Parse snapshot JSON. Unknown dimension names are skipped with a warning.
    pub fn from_json(content: &str) -> Result<Self, ProviderError> {
        let raw: RawSnapshot = serde_json::from_str(content)?;
        let mut dimensions = BTreeMap::new();
        for (name, facts) in raw.dimensions {
            match name.parse::<Dimension>() {
                Ok(dimension) => {
                    dimensions.insert(dimension, facts);
                }
                Err(_) => warn!("Ignoring facts for unknown dimension '{}'", name),
            }
        }
        Ok(Self {
            url: raw.url,
            domain: raw.domain,
            dimensions,
        })
    }

    /// Dimensions with recorded facts (including recorded failures)
    pub fn recorded(&self) -> Vec<Dimension> {
        self.dimensions.keys().copied().collect()
    }

    /// One provider per requested dimension, all sharing this snapshot
    pub fn providers(self: Arc<Self>, dimensions: &[Dimension]) -> Vec<Arc<dyn FactProvider>> {
        dimensions
            .iter()
            .map(|&dimension| {
                Arc::new(SnapshotProvider {
                    dimension,
                    snapshot: Arc::clone(&self),
                }) as Arc<dyn FactProvider>
            })
            .collect()
    }
}

/// Serves one dimension out of a shared `FactSnapshot`
pub struct SnapshotProvider {
    dimension: Dimension,
    snapshot: Arc<FactSnapshot>,
}

impl SnapshotProvider {
    pub fn new(dimension: Dimension, snapshot: Arc<FactSnapshot>) -> Self {
        Self {
            dimension,
            snapshot,
        }
    }
}

impl FactProvider for SnapshotProvider {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn name(&self) -> &str {
        "snapshot"
    }

    fn fetch(&self, _ctx: &RunContext) -> Result<DimensionFacts, ProviderError> {
        let value = self
            .snapshot
            .dimensions
            .get(&self.dimension)
            .ok_or(ProviderError::NoFacts(self.dimension))?;

        if let Some(message) = value.get(PROVIDER_ERROR_FIELD).and_then(Value::as_str) {
            return Err(ProviderError::Unavailable {
                provider: format!("{} provider", self.dimension),
                message: message.to_string(),
            });
        }

        Ok(DimensionFacts::from_value(value.clone()))
    }
}
