//! Project-level configuration support
//!
//! Loads configuration from `sitehealth.toml` or `.sitehealthrc.json` in
//! the working directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # sitehealth.toml
//!
//! [scoring]
//! recommendation_cap = 10
//! order = "priority"   # or "impact"
//!
//! [dimensions.ads]
//! enabled = false
//!
//! [providers]
//! timeout_secs = 30
//! workers = 4
//!
//! [defaults]
//! format = "text"
//! fail_under = 50.0
//! ```

use anyhow::Context;
use crate::models::Dimension;
use crate::scoring::{MergeOptions, MergeOrder, DEFAULT_RECOMMENDATION_CAP};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Preferred config file name
pub const CONFIG_FILE_NAME: &str = "sitehealth.toml";

/// JSON fallback config file name
pub const JSON_CONFIG_FILE_NAME: &str = ".sitehealthrc.json";

/// Commented config written by `sitehealth init`. Every value is the default.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# sitehealth configuration

[scoring]
# Maximum number of merged recommendations in a report
recommendation_cap = 10

# Recommendation order: "priority" (dimension order) or "impact" (weakest dimension first)
order = "priority"

# Disable a dimension entirely; it is never fetched and never reported
# [dimensions.ads]
# enabled = false

[providers]
# Seconds each dimension's facts may take before it is marked as failed
timeout_secs = 30

# Provider threads (0 = auto)
workers = 0

[defaults]
# Output format (text, json, markdown)
format = "text"

# Exit non-zero when the overall score is below this value
# fail_under = 50.0
"#;

/// Project configuration loaded from sitehealth.toml
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Aggregation and recommendation settings
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Per-dimension toggles, keyed by dimension name
    #[serde(default)]
    pub dimensions: BTreeMap<String, DimensionToggle>,

    /// Provider execution settings
    #[serde(default)]
    pub providers: ProviderConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_recommendation_cap")]
    pub recommendation_cap: usize,

    #[serde(default)]
    pub order: MergeOrder,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            recommendation_cap: DEFAULT_RECOMMENDATION_CAP,
            order: MergeOrder::default(),
        }
    }
}

fn default_recommendation_cap() -> usize {
    DEFAULT_RECOMMENDATION_CAP
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DimensionToggle {
    /// Whether the dimension is analyzed (default: true)
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Per-dimension fetch timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Provider threads (0 = auto)
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            workers: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json, markdown)
    #[serde(default)]
    pub format: Option<String>,

    /// Default minimum overall score before `analyze` exits non-zero
    #[serde(default)]
    pub fail_under: Option<f64>,
}

impl ProjectConfig {
    /// Check if a dimension is enabled (defaults to true if not specified).
    ///
    /// When several aliases (`links`, `link`) configure the same dimension,
    /// any one disabling it wins.
    pub fn is_dimension_enabled(&self, dimension: Dimension) -> bool {
        !self
            .dimensions
            .iter()
            .filter(|(name, _)| name.parse::<Dimension>().ok() == Some(dimension))
            .any(|(_, toggle)| toggle.enabled == Some(false))
    }

    /// Dimensions switched off in the config, in priority order.
    ///
    /// Unknown dimension names are logged and ignored.
    pub fn disabled_dimensions(&self) -> Vec<Dimension> {
        for name in self.dimensions.keys() {
            if let Err(e) = name.parse::<Dimension>() {
                warn!("Ignoring [dimensions.{}]: {}", name, e);
            }
        }
        Dimension::ALL
            .into_iter()
            .filter(|&d| !self.is_dimension_enabled(d))
            .collect()
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            cap: self.scoring.recommendation_cap,
            order: self.scoring.order,
        }
    }
}

/// Load project configuration from a directory.
///
/// Tries `sitehealth.toml` first, then `.sitehealthrc.json`. A file that
/// fails to parse is logged and skipped; with nothing usable the defaults
/// apply.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    // Try TOML first (preferred format)
    let toml_path = dir.join(CONFIG_FILE_NAME);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load project config: {:#}", e);
            }
        }
    }

    let json_path = dir.join(JSON_CONFIG_FILE_NAME);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load project config: {:#}", e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ProjectConfig = toml::from_str(&content)
        .with_context(|| format!("Invalid TOML in {}", path.display()))?;
    Ok(config)
}

fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ProjectConfig = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests;
