//! Configuration module for sitehealth
//!
//! This module handles:
//! - Project-level configuration (sitehealth.toml)
//! - Dimension toggles
//! - Scoring and provider settings
//! - CLI defaults

mod project_config;

pub use project_config::{
    load_project_config, CliDefaults, DimensionToggle, ProjectConfig, ProviderConfig,
    ScoringConfig, CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE, JSON_CONFIG_FILE_NAME,
};
