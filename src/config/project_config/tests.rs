use super::*;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = ProjectConfig::default();
    assert_eq!(config.scoring.recommendation_cap, 10);
    assert_eq!(config.scoring.order, MergeOrder::Priority);
    assert_eq!(config.providers.timeout(), Duration::from_secs(30));
    assert!(config.providers.workers.is_none());
    assert!(config.disabled_dimensions().is_empty());
}

#[test]
fn test_parse_toml() {
    let config: ProjectConfig = toml::from_str(
        r#"
[scoring]
recommendation_cap = 5
order = "impact"

[dimensions.ads]
enabled = false

[dimensions.search-console]
enabled = false

[dimensions.content]
enabled = true

[providers]
timeout_secs = 5
workers = 2

[defaults]
format = "json"
fail_under = 65.0
"#,
    )
    .unwrap();

    assert_eq!(config.merge_options().cap, 5);
    assert_eq!(config.merge_options().order, MergeOrder::Impact);
    assert_eq!(
        config.disabled_dimensions(),
        vec![Dimension::Ads, Dimension::SearchConsole]
    );
    assert!(config.is_dimension_enabled(Dimension::Content));
    assert!(config.is_dimension_enabled(Dimension::Links));
    assert_eq!(config.providers.timeout(), Duration::from_secs(5));
    assert_eq!(config.providers.workers, Some(2));
    assert_eq!(config.defaults.format.as_deref(), Some("json"));
    assert_eq!(config.defaults.fail_under, Some(65.0));
}

#[test]
fn test_partial_sections_keep_defaults() {
    let config: ProjectConfig = toml::from_str("[scoring]\norder = \"impact\"\n").unwrap();
    assert_eq!(config.scoring.recommendation_cap, 10);
    assert_eq!(config.providers.timeout_secs, 30);
}

#[test]
fn test_unknown_dimension_ignored() {
    let config: ProjectConfig = toml::from_str("[dimensions.seo]\nenabled = false\n").unwrap();
    assert!(config.disabled_dimensions().is_empty());
}

#[test]
fn test_template_matches_defaults() {
    let config: ProjectConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
    assert_eq!(config.scoring.recommendation_cap, DEFAULT_RECOMMENDATION_CAP);
    assert_eq!(config.scoring.order, MergeOrder::Priority);
    assert_eq!(config.providers.timeout_secs, 30);
    assert_eq!(config.defaults.format.as_deref(), Some("text"));
    assert!(config.defaults.fail_under.is_none());
}

#[test]
fn test_load_toml_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[scoring]\nrecommendation_cap = 3\n",
    )
    .unwrap();
    let config = load_project_config(dir.path());
    assert_eq!(config.scoring.recommendation_cap, 3);
}

#[test]
fn test_load_json_fallback() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(JSON_CONFIG_FILE_NAME),
        r#"{"dimensions": {"analytics": {"enabled": false}}}"#,
    )
    .unwrap();
    let config = load_project_config(dir.path());
    assert_eq!(config.disabled_dimensions(), vec![Dimension::Analytics]);
}

#[test]
fn test_broken_toml_falls_back_to_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[scoring\n").unwrap();
    std::fs::write(
        dir.path().join(JSON_CONFIG_FILE_NAME),
        r#"{"scoring": {"recommendation_cap": 7}}"#,
    )
    .unwrap();
    assert_eq!(load_project_config(dir.path()).scoring.recommendation_cap, 7);
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_project_config(dir.path());
    assert_eq!(config.scoring.recommendation_cap, 10);
}

#[test]
fn test_conflicting_aliases_disable() {
    for source in [
        "[dimensions.link]\nenabled = false\n[dimensions.links]\nenabled = true\n",
        "[dimensions.link]\nenabled = true\n[dimensions.links]\nenabled = false\n",
    ] {
        let config: ProjectConfig = toml::from_str(source).unwrap();
        assert!(!config.is_dimension_enabled(Dimension::Links));
        assert_eq!(config.disabled_dimensions(), vec![Dimension::Links]);
    }
}

#[test]
fn test_load_error_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[scoring\n").unwrap();
    let err = load_toml_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("Invalid TOML in"));
    assert!(format!("{err}").contains(CONFIG_FILE_NAME));
}
