//! Tests for config module.

use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Parse config from YAML string (for testing).
fn from_yaml(yaml: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

fn minimal_valid_yaml() -> String {
    r#"
app:
  name: riskdesk
  env: development

exchange:
  enabled: true

preferences:
  path: configs/preferences.txt
"#
    .to_string()
}

// ==================== YAML field loading tests ====================

#[test]
fn test_load_app_fields() {
    let yaml = r#"
app:
  name: mydesk
  env: production
  log_level: debug

exchange:
  enabled: true

preferences:
  path: prefs.txt
"#;
    let cfg = from_yaml(yaml).unwrap();

    assert_eq!(cfg.app.name, "mydesk");
    assert_eq!(cfg.app.env, "production");
    assert_eq!(cfg.app.log_level, Some("debug".to_string()));
}

#[test]
fn test_load_exchange_fields() {
    let yaml = r#"
app:
  name: test
  env: development

exchange:
  enabled: true
  testnet: true
  rate_limit: 1200

preferences:
  path: prefs.txt
"#;
    let cfg = from_yaml(yaml).unwrap();

    assert!(cfg.exchange.enabled);
    assert!(cfg.exchange.testnet);
    assert_eq!(cfg.exchange.rate_limit, Some(1200));
    // Credentials never come from YAML
    assert!(cfg.exchange.api_key.is_empty());
    assert!(cfg.exchange.api_secret.is_empty());
}

#[test]
fn test_load_recorder_defaults() {
    let yaml = r#"
app:
  name: test
  env: development

exchange:
  enabled: true

preferences:
  path: prefs.txt

recorder: {}
"#;
    let cfg = from_yaml(yaml).unwrap();
    let recorder = cfg.recorder.unwrap();

    assert!(recorder.enabled);
    assert_eq!(recorder.path, "trades.db");
    assert_eq!(recorder.max_connections, 5);
}

#[test]
fn test_recorder_section_optional() {
    let cfg = from_yaml(&minimal_valid_yaml()).unwrap();
    assert!(cfg.recorder.is_none());
}

// ==================== Validation tests ====================

#[test]
fn test_validate_minimal_config() {
    let cfg = from_yaml(&minimal_valid_yaml()).unwrap();
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_empty_app_name_fails() {
    let yaml = r#"
app:
  name: ""
  env: development

exchange:
  enabled: true

preferences:
  path: prefs.txt
"#;
    let cfg = from_yaml(yaml).unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("app.name"));
}

#[test]
fn test_validate_missing_preferences_path_fails() {
    let yaml = r#"
app:
  name: test
  env: development

exchange:
  enabled: true

preferences:
  path: ""
"#;
    let cfg = from_yaml(yaml).unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("preferences.path"));
}

#[test]
fn test_validate_disabled_exchange_fails() {
    let yaml = r#"
app:
  name: test
  env: development

exchange:
  enabled: false

preferences:
  path: prefs.txt
"#;
    let cfg = from_yaml(yaml).unwrap();
    assert!(cfg.validate().is_err());
}

#[test]
fn test_validate_production_requires_credentials() {
    let yaml = r#"
app:
  name: test
  env: production

exchange:
  enabled: true

preferences:
  path: prefs.txt
"#;
    let cfg = from_yaml(yaml).unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("BINANCE_API_KEY"));
}

#[test]
fn test_validate_development_skips_credentials() {
    let cfg = from_yaml(&minimal_valid_yaml()).unwrap();
    assert!(cfg.exchange.api_key.is_empty());
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_nonpositive_rate_limit_fails() {
    let yaml = r#"
app:
  name: test
  env: development

exchange:
  enabled: true
  rate_limit: 0

preferences:
  path: prefs.txt
"#;
    let cfg = from_yaml(yaml).unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("rate_limit"));
}

#[test]
fn test_validate_enabled_recorder_requires_path() {
    let yaml = r#"
app:
  name: test
  env: development

exchange:
  enabled: true

preferences:
  path: prefs.txt

recorder:
  enabled: true
  path: ""
"#;
    let cfg = from_yaml(yaml).unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("recorder.path"));
}

// ==================== File loading tests ====================

#[test]
fn test_load_from_file() {
    let mut f = NamedTempFile::new().unwrap();
    write!(f, "{}", minimal_valid_yaml()).unwrap();

    let cfg = Config::load(f.path().to_str().unwrap()).unwrap();
    assert_eq!(cfg.app.name, "riskdesk");
}

#[test]
fn test_load_missing_file_fails() {
    let err = Config::load("/nonexistent/config.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile(_)));
}

#[test]
fn test_load_malformed_yaml_fails() {
    let mut f = NamedTempFile::new().unwrap();
    write!(f, "app: [not a map").unwrap();

    let err = Config::load(f.path().to_str().unwrap()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
