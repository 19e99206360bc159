//! Tests for config loading

use serial_test::serial;
use std::io::Write;
use std::path::Path;

use corpscout::config::Config;

const ENV_KEYS: &[&str] = &[
    "OPENROUTER_API_KEY",
    "OPEN_ROUTER_KEY",
    "SERPAPI_KEY",
    "COMPANY_DB_URL",
    "CORPSCOUT_MATCH_THRESHOLD",
    "CORPSCOUT_MAX_EVENTS",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_example_config_parses() {
    clear_env();
    let config = Config::from_file(Path::new("config.example.toml")).expect("example config should parse");

    assert_eq!(config.llm.deep_model, "anthropic/claude-3.5-sonnet");
    assert_eq!(config.company_db.currency_ids.get("EUR"), Some(&2));
    assert!(config.company_db.create_event_path.is_none());
    assert_eq!(config.research.max_events, 20);
    assert!((config.matching.threshold - 0.4).abs() < f64::EPSILON);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[matching]\nthreshold = 0.5\n\n[research]\nmax_events = 5").unwrap();

    std::env::set_var("OPEN_ROUTER_KEY", "from-env");
    std::env::set_var("CORPSCOUT_MAX_EVENTS", "8");
    std::env::set_var("COMPANY_DB_URL", "https://db.example.com");

    let config = Config::load(Some(file.path())).unwrap();
    clear_env();

    assert_eq!(config.llm.api_key.as_deref(), Some("from-env"));
    assert_eq!(config.research.max_events, 8);
    assert!((config.matching.threshold - 0.5).abs() < f64::EPSILON);
    assert_eq!(config.company_db.base_url.as_deref(), Some("https://db.example.com"));
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_primary_key_name_wins() {
    clear_env();
    std::env::set_var("OPENROUTER_API_KEY", "primary");
    std::env::set_var("OPEN_ROUTER_KEY", "legacy");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.llm.api_key.as_deref(), Some("primary"));
}

#[test]
#[serial]
fn test_missing_gateway_key_is_fatal() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[logging]\nformat = \"json\"").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.logging.format, "json");
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("OPENROUTER_API_KEY"));
}

#[test]
#[serial]
fn test_unreadable_file() {
    clear_env();
    let err = Config::from_file(Path::new("does/not/exist.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
