/*!
 * Configuration Tests
 * Environment overrides and JSON config files
 */

use handle_arena::core::config::{ENV_GROWTH_FACTOR, ENV_INITIAL_CAPACITY, ENV_MAX_CAPACITY};
use handle_arena::{Arena, ArenaConfig, ConfigError, SharedArena};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;
use std::io::Write;

fn clear_env() {
    env::remove_var(ENV_INITIAL_CAPACITY);
    env::remove_var(ENV_MAX_CAPACITY);
    env::remove_var(ENV_GROWTH_FACTOR);
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    assert_eq!(ArenaConfig::from_env().unwrap(), ArenaConfig::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    env::set_var(ENV_INITIAL_CAPACITY, "256");
    env::set_var(ENV_MAX_CAPACITY, " 4096 ");
    env::set_var(ENV_GROWTH_FACTOR, "3");

    let config = ArenaConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.initial_capacity, 256);
    assert_eq!(config.max_capacity, 4096);
    assert_eq!(config.growth_factor, 3);

    let arena = Arena::with_config(config).unwrap();
    assert_eq!(arena.capacity(), 256);
}

#[test]
#[serial]
fn test_from_env_rejects_garbage() {
    clear_env();
    env::set_var(ENV_MAX_CAPACITY, "lots");
    let err = ArenaConfig::from_env().unwrap_err();
    clear_env();

    match err {
        ConfigError::Env { var, value } => {
            assert_eq!(var, ENV_MAX_CAPACITY);
            assert_eq!(value, "lots");
        }
        other => panic!("expected env error, got {other}"),
    }
}

#[test]
#[serial]
fn test_from_env_validates() {
    clear_env();
    env::set_var(ENV_GROWTH_FACTOR, "1");
    let result = ArenaConfig::from_env();
    clear_env();
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "initial_capacity": 64, "max_capacity": 1024, "warning_threshold": 0.5 }}"#
    )
    .unwrap();

    let config = ArenaConfig::from_file(file.path()).unwrap();
    assert_eq!(config.initial_capacity, 64);
    assert_eq!(config.max_capacity, 1024);
    assert_eq!(config.warning_threshold, 0.5);
    assert_eq!(config.growth_factor, ArenaConfig::default().growth_factor);

    let shared = SharedArena::with_config(config).unwrap();
    assert_eq!(shared.capacity(), 64);
}

#[test]
fn test_from_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("arena.json");
    let config = ArenaConfig::with_initial_capacity(32).with_max_capacity(512);
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    assert_eq!(ArenaConfig::from_file(&path).unwrap(), config);
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    match ArenaConfig::from_file(&path) {
        Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn test_from_file_rejects_invalid_limits() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "initial_capacity": 2048, "max_capacity": 1024 }}"#).unwrap();
    assert!(matches!(
        ArenaConfig::from_file(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}
