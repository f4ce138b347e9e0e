//! Integration-level tests for the SettingsEngine public API.
//!
//! Exercises loading, immediate persistence and the fallbacks for
//! missing, malformed or unrecognised values.

use std::fs;

use tabbridge::services::settings_engine::{
    SettingsEngine, SettingsEngineTrait, KEY_SORT_DIRECTION, KEY_SORT_ORDER,
};
use tabbridge::types::errors::SettingsError;
use tabbridge::types::settings::{PersistedSettings, ViewConfig};
use tabbridge::types::sort::{SortDirection, SortOrder};
use tempfile::TempDir;

/// Helper: engine backed by `settings.json` inside `dir`.
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, PersistedSettings::default());
    assert_eq!(settings.sort_order(), SortOrder::Position);
    assert_eq!(settings.sort_direction(), SortDirection::Ascending);
}

#[test]
fn test_setters_persist_immediately() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine.set_sort_order(SortOrder::Domain).unwrap();
        engine.set_sort_direction(SortDirection::Descending).unwrap();
    }

    let mut engine = engine_in_temp(&dir);
    let settings = engine.load().unwrap();

    assert_eq!(settings.sort_order(), SortOrder::Domain);
    assert_eq!(settings.sort_direction(), SortDirection::Descending);
}

#[test]
fn test_file_uses_raw_value_keys() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.set_value(KEY_SORT_ORDER, "lastViewed").unwrap();
    engine.set_value(KEY_SORT_DIRECTION, "ascending").unwrap();

    let raw = fs::read_to_string(engine.get_config_path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(json["tabSortOrder"], "lastViewed");
    assert_eq!(json["sortDirection"], "ascending");
}

#[test]
fn test_missing_direction_uses_order_default() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("settings.json"),
        r#"{"tabSortOrder":"lastViewed"}"#,
    )
    .unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();
    let config = ViewConfig::from(&settings);

    assert_eq!(config.sort_order, SortOrder::LastViewed);
    assert_eq!(config.direction, SortDirection::Descending);
    assert!(!config.is_reversed());
}

#[test]
fn test_unrecognised_stored_values_fall_back() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("settings.json"),
        r#"{"tabSortOrder":"bySize","sortDirection":"sideways"}"#,
    )
    .unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings.sort_order(), SortOrder::Position);
    assert_eq!(settings.sort_direction(), SortDirection::Ascending);
}

#[test]
fn test_legacy_position_raw_value_is_accepted() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("settings.json"),
        r#"{"tabSortOrder":"position"}"#,
    )
    .unwrap();
    let mut engine = engine_in_temp(&dir);

    assert_eq!(engine.load().unwrap().sort_order(), SortOrder::Position);
}

#[test]
fn test_malformed_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, PersistedSettings::default());
}

#[test]
fn test_invalid_value_is_rejected_and_not_saved() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let result = engine.set_value(KEY_SORT_ORDER, "bySize");

    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    assert!(!dir.path().join("settings.json").exists());
}

#[test]
fn test_reset_restores_defaults_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.set_sort_order(SortOrder::Title).unwrap();

    engine.reset().unwrap();

    let mut fresh = engine_in_temp(&dir);
    assert_eq!(fresh.load().unwrap(), PersistedSettings::default());
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir
        .path()
        .join("nested")
        .join("deeper")
        .join("settings.json");
    let mut engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));

    engine.set_sort_order(SortOrder::Domain).unwrap();

    assert!(path.exists());
}
