//! Tests for the JSON-RPC method dispatcher.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use common::{position_blob, Fixture, TabRow};
use serde_json::{json, Value};
use tabbridge::app::App;
use tabbridge::rpc_handler::handle_method;
use tabbridge::services::cloud_tabs_reader::CloudTabsReader;
use tabbridge::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabbridge::types::sort::SortOrder;
use tempfile::TempDir;

struct Harness {
    fixture: Fixture,
    settings_dir: TempDir,
    app: App,
}

/// App over a database with an iPhone and a MacBook, three tabs in total.
fn harness() -> Harness {
    let fixture = Fixture::new();
    fixture.add_device("MAC", Some("MacBook Air"), 500.0);
    fixture.add_device("PHONE", Some("iPhone 15"), 100.0);
    fixture.add_tab(TabRow {
        id: "T1",
        device_id: "MAC",
        title: Some("Rust Book"),
        url: Some("https://doc.rust-lang.org/book/"),
        position: Some(position_blob(2)),
        system_fields: Some(vec![9, 9]),
        ..Default::default()
    });
    fixture.add_tab(TabRow {
        id: "T2",
        device_id: "MAC",
        title: Some("crates.io"),
        url: Some("https://crates.io/"),
        is_pinned: true,
        position: Some(position_blob(5)),
        ..Default::default()
    });
    fixture.add_tab(TabRow {
        id: "T3",
        device_id: "PHONE",
        title: Some("Weather"),
        url: Some("https://weather.example.com/today"),
        last_viewed: Some(1_000.0),
        ..Default::default()
    });

    let settings_dir = TempDir::new().unwrap();
    let settings = SettingsEngine::new(Some(
        settings_dir
            .path()
            .join("settings.json")
            .to_string_lossy()
            .to_string(),
    ));
    let mut app = App::new(Arc::new(CloudTabsReader::new(&fixture.path)), settings);
    app.refresh();

    Harness {
        fixture,
        settings_dir,
        app,
    }
}

fn call(app: &mut App, method: &str, params: Value) -> Value {
    handle_method(app, method, &params).unwrap()
}

fn group_tab_ids(group: &Value) -> Vec<String> {
    group["tabs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_state_access() {
    let mut h = harness();

    let result = call(&mut h.app, "state.access", json!({}));

    assert_eq!(result["accessible"], true);
    assert!(result["path"].as_str().unwrap().ends_with("CloudTabs.db"));
}

#[test]
fn test_state_snapshot_shape() {
    let mut h = harness();

    let result = call(&mut h.app, "state.snapshot", json!({}));

    assert_eq!(result["totalTabCount"], 3);
    assert_eq!(result["devices"][0]["id"], "MAC");
    assert_eq!(result["devices"][0]["kind"], "laptop");
    assert_eq!(result["devices"][1]["kind"], "phone");
    assert_eq!(result["grouped"]["PHONE"], json!(["T3"]));
    let t1 = result["tabs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == "T1")
        .unwrap();
    assert_eq!(t1["domain"], "doc.rust-lang.org");
    assert_eq!(t1["positionSortValue"], 2);
    assert_eq!(t1["selected"], false);
}

#[test]
fn test_state_filtered_follows_view_config() {
    let mut h = harness();

    let groups = call(&mut h.app, "state.filtered", json!({}));
    assert_eq!(groups.as_array().unwrap().len(), 2);
    assert_eq!(group_tab_ids(&groups[0]), vec!["T2", "T1"]);

    call(&mut h.app, "view.set_search", json!({"text": "weather"}));
    let groups = call(&mut h.app, "state.filtered", json!({}));
    assert_eq!(groups.as_array().unwrap().len(), 1);
    assert_eq!(groups[0]["device"]["id"], "PHONE");
}

#[test]
fn test_set_sort_order_persists_and_resets_direction() {
    let mut h = harness();
    call(&mut h.app, "view.set_direction", json!({"direction": "descending"}));

    let config = call(&mut h.app, "view.set_sort_order", json!({"order": "lastViewed"}));

    assert_eq!(config["sortOrder"], "lastViewed");
    assert_eq!(config["direction"], "descending");
    let mut fresh = SettingsEngine::new(Some(h.app.settings_engine.get_config_path().to_string()));
    assert_eq!(fresh.load().unwrap().sort_order(), SortOrder::LastViewed);
}

#[test]
fn test_toggle_direction() {
    let mut h = harness();

    let config = call(&mut h.app, "view.toggle_direction", json!({}));

    assert_eq!(config["direction"], "descending");
    let groups = call(&mut h.app, "state.filtered", json!({}));
    assert_eq!(group_tab_ids(&groups[0]), vec!["T2", "T1"]);
}

#[test]
fn test_device_filter_methods() {
    let mut h = harness();

    call(&mut h.app, "view.set_device_filter", json!({"ids": ["PHONE"]}));
    let groups = call(&mut h.app, "state.filtered", json!({}));
    assert_eq!(groups.as_array().unwrap().len(), 1);

    let config = call(&mut h.app, "view.toggle_device", json!({"id": "MAC"}));
    assert_eq!(config["deviceFilter"], json!(["MAC", "PHONE"]));

    let config = call(&mut h.app, "view.clear_device_filter", json!({}));
    assert_eq!(config["deviceFilter"], json!([]));
}

#[test]
fn test_selection_methods() {
    let mut h = harness();

    let result = call(&mut h.app, "selection.toggle", json!({"id": "T3"}));
    assert_eq!(result["selected"], true);
    let list = call(&mut h.app, "selection.list", json!({}));
    assert_eq!(list[0]["id"], "T3");
    assert_eq!(list[0]["selected"], true);

    call(&mut h.app, "selection.clear", json!({}));
    assert_eq!(call(&mut h.app, "selection.list", json!({})), json!([]));
}

#[test]
fn test_sort_orders_listing() {
    let mut h = harness();

    let orders = call(&mut h.app, "view.sort_orders", json!({}));

    let ids: Vec<&str> = orders
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["lastViewed", "title", "domain", "tabPosition"]);
    assert_eq!(orders[0]["defaultDirection"], "descending");
}

#[test]
fn test_request_close_inserts_row() {
    let mut h = harness();

    let result = call(&mut h.app, "tab.request_close", json!({"id": "T3"}));

    assert_eq!(result["ok"], true);
    assert_eq!(h.fixture.close_request_count(), 1);
}

#[test]
fn test_error_paths() {
    let mut h = harness();

    assert_eq!(
        handle_method(&mut h.app, "nope.nothing", &json!({})).unwrap_err(),
        "unknown method: nope.nothing"
    );
    assert_eq!(
        handle_method(&mut h.app, "view.set_sort_order", &json!({})).unwrap_err(),
        "missing order"
    );
    assert_eq!(
        handle_method(&mut h.app, "view.set_sort_order", &json!({"order": "size"})).unwrap_err(),
        "Unknown sort key: size"
    );
    assert_eq!(
        handle_method(&mut h.app, "tab.request_close", &json!({"id": "ZZ"})).unwrap_err(),
        "Tab not found: ZZ"
    );
    assert!(h.settings_dir.path().exists());
}

#[test]
fn test_state_refresh_reports_errors() {
    let mut h = harness();
    std::fs::remove_file(&h.fixture.path).unwrap();

    let result = call(&mut h.app, "state.refresh", json!({}));

    assert_eq!(result["ok"], false);
    assert!(result["error"].as_str().unwrap().starts_with("Cannot open database"));
    assert_eq!(call(&mut h.app, "state.snapshot", json!({}))["totalTabCount"], 3);
}

#[test]
fn test_settings_set_applies_and_persists() {
    let mut h = harness();

    let config = call(
        &mut h.app,
        "settings.set",
        json!({"key": "tabSortOrder", "value": "lastViewed"}),
    );

    assert_eq!(config["sortOrder"], "lastViewed");
    assert_eq!(config["direction"], "descending");
    let stored = call(&mut h.app, "settings.get", json!({}));
    assert_eq!(stored["tabSortOrder"], "lastViewed");
    assert_eq!(stored["sortDirection"], "descending");

    let config = call(
        &mut h.app,
        "settings.set",
        json!({"key": "sortDirection", "value": "ascending"}),
    );
    assert_eq!(config["sortOrder"], "lastViewed");
    assert_eq!(config["direction"], "ascending");
}

#[test]
fn test_settings_set_rejects_bad_input() {
    let mut h = harness();

    let err = handle_method(
        &mut h.app,
        "settings.set",
        &json!({"key": "theme", "value": "dark"}),
    )
    .unwrap_err();
    assert!(err.starts_with("Invalid settings key"));

    let err = handle_method(
        &mut h.app,
        "settings.set",
        &json!({"key": "sortDirection", "value": "sideways"}),
    )
    .unwrap_err();
    assert_eq!(
        err,
        "Invalid settings value: Unknown sort direction: sideways"
    );
    assert_eq!(call(&mut h.app, "view.config", json!({}))["direction"], "ascending");
}

#[test]
fn test_settings_reset_restores_defaults() {
    let mut h = harness();
    call(&mut h.app, "view.set_sort_order", json!({"order": "domain"}));
    call(&mut h.app, "view.toggle_direction", json!({}));

    let config = call(&mut h.app, "settings.reset", json!({}));

    assert_eq!(config["sortOrder"], "tabPosition");
    assert_eq!(config["direction"], "ascending");
    assert_eq!(call(&mut h.app, "settings.get", json!({})), json!({}));
    let mut fresh = SettingsEngine::new(Some(h.app.settings_engine.get_config_path().to_string()));
    assert_eq!(fresh.load().unwrap().sort_order(), SortOrder::Position);
}
