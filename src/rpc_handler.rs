//! RPC method handler for the TabBridge JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches method calls to the view state,
//! settings and reader owned by the `App`. It runs on the thread that owns
//! the `App`.

use std::collections::BTreeSet;

use chrono::Utc;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::view_state::ViewStateTrait;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::device::Device;
use crate::types::errors::ViewError;
use crate::types::snapshot::DeviceGroup;
use crate::types::sort::{SortDirection, SortOrder};
use crate::types::tab::Tab;

/// JSON shape of a device for the display layer.
pub fn device_json(device: &Device) -> Value {
    json!({
        "id": device.id,
        "name": device.name,
        "kind": device.kind(),
        "lastModified": device.last_modified.to_rfc3339(),
        "relativeModified": device.relative_modified(Utc::now()),
    })
}

/// JSON shape of a tab for the display layer.
pub fn tab_json(app: &App, tab: &Tab) -> Value {
    json!({
        "id": tab.id,
        "deviceId": tab.device_id,
        "title": tab.title,
        "displayTitle": tab.display_title(),
        "url": tab.url.as_str(),
        "domain": tab.domain(),
        "favicon": tab.favicon_url(),
        "isPinned": tab.is_pinned,
        "positionSortValue": tab.position_sort_value,
        "lastViewedTime": tab.last_viewed_time.map(|t| t.to_rfc3339()),
        "relativeLastViewed": tab.relative_last_viewed(Utc::now()),
        "selected": app.view.is_selected(&tab.id),
    })
}

fn group_json(app: &App, group: &DeviceGroup) -> Value {
    let tabs: Vec<Value> = group.tabs.iter().map(|t| tab_json(app, t)).collect();
    json!({"device": device_json(&group.device), "tabs": tabs})
}

fn config_json(app: &App) -> Value {
    let config = app.view.config();
    json!({
        "sortOrder": config.sort_order.as_str(),
        "direction": config.direction.as_str(),
        "searchText": config.search_text,
        "deviceFilter": config.device_filter,
    })
}

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &mut App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        // ─── State ───
        "state.access" => {
            let accessible = app.check_access();
            Ok(json!({"accessible": accessible, "path": app.reader().path().to_string_lossy()}))
        }
        "state.refresh" => {
            app.refresh();
            Ok(json!({"ok": app.view.error_message().is_none(), "error": app.view.error_message()}))
        }
        "state.snapshot" => {
            let app = &*app;
            let devices: Vec<Value> = app.view.devices().iter().map(device_json).collect();
            let tabs: Vec<Value> = app.view.tabs().iter().map(|t| tab_json(app, t)).collect();
            let grouped: serde_json::Map<String, Value> = app
                .view
                .snapshot()
                .grouped
                .iter()
                .map(|(device_id, tabs)| {
                    let ids: Vec<&str> = tabs.iter().map(|t| t.id.as_str()).collect();
                    (device_id.clone(), json!(ids))
                })
                .collect();
            Ok(json!({
                "devices": devices,
                "tabs": tabs,
                "grouped": grouped,
                "totalTabCount": app.view.total_tab_count(),
            }))
        }
        "state.filtered" => {
            let app = &*app;
            let groups = app.view.filtered_grouped();
            let arr: Vec<Value> = groups.iter().map(|g| group_json(app, g)).collect();
            Ok(json!(arr))
        }
        "state.error" => Ok(json!({"error": app.view.error_message()})),
        "state.device_tabs" => {
            let id = str_param(params, "id")?;
            let app = &*app;
            let arr: Vec<Value> = app
                .view
                .tabs_for_device(id)
                .iter()
                .map(|t| tab_json(app, t))
                .collect();
            Ok(json!(arr))
        }

        // ─── View configuration ───
        "view.config" => Ok(config_json(app)),
        "view.sort_orders" => {
            let arr: Vec<Value> = SortOrder::ALL
                .iter()
                .map(|o| {
                    json!({
                        "id": o.as_str(),
                        "label": o.label(),
                        "defaultDirection": o.default_direction().as_str(),
                    })
                })
                .collect();
            Ok(json!(arr))
        }
        "view.set_sort_order" => {
            let order: SortOrder = str_param(params, "order")?
                .parse()
                .map_err(|e: ViewError| e.to_string())?;
            app.set_sort_order(order).map_err(|e| e.to_string())?;
            Ok(config_json(app))
        }
        "view.set_direction" => {
            let direction: SortDirection = str_param(params, "direction")?
                .parse()
                .map_err(|e: ViewError| e.to_string())?;
            app.set_sort_direction(direction).map_err(|e| e.to_string())?;
            Ok(config_json(app))
        }
        "view.toggle_direction" => {
            app.toggle_sort_direction().map_err(|e| e.to_string())?;
            Ok(config_json(app))
        }
        "view.set_search" => {
            let text = str_param(params, "text")?;
            app.view.set_search_text(text);
            Ok(config_json(app))
        }
        "view.set_device_filter" => {
            let ids = params
                .get("ids")
                .and_then(|v| v.as_array())
                .ok_or("missing ids")?;
            let set: BTreeSet<String> = ids
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            app.view.set_device_filter(set);
            Ok(config_json(app))
        }
        "view.toggle_device" => {
            let id = str_param(params, "id")?;
            app.view.toggle_device_filter(id);
            Ok(config_json(app))
        }
        "view.clear_device_filter" => {
            app.view.clear_device_filter();
            Ok(config_json(app))
        }

        // ─── Settings ───
        "settings.get" => Ok(json!(app.settings_engine.get_settings())),
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = str_param(params, "value")?;
            app.set_setting(key, value).map_err(|e| e.to_string())?;
            Ok(config_json(app))
        }
        "settings.reset" => {
            app.reset_settings().map_err(|e| e.to_string())?;
            Ok(config_json(app))
        }

        // ─── Selection ───
        "selection.toggle" => {
            let id = str_param(params, "id")?;
            let selected = app.view.toggle_selection(id);
            Ok(json!({"id": id, "selected": selected}))
        }
        "selection.clear" => {
            app.view.clear_selection();
            Ok(json!({"ok": true}))
        }
        "selection.list" => {
            let app = &*app;
            let arr: Vec<Value> = app
                .view
                .selected_tabs()
                .into_iter()
                .map(|t| tab_json(app, t))
                .collect();
            Ok(json!(arr))
        }

        // ─── Tabs ───
        "tab.request_close" => {
            let id = str_param(params, "id")?;
            app.request_close(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
