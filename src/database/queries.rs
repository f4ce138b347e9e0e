//! SQL text for the external CloudTabs schema.
//!
//! These statements are the contract with the database written by the
//! source application and must match its table and column names exactly.

/// All devices, most recently modified first.
pub const SELECT_DEVICES: &str = "SELECT device_uuid, device_name, last_modified
     FROM cloud_tab_devices
     ORDER BY last_modified DESC";

/// All tabs joined to their device, ordered by the device's recency.
pub const SELECT_TABS: &str = "SELECT t.tab_uuid, t.device_uuid, t.title, t.url,
            t.is_pinned, t.last_viewed_time, t.position
     FROM cloud_tabs t
     JOIN cloud_tab_devices d ON t.device_uuid = d.device_uuid
     ORDER BY d.last_modified DESC";

/// One existing `system_fields` blob, used as the template for close requests.
pub const SELECT_TEMPLATE_SYSTEM_FIELDS: &str = "SELECT system_fields FROM cloud_tabs LIMIT 1";

pub const INSERT_CLOSE_REQUEST: &str = "INSERT INTO cloud_tab_close_requests
     (close_request_uuid, system_fields, destination_device_uuid, url, tab_uuid)
     VALUES (?1, ?2, ?3, ?4, ?5)";
