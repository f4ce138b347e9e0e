use std::collections::HashMap;

use serde::Serialize;

use super::device::Device;
use super::tab::Tab;

/// Devices and tabs as of the last successful fetch.
///
/// Always replaced as a whole; never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    /// Most recently modified device first, as returned by the store.
    pub devices: Vec<Device>,
    /// In store order (grouped by parent device recency).
    pub tabs: Vec<Tab>,
    /// Tabs keyed by `device_id`, each list in store order.
    pub grouped: HashMap<String, Vec<Tab>>,
}

impl Snapshot {
    pub fn new(devices: Vec<Device>, tabs: Vec<Tab>) -> Self {
        let mut grouped: HashMap<String, Vec<Tab>> = HashMap::new();
        for tab in &tabs {
            grouped
                .entry(tab.device_id.clone())
                .or_default()
                .push(tab.clone());
        }
        Self {
            devices,
            tabs,
            grouped,
        }
    }

    pub fn tabs_for_device(&self, device_id: &str) -> &[Tab] {
        self.grouped
            .get(device_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn device(&self, device_id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == device_id)
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }
}

/// One device section of the filtered, sorted view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceGroup {
    pub device: Device,
    pub tabs: Vec<Tab>,
}
