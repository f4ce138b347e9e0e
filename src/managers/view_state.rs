//! View state for the synced tabs window.
//!
//! Owns the last fetched [`Snapshot`] and the sort/filter configuration, and
//! derives the grouped, filtered and sorted presentation on every read.
//! `refresh`/`apply_fetch_result` are the only operations that replace the
//! snapshot; a failed fetch keeps the previous snapshot and records the error.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use tracing::warn;

use crate::services::cloud_tabs_reader::CloudTabsReaderTrait;
use crate::types::device::Device;
use crate::types::errors::CloudTabsError;
use crate::types::settings::ViewConfig;
use crate::types::snapshot::{DeviceGroup, Snapshot};
use crate::types::sort::{SortDirection, SortOrder};
use crate::types::tab::Tab;

/// Result of one fetch from the record store.
pub type FetchResult = Result<(Vec<Device>, Vec<Tab>), CloudTabsError>;

/// Trait defining the view state interface.
pub trait ViewStateTrait {
    fn refresh(&mut self, reader: &dyn CloudTabsReaderTrait);
    fn apply_fetch_result(&mut self, result: FetchResult);
    fn check_access(&mut self, reader: &dyn CloudTabsReaderTrait) -> bool;
    fn set_sort_order(&mut self, order: SortOrder);
    fn set_direction(&mut self, direction: SortDirection);
    fn toggle_direction(&mut self) -> SortDirection;
    fn set_search_text(&mut self, text: &str);
    fn set_device_filter(&mut self, device_ids: BTreeSet<String>);
    fn toggle_device_filter(&mut self, device_id: &str);
    fn clear_device_filter(&mut self);
    fn filtered_grouped(&self) -> Vec<DeviceGroup>;
    fn toggle_selection(&mut self, tab_id: &str) -> bool;
    fn select(&mut self, tab_id: &str);
    fn deselect(&mut self, tab_id: &str);
    fn clear_selection(&mut self);
    fn selected_tabs(&self) -> Vec<&Tab>;
}

/// Snapshot, configuration, access flag, last error and selection.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    snapshot: Snapshot,
    config: ViewConfig,
    error_message: Option<String>,
    has_access: bool,
    selected_tab_ids: HashSet<String>,
}

impl ViewState {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn devices(&self) -> &[Device] {
        &self.snapshot.devices
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.snapshot.tabs
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn has_access(&self) -> bool {
        self.has_access
    }

    pub fn set_access(&mut self, accessible: bool) {
        self.has_access = accessible;
    }

    pub fn total_tab_count(&self) -> usize {
        self.snapshot.tabs.len()
    }

    pub fn device(&self, device_id: &str) -> Option<&Device> {
        self.snapshot.device(device_id)
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.snapshot.tab(tab_id)
    }

    /// Unfiltered tabs of one device, in store order.
    pub fn tabs_for_device(&self, device_id: &str) -> &[Tab] {
        self.snapshot.tabs_for_device(device_id)
    }

    pub fn is_selected(&self, tab_id: &str) -> bool {
        self.selected_tab_ids.contains(tab_id)
    }
}

impl ViewStateTrait for ViewState {
    /// Fetches synchronously from `reader`. Blocks on file I/O; callers that
    /// must stay responsive should fetch elsewhere and use `apply_fetch_result`.
    fn refresh(&mut self, reader: &dyn CloudTabsReaderTrait) {
        let result = reader.fetch_devices_and_tabs();
        self.apply_fetch_result(result);
    }

    fn apply_fetch_result(&mut self, result: FetchResult) {
        match result {
            Ok((devices, tabs)) => {
                self.snapshot = Snapshot::new(devices, tabs);
                self.error_message = None;
            }
            Err(e) => {
                warn!("refresh failed, keeping previous snapshot: {}", e);
                self.error_message = Some(e.to_string());
            }
        }
    }

    fn check_access(&mut self, reader: &dyn CloudTabsReaderTrait) -> bool {
        self.has_access = reader.is_accessible();
        self.has_access
    }

    /// Sets the sort key and resets the direction to that key's default.
    fn set_sort_order(&mut self, order: SortOrder) {
        self.config.sort_order = order;
        self.config.direction = order.default_direction();
    }

    fn set_direction(&mut self, direction: SortDirection) {
        self.config.direction = direction;
    }

    fn toggle_direction(&mut self) -> SortDirection {
        self.config.direction = self.config.direction.toggled();
        self.config.direction
    }

    fn set_search_text(&mut self, text: &str) {
        self.config.search_text = text.to_string();
    }

    fn set_device_filter(&mut self, device_ids: BTreeSet<String>) {
        self.config.device_filter = device_ids;
    }

    fn toggle_device_filter(&mut self, device_id: &str) {
        if !self.config.device_filter.remove(device_id) {
            self.config.device_filter.insert(device_id.to_string());
        }
    }

    fn clear_device_filter(&mut self) {
        self.config.device_filter.clear();
    }

    fn filtered_grouped(&self) -> Vec<DeviceGroup> {
        filtered_grouped(&self.snapshot, &self.config)
    }

    /// Flips selection of `tab_id`; returns whether it is now selected.
    fn toggle_selection(&mut self, tab_id: &str) -> bool {
        if self.selected_tab_ids.remove(tab_id) {
            false
        } else {
            self.selected_tab_ids.insert(tab_id.to_string());
            true
        }
    }

    fn select(&mut self, tab_id: &str) {
        self.selected_tab_ids.insert(tab_id.to_string());
    }

    fn deselect(&mut self, tab_id: &str) {
        self.selected_tab_ids.remove(tab_id);
    }

    fn clear_selection(&mut self) {
        self.selected_tab_ids.clear();
    }

    /// Selected tabs present in the current snapshot, in snapshot order.
    fn selected_tabs(&self) -> Vec<&Tab> {
        self.snapshot
            .tabs
            .iter()
            .filter(|t| self.selected_tab_ids.contains(&t.id))
            .collect()
    }
}

/// Builds the grouped view: devices in snapshot order, each with its tabs
/// filtered by the search text and sorted. Devices excluded by the device
/// filter, or left with no tabs, are omitted.
pub fn filtered_grouped(snapshot: &Snapshot, config: &ViewConfig) -> Vec<DeviceGroup> {
    let query = config.search_text.trim().to_lowercase();

    snapshot
        .devices
        .iter()
        .filter(|device| {
            config.device_filter.is_empty() || config.device_filter.contains(&device.id)
        })
        .filter_map(|device| {
            let tabs = snapshot.tabs_for_device(&device.id);
            let mut kept: Vec<Tab> = if query.is_empty() {
                tabs.to_vec()
            } else {
                tabs.iter()
                    .filter(|tab| matches_search(tab, device, &query))
                    .cloned()
                    .collect()
            };
            if kept.is_empty() {
                return None;
            }
            sort_tabs(&mut kept, config.sort_order, config.direction);
            Some(DeviceGroup {
                device: device.clone(),
                tabs: kept,
            })
        })
        .collect()
}

/// `query` must already be trimmed and lowercased.
fn matches_search(tab: &Tab, device: &Device, query: &str) -> bool {
    tab.display_title().to_lowercase().contains(query)
        || tab.url.as_str().to_lowercase().contains(query)
        || device.name.to_lowercase().contains(query)
}

/// Stable sort: pinned tabs first, then by `order`, inverted when
/// `direction` is not the key's default.
pub fn sort_tabs(tabs: &mut [Tab], order: SortOrder, direction: SortDirection) {
    let reversed = direction != order.default_direction();
    tabs.sort_by(|a, b| compare_tabs(a, b, order, reversed));
}

/// Total order used by [`sort_tabs`]. The pinned partition is never reversed.
pub fn compare_tabs(a: &Tab, b: &Tab, order: SortOrder, reversed: bool) -> Ordering {
    let pinned = b.is_pinned.cmp(&a.is_pinned);
    if pinned != Ordering::Equal {
        return pinned;
    }
    let by_key = compare_by_key(a, b, order);
    if reversed {
        by_key.reverse()
    } else {
        by_key
    }
}

fn compare_by_key(a: &Tab, b: &Tab, order: SortOrder) -> Ordering {
    match order {
        // Most recent first; tabs never viewed go last.
        SortOrder::LastViewed => match (a.last_viewed_time, b.last_viewed_time) {
            (Some(at), Some(bt)) => bt.cmp(&at),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortOrder::Title => compare_case_insensitive(&a.display_title(), &b.display_title()),
        SortOrder::Domain => compare_case_insensitive(&a.domain(), &b.domain())
            .then_with(|| compare_case_insensitive(&a.display_title(), &b.display_title())),
        SortOrder::Position => match (a.position_sort_value, b.position_sort_value) {
            (Some(ap), Some(bp)) => ap.cmp(&bp),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn compare_case_insensitive(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
