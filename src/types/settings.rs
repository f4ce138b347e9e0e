use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::sort::{SortDirection, SortOrder};

/// Settings persisted between runs.
///
/// Values are kept as raw strings so that an unknown value written by a
/// newer or older build degrades to the default instead of failing the
/// whole file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersistedSettings {
    #[serde(rename = "tabSortOrder", default, skip_serializing_if = "Option::is_none")]
    pub tab_sort_order: Option<String>,
    #[serde(rename = "sortDirection", default, skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<String>,
}

impl PersistedSettings {
    /// Stored sort key, or `Position` when absent or unrecognised.
    pub fn sort_order(&self) -> SortOrder {
        self.tab_sort_order
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    /// Stored direction, or the default direction of [`Self::sort_order`].
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| self.sort_order().default_direction())
    }
}

/// Sort and filter configuration of the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub sort_order: SortOrder,
    pub direction: SortDirection,
    pub search_text: String,
    pub device_filter: BTreeSet<String>,
}

impl ViewConfig {
    pub fn new(sort_order: SortOrder, direction: SortDirection) -> Self {
        Self {
            sort_order,
            direction,
            search_text: String::new(),
            device_filter: BTreeSet::new(),
        }
    }

    /// True when the active direction is the opposite of the key's default.
    pub fn is_reversed(&self) -> bool {
        self.direction != self.sort_order.default_direction()
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        let order = SortOrder::default();
        Self::new(order, order.default_direction())
    }
}

impl From<&PersistedSettings> for ViewConfig {
    fn from(settings: &PersistedSettings) -> Self {
        Self::new(settings.sort_order(), settings.sort_direction())
    }
}
