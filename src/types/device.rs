use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::relative_label;

/// Placeholder used when the device row has no name.
pub const UNKNOWN_DEVICE_NAME: &str = "Unknown Device";

/// A remote source of browser tabs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub last_modified: DateTime<Utc>,
}

/// Rough hardware class guessed from the device name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceKind {
    Phone,
    Tablet,
    Laptop,
    Desktop,
    Other,
}

impl Device {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            last_modified,
        }
    }

    /// Classifies the device from its user-visible name.
    ///
    /// Rules are checked in order, so "Mac mini" is a desktop and
    /// "MacBook Pro" a laptop even though both contain "mac".
    pub fn kind(&self) -> DeviceKind {
        let lower = self.name.to_lowercase();
        if lower.contains("iphone") || lower.contains("phone") || lower.contains("pro max") {
            DeviceKind::Phone
        } else if lower.contains("ipad") || lower.contains("pad") {
            DeviceKind::Tablet
        } else if lower.contains("mini") {
            DeviceKind::Desktop
        } else if lower.contains("macbook") || lower.contains("mbp") || lower.contains("mba") {
            DeviceKind::Laptop
        } else if lower.contains("mac") || lower.contains("imac") {
            DeviceKind::Desktop
        } else {
            DeviceKind::Other
        }
    }

    /// Abbreviated "3 hr ago" style label for the last sync of this device.
    pub fn relative_modified(&self, now: DateTime<Utc>) -> String {
        relative_label(self.last_modified, now)
    }
}
