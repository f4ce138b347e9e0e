use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::relative_label;

/// A browser tab open on one of the synced devices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub device_id: String,
    pub title: Option<String>,
    pub url: Url,
    pub is_pinned: bool,
    pub position_sort_value: Option<i64>,
    pub last_viewed_time: Option<DateTime<Utc>>,
}

impl Tab {
    /// Title shown to the user: the stored title if non-empty, else the
    /// URL host, else the whole URL.
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => self.domain(),
        }
    }

    /// Host component of the URL, or the full URL when it has no host
    /// (`about:blank`, `data:` and friends).
    pub fn domain(&self) -> String {
        match self.url.host_str() {
            Some(host) => host.to_string(),
            None => self.url.as_str().to_string(),
        }
    }

    /// Favicon lookup URL for the display layer. Nothing is fetched here.
    pub fn favicon_url(&self) -> Option<String> {
        let host = self.url.host_str()?;
        Some(format!(
            "https://www.google.com/s2/favicons?sz=32&domain={}",
            host
        ))
    }

    pub fn relative_last_viewed(&self, now: DateTime<Utc>) -> Option<String> {
        self.last_viewed_time.map(|t| relative_label(t, now))
    }
}
