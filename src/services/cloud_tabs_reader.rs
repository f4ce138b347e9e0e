//! Reader for the browser's CloudTabs database.
//!
//! Opens the file read-only for every fetch, runs the two fixed queries and
//! decodes rows into [`Device`] and [`Tab`] values. The connection never
//! outlives a call. A second, experimental path writes close requests.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{params, Row};
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::database::queries;
use crate::database::CloudTabsConnection;
use crate::platform;
use crate::services::position_decoder::decode_position;
use crate::types::device::{Device, UNKNOWN_DEVICE_NAME};
use crate::types::errors::CloudTabsError;
use crate::types::tab::Tab;

/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z, the reference
/// date of the timestamps stored by the browser.
pub const CORE_DATA_EPOCH_OFFSET: f64 = 978_307_200.0;

/// Trait defining the record store interface consumed by the view state.
pub trait CloudTabsReaderTrait: Send + Sync {
    /// True iff the path is a regular file this process can open for reading.
    fn is_accessible(&self) -> bool;
    /// Fetches every device and tab. Never returns partial results.
    fn fetch_devices_and_tabs(&self) -> Result<(Vec<Device>, Vec<Tab>), CloudTabsError>;
    /// Best-effort request asking the owning device to close `tab`.
    fn request_close_tab(&self, tab: &Tab) -> Result<(), CloudTabsError>;
    fn path(&self) -> &Path;
}

/// Record store reader bound to one database path.
#[derive(Debug, Clone)]
pub struct CloudTabsReader {
    path: PathBuf,
}

impl CloudTabsReader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Reader for [`platform::default_cloud_tabs_path`].
    pub fn with_default_path() -> Self {
        Self::new(platform::default_cloud_tabs_path())
    }
}

impl CloudTabsReaderTrait for CloudTabsReader {
    fn is_accessible(&self) -> bool {
        self.path.is_file() && File::open(&self.path).is_ok()
    }

    fn fetch_devices_and_tabs(&self) -> Result<(Vec<Device>, Vec<Tab>), CloudTabsError> {
        debug!(path = %self.path.display(), "fetching cloud tabs");
        let db = CloudTabsConnection::open_read_only(&self.path)?;
        let devices = query_devices(&db)?;
        let tabs = query_tabs(&db)?;
        info!(devices = devices.len(), tabs = tabs.len(), "fetched cloud tabs");
        Ok((devices, tabs))
    }

    fn request_close_tab(&self, tab: &Tab) -> Result<(), CloudTabsError> {
        let db = CloudTabsConnection::open_read_write(&self.path)?;
        let system_fields = read_template_system_fields(&db)?;

        let close_uuid = Uuid::new_v4().to_string().to_uppercase();
        db.connection()
            .execute(
                queries::INSERT_CLOSE_REQUEST,
                params![
                    close_uuid,
                    system_fields,
                    tab.device_id,
                    tab.url.as_str(),
                    tab.id
                ],
            )
            .map_err(query_error)?;

        info!(tab = %tab.id, request = %close_uuid, "inserted close request");
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

fn query_error(e: rusqlite::Error) -> CloudTabsError {
    CloudTabsError::Query(e.to_string())
}

/// Converts a reference-date timestamp into UTC.
///
/// Non-finite or out-of-range values yield `None`.
pub fn core_data_timestamp(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let unix = secs + CORE_DATA_EPOCH_OFFSET;
    let whole = unix.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    let nanos = (((unix - whole) * 1e9).round() as u32).min(999_999_999);
    Utc.timestamp_opt(whole as i64, nanos).single()
}

fn reference_date() -> DateTime<Utc> {
    Utc.timestamp_opt(CORE_DATA_EPOCH_OFFSET as i64, 0)
        .single()
        .unwrap_or_default()
}

fn query_devices(db: &CloudTabsConnection) -> Result<Vec<Device>, CloudTabsError> {
    let mut stmt = db
        .connection()
        .prepare(queries::SELECT_DEVICES)
        .map_err(query_error)?;

    let rows = stmt
        .query_map([], |row| {
            let id: String = row.get(0)?;
            let name: Option<String> = row.get(1)?;
            let last_modified: Option<f64> = row.get(2)?;
            Ok(Device {
                id,
                name: name.unwrap_or_else(|| UNKNOWN_DEVICE_NAME.to_string()),
                last_modified: last_modified
                    .and_then(core_data_timestamp)
                    .unwrap_or_else(reference_date),
            })
        })
        .map_err(query_error)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(query_error)
}

fn query_tabs(db: &CloudTabsConnection) -> Result<Vec<Tab>, CloudTabsError> {
    let mut stmt = db
        .connection()
        .prepare(queries::SELECT_TABS)
        .map_err(query_error)?;

    let rows = stmt.query_map([], decode_tab_row).map_err(query_error)?;

    let mut tabs = Vec::new();
    for row in rows {
        if let Some(tab) = row.map_err(query_error)? {
            tabs.push(tab);
        }
    }
    Ok(tabs)
}

/// Decodes one tab row. `Ok(None)` means the row is skipped because its
/// URL is missing, not text, or not an absolute URL.
///
/// Optional columns are read loosely so that one odd row never fails the
/// whole fetch: titles are decoded lossily, the pinned flag and timestamp
/// accept either numeric storage class, anything else reads as absent.
fn decode_tab_row(row: &Row<'_>) -> rusqlite::Result<Option<Tab>> {
    let id: String = row.get(0)?;
    let device_id: String = row.get(1)?;
    let title = match row.get_ref(2)? {
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    };
    let raw_url = match row.get_ref(3)? {
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok(),
        _ => None,
    };
    let is_pinned = match row.get_ref(4)? {
        ValueRef::Integer(flag) => flag != 0,
        ValueRef::Real(flag) => flag != 0.0,
        _ => false,
    };
    let last_viewed_time = match row.get_ref(5)? {
        ValueRef::Real(secs) => core_data_timestamp(secs),
        ValueRef::Integer(secs) => core_data_timestamp(secs as f64),
        _ => None,
    };
    let position_sort_value = match row.get_ref(6)? {
        ValueRef::Blob(blob) => decode_position(blob),
        _ => None,
    };

    let url = match raw_url.map(Url::parse) {
        Some(Ok(url)) => url,
        _ => {
            debug!(tab = %id, url = ?raw_url, "skipping tab with unreadable url");
            return Ok(None);
        }
    };

    Ok(Some(Tab {
        id,
        device_id,
        title,
        url,
        is_pinned,
        position_sort_value,
        last_viewed_time,
    }))
}

fn read_template_system_fields(db: &CloudTabsConnection) -> Result<Vec<u8>, CloudTabsError> {
    let result = db.connection().query_row(
        queries::SELECT_TEMPLATE_SYSTEM_FIELDS,
        [],
        |row| row.get::<_, Option<Vec<u8>>>(0),
    );

    match result {
        Ok(Some(blob)) if !blob.is_empty() => Ok(blob),
        Ok(_) => Err(CloudTabsError::NoTemplateBlob),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(CloudTabsError::NoTemplateBlob),
        Err(e) => Err(query_error(e)),
    }
}
