//! SQLite connection management for the CloudTabs database.
//!
//! Provides the [`CloudTabsConnection`] struct that wraps a `rusqlite::Connection`
//! opened either read-only (fetch path) or read-write (close requests).
//! Connections are short-lived: open, query, drop.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::types::errors::CloudTabsError;

/// A single open connection to the external CloudTabs file.
///
/// The connection is closed when the value is dropped, so every early
/// return through `?` releases it.
pub struct CloudTabsConnection {
    conn: Connection,
}

impl CloudTabsConnection {
    /// Opens the database read-only through a `file:` URI with `mode=ro`.
    ///
    /// The file is never created or modified by this path.
    ///
    /// # Errors
    /// Returns [`CloudTabsError::DatabaseOpen`] if the file is missing,
    /// locked, or not a database.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, CloudTabsError> {
        let uri = read_only_uri(path.as_ref());
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&uri, flags)
            .map_err(|e| CloudTabsError::DatabaseOpen(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Opens the database for writing. The file must already exist.
    ///
    /// # Errors
    /// Returns [`CloudTabsError::DatabaseOpen`] if the connection cannot be established.
    pub fn open_read_write<P: AsRef<Path>>(path: P) -> Result<Self, CloudTabsError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path.as_ref(), flags)
            .map_err(|e| CloudTabsError::DatabaseOpen(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Returns a reference to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Builds `file:<path>?mode=ro`, percent-escaping the characters SQLite
/// treats specially inside a URI path.
pub fn read_only_uri(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut escaped = String::with_capacity(raw.len() + 16);
    for ch in raw.chars() {
        match ch {
            '%' => escaped.push_str("%25"),
            '?' => escaped.push_str("%3F"),
            '#' => escaped.push_str("%23"),
            ' ' => escaped.push_str("%20"),
            _ => escaped.push(ch),
        }
    }
    format!("file:{}?mode=ro", escaped)
}
