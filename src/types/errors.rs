use std::fmt;

// === CloudTabsError ===

/// Errors raised while reading from or writing to the CloudTabs database.
#[derive(Debug, Clone, PartialEq)]
pub enum CloudTabsError {
    /// The SQLite connection could not be established.
    DatabaseOpen(String),
    /// Statement preparation or execution failed.
    Query(String),
    /// The close-request path found no `system_fields` blob to clone.
    NoTemplateBlob,
}

impl fmt::Display for CloudTabsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudTabsError::DatabaseOpen(msg) => write!(f, "Cannot open database: {}", msg),
            CloudTabsError::Query(msg) => write!(f, "Query failed: {}", msg),
            CloudTabsError::NoTemplateBlob => {
                write!(f, "No template system_fields blob found")
            }
        }
    }
}

impl std::error::Error for CloudTabsError {}

// === SettingsError ===

/// Errors related to settings persistence.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === ViewError ===

/// Errors raised by view configuration and tab lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewError {
    /// The sort key raw value is not recognised.
    UnknownSortKey(String),
    /// The sort direction raw value is not recognised.
    UnknownDirection(String),
    /// No tab with the given ID exists in the current snapshot.
    TabNotFound(String),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::UnknownSortKey(key) => write!(f, "Unknown sort key: {}", key),
            ViewError::UnknownDirection(dir) => write!(f, "Unknown sort direction: {}", dir),
            ViewError::TabNotFound(id) => write!(f, "Tab not found: {}", id),
        }
    }
}

impl std::error::Error for ViewError {}
