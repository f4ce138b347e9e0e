// TabBridge platform abstraction
// Provides platform-specific paths: the settings directory and the location
// of the browser's CloudTabs database.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::{Path, PathBuf};

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as imp;

#[cfg(target_os = "macos")]
use macos as imp;

#[cfg(target_os = "windows")]
use windows as imp;

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "TABBRIDGE_DB";

/// Returns the platform-specific configuration directory for TabBridge.
///
/// - **Linux**: `~/.config/tabbridge` (or `$XDG_CONFIG_HOME/tabbridge`)
/// - **macOS**: `~/Library/Application Support/TabBridge`
/// - **Windows**: `%APPDATA%/TabBridge`
pub fn get_config_dir() -> PathBuf {
    imp::get_config_dir()
}

pub fn home_dir() -> PathBuf {
    imp::home_dir()
}

/// Candidate CloudTabs locations under `home`, in preference order:
/// the sandboxed container first, then the legacy location.
pub fn cloud_tabs_candidates(home: &Path) -> [PathBuf; 2] {
    [
        home.join("Library")
            .join("Containers")
            .join("com.apple.Safari")
            .join("Data")
            .join("Library")
            .join("Safari")
            .join("CloudTabs.db"),
        home.join("Library").join("Safari").join("CloudTabs.db"),
    ]
}

/// First existing candidate under `home`, else the container path.
pub fn resolve_cloud_tabs_path(home: &Path) -> PathBuf {
    let [container, legacy] = cloud_tabs_candidates(home);
    if container.exists() {
        container
    } else if legacy.exists() {
        legacy
    } else {
        container
    }
}

/// Database path used when none is given: `$TABBRIDGE_DB` if set, else
/// [`resolve_cloud_tabs_path`] under the user's home directory.
pub fn default_cloud_tabs_path() -> PathBuf {
    match std::env::var(DB_PATH_ENV) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => resolve_cloud_tabs_path(&home_dir()),
    }
}
