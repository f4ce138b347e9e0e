// TabBridge platform paths for macOS
// Config: ~/Library/Application Support/TabBridge

use std::env;
use std::path::PathBuf;

/// Returns the home directory on macOS.
pub fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the configuration directory for TabBridge on macOS.
/// `~/Library/Application Support/TabBridge`
pub fn get_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("TabBridge")
}
