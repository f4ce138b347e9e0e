// TabBridge platform paths for Windows
// Config: %APPDATA%/TabBridge

use std::env;
use std::path::PathBuf;

/// Returns the user profile directory on Windows.
pub fn home_dir() -> PathBuf {
    PathBuf::from(
        env::var("USERPROFILE").unwrap_or_else(|_| String::from("C:\\Users\\Default")),
    )
}

/// Returns the configuration directory for TabBridge on Windows.
/// `%APPDATA%/TabBridge`
pub fn get_config_dir() -> PathBuf {
    let appdata = env::var("APPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("TabBridge")
}
