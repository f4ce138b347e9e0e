// TabBridge platform paths for Linux
// Config: ~/.config/tabbridge

use std::env;
use std::path::PathBuf;

/// Returns the home directory on Linux.
pub fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the configuration directory for TabBridge on Linux.
/// Uses `$XDG_CONFIG_HOME/tabbridge` if set, otherwise `~/.config/tabbridge`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("tabbridge"),
        _ => home_dir().join(".config").join("tabbridge"),
    }
}
