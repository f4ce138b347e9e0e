// TabBridge Settings Engine
// Persists the chosen sort key and direction as a small JSON file at the
// platform-specific config path. Unknown or unreadable values fall back to defaults.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::platform;
use crate::types::errors::{SettingsError, ViewError};
use crate::types::settings::PersistedSettings;
use crate::types::sort::{SortDirection, SortOrder};

/// Key under which the sort key raw value is stored.
pub const KEY_SORT_ORDER: &str = "tabSortOrder";
/// Key under which the sort direction raw value is stored.
pub const KEY_SORT_DIRECTION: &str = "sortDirection";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<PersistedSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &PersistedSettings;
    fn set_value(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;
    fn set_sort_order(&mut self, order: SortOrder) -> Result<(), SettingsError>;
    fn set_sort_direction(&mut self, direction: SortDirection) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: PersistedSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses the platform-specific config directory with `settings.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string(),
        };

        Self {
            config_path,
            settings: PersistedSettings::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// A missing file yields defaults. A malformed file also yields
    /// defaults (and is logged), since the only content is a preference.
    /// Read errors other than "not found" are returned.
    fn load(&mut self) -> Result<PersistedSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = PersistedSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        self.settings = match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %self.config_path, "ignoring malformed settings file: {}", e);
                PersistedSettings::default()
            }
        };
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &PersistedSettings {
        &self.settings
    }

    /// Updates one setting by key from its raw string value and saves.
    ///
    /// # Examples
    /// - `"tabSortOrder"`, `"domain"`
    /// - `"sortDirection"`, `"descending"`
    fn set_value(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        match key {
            KEY_SORT_ORDER => {
                let order: SortOrder = value
                    .parse()
                    .map_err(|e: ViewError| SettingsError::InvalidValue(e.to_string()))?;
                self.set_sort_order(order)
            }
            KEY_SORT_DIRECTION => {
                let direction: SortDirection = value
                    .parse()
                    .map_err(|e: ViewError| SettingsError::InvalidValue(e.to_string()))?;
                self.set_sort_direction(direction)
            }
            "" => Err(SettingsError::InvalidKey("Key cannot be empty".to_string())),
            other => Err(SettingsError::InvalidKey(format!(
                "Key '{}' not found in settings",
                other
            ))),
        }
    }

    fn set_sort_order(&mut self, order: SortOrder) -> Result<(), SettingsError> {
        self.settings.tab_sort_order = Some(order.as_str().to_string());
        self.save()
    }

    fn set_sort_direction(&mut self, direction: SortDirection) -> Result<(), SettingsError> {
        self.settings.sort_direction = Some(direction.as_str().to_string());
        self.save()
    }

    /// Resets all settings to defaults and saves.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = PersistedSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
