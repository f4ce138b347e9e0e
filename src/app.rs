//! App Core for TabBridge.
//!
//! The explicit application-state object: owns the view state, the settings
//! engine and the database monitor. All mutation happens on the thread that
//! owns the `App`; the monitor and background fetches only send
//! [`AppEvent`]s into its channel, which the owner drains.

use std::error::Error;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::managers::view_state::{FetchResult, ViewState, ViewStateTrait};
use crate::services::cloud_tabs_reader::{CloudTabsReader, CloudTabsReaderTrait};
use crate::services::database_monitor::{DatabaseMonitor, MonitorConfig};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait, KEY_SORT_ORDER};
use crate::types::errors::{SettingsError, ViewError};
use crate::types::settings::ViewConfig;
use crate::types::sort::{SortDirection, SortOrder};

/// Messages delivered to the owning context.
#[derive(Debug)]
pub enum AppEvent {
    /// The monitor saw the database change (or re-armed after replacement).
    DatabaseChanged,
    /// A background fetch finished.
    FetchCompleted(FetchResult),
}

/// Central application struct.
pub struct App {
    pub view: ViewState,
    pub settings_engine: SettingsEngine,
    reader: Arc<dyn CloudTabsReaderTrait>,
    monitor: Option<DatabaseMonitor>,
    monitor_config: MonitorConfig,
    events_tx: Sender<AppEvent>,
    events_rx: Receiver<AppEvent>,
    fetch_in_flight: bool,
    refresh_queued: bool,
    is_set_up: bool,
}

impl App {
    /// Creates a new App around `reader`, restoring the persisted sort settings.
    pub fn new(reader: Arc<dyn CloudTabsReaderTrait>, mut settings_engine: SettingsEngine) -> Self {
        if let Err(e) = settings_engine.load() {
            warn!("could not load settings, using defaults: {}", e);
        }
        let config = ViewConfig::from(settings_engine.get_settings());
        let (events_tx, events_rx) = mpsc::channel();

        Self {
            view: ViewState::new(config),
            settings_engine,
            reader,
            monitor: None,
            monitor_config: MonitorConfig::default(),
            events_tx,
            events_rx,
            fetch_in_flight: false,
            refresh_queued: false,
            is_set_up: false,
        }
    }

    /// App over the platform default database and settings locations.
    pub fn with_default_paths() -> Self {
        Self::new(
            Arc::new(CloudTabsReader::with_default_path()),
            SettingsEngine::new(None),
        )
    }

    pub fn with_monitor_config(mut self, config: MonitorConfig) -> Self {
        self.monitor_config = config;
        self
    }

    pub fn reader(&self) -> &dyn CloudTabsReaderTrait {
        self.reader.as_ref()
    }

    pub fn is_set_up(&self) -> bool {
        self.is_set_up
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitor.as_ref().is_some_and(DatabaseMonitor::is_running)
    }

    /// Startup sequence: check access, then fetch and start monitoring if
    /// the database is readable. Runs once; later calls do nothing.
    pub fn setup(&mut self) {
        if self.is_set_up {
            return;
        }
        self.is_set_up = true;
        if self.check_access() {
            self.refresh();
            self.start_monitoring();
        } else {
            info!(path = %self.reader.path().display(), "database not accessible");
        }
    }

    pub fn check_access(&mut self) -> bool {
        self.view.check_access(self.reader.as_ref())
    }

    /// Fetches on the calling thread and applies the result.
    pub fn refresh(&mut self) {
        self.view.refresh(self.reader.as_ref());
    }

    /// Fetches on a background thread; the result arrives as
    /// [`AppEvent::FetchCompleted`]. Requests made while a fetch is running
    /// are coalesced into one follow-up fetch.
    pub fn request_refresh(&mut self) {
        if self.fetch_in_flight {
            self.refresh_queued = true;
            return;
        }
        self.fetch_in_flight = true;
        let reader = Arc::clone(&self.reader);
        let tx = self.events_tx.clone();
        let spawned = thread::Builder::new()
            .name("tabbridge-fetch".to_string())
            .spawn(move || {
                let result = reader.fetch_devices_and_tabs();
                let _ = tx.send(AppEvent::FetchCompleted(result));
            });
        if let Err(e) = spawned {
            warn!("failed to spawn fetch thread, fetching inline: {}", e);
            self.fetch_in_flight = false;
            self.refresh();
        }
    }

    pub fn start_monitoring(&mut self) {
        let tx = self.events_tx.clone();
        let mut monitor = DatabaseMonitor::with_config(
            self.reader.path().to_path_buf(),
            self.monitor_config,
            move || {
                let _ = tx.send(AppEvent::DatabaseChanged);
            },
        );
        monitor.start();
        self.monitor = Some(monitor);
    }

    pub fn stop_monitoring(&mut self) {
        if let Some(mut monitor) = self.monitor.take() {
            monitor.stop();
        }
    }

    /// Applies one event. Returns true when the snapshot or error changed.
    pub fn process_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::DatabaseChanged => {
                debug!("database changed, refreshing");
                self.request_refresh();
                false
            }
            AppEvent::FetchCompleted(result) => {
                self.fetch_in_flight = false;
                self.view.apply_fetch_result(result);
                if self.refresh_queued {
                    self.refresh_queued = false;
                    self.request_refresh();
                }
                true
            }
        }
    }

    /// Drains queued events without blocking. Returns how many fetch
    /// results were applied.
    pub fn process_pending_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.process_event(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Blocks up to `timeout` for one event and applies it.
    /// Returns `None` on timeout.
    pub fn wait_for_event(&mut self, timeout: Duration) -> Option<bool> {
        match self.events_rx.recv_timeout(timeout) {
            Ok(event) => Some(self.process_event(event)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Changes the sort key (resetting direction to its default) and persists both.
    pub fn set_sort_order(&mut self, order: SortOrder) -> Result<(), SettingsError> {
        self.view.set_sort_order(order);
        self.settings_engine.set_sort_order(order)?;
        self.settings_engine
            .set_sort_direction(self.view.config().direction)
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) -> Result<(), SettingsError> {
        self.view.set_direction(direction);
        self.settings_engine.set_sort_direction(direction)
    }

    pub fn toggle_sort_direction(&mut self) -> Result<SortDirection, SettingsError> {
        let direction = self.view.config().direction.toggled();
        self.set_sort_direction(direction)?;
        Ok(direction)
    }

    /// Sets one persisted setting from its raw key and value, then applies
    /// it to the view. A new sort key also resets the stored direction.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.settings_engine.set_value(key, value)?;
        if key == KEY_SORT_ORDER {
            let order = self.settings_engine.get_settings().sort_order();
            self.settings_engine
                .set_sort_direction(order.default_direction())?;
        }
        self.sync_sort_from_settings();
        Ok(())
    }

    /// Restores default settings on disk and in the view.
    pub fn reset_settings(&mut self) -> Result<(), SettingsError> {
        self.settings_engine.reset()?;
        self.sync_sort_from_settings();
        Ok(())
    }

    fn sync_sort_from_settings(&mut self) {
        let persisted = self.settings_engine.get_settings();
        let (order, direction) = (persisted.sort_order(), persisted.sort_direction());
        self.view.set_sort_order(order);
        self.view.set_direction(direction);
    }

    /// Asks the owning device to close a tab from the current snapshot.
    ///
    /// Experimental: the browser may ignore the request.
    pub fn request_close(&self, tab_id: &str) -> Result<(), Box<dyn Error>> {
        let tab = self
            .view
            .tab(tab_id)
            .ok_or_else(|| ViewError::TabNotFound(tab_id.to_string()))?;
        self.reader.request_close_tab(tab)?;
        Ok(())
    }

    /// Shutdown sequence: stop monitoring.
    pub fn shutdown(&mut self) {
        self.stop_monitoring();
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stop_monitoring();
    }
}
