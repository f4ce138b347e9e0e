//! File change monitor for the CloudTabs database.
//!
//! Watches a single file path for writes and replacement. Bursts of writes
//! are coalesced into one notification after a quiet period. When the file
//! is deleted or renamed (the browser replaces the database atomically) the
//! watch is dropped and re-established on the same path after a settle
//! delay, followed by a debounced notification.
//!
//! Notifications are invoked on the monitor's worker thread, one at a time.
//! Consumers that own state should forward them to their own context.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

/// Default quiet period before a change notification fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
/// Default delay between losing the file and watching it again.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(500);

/// Timing parameters for [`DatabaseMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub debounce: Duration,
    pub settle: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            settle: DEFAULT_SETTLE,
        }
    }
}

/// File system events the monitor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEvent {
    /// Content written or file extended.
    Write,
    /// File deleted or renamed away; the watch is stale.
    Replaced,
}

/// Maps a `notify` event kind onto the events the monitor cares about.
pub fn classify(kind: &EventKind) -> Option<FileEvent> {
    match kind {
        EventKind::Remove(_) => Some(FileEvent::Replaced),
        EventKind::Modify(ModifyKind::Name(_)) => Some(FileEvent::Replaced),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(FileEvent::Write),
        _ => None,
    }
}

/// Work the monitor must perform once a deadline has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorAction {
    Rearm,
    Notify,
}

/// Deadline bookkeeping for debounce and re-arm, independent of any watcher.
#[derive(Debug, Clone)]
pub struct DebounceState {
    config: MonitorConfig,
    notify_at: Option<Instant>,
    rearm_at: Option<Instant>,
}

impl DebounceState {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            notify_at: None,
            rearm_at: None,
        }
    }

    /// Records an event observed at `now`.
    ///
    /// A write (re)starts the debounce window. A replacement cancels any
    /// pending notification and schedules a re-arm; writes seen while a
    /// re-arm is pending belong to the old file and are ignored.
    pub fn on_event(&mut self, event: FileEvent, now: Instant) {
        match event {
            FileEvent::Write => {
                if self.rearm_at.is_none() {
                    self.notify_at = Some(now + self.config.debounce);
                }
            }
            FileEvent::Replaced => {
                self.notify_at = None;
                self.rearm_at = Some(now + self.config.settle);
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.notify_at, self.rearm_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_rearm_pending(&self) -> bool {
        self.rearm_at.is_some()
    }

    /// Returns the actions due at `now`, in execution order.
    pub fn poll(&mut self, now: Instant) -> Vec<MonitorAction> {
        let mut actions = Vec::new();
        if let Some(at) = self.rearm_at {
            if at <= now {
                self.rearm_at = None;
                actions.push(MonitorAction::Rearm);
                self.notify_at = Some(now + self.config.debounce);
            }
        }
        if let Some(at) = self.notify_at {
            if at <= now {
                self.notify_at = None;
                actions.push(MonitorAction::Notify);
            }
        }
        actions
    }

    pub fn cancel(&mut self) {
        self.notify_at = None;
        self.rearm_at = None;
    }
}

enum MonitorMsg {
    Fs(notify::Result<notify::Event>),
    Stop,
}

struct Worker {
    control: Sender<MonitorMsg>,
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Watches the database file and invokes a callback after changes settle.
pub struct DatabaseMonitor {
    path: PathBuf,
    config: MonitorConfig,
    on_change: Arc<dyn Fn() + Send + Sync>,
    worker: Option<Worker>,
}

impl DatabaseMonitor {
    pub fn new<P, F>(path: P, on_change: F) -> Self
    where
        P: Into<PathBuf>,
        F: Fn() + Send + Sync + 'static,
    {
        Self::with_config(path, MonitorConfig::default(), on_change)
    }

    pub fn with_config<P, F>(path: P, config: MonitorConfig, on_change: F) -> Self
    where
        P: Into<PathBuf>,
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            config,
            on_change: Arc::new(on_change),
            worker: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Starts watching. Calling `start` on a running monitor restarts it,
    /// so at most one watch is ever active.
    ///
    /// If the file cannot be watched the monitor stays inert until stopped.
    pub fn start(&mut self) {
        self.stop();

        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(true));
        let path = self.path.clone();
        let config = self.config;
        let on_change = Arc::clone(&self.on_change);
        let worker_running = Arc::clone(&running);
        let fs_tx = tx.clone();

        let spawned = thread::Builder::new()
            .name("tabbridge-monitor".to_string())
            .spawn(move || {
                run_worker(path, config, on_change, worker_running, fs_tx, rx);
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(Worker {
                    control: tx,
                    running,
                    handle,
                });
            }
            Err(e) => warn!("failed to spawn database monitor thread: {}", e),
        }
    }

    /// Stops watching and cancels any pending notification.
    ///
    /// Once this returns no further callbacks fire. Safe to call repeatedly,
    /// and from inside the callback itself.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.running.store(false, Ordering::SeqCst);
        let _ = worker.control.send(MonitorMsg::Stop);
        if worker.handle.thread().id() != thread::current().id() {
            let _ = worker.handle.join();
        }
        debug!(path = %self.path.display(), "database monitor stopped");
    }
}

impl Drop for DatabaseMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Opens a watch on `path`, forwarding events into `tx`.
fn arm(path: &Path, tx: &Sender<MonitorMsg>) -> Option<RecommendedWatcher> {
    let tx = tx.clone();
    let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let _ = tx.send(MonitorMsg::Fs(res));
    });
    let mut watcher = match watcher {
        Ok(w) => w,
        Err(e) => {
            warn!("cannot create file watcher: {}", e);
            return None;
        }
    };
    match watcher.watch(path, RecursiveMode::NonRecursive) {
        Ok(()) => {
            info!(path = %path.display(), "watching database");
            Some(watcher)
        }
        Err(e) => {
            warn!(path = %path.display(), "cannot watch database, monitor inert: {}", e);
            None
        }
    }
}

fn run_worker(
    path: PathBuf,
    config: MonitorConfig,
    on_change: Arc<dyn Fn() + Send + Sync>,
    running: Arc<AtomicBool>,
    tx: Sender<MonitorMsg>,
    rx: mpsc::Receiver<MonitorMsg>,
) {
    let mut watcher = arm(&path, &tx);
    let mut state = DebounceState::new(config);

    loop {
        let msg = match state.next_deadline() {
            Some(deadline) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(timeout) {
                    Ok(msg) => Some(msg),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(msg) => Some(msg),
                Err(_) => break,
            },
        };

        match msg {
            Some(MonitorMsg::Stop) => break,
            Some(MonitorMsg::Fs(Ok(event))) => {
                if let Some(file_event) = classify(&event.kind) {
                    if file_event == FileEvent::Replaced && watcher.take().is_some() {
                        debug!(path = %path.display(), "database replaced, dropping watch");
                    }
                    state.on_event(file_event, Instant::now());
                }
            }
            Some(MonitorMsg::Fs(Err(e))) => warn!("database watcher error: {}", e),
            None => {}
        }

        for action in state.poll(Instant::now()) {
            match action {
                MonitorAction::Rearm => {
                    watcher = arm(&path, &tx);
                }
                MonitorAction::Notify => {
                    if !running.load(Ordering::SeqCst) {
                        return;
                    }
                    on_change();
                }
            }
        }
    }

    state.cancel();
    drop(watcher);
}
