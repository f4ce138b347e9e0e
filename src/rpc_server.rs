//! TabBridge RPC Server: JSON-RPC over stdin/stdout for a display layer.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"view.set_sort_order", "params":{"order":"domain"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Push:     {"event":"changed"} after every monitor-driven refresh.
//!
//! The main thread owns the `App`. Stdin is read on a helper thread and
//! forwarded over a channel so file-change events can be applied between requests.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tabbridge::app::App;
use tabbridge::rpc_handler::handle_method;

/// How long the owner waits for input before draining app events.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn emit(out: &mut impl Write, value: &Value) {
    if writeln!(out, "{}", value).and_then(|_| out.flush()).is_err() {
        warn!("stdout closed");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let mut app = App::with_default_paths();
    app.setup();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    emit(
        &mut out,
        &json!({
            "event": "ready",
            "version": env!("CARGO_PKG_VERSION"),
            "accessible": app.view.has_access(),
        }),
    );

    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if line_tx.send(l).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    let mut rate_limiter = RateLimiter::new(200);

    loop {
        if app.process_pending_events() > 0 {
            emit(&mut out, &json!({"event":"changed","error":app.view.error_message()}));
        }

        let line = match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(l) => l,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                emit(&mut out, &json!({"id":null,"error":format!("parse error: {}",e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            emit(&mut out, &json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let response = match handle_method(&mut app, method, &params) {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        emit(&mut out, &response);
    }

    info!("stdin closed, shutting down");
    app.shutdown();
}
