// TabBridge shared type definitions
// Each submodule defines types used across the application.

pub mod device;
pub mod errors;
pub mod settings;
pub mod snapshot;
pub mod sort;
pub mod tab;

use chrono::{DateTime, Utc};

/// Abbreviated relative time label ("just now", "5 min ago", "2 days ago").
///
/// Timestamps in the future are reported as "just now".
pub fn relative_label(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let secs = elapsed.num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }
    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return format!("{} min ago", minutes);
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{} hr ago", hours);
    }
    let days = elapsed.num_days();
    if days == 1 {
        return "1 day ago".to_string();
    }
    if days < 7 {
        return format!("{} days ago", days);
    }
    let weeks = days / 7;
    if weeks < 5 {
        return format!("{} wk ago", weeks);
    }
    let months = days / 30;
    if months < 12 {
        return format!("{} mo ago", months.max(1));
    }
    format!("{} yr ago", (days / 365).max(1))
}
