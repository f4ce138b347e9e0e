//! TabBridge database layer.
//!
//! Connection helpers and fixed SQL for the CloudTabs file written by the
//! browser. This crate never creates or migrates that schema.
//!
//! # Usage
//!
//! ```no_run
//! use tabbridge::database::CloudTabsConnection;
//!
//! let db = CloudTabsConnection::open_read_only("CloudTabs.db").expect("failed to open database");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod queries;

pub use connection::CloudTabsConnection;
