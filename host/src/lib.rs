//! Async host for `todo-sync`.
//!
//! # Overview
//! The core crate never performs I/O; this crate supplies it. A
//! [`Transport`] executes the core's `HttpRequest` values, and a
//! [`TodoSession`] pairs one `TodoStore` with one transport so callers can
//! simply `await` store operations.
//!
//! # Design
//! - `Transport` is the only seam between the store and the network, so
//!   tests swap in scripted transports without a server.
//! - `UreqTransport` runs the blocking ureq agent on tokio's blocking pool.
//! - Configuration comes from the environment (see [`Config`]).

pub mod config;
pub mod session;
pub mod transport;

pub use config::{Config, ConfigError};
pub use session::TodoSession;
pub use transport::{Transport, UreqTransport};
