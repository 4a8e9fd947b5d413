//! I/O-free core of a paginated todo list client.
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse`
//! values for the remote list service without touching the network.
//! `TodoStore` owns the working set of one view session and applies
//! optimistic changes. Each remote operation comes back as a pending effect
//! that the host executes and then completes, so failures roll back exactly
//! what that operation changed. `view` derives the search-filtered list and
//! pagination metadata.
//!
//! # Design
//! - Nothing here performs I/O or spawns tasks; the host decides how
//!   requests are executed and may overlap them.
//! - Items carry an `Origin`: local items never produce requests.
//! - Wire DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod ids;
pub mod store;
pub mod types;
pub mod view;

pub use client::{TodoClient, DEFAULT_BASE_URL};
pub use error::NetworkError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use ids::LocalIds;
pub use store::{
    FetchOutcome, MutationKind, MutationOutcome, PendingFetch, PendingMutation, TodoStore,
    DEFAULT_PAGE_SIZE,
};
pub use types::{Origin, RemoteTodo, TodoId, TodoItem, TodoPage, UpdateTodo};
pub use view::{DisplayRange, TodoView};
