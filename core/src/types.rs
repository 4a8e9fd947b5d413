//! Domain types and wire DTOs.
//!
//! # Design
//! The remote service speaks `{id, todo, completed}`; the store works with
//! `TodoItem`, which renames `todo` to `text` and records where the item
//! came from. The wire types are defined independently from the
//! mock-server crate; the integration tests catch schema drift.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a todo. Remote ids come from the service; local ids come
/// from [`LocalIds`](crate::ids::LocalIds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub u64);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an item lives, which decides whether mutations reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Created in this session, never sent to the service.
    Local,
    /// Loaded from the service; mutations are confirmed remotely.
    Remote,
}

/// One entry of the store's working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub origin: Origin,
}

impl TodoItem {
    pub fn is_local(&self) -> bool {
        self.origin == Origin::Local
    }
}

impl From<RemoteTodo> for TodoItem {
    fn from(remote: RemoteTodo) -> Self {
        Self {
            id: remote.id,
            text: remote.todo,
            completed: remote.completed,
            origin: Origin::Remote,
        }
    }
}

/// A todo record as the remote service encodes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteTodo {
    pub id: TodoId,
    pub todo: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

/// One page of `GET /todos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoPage {
    pub todos: Vec<RemoteTodo>,
    /// Number of todos on the service across all pages.
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

/// Body of `PUT /todos/{id}`. Only the fields present are applied; the
/// store always sends exactly one of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}
