//! Stateless request builder and response parser for the remote list
//! service.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each remote operation is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the round-trip in
//! between, so this module stays deterministic and free of I/O.

use serde::de::DeserializeOwned;

use crate::error::NetworkError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{RemoteTodo, TodoId, TodoPage, UpdateTodo};

/// Public endpoint the service is normally reached at.
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// Number of records the service skips before page `page` of size
/// `page_size`. Page numbers are 1-based; page 0 is treated as page 1.
pub fn page_offset(page: u32, page_size: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(page_size)
}

/// Synchronous, stateless client for the remote list service.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl Default for TodoClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_fetch_page(&self, page: u32, page_size: u32) -> HttpRequest {
        let skip = page_offset(page, page_size);
        HttpRequest::without_body(
            HttpMethod::Get,
            format!("{}/todos?limit={page_size}&skip={skip}", self.base_url),
        )
    }

    pub fn build_get(&self, id: TodoId) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Get, self.todo_url(id))
    }

    pub fn build_delete(&self, id: TodoId) -> HttpRequest {
        HttpRequest::without_body(HttpMethod::Delete, self.todo_url(id))
    }

    pub fn build_set_completed(&self, id: TodoId, completed: bool) -> Result<HttpRequest, NetworkError> {
        self.build_update(
            id,
            &UpdateTodo {
                todo: None,
                completed: Some(completed),
            },
        )
    }

    pub fn build_set_text(&self, id: TodoId, text: &str) -> Result<HttpRequest, NetworkError> {
        self.build_update(
            id,
            &UpdateTodo {
                todo: Some(text.to_string()),
                completed: None,
            },
        )
    }

    pub fn build_update(&self, id: TodoId, input: &UpdateTodo) -> Result<HttpRequest, NetworkError> {
        let body = serde_json::to_string(input).map_err(|e| NetworkError::Encode(e.to_string()))?;
        Ok(HttpRequest::json(HttpMethod::Put, self.todo_url(id), body))
    }

    pub fn parse_fetch_page(&self, response: HttpResponse) -> Result<TodoPage, NetworkError> {
        check_status(&response, |r| r.status == 200)?;
        decode(&response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<RemoteTodo, NetworkError> {
        check_status(&response, |r| r.status == 200)?;
        decode(&response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<RemoteTodo, NetworkError> {
        check_status(&response, HttpResponse::is_success)?;
        decode(&response)
    }

    /// The service echoes the deleted record, but nothing in it is needed;
    /// any 2xx confirms the delete.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), NetworkError> {
        check_status(&response, HttpResponse::is_success)
    }

    fn todo_url(&self, id: TodoId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

/// Map unexpected status codes to the matching `NetworkError` variant.
fn check_status(response: &HttpResponse, accept: impl Fn(&HttpResponse) -> bool) -> Result<(), NetworkError> {
    if accept(response) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(NetworkError::NotFound);
    }
    Err(NetworkError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, NetworkError> {
    serde_json::from_str(&response.body).map_err(|e| NetworkError::Decode(e.to_string()))
}
