//! The todo state store: single source of truth for one view session.
//!
//! # Design
//! The store follows the same host-does-IO split as `TodoClient`. An
//! operation that needs the network applies its optimistic change, then
//! returns a pending effect carrying the `HttpRequest` to execute. The host
//! runs the request and hands the result back through `complete_fetch` or
//! `complete_mutation`.
//!
//! Rollback is tracked per item, never as a snapshot of the whole list:
//!
//! - Every item carries a rank. Fetched items are ranked by page position and
//!   local adds rank below everything already present, so the list is always
//!   sorted by rank. A failed delete reinserts the removed item at its rank,
//!   which puts it back between the same neighbours whatever else was added
//!   or removed in the meantime.
//! - Optimistic writes to `completed` and `text` are logged per item, oldest
//!   first, on top of the last value the service is known to hold. A failed
//!   write drops out of the log and the item shows the newest write still
//!   standing. A confirmed write becomes the new known value and retires the
//!   writes sent before it.
//!
//! Overlapping operations therefore cannot undo each other's confirmed work,
//! even on the same item.
//!
//! Each pending fetch carries a token. Starting a new fetch supersedes the
//! previous one; a superseded fetch's response is dropped on completion.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::NetworkError;
use crate::http::{HttpRequest, HttpResponse};
use crate::ids::LocalIds;
use crate::types::{Origin, TodoId, TodoItem, TodoPage};
use crate::view::{self, DisplayRange, TodoView};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A page load waiting for its response.
#[derive(Debug)]
#[must_use = "execute the request and pass the result to `TodoStore::complete_fetch`"]
pub struct PendingFetch {
    token: u64,
    page: u32,
    page_size: u32,
    request: HttpRequest,
}

impl PendingFetch {
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Delete,
    SetCompleted,
    SetText,
}

/// A remote item taken out by a pending delete.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Removed {
    rank: i64,
    item: TodoItem,
}

/// An optimistic change to a remote item waiting for confirmation.
#[derive(Debug)]
#[must_use = "execute the request and pass the result to `TodoStore::complete_mutation`"]
pub struct PendingMutation {
    id: TodoId,
    kind: MutationKind,
    seq: u64,
    removed: Option<Removed>,
    epoch: u64,
    request: HttpRequest,
}

impl PendingMutation {
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }
}

/// Unconfirmed writes to one field of one item, oldest first.
#[derive(Debug)]
struct Writes<T> {
    settled: T,
    pending: Vec<(u64, T)>,
}

impl<T> Writes<T> {
    fn new(settled: T) -> Self {
        Self {
            settled,
            pending: Vec::new(),
        }
    }

    fn push(&mut self, seq: u64, value: T) {
        self.pending.push((seq, value));
    }

    /// Value the item should show: the newest standing write.
    fn current(&self) -> &T {
        self.pending.last().map_or(&self.settled, |(_, value)| value)
    }

    /// The service accepted write `seq`; everything sent before it is moot.
    fn confirm(&mut self, seq: u64) {
        if let Some(at) = self.pending.iter().position(|(s, _)| *s == seq) {
            let mut retired = self.pending.drain(..=at);
            if let Some((_, value)) = retired.next_back() {
                self.settled = value;
            }
        }
    }

    /// Drop write `seq`. Returns false if it was already retired.
    fn discard(&mut self, seq: u64) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(s, _)| *s != seq);
        self.pending.len() != before
    }

    fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page replaced the working set.
    Applied,
    /// The fetch failed; the previous items were kept and `error` is set.
    Failed,
    /// A newer fetch was started in the meantime; the result was ignored.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Confirmed,
    /// The optimistic change was undone and `error` is set.
    Reverted,
}

/// Todo collection plus loading, error, pagination and search state.
#[derive(Debug)]
pub struct TodoStore {
    client: TodoClient,
    items: Vec<TodoItem>,
    error: Option<NetworkError>,
    page: u32,
    page_size: u32,
    total_count: u64,
    search_term: String,
    ids: LocalIds,
    next_fetch_token: u64,
    current_fetch: Option<u64>,
    // Sort key of every item in `items`; ascending in list order.
    ranks: HashMap<TodoId, i64>,
    front_rank: i64,
    completed_writes: HashMap<TodoId, Writes<bool>>,
    text_writes: HashMap<TodoId, Writes<String>>,
    next_mutation: u64,
    // Bumped whenever a fetched page replaces `items`; removals from an
    // older epoch no longer belong to the working set.
    epoch: u64,
    mutations_in_flight: usize,
}

impl TodoStore {
    /// Empty store on page 1. A `page_size` of zero falls back to
    /// [`DEFAULT_PAGE_SIZE`]. Call [`refetch`](Self::refetch) to load the
    /// first page.
    pub fn new(client: TodoClient, page_size: u32) -> Self {
        Self::with_ids(client, page_size, LocalIds::new())
    }

    pub fn with_ids(client: TodoClient, page_size: u32, ids: LocalIds) -> Self {
        Self {
            client,
            items: Vec::new(),
            error: None,
            page: 1,
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
            total_count: 0,
            search_term: String::new(),
            ids,
            next_fetch_token: 0,
            current_fetch: None,
            ranks: HashMap::new(),
            front_rank: 0,
            completed_writes: HashMap::new(),
            text_writes: HashMap::new(),
            next_mutation: 0,
            epoch: 0,
            mutations_in_flight: 0,
        }
    }

    // --- reads ---

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn item(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.current_fetch.is_some() || self.mutations_in_flight > 0
    }

    pub fn error(&self) -> Option<&NetworkError> {
        self.error.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn visible_items(&self) -> Vec<&TodoItem> {
        view::visible_items(&self.items, &self.search_term)
    }

    pub fn total_pages(&self) -> u64 {
        view::total_pages(self.total_count, self.page_size)
    }

    pub fn display_range(&self) -> Option<DisplayRange> {
        let remote = self.items.iter().filter(|item| !item.is_local()).count();
        view::display_range(self.page, self.page_size, self.total_count, remote)
    }

    pub fn view(&self) -> TodoView<'_> {
        TodoView {
            visible_items: self.visible_items(),
            is_loading: self.is_loading(),
            error: self.error(),
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages(),
            display_range: self.display_range(),
            search_term: &self.search_term,
        }
    }

    // --- fetch ---

    /// Start loading the current page, superseding any fetch still pending.
    pub fn refetch(&mut self) -> PendingFetch {
        self.error = None;
        let token = self.next_fetch_token;
        self.next_fetch_token += 1;
        if let Some(stale) = self.current_fetch.replace(token) {
            debug!(stale, token, "superseding pending fetch");
        }
        debug!(page = self.page, page_size = self.page_size, "fetching todos");
        PendingFetch {
            token,
            page: self.page,
            page_size: self.page_size,
            request: self.client.build_fetch_page(self.page, self.page_size),
        }
    }

    pub fn complete_fetch(
        &mut self,
        pending: PendingFetch,
        result: Result<HttpResponse, NetworkError>,
    ) -> FetchOutcome {
        if self.current_fetch != Some(pending.token) {
            debug!(token = pending.token, page = pending.page, "discarding stale fetch result");
            return FetchOutcome::Discarded;
        }
        self.current_fetch = None;

        match result.and_then(|response| self.client.parse_fetch_page(response)) {
            Ok(page) => {
                self.apply_page(page);
                FetchOutcome::Applied
            }
            Err(err) => {
                warn!(page = pending.page, error = %err, "fetching todos failed; keeping previous items");
                self.error = Some(err);
                FetchOutcome::Failed
            }
        }
    }

    fn apply_page(&mut self, page: TodoPage) {
        let mut seen = HashSet::with_capacity(page.todos.len());
        let mut items = Vec::with_capacity(page.todos.len());
        for todo in page.todos {
            if !seen.insert(todo.id) {
                warn!(id = %todo.id, "service returned a duplicate todo id; keeping the first");
                continue;
            }
            self.ids.observe(todo.id);
            items.push(TodoItem::from(todo));
        }
        debug!(count = items.len(), total = page.total, "loaded todos");
        self.ranks = items.iter().zip(0..).map(|(item, rank)| (item.id, rank)).collect();
        self.front_rank = 0;
        self.completed_writes.clear();
        self.text_writes.clear();
        self.items = items;
        self.total_count = page.total;
        self.epoch += 1;
    }

    // --- mutations ---

    /// Prepend a local todo. Blank text is ignored.
    pub fn add(&mut self, text: &str) -> Option<TodoId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.error = None;
        let id = self.ids.allocate();
        self.front_rank -= 1;
        self.ranks.insert(id, self.front_rank);
        self.items.insert(
            0,
            TodoItem {
                id,
                text: text.to_string(),
                completed: false,
                origin: Origin::Local,
            },
        );
        debug!(%id, "added local todo");
        Some(id)
    }

    /// Remove a todo. Local items are dropped immediately; remote items are
    /// dropped optimistically and the returned delete must be completed.
    pub fn remove(&mut self, id: TodoId) -> Option<PendingMutation> {
        self.error = None;
        let index = self.position(id)?;
        let item = self.items.remove(index);
        let rank = self.ranks.remove(&id).unwrap_or_default();
        if item.is_local() {
            debug!(%id, "removed local todo");
            return None;
        }
        let request = self.client.build_delete(id);
        let mut pending = self.begin(id, MutationKind::Delete, request);
        pending.removed = Some(Removed { rank, item });
        Some(pending)
    }

    pub fn toggle_completed(&mut self, id: TodoId) -> Option<PendingMutation> {
        self.error = None;
        let index = self.position(id)?;
        let item = &mut self.items[index];
        if item.is_local() {
            item.completed = !item.completed;
            return None;
        }
        let completed = !item.completed;
        let request = match self.client.build_set_completed(id, completed) {
            Ok(request) => request,
            Err(err) => {
                self.reject(id, err);
                return None;
            }
        };
        let previous = std::mem::replace(&mut self.items[index].completed, completed);
        let pending = self.begin(id, MutationKind::SetCompleted, request);
        self.completed_writes
            .entry(id)
            .or_insert_with(|| Writes::new(previous))
            .push(pending.seq, completed);
        Some(pending)
    }

    /// Replace a todo's text. The new text shows immediately for both
    /// origins; remote items are then confirmed with the service.
    pub fn edit_text(&mut self, id: TodoId, text: &str) -> Option<PendingMutation> {
        self.error = None;
        let index = self.position(id)?;
        let item = &mut self.items[index];
        if item.is_local() {
            item.text = text.to_string();
            return None;
        }
        let request = match self.client.build_set_text(id, text) {
            Ok(request) => request,
            Err(err) => {
                self.reject(id, err);
                return None;
            }
        };
        let previous = std::mem::replace(&mut self.items[index].text, text.to_string());
        let pending = self.begin(id, MutationKind::SetText, request);
        self.text_writes
            .entry(id)
            .or_insert_with(|| Writes::new(previous))
            .push(pending.seq, text.to_string());
        Some(pending)
    }

    pub fn complete_mutation(
        &mut self,
        pending: PendingMutation,
        result: Result<HttpResponse, NetworkError>,
    ) -> MutationOutcome {
        self.mutations_in_flight = self.mutations_in_flight.saturating_sub(1);
        let confirmed = result.and_then(|response| match pending.kind {
            MutationKind::Delete => self.client.parse_delete(response),
            MutationKind::SetCompleted | MutationKind::SetText => {
                self.client.parse_update(response).map(drop)
            }
        });
        match confirmed {
            Ok(()) => {
                debug!(id = %pending.id, kind = ?pending.kind, "remote change confirmed");
                self.settle(&pending);
                MutationOutcome::Confirmed
            }
            Err(err) => {
                warn!(id = %pending.id, kind = ?pending.kind, error = %err, "remote change failed; rolling back");
                self.revert(pending);
                self.error = Some(err);
                MutationOutcome::Reverted
            }
        }
    }

    fn begin(&mut self, id: TodoId, kind: MutationKind, request: HttpRequest) -> PendingMutation {
        let seq = self.next_mutation;
        self.next_mutation += 1;
        self.mutations_in_flight += 1;
        debug!(%id, ?kind, seq, "sending remote change");
        PendingMutation {
            id,
            kind,
            seq,
            removed: None,
            epoch: self.epoch,
            request,
        }
    }

    /// The request could not be built; nothing was applied.
    fn reject(&mut self, id: TodoId, err: NetworkError) {
        warn!(%id, error = %err, "could not encode remote change");
        self.error = Some(err);
    }

    fn settle(&mut self, pending: &PendingMutation) {
        match pending.kind {
            MutationKind::Delete => {}
            MutationKind::SetCompleted => {
                if let Some(writes) = self.completed_writes.get_mut(&pending.id) {
                    writes.confirm(pending.seq);
                    if writes.is_idle() {
                        self.completed_writes.remove(&pending.id);
                    }
                }
            }
            MutationKind::SetText => {
                if let Some(writes) = self.text_writes.get_mut(&pending.id) {
                    writes.confirm(pending.seq);
                    if writes.is_idle() {
                        self.text_writes.remove(&pending.id);
                    }
                }
            }
        }
    }

    fn revert(&mut self, pending: PendingMutation) {
        let id = pending.id;
        match pending.kind {
            MutationKind::Delete => {
                let Some(Removed { rank, item }) = pending.removed else {
                    return;
                };
                if pending.epoch != self.epoch {
                    debug!(%id, "working set was reloaded since the delete; nothing to restore");
                    return;
                }
                if self.position(id).is_some() {
                    return;
                }
                let at = self
                    .items
                    .iter()
                    .position(|other| self.ranks.get(&other.id).is_some_and(|r| *r > rank))
                    .unwrap_or(self.items.len());
                self.ranks.insert(id, rank);
                self.items.insert(at, item);
            }
            MutationKind::SetCompleted => {
                let Some(writes) = self.completed_writes.get_mut(&id) else {
                    return;
                };
                if !writes.discard(pending.seq) {
                    return;
                }
                let completed = *writes.current();
                if writes.is_idle() {
                    self.completed_writes.remove(&id);
                }
                if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    item.completed = completed;
                }
            }
            MutationKind::SetText => {
                let Some(writes) = self.text_writes.get_mut(&id) else {
                    return;
                };
                if !writes.discard(pending.seq) {
                    return;
                }
                let text = writes.current().clone();
                if writes.is_idle() {
                    self.text_writes.remove(&id);
                }
                if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    item.text = text;
                }
            }
        }
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    // --- search and pagination ---

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Advance one page unless already on the last one.
    pub fn go_to_next_page(&mut self) -> Option<PendingFetch> {
        if u64::from(self.page) >= self.total_pages() {
            return None;
        }
        self.page += 1;
        Some(self.refetch())
    }

    pub fn go_to_prev_page(&mut self) -> Option<PendingFetch> {
        if self.page <= 1 {
            return None;
        }
        self.page -= 1;
        Some(self.refetch())
    }

    /// Change the page size and return to the first page. Zero is ignored,
    /// as is a call that changes neither page nor page size.
    pub fn set_page_size(&mut self, size: u32) -> Option<PendingFetch> {
        if size == 0 {
            warn!("ignoring page size of zero");
            return None;
        }
        if size == self.page_size && self.page == 1 {
            return None;
        }
        self.page_size = size;
        self.page = 1;
        Some(self.refetch())
    }
}
