//! One view session: a `TodoStore` wired to a `Transport`.
//!
//! Every async method runs the store operation, awaits the transport and
//! completes the effect before returning, so `&mut self` serializes calls.
//! Hosts that want overlapping requests drive `TodoStore` directly.

use todo_sync::{
    FetchOutcome, MutationOutcome, PendingFetch, PendingMutation, TodoClient, TodoId, TodoStore, TodoView,
};
use tracing::info;

use crate::config::Config;
use crate::transport::{Transport, UreqTransport};

pub struct TodoSession<T> {
    store: TodoStore,
    transport: T,
}

impl TodoSession<UreqTransport> {
    pub fn from_config(config: &Config) -> Self {
        let client = TodoClient::new(&config.base_url);
        Self::new(TodoStore::new(client, config.page_size), UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> TodoSession<T> {
    pub fn new(store: TodoStore, transport: T) -> Self {
        Self { store, transport }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    pub fn view(&self) -> TodoView<'_> {
        self.store.view()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Load the first page.
    pub async fn start(&mut self) -> FetchOutcome {
        info!(page_size = self.store.page_size(), "starting todo session");
        self.refetch().await
    }

    pub async fn refetch(&mut self) -> FetchOutcome {
        let pending = self.store.refetch();
        self.run_fetch(pending).await
    }

    pub fn add(&mut self, text: &str) -> Option<TodoId> {
        self.store.add(text)
    }

    /// `None` when nothing had to be confirmed remotely.
    pub async fn remove(&mut self, id: TodoId) -> Option<MutationOutcome> {
        let pending = self.store.remove(id)?;
        Some(self.run_mutation(pending).await)
    }

    pub async fn toggle_completed(&mut self, id: TodoId) -> Option<MutationOutcome> {
        let pending = self.store.toggle_completed(id)?;
        Some(self.run_mutation(pending).await)
    }

    pub async fn edit_text(&mut self, id: TodoId, text: &str) -> Option<MutationOutcome> {
        let pending = self.store.edit_text(id, text)?;
        Some(self.run_mutation(pending).await)
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.store.set_search_term(term);
    }

    /// `None` when already on the last page.
    pub async fn go_to_next_page(&mut self) -> Option<FetchOutcome> {
        let pending = self.store.go_to_next_page()?;
        Some(self.run_fetch(pending).await)
    }

    pub async fn go_to_prev_page(&mut self) -> Option<FetchOutcome> {
        let pending = self.store.go_to_prev_page()?;
        Some(self.run_fetch(pending).await)
    }

    pub async fn set_page_size(&mut self, size: u32) -> Option<FetchOutcome> {
        let pending = self.store.set_page_size(size)?;
        Some(self.run_fetch(pending).await)
    }

    async fn run_fetch(&mut self, pending: PendingFetch) -> FetchOutcome {
        let result = self.transport.execute(pending.request().clone()).await;
        self.store.complete_fetch(pending, result)
    }

    async fn run_mutation(&mut self, pending: PendingMutation) -> MutationOutcome {
        let result = self.transport.execute(pending.request().clone()).await;
        self.store.complete_mutation(pending, result)
    }
}
