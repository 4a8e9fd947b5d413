//! Identifier allocation for locally created todos.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::TodoId;

/// Monotonic allocator for local todo ids.
///
/// Seeded from wall-clock milliseconds so ids look like the timestamps the
/// service's own clients use, then incremented per allocation. Every remote
/// id the store loads is reported through [`observe`](Self::observe), which
/// keeps the next local id strictly above it.
#[derive(Debug, Clone)]
pub struct LocalIds {
    next: u64,
}

impl LocalIds {
    pub fn new() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX / 2))
            .unwrap_or(0);
        Self::starting_at(millis)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    pub fn allocate(&mut self) -> TodoId {
        let id = TodoId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    pub fn observe(&mut self, id: TodoId) {
        if id.0 >= self.next {
            self.next = id.0.saturating_add(1);
        }
    }
}

impl Default for LocalIds {
    fn default() -> Self {
        Self::new()
    }
}
