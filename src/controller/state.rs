//! Controller-owned list state
//!
//! One instance per mounted screen; never shared between screens and never
//! persisted.

#[derive(Debug)]
pub(crate) struct ListState<T> {
    pub items: Vec<T>,
    pub next_page: u32,
    pub exhausted: bool,
    /// Ticket of the fetch currently owning the in-flight gate.
    pub inflight: Option<u64>,
    pub query: String,
    /// Bumped on every reset; a resolving fetch carrying an older value is
    /// stale and its result is rejected.
    pub generation: u64,
    /// Last keystroke wins: only the debounce holder with the latest
    /// sequence number commits.
    pub debounce_seq: u64,
    next_ticket: u64,
}

impl<T> ListState<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_page: 1,
            exhausted: false,
            inflight: None,
            query: String::new(),
            generation: 0,
            debounce_seq: 0,
            next_ticket: 0,
        }
    }

    pub fn pending(&self) -> bool {
        self.inflight.is_some()
    }

    /// Issue a ticket for a new outbound request, taking over the gate even
    /// if an older (now superseded) fetch is still in flight.
    pub fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.inflight = Some(self.next_ticket);
        self.next_ticket
    }

    /// Clear accumulated results ahead of a page-1 fetch for `query`.
    pub fn reset(&mut self, query: String) {
        self.items.clear();
        self.next_page = 1;
        self.exhausted = false;
        self.query = query;
        self.generation += 1;
    }
}

/// Read-only view of the state for the UI shell.
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub pending: bool,
    pub exhausted: bool,
    pub query: String,
}
