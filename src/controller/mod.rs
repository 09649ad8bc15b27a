//! Incremental list controller
//!
//! Client half of the listing protocol: drives an infinite-scroll screen by
//! repeatedly fetching pages, accumulating results, tracking exhaustion and
//! coalescing rapid search input. One controller per screen instance.
//!
//! At most one fetch owns the in-flight gate at a time. Scroll triggers that
//! arrive while a fetch is pending are dropped, not queued; a committed
//! search or a mutation refresh instead *supersedes* the in-flight fetch by
//! bumping the reset generation, so a stale result resolving later is
//! rejected rather than merged.

pub mod events;
pub mod state;

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub use events::{ListEvent, ListEventSubscriber, ListEvents};
pub use state::ListSnapshot;

use crate::domain::ListResult;
use crate::shared::{PageRequest, PageResult, DEFAULT_LIMIT};
use state::ListState;

/// The logical list endpoint the controller fetches from. Over the wire this
/// is the paginated REST route; in-process it is [`crate::engine::ListEndpoint`].
#[async_trait]
pub trait ListClient<T>: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> ListResult<PageResult<T>>;
}

/// What happened to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was fetched and applied to the accumulated list.
    Applied { appended: usize },
    /// The trigger was dropped: a fetch was already pending, the listing was
    /// exhausted, or a later keystroke superseded this one.
    Skipped,
    /// The fetch resolved after a reset superseded it; its result was
    /// discarded.
    Stale,
    /// The fetch failed; accumulated state is unchanged and an error event
    /// was published.
    Failed,
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Fixed page size used for every fetch.
    pub page_size: u32,
    /// Quiet interval a search value must survive before it commits.
    pub debounce: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_LIMIT,
            debounce: Duration::from_millis(300),
        }
    }
}

pub struct ListController<T, C> {
    client: C,
    state: Mutex<ListState<T>>,
    events: ListEvents,
    config: ControllerConfig,
}

impl<T, C> ListController<T, C>
where
    T: Clone + Send + 'static,
    C: ListClient<T>,
{
    pub fn new(client: C) -> Self {
        Self::with_config(client, ControllerConfig::default())
    }

    pub fn with_config(client: C, config: ControllerConfig) -> Self {
        Self {
            client,
            state: Mutex::new(ListState::new()),
            events: ListEvents::new(),
            config,
        }
    }

    /// Subscribe to controller events (for toasts, skeletons, logging).
    pub fn subscribe(&self) -> ListEventSubscriber {
        self.events.subscribe()
    }

    /// Fetch the next page. Dropped (not queued) if a fetch is already in
    /// flight or the listing is exhausted; the next user action re-triggers.
    pub async fn fetch_next(&self) -> FetchOutcome {
        let (ticket, generation, page, query) = {
            let mut state = self.state.lock().await;
            if state.pending() {
                debug!("fetch_next dropped, request already in flight");
                return FetchOutcome::Skipped;
            }
            if state.exhausted {
                debug!("fetch_next dropped, listing exhausted");
                return FetchOutcome::Skipped;
            }
            let ticket = state.issue_ticket();
            (ticket, state.generation, state.next_page, state.query.clone())
        };
        self.run_fetch(ticket, generation, page, query).await
    }

    /// Record a search keystroke. The value only commits after the quiet
    /// interval passes without a newer keystroke; intermediate values are
    /// dropped. A committed search resets the list and fetches page 1,
    /// superseding any fetch still in flight.
    pub async fn set_query(&self, query: impl Into<String>) -> FetchOutcome {
        let query = query.into();
        let seq = {
            let mut state = self.state.lock().await;
            state.debounce_seq += 1;
            state.debounce_seq
        };

        tokio::time::sleep(self.config.debounce).await;

        let (ticket, generation) = {
            let mut state = self.state.lock().await;
            if state.debounce_seq != seq {
                return FetchOutcome::Skipped;
            }
            state.reset(query.clone());
            let ticket = state.issue_ticket();
            self.events.publish(ListEvent::Reset {
                query: query.clone(),
            });
            (ticket, state.generation)
        };
        self.run_fetch(ticket, generation, 1, query).await
    }

    /// Full refresh after a mutation (archive/restore/delete): back to page 1
    /// with the current query, so totals and ordering reflect the server.
    pub async fn refresh(&self) -> FetchOutcome {
        let (ticket, generation, query) = {
            let mut state = self.state.lock().await;
            let query = state.query.clone();
            state.reset(query.clone());
            let ticket = state.issue_ticket();
            self.events.publish(ListEvent::Reset {
                query: query.clone(),
            });
            (ticket, state.generation, query)
        };
        self.run_fetch(ticket, generation, 1, query).await
    }

    pub async fn snapshot(&self) -> ListSnapshot<T> {
        let state = self.state.lock().await;
        ListSnapshot {
            items: state.items.clone(),
            pending: state.pending(),
            exhausted: state.exhausted,
            query: state.query.clone(),
        }
    }

    pub async fn accumulated(&self) -> Vec<T> {
        self.state.lock().await.items.clone()
    }

    pub async fn pending(&self) -> bool {
        self.state.lock().await.pending()
    }

    pub async fn exhausted(&self) -> bool {
        self.state.lock().await.exhausted
    }

    async fn run_fetch(
        &self,
        ticket: u64,
        generation: u64,
        page: u32,
        query: String,
    ) -> FetchOutcome {
        let mut request = PageRequest::new(page, self.config.page_size);
        if !query.is_empty() {
            request = request.filter("search", query.as_str());
        }
        debug!(page, query = %query, "fetching page");

        let result = self.client.fetch_page(request).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            warn!(page, query = %query, "stale page result discarded");
            if state.inflight == Some(ticket) {
                state.inflight = None;
            }
            return FetchOutcome::Stale;
        }
        if state.inflight == Some(ticket) {
            state.inflight = None;
        }

        match result {
            Ok(result) => {
                let appended = result.items.len();
                if page == 1 {
                    state.items = result.items;
                } else {
                    state.items.extend(result.items);
                }
                state.next_page = page + 1;
                state.exhausted = page >= result.total_pages;
                debug!(
                    accumulated = state.items.len(),
                    exhausted = state.exhausted,
                    "page applied"
                );
                self.events.publish(ListEvent::Loaded {
                    page,
                    appended,
                    total: result.total,
                    exhausted: state.exhausted,
                });
                FetchOutcome::Applied { appended }
            }
            Err(e) => {
                warn!(error = %e, page, "list fetch failed");
                self.events.publish(ListEvent::Error {
                    message: e.to_string(),
                });
                FetchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio::sync::Notify;

    use crate::domain::ListError;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: usize,
        tag: String,
    }

    fn rows(tag: &str, range: std::ops::Range<usize>) -> Vec<Row> {
        range
            .map(|id| Row {
                id,
                tag: tag.to_string(),
            })
            .collect()
    }

    fn query_of(request: &PageRequest) -> String {
        request
            .filters
            .iter()
            .find(|(field, _)| *field == "search")
            .and_then(|(_, value)| match value {
                crate::shared::FieldValue::Text(q) => Some(q.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Serves `total` rows tagged with the query, with an optional blocking
    /// gate armed for one specific call ordinal.
    struct FakeEndpoint {
        total: u64,
        calls: AtomicUsize,
        last_query: std::sync::Mutex<String>,
        block_call: Option<usize>,
        gate: Arc<Notify>,
    }

    impl FakeEndpoint {
        fn new(total: u64) -> Self {
            Self {
                total,
                calls: AtomicUsize::new(0),
                last_query: std::sync::Mutex::new(String::new()),
                block_call: None,
                gate: Arc::new(Notify::new()),
            }
        }

        fn blocking_on_call(total: u64, ordinal: usize) -> Self {
            Self {
                block_call: Some(ordinal),
                ..Self::new(total)
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ListClient<Row> for Arc<FakeEndpoint> {
        async fn fetch_page(&self, request: PageRequest) -> ListResult<PageResult<Row>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let query = query_of(&request);
            *self.last_query.lock().unwrap() = query.clone();

            if self.block_call == Some(call) {
                self.gate.notified().await;
            }

            let start = request.skip() as usize;
            let end = (start + request.limit as usize).min(self.total as usize);
            let items = if start >= end {
                Vec::new()
            } else {
                rows(&query, start..end)
            };
            Ok(PageResult::new(items, self.total, request.page, request.limit))
        }
    }

    /// Always fails with a transient error.
    struct BrokenEndpoint;

    #[async_trait]
    impl ListClient<Row> for BrokenEndpoint {
        async fn fetch_page(&self, _request: PageRequest) -> ListResult<PageResult<Row>> {
            Err(ListError::transient("connection reset by peer"))
        }
    }

    fn controller_with(
        endpoint: Arc<FakeEndpoint>,
        debounce_ms: u64,
    ) -> ListController<Row, Arc<FakeEndpoint>> {
        ListController::with_config(
            endpoint,
            ControllerConfig {
                page_size: 10,
                debounce: Duration::from_millis(debounce_ms),
            },
        )
    }

    #[tokio::test]
    async fn accumulates_pages_until_exhausted() {
        let endpoint = Arc::new(FakeEndpoint::new(25));
        let controller = controller_with(endpoint.clone(), 300);

        assert_eq!(controller.fetch_next().await, FetchOutcome::Applied { appended: 10 });
        assert_eq!(controller.accumulated().await.len(), 10);
        assert!(!controller.exhausted().await);

        assert_eq!(controller.fetch_next().await, FetchOutcome::Applied { appended: 10 });
        assert_eq!(controller.accumulated().await.len(), 20);
        assert!(!controller.exhausted().await);

        assert_eq!(controller.fetch_next().await, FetchOutcome::Applied { appended: 5 });
        assert_eq!(controller.accumulated().await.len(), 25);
        assert!(controller.exhausted().await);

        // Exhausted listings drop further triggers without a request.
        assert_eq!(controller.fetch_next().await, FetchOutcome::Skipped);
        assert_eq!(endpoint.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_triggers_while_pending_issue_one_request() {
        // Arm the gate on the first call so the fetch stays in flight.
        let endpoint = Arc::new(FakeEndpoint::blocking_on_call(25, 1));
        let controller = Arc::new(controller_with(endpoint.clone(), 300));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.fetch_next().await })
        };
        // Let the first trigger take the gate.
        tokio::task::yield_now().await;
        assert!(controller.pending().await);

        assert_eq!(controller.fetch_next().await, FetchOutcome::Skipped);
        assert_eq!(controller.fetch_next().await, FetchOutcome::Skipped);

        endpoint.gate.notify_one();
        assert_eq!(first.await.unwrap(), FetchOutcome::Applied { appended: 10 });
        assert_eq!(endpoint.calls(), 1);
        assert!(!controller.pending().await);
    }

    #[tokio::test(start_paused = true)]
    async fn five_keystrokes_in_the_quiet_interval_fetch_once() {
        let endpoint = Arc::new(FakeEndpoint::new(25));
        let controller = controller_with(endpoint.clone(), 300);

        let outcomes = tokio::join!(
            controller.set_query("r"),
            controller.set_query("ru"),
            controller.set_query("rus"),
            controller.set_query("rust"),
            controller.set_query("rust!"),
        );

        assert_eq!(
            outcomes,
            (
                FetchOutcome::Skipped,
                FetchOutcome::Skipped,
                FetchOutcome::Skipped,
                FetchOutcome::Skipped,
                FetchOutcome::Applied { appended: 10 },
            )
        );
        assert_eq!(endpoint.calls(), 1);
        assert_eq!(*endpoint.last_query.lock().unwrap(), "rust!");
        assert_eq!(controller.snapshot().await.query, "rust!");
    }

    #[tokio::test(start_paused = true)]
    async fn stale_in_flight_result_is_discarded_after_new_search() {
        // Calls 1 and 2 load pages normally, call 3 blocks (the in-flight
        // fetch for the old query), call 4 serves the new search.
        let endpoint = Arc::new(FakeEndpoint::blocking_on_call(25, 3));
        let controller = Arc::new(controller_with(endpoint.clone(), 10));

        controller.fetch_next().await;
        controller.fetch_next().await;
        assert_eq!(controller.accumulated().await.len(), 20);

        let slow = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.fetch_next().await })
        };
        tokio::task::yield_now().await;
        assert!(controller.pending().await);

        assert_eq!(
            controller.set_query("beta").await,
            FetchOutcome::Applied { appended: 10 }
        );
        let after_search = controller.accumulated().await;
        assert_eq!(after_search.len(), 10);
        assert!(after_search.iter().all(|row| row.tag == "beta"));

        // The old page-3 fetch resolves late and must not merge in.
        endpoint.gate.notify_one();
        assert_eq!(slow.await.unwrap(), FetchOutcome::Stale);

        let final_items = controller.accumulated().await;
        assert_eq!(final_items.len(), 10);
        assert!(final_items.iter().all(|row| row.tag == "beta"));
        assert_eq!(controller.snapshot().await.query, "beta");
        assert!(!controller.pending().await);
    }

    #[tokio::test]
    async fn refresh_resets_to_page_one_with_current_query() {
        let endpoint = Arc::new(FakeEndpoint::new(25));
        let controller = controller_with(endpoint.clone(), 0);

        controller.set_query("rust").await;
        controller.fetch_next().await;
        assert_eq!(controller.accumulated().await.len(), 20);

        assert_eq!(
            controller.refresh().await,
            FetchOutcome::Applied { appended: 10 }
        );
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.items.len(), 10);
        assert_eq!(snapshot.query, "rust");
        assert_eq!(*endpoint.last_query.lock().unwrap(), "rust");
    }

    #[tokio::test]
    async fn failed_fetch_leaves_state_untouched_and_emits_error() {
        let controller: ListController<Row, _> = ListController::new(BrokenEndpoint);
        let mut events = controller.subscribe();

        assert_eq!(controller.fetch_next().await, FetchOutcome::Failed);

        let snapshot = controller.snapshot().await;
        assert!(snapshot.items.is_empty());
        assert!(!snapshot.pending);
        assert!(!snapshot.exhausted);

        match events.recv().await {
            Some(ListEvent::Error { message }) => {
                assert!(message.contains("connection reset"));
            }
            other => panic!("expected error event, got {other:?}"),
        }

        // The same trigger works again once the backend recovers.
        assert_eq!(controller.fetch_next().await, FetchOutcome::Failed);
    }

    #[tokio::test]
    async fn loaded_events_track_pagination_progress() {
        let endpoint = Arc::new(FakeEndpoint::new(15));
        let controller = controller_with(endpoint, 300);
        let mut events = controller.subscribe();

        controller.fetch_next().await;
        controller.fetch_next().await;

        match events.recv().await {
            Some(ListEvent::Loaded { page: 1, appended: 10, total: 15, exhausted: false }) => {}
            other => panic!("unexpected first event: {other:?}"),
        }
        match events.recv().await {
            Some(ListEvent::Loaded { page: 2, appended: 5, total: 15, exhausted: true }) => {}
            other => panic!("unexpected second event: {other:?}"),
        }
    }
}
