use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::route::Route;
use crate::service::SearchService;
use crate::state::{Effect, Event, RequestToken, SearchState};

struct PendingRequest {
    token: RequestToken,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl PendingRequest {
    fn abort(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Async driver for one search box.
///
/// Feeds events into [`SearchState`] and executes the effects it returns:
/// the debounce timer and the single in-flight lookup are spawned tasks
/// whose results come back through [`SearchSession::next_event`]. Dropping
/// the session aborts both.
pub struct SearchSession {
    state: SearchState,
    service: Arc<dyn SearchService>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    timer: Option<JoinHandle<()>>,
    request: Option<PendingRequest>,
}

impl SearchSession {
    pub fn new(service: Arc<dyn SearchService>, min_chars: usize, debounce: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: SearchState::new(min_chars, debounce),
            service,
            events_tx,
            events_rx,
            timer: None,
            request: None,
        }
    }

    pub fn from_config(service: Arc<dyn SearchService>, config: &SearchConfig) -> Self {
        Self::new(service, config.min_chars, config.debounce())
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Apply one event; returns the route to navigate to, if any
    pub fn dispatch(&mut self, event: Event) -> Option<Route> {
        if let Event::Response { token, .. } = &event {
            if self.request.as_ref().is_some_and(|r| r.token == *token) {
                self.request = None;
            }
        }

        let mut navigation = None;
        for effect in self.state.apply(event) {
            match effect {
                Effect::StartTimer { generation, delay } => self.start_timer(generation, delay),
                Effect::CancelTimer => self.cancel_timer(),
                Effect::Fetch { token, query } => self.fetch(token, query),
                Effect::CancelRequest { token } => self.cancel_request(token),
                Effect::Navigate(route) => {
                    info!(route = %route, "Navigating");
                    navigation = Some(route);
                }
            }
        }
        navigation
    }

    /// Next timer or response event; pass it back to [`dispatch`](Self::dispatch)
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events_rx.recv().await
    }

    /// No debounce timer pending and no request in flight
    pub fn is_idle(&self) -> bool {
        !self.state.has_pending_timer() && !self.state.is_loading()
    }

    /// Drive timer and response events until the session is idle
    pub async fn settle(&mut self) -> Option<Route> {
        while !self.is_idle() {
            let event = self.next_event().await?;
            if let Some(route) = self.dispatch(event) {
                return Some(route);
            }
        }
        None
    }

    /// Tear down: the pending timer never fires and the in-flight request is aborted
    pub fn shutdown(&mut self) {
        self.dispatch(Event::Teardown);
        self.release();
    }

    fn start_timer(&mut self, generation: u64, delay: Duration) {
        self.cancel_timer();
        let tx = self.events_tx.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Event::TimerFired { generation });
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn fetch(&mut self, token: RequestToken, query: String) {
        if let Some(previous) = self.request.take() {
            previous.abort();
        }

        debug!(token = token.id(), query = %query, endpoint = self.service.endpoint(), "Dispatching search");

        let cancel = CancellationToken::new();
        let cancelled = cancel.clone();
        let service = self.service.clone();
        let tx = self.events_tx.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    debug!(token = token.id(), "Search request cancelled");
                }
                outcome = AssertUnwindSafe(service.search(&query)).catch_unwind() => {
                    let outcome = outcome.unwrap_or_else(|_| {
                        warn!(token = token.id(), query = %query, "Search service panicked");
                        Err(SearchError::Transport("search service panicked".to_string()))
                    });
                    let _ = tx.send(Event::Response { token, outcome });
                }
            }
        });

        self.request = Some(PendingRequest {
            token,
            cancel,
            handle,
        });
    }

    fn cancel_request(&mut self, token: RequestToken) {
        if let Some(request) = self.request.take_if(|r| r.token == token) {
            request.abort();
        }
    }

    fn release(&mut self) {
        self.cancel_timer();
        if let Some(request) = self.request.take() {
            request.abort();
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.release();
    }
}
