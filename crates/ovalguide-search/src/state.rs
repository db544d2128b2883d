use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::SearchError;
use crate::route::{resolve_submit, Route};
use crate::types::SearchHit;

/// Identity of one issued lookup; a response is applied only while its
/// token is still the in-flight one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Keys the search box reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Down,
    Up,
    Enter,
    Escape,
}

/// Everything that can happen to the search box
#[derive(Debug, Clone)]
pub enum Event {
    /// New raw input value (every keystroke)
    Input(String),
    /// Debounce timer elapsed
    TimerFired { generation: u64 },
    /// Search Service answered (or failed) for `token`
    Response {
        token: RequestToken,
        outcome: Result<Vec<SearchHit>, SearchError>,
    },
    Key(Key),
    /// Explicit submit (search button)
    Submit,
    /// Pointer selection of the hit at this index
    Select(usize),
    /// Pointer moved over the hit at this index
    Hover(usize),
    Focus,
    /// Focus left the box (outside click)
    Blur,
    Teardown,
}

/// Side effects requested by the reducer, executed by the session
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start the debounce timer, replacing any pending one
    StartTimer { generation: u64, delay: Duration },
    CancelTimer,
    Fetch { token: RequestToken, query: String },
    CancelRequest { token: RequestToken },
    Navigate(Route),
}

#[derive(Debug, Clone)]
struct InFlight {
    token: RequestToken,
    query: String,
}

/// Search box state machine.
///
/// `apply` is pure apart from logging: timers and network calls only
/// happen through the returned [`Effect`]s. At most one request is in
/// flight; issuing a new one always cancels the previous.
#[derive(Debug)]
pub struct SearchState {
    min_chars: usize,
    debounce: Duration,
    query: String,
    debounced: String,
    cache: HashMap<String, Vec<SearchHit>>,
    in_flight: Option<InFlight>,
    results: Vec<SearchHit>,
    active_index: Option<usize>,
    open: bool,
    timer_generation: u64,
    timer_pending: bool,
    next_token: u64,
}

impl SearchState {
    pub fn new(min_chars: usize, debounce: Duration) -> Self {
        Self {
            min_chars: min_chars.max(1),
            debounce,
            query: String::new(),
            debounced: String::new(),
            cache: HashMap::new(),
            in_flight: None,
            results: Vec::new(),
            active_index: None,
            open: false,
            timer_generation: 0,
            timer_pending: false,
            next_token: 0,
        }
    }

    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Input(text) => {
                self.query = text;
                self.timer_generation += 1;
                self.timer_pending = true;
                vec![Effect::StartTimer {
                    generation: self.timer_generation,
                    delay: self.debounce,
                }]
            }
            Event::TimerFired { generation } => {
                if !self.timer_pending || generation != self.timer_generation {
                    debug!(generation, current = self.timer_generation, "Ignoring stale timer");
                    return Vec::new();
                }
                self.timer_pending = false;
                self.debounced = self.query.trim().to_string();
                self.lookup()
            }
            Event::Response { token, outcome } => self.receive(token, outcome),
            Event::Key(key) => self.on_key(key),
            Event::Submit => self.submit(),
            Event::Select(index) => match self.results.get(index) {
                Some(hit) => {
                    let route = Route::for_hit(hit);
                    self.active_index = Some(index);
                    self.open = false;
                    vec![Effect::Navigate(route)]
                }
                None => Vec::new(),
            },
            Event::Hover(index) => {
                if index < self.results.len() {
                    self.active_index = Some(index);
                }
                Vec::new()
            }
            Event::Focus => {
                if !self.results.is_empty() {
                    self.open = true;
                }
                Vec::new()
            }
            Event::Blur => {
                self.open = false;
                Vec::new()
            }
            Event::Teardown => {
                let mut effects = Vec::new();
                if self.timer_pending {
                    self.timer_pending = false;
                    effects.push(Effect::CancelTimer);
                }
                effects.extend(self.cancel_in_flight());
                effects
            }
        }
    }

    /// Settled query -> threshold check, cache, or a fresh request.
    /// A request already in flight for the same text is kept.
    fn lookup(&mut self) -> Vec<Effect> {
        let query = self.debounced.clone();

        if let Some(ref f) = self.in_flight {
            if f.query == query {
                debug!(token = f.token.id(), query = %query, "Request for settled query already in flight");
                return Vec::new();
            }
        }

        let mut effects = self.cancel_in_flight();

        if query.chars().count() < self.min_chars {
            self.results.clear();
            self.active_index = None;
            self.open = false;
            return effects;
        }

        if let Some(hits) = self.cache.get(&query).cloned() {
            debug!(query = %query, hits = hits.len(), "Search served from cache");
            self.show(hits);
            return effects;
        }

        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.in_flight = Some(InFlight {
            token,
            query: query.clone(),
        });
        effects.push(Effect::Fetch { token, query });
        effects
    }

    fn receive(
        &mut self,
        token: RequestToken,
        outcome: Result<Vec<SearchHit>, SearchError>,
    ) -> Vec<Effect> {
        let Some(in_flight) = self.in_flight.take_if(|f| f.token == token) else {
            debug!(token = token.id(), "Dropping response for superseded request");
            return Vec::new();
        };

        match outcome {
            Ok(hits) => {
                self.cache.insert(in_flight.query, hits.clone());
                self.show(hits);
            }
            Err(e) => {
                warn!(query = %in_flight.query, error = %e, "Search lookup failed");
                self.results.clear();
                self.active_index = None;
                self.open = false;
            }
        }
        Vec::new()
    }

    fn on_key(&mut self, key: Key) -> Vec<Effect> {
        let len = self.results.len();
        let navigable = self.open && len > 0;

        match key {
            Key::Down if navigable => {
                self.active_index = Some(match self.active_index {
                    Some(i) => (i + 1) % len,
                    None => 0,
                });
                Vec::new()
            }
            Key::Up if navigable => {
                self.active_index = Some(match self.active_index {
                    Some(i) => (i + len - 1) % len,
                    None => len - 1,
                });
                Vec::new()
            }
            Key::Enter if navigable => {
                let index = self.active_index.filter(|i| *i < len).unwrap_or(0);
                let route = Route::for_hit(&self.results[index]);
                self.open = false;
                vec![Effect::Navigate(route)]
            }
            Key::Enter => self.submit(),
            Key::Escape => {
                self.open = false;
                Vec::new()
            }
            Key::Down | Key::Up => Vec::new(),
        }
    }

    fn submit(&mut self) -> Vec<Effect> {
        let route = resolve_submit(&self.query, self.active_hit(), self.min_chars);
        self.open = false;
        route.map(Effect::Navigate).into_iter().collect()
    }

    fn show(&mut self, hits: Vec<SearchHit>) {
        self.active_index = if hits.is_empty() { None } else { Some(0) };
        self.results = hits;
        self.open = true;
    }

    fn cancel_in_flight(&mut self) -> Vec<Effect> {
        match self.in_flight.take() {
            Some(f) => {
                debug!(token = f.token.id(), query = %f.query, "Cancelling superseded request");
                vec![Effect::CancelRequest { token: f.token }]
            }
            None => Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn debounced(&self) -> &str {
        &self.debounced
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    /// `None` means no selection
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Hit Enter/Submit would open: the highlighted one, else the first
    pub fn active_hit(&self) -> Option<&SearchHit> {
        self.active_index
            .and_then(|i| self.results.get(i))
            .or_else(|| self.results.first())
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn has_pending_timer(&self) -> bool {
        self.timer_pending
    }

    pub fn in_flight_token(&self) -> Option<RequestToken> {
        self.in_flight.as_ref().map(|f| f.token)
    }

    pub fn cached(&self, query: &str) -> Option<&[SearchHit]> {
        self.cache.get(query).map(Vec::as_slice)
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }
}
