use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::catalog::FilterCatalog;
use crate::client::{CandidateSource, FetchError};
use crate::models::{Candidate, CandidatePage};
use crate::pagination::{self, PaginationMode};
use crate::query::{self, OutboundQuery};
use crate::selection::Selection;
use crate::state::{ListingState, QueryState};

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("An error occurred while fetching candidates.")]
    Unknown,
}

#[derive(Debug, Clone, Default)]
pub enum RetrievalResult {
    #[default]
    Loading,
    Error {
        message: String,
    },
    Success {
        candidates: Vec<Candidate>,
    },
}

/// Identifies one triggered fetch. Later tickets supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Result<CandidatePage, RetrievalError>,
}

#[derive(Debug, Clone)]
struct Snapshot {
    selection: Selection,
    query: QueryState,
}

pub struct RetrievalController<S: CandidateSource> {
    source: Arc<S>,
    catalog: FilterCatalog,
    mode: PaginationMode,
    last_seen: Option<Snapshot>,
    generation: u64,
    in_flight: Option<AbortHandle>,
    result: RetrievalResult,
    total: usize,
}

impl<S: CandidateSource> RetrievalController<S> {
    pub fn new(source: S, catalog: FilterCatalog, mode: PaginationMode) -> Self {
        Self {
            source: Arc::new(source),
            catalog,
            mode,
            last_seen: None,
            generation: 0,
            in_flight: None,
            result: RetrievalResult::Loading,
            total: 0,
        }
    }

    pub fn base_url(&self) -> &str {
        self.source.base_url()
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    pub fn result(&self) -> &RetrievalResult {
        &self.result
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.result, RetrievalResult::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.result {
            RetrievalResult::Error { message } => Some(message),
            _ => None,
        }
    }

    /// The last response's candidates; empty while loading or after an error.
    pub fn candidates(&self) -> &[Candidate] {
        match &self.result {
            RetrievalResult::Success { candidates } => candidates,
            _ => &[],
        }
    }

    /// Last known total match count. Survives a reload, zeroed by an error.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self, page_size: usize) -> usize {
        pagination::total_pages(self.total, page_size)
    }

    /// The rows to show for the current page.
    pub fn visible(&self, query: &QueryState) -> &[Candidate] {
        match self.mode {
            PaginationMode::Server => self.candidates(),
            PaginationMode::Client => {
                pagination::page_slice(self.candidates(), query.page, query.page_size)
            }
        }
    }

    pub fn outbound(&self, listing: &ListingState) -> OutboundQuery {
        query::synthesize(listing.selection(), listing.query(), &self.catalog, self.mode)
    }

    /// Decides whether the given state needs a request, remembering it either
    /// way. A full-text toggle with an empty search box is the one change that
    /// is absorbed without a request (see `query::is_inert_full_text_toggle`).
    fn should_fetch(&mut self, listing: &ListingState) -> bool {
        let next = listing.query();
        let skip = self.last_seen.as_ref().is_some_and(|prev| {
            query::is_inert_full_text_toggle(
                &prev.query.search_text,
                prev.query.full_text_search,
                &next.search_text,
                next.full_text_search,
            ) && prev.selection == *listing.selection()
                && prev.query.sort == next.sort
                && (self.mode == PaginationMode::Client || prev.query.page == next.page)
        });

        if skip {
            if let Some(prev) = self.last_seen.as_mut() {
                prev.query.full_text_search = next.full_text_search;
            }
            debug!("full-text toggle with empty search, not fetching");
            return false;
        }

        self.last_seen = Some(Snapshot {
            selection: listing.selection().clone(),
            query: next.clone(),
        });
        true
    }

    fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.result = RetrievalResult::Loading;
        Ticket(self.generation)
    }

    /// Records a fetch outcome. Outcomes from superseded tickets are dropped;
    /// returns whether this one was applied.
    pub fn apply(&mut self, ticket: Ticket, outcome: Result<CandidatePage, RetrievalError>) -> bool {
        if ticket != Ticket(self.generation) {
            debug!(ticket = ticket.0, current = self.generation, "dropping stale response");
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(page) => {
                info!(count = page.candidates.len(), total = page.total, "candidates loaded");
                self.total = page.total;
                self.result = RetrievalResult::Success {
                    candidates: page.candidates,
                };
            }
            Err(err) => {
                warn!(error = %err, "candidate fetch failed");
                self.total = 0;
                self.result = RetrievalResult::Error {
                    message: err.to_string(),
                };
            }
        }
        true
    }

    /// Fetches inline and applies the result. Returns false when the change
    /// did not warrant a request.
    pub async fn refresh(&mut self, listing: &ListingState) -> bool {
        if !self.should_fetch(listing) {
            return false;
        }
        let ticket = self.begin();
        let outbound = self.outbound(listing);
        debug!(ticket = ticket.0, ?outbound, "fetching candidates");
        let outcome = self.source.fetch(&outbound).await.map_err(RetrievalError::from);
        self.apply(ticket, outcome);
        true
    }

    /// Starts a background fetch whose completion is delivered on `tx`.
    /// Any fetch still in flight is cancelled.
    pub fn spawn_refresh(
        &mut self,
        listing: &ListingState,
        tx: UnboundedSender<Completion>,
    ) -> Option<Ticket> {
        if !self.should_fetch(listing) {
            return None;
        }
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        let ticket = self.begin();
        let outbound = self.outbound(listing);
        debug!(ticket = ticket.0, ?outbound, "fetching candidates");

        let source = Arc::clone(&self.source);
        let fetch = tokio::spawn(async move { source.fetch(&outbound).await });
        self.in_flight = Some(fetch.abort_handle());

        tokio::spawn(async move {
            let outcome = match fetch.await {
                Ok(result) => result.map_err(RetrievalError::from),
                Err(err) if err.is_cancelled() => return,
                Err(_) => Err(RetrievalError::Unknown),
            };
            let _ = tx.send(Completion { ticket, outcome });
        });

        Some(ticket)
    }

    /// Forgets the remembered state so the next trigger always fetches.
    pub fn invalidate(&mut self) {
        self.last_seen = None;
    }
}
