//! Continuation crawler - walks the paginated `allimages` listing
//!
//! The crawl is an explicit state machine rather than recursion, so very long
//! listings use constant stack. Each call to [`ContinuationCrawler::next_record`]
//! drains the records of the current page first and only touches the network
//! once the buffer is empty. A cancelled token drops whatever is still
//! buffered and ends the crawl.
//!
//! 1. Wait out the pending backoff delay (if any)
//! 2. Fetch the page for the current cursor
//!    - `NoData` or an empty body ends the crawl quietly
//! 3. Parse it; a malformed page ends the crawl with an error
//! 4. Buffer its records
//! 5. No cursor → finished; otherwise derive the next delay and seed

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, Stream};
use tokio_util::sync::CancellationToken;

use super::backoff::Backoff;
use crate::api::{parse_listing, Endpoint, ImageRecord};
use crate::transport::{FetchResult, Transport};
use crate::CrawlError;

/// Position of a crawl in the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlState {
    /// `aifrom` value of the next page to fetch
    pub cursor: String,

    /// Seed the next backoff delay is derived from
    pub backoff_seed: u32,
}

impl CrawlState {
    pub fn new(cursor: impl Into<String>, backoff_seed: u32) -> Self {
        Self {
            cursor: cursor.into(),
            backoff_seed,
        }
    }
}

/// Counters for one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages successfully fetched and parsed
    pub pages_fetched: u64,

    /// Records handed to the caller
    pub records_yielded: u64,

    /// Backoff waits that ran to completion
    pub delays_waited: u64,

    /// Sum of those waits
    pub total_delay: Duration,

    /// The crawl stopped because the transport returned no data
    pub ended_without_data: bool,
}

#[derive(Debug)]
enum Phase {
    /// A page still has to be fetched, after `delay` if set
    Fetch {
        state: CrawlState,
        delay: Option<Duration>,
    },

    /// No more pages; only buffered records remain
    Finished,
}

/// Lazy, order-preserving stream of every image in the listing
pub struct ContinuationCrawler {
    transport: Arc<dyn Transport>,
    endpoint: Endpoint,
    backoff: Backoff,
    cancel: CancellationToken,
    phase: Phase,
    buffer: VecDeque<ImageRecord>,
    stats: CrawlStats,
}

impl ContinuationCrawler {
    /// Creates a crawler starting at `start_cursor` with the backoff's initial seed
    ///
    /// Nothing is fetched until the first record is requested.
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: Endpoint,
        backoff: Backoff,
        start_cursor: &str,
    ) -> Self {
        let state = CrawlState::new(start_cursor, backoff.initial_seed());

        Self {
            transport,
            endpoint,
            backoff,
            cancel: CancellationToken::new(),
            phase: Phase::Fetch { state, delay: None },
            buffer: VecDeque::new(),
            stats: CrawlStats::default(),
        }
    }

    /// Attaches a cancellation token
    ///
    /// The token is checked before every record is handed out and every
    /// fetch, and raced against every backoff wait.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// State of the next fetch, or `None` once the listing is exhausted
    pub fn state(&self) -> Option<&CrawlState> {
        match &self.phase {
            Phase::Fetch { state, .. } => Some(state),
            Phase::Finished => None,
        }
    }

    /// Returns the next record in listing order
    ///
    /// # Returns
    ///
    /// * `Ok(Some(record))` - The next image
    /// * `Ok(None)` - The listing is exhausted, or the transport gave up
    /// * `Err(CrawlError::MalformedResponse)` - A page could not be parsed
    /// * `Err(CrawlError::Cancelled)` - The token was cancelled
    ///
    /// After an error the crawler is finished and keeps returning `Ok(None)`.
    pub async fn next_record(&mut self) -> Result<Option<ImageRecord>, CrawlError> {
        loop {
            let exhausted = matches!(self.phase, Phase::Finished) && self.buffer.is_empty();
            if self.cancel.is_cancelled() && !exhausted {
                tracing::info!(
                    "Crawl cancelled with {} buffered records left",
                    self.buffer.len()
                );
                self.buffer.clear();
                self.phase = Phase::Finished;
                return Err(CrawlError::Cancelled);
            }

            if let Some(record) = self.buffer.pop_front() {
                self.stats.records_yielded += 1;
                return Ok(Some(record));
            }

            let (state, delay) = match std::mem::replace(&mut self.phase, Phase::Finished) {
                Phase::Fetch { state, delay } => (state, delay),
                Phase::Finished => return Ok(None),
            };

            if let Some(delay) = delay {
                self.wait(delay).await?;
            }

            self.fetch_page(state).await?;
        }
    }

    /// Turns the crawler into a [`Stream`] of records
    ///
    /// The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<ImageRecord, CrawlError>> {
        stream::try_unfold(self, |mut crawler| async move {
            Ok(crawler
                .next_record()
                .await?
                .map(|record| (record, crawler)))
        })
    }

    /// Drains the whole listing into memory
    pub async fn collect_all(mut self) -> Result<Vec<ImageRecord>, CrawlError> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record().await? {
            records.push(record);
        }
        Ok(records)
    }

    async fn wait(&mut self, delay: Duration) -> Result<(), CrawlError> {
        tracing::info!("Waiting {:?} before the next page", delay);

        tokio::select! {
            _ = self.cancel.cancelled() => {
                tracing::info!("Crawl cancelled during backoff");
                Err(CrawlError::Cancelled)
            }
            _ = tokio::time::sleep(delay) => {
                self.stats.delays_waited += 1;
                self.stats.total_delay += delay;
                Ok(())
            }
        }
    }

    /// Fetches and parses the page at `state.cursor`, leaving the phase set
    /// for whatever comes next
    async fn fetch_page(&mut self, state: CrawlState) -> Result<(), CrawlError> {
        if self.cancel.is_cancelled() {
            tracing::info!("Crawl cancelled before fetching cursor {:?}", state.cursor);
            return Err(CrawlError::Cancelled);
        }

        let url = self.endpoint.all_images_url(&state.cursor);
        tracing::debug!("Fetching listing page: {}", url);

        let body = match self.transport.get_text(&url).await {
            FetchResult::Body(body) if !body.trim().is_empty() => body,
            FetchResult::Body(_) => {
                tracing::info!("Empty response for cursor {:?}, ending crawl", state.cursor);
                self.stats.ended_without_data = true;
                return Ok(());
            }
            FetchResult::NoData { reason } => {
                tracing::info!(
                    "No data for cursor {:?} ({}), ending crawl",
                    state.cursor,
                    reason
                );
                self.stats.ended_without_data = true;
                return Ok(());
            }
        };

        let page = parse_listing(&body, self.endpoint.api_url()).map_err(|message| {
            tracing::error!("Malformed listing page {}: {}", url, message);
            CrawlError::MalformedResponse {
                url: url.to_string(),
                message,
            }
        })?;

        self.stats.pages_fetched += 1;
        tracing::debug!(
            "Page {} for cursor {:?}: {} records, next cursor {:?}",
            self.stats.pages_fetched,
            state.cursor,
            page.records.len(),
            page.next_cursor
        );

        self.buffer.extend(page.records);

        if let Some(cursor) = page.next_cursor {
            let (delay, backoff_seed) = self.backoff.next_delay(state.backoff_seed);
            self.phase = Phase::Fetch {
                state: CrawlState {
                    cursor,
                    backoff_seed,
                },
                delay: Some(delay),
            };
        }

        Ok(())
    }
}
