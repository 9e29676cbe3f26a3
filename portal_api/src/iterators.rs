//! Offset/limit pagers over datastore search results.
//!
//! [`ResultsIterator`] walks a result set page by page, tracking the offset
//! itself. Any failure while paging (transport error, unsuccessful response,
//! empty or missing records) ends the sequence instead of surfacing an error,
//! and puts the pager back into its construction state so the next
//! [`advance`](ResultsIterator::advance) starts over. [`AssetIterator`] layers
//! media extraction on top of the same paging.

use serde_json::Value;

use crate::{
    query::Params,
    transport::Transport,
    types::{AssetTuple, Record, ResultPage, SearchResponse, SearchResult},
    Error,
};

/// Page size used by [`ResultsIterator::all`] to keep request counts low.
pub const ALL_PAGE_SIZE: u64 = 1000;

/// How many consecutive media-less pages an [`AssetIterator`] skips before giving up.
pub const DEFAULT_MAX_EMPTY_PAGES: usize = 50;

const MEDIA_FIELD: &str = "associatedMedia";
const ID_FIELD: &str = "_id";

/// Where a pager is in its walk over the result set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerState {
    /// Nothing fetched since construction or the last reset.
    Ready,
    /// At least one page fetched; more may remain.
    Paging,
    /// The result set ended (or a request failed); offset and params are back
    /// to their construction values.
    Exhausted,
}

/// Pages through the results of one search.
///
/// Also an [`Iterator`] over pages. Unlike most iterators it restarts after
/// returning `None`, since exhaustion resets it to its construction state.
#[derive(Debug)]
pub struct ResultsIterator<T> {
    transport: T,
    url: String,
    credential: Option<String>,
    has_records: bool,
    offset: u64,
    initial_offset: u64,
    params: Params,
    initial_params: Params,
    total: Option<u64>,
    state: PagerState,
}

impl<T: Transport> ResultsIterator<T> {
    /// Creates a pager that sends `params` (plus the current offset) to `url`.
    pub fn new(
        transport: T,
        url: impl Into<String>,
        credential: Option<String>,
        offset: u64,
        params: Params,
    ) -> Self {
        Self {
            transport,
            url: url.into(),
            credential,
            has_records: true,
            offset,
            initial_offset: offset,
            initial_params: params.clone(),
            params,
            total: None,
            state: PagerState::Ready,
        }
    }

    /// Whether responses carry a `records` list. When they don't, the whole
    /// `result` object is returned as a single-item page.
    pub fn with_records(mut self, has_records: bool) -> Self {
        self.has_records = has_records;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The offset the next request will use.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    /// The current `limit` parameter, if one is set.
    pub fn page_size(&self) -> Option<u64> {
        self.params
            .get("limit")
            .and_then(|v| v.as_str())
            .and_then(|v| v.parse().ok())
    }

    /// Sets the `limit` parameter for subsequent requests.
    pub fn set_page_size(&mut self, page_size: u64) {
        self.params.insert("limit", page_size);
    }

    /// Fetches the next page of records, or `None` once the results run out.
    pub fn advance(&mut self) -> Option<Vec<Record>> {
        if self.state == PagerState::Paging && self.total.is_some_and(|t| self.offset >= t) {
            tracing::debug!("Nothing else in queue.");
            return self.finish();
        }

        let body = match self.request(self.offset, &self.params) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Request to {} failed, ending iteration: {}", self.url, e);
                return self.finish();
            }
        };

        match self.page_from(body) {
            Some(page) if self.offset < page.total => {
                self.offset += page.records.len() as u64;
                self.total = Some(page.total);
                self.state = PagerState::Paging;
                Some(page.records)
            }
            _ => {
                tracing::debug!("Nothing else in queue.");
                self.finish()
            }
        }
    }

    /// Lazily yields individual records across all remaining pages, fetching
    /// [`ALL_PAGE_SIZE`] records per request. Once the sequence ends it stays
    /// ended; call `all` again to replay the results from the start.
    pub fn all(&mut self) -> impl Iterator<Item = Record> + '_ {
        self.set_page_size(ALL_PAGE_SIZE);
        self.by_ref().flatten()
    }

    /// Returns the first record of the result set, honouring the construction offset.
    pub fn first(&mut self) -> Result<Record, Error> {
        self.restart();
        self.set_page_size(1);
        let page = self.advance();
        self.restart();
        page.and_then(|records| records.into_iter().next()).ok_or(Error::NoResults)
    }

    /// Returns the size of the whole result set, or 0 if the request fails.
    ///
    /// Uses the construction offset and parameters and leaves the pager untouched.
    pub fn count(&self) -> u64 {
        match self.request(self.initial_offset, &self.initial_params) {
            Ok(body) => body
                .get("result")
                .and_then(|result| result.get("total"))
                .and_then(Value::as_u64)
                .unwrap_or(0),
            Err(e) => {
                tracing::warn!("Count request to {} failed: {}", self.url, e);
                0
            }
        }
    }

    /// Puts offset and params back to their construction values.
    pub(crate) fn restart(&mut self) {
        self.offset = self.initial_offset;
        self.params = self.initial_params.clone();
        self.total = None;
        self.state = PagerState::Ready;
    }

    pub(crate) fn finish<I>(&mut self) -> Option<I> {
        self.restart();
        self.state = PagerState::Exhausted;
        None
    }

    fn request(&self, offset: u64, params: &Params) -> Result<Value, Error> {
        let mut params = params.clone();
        params.insert("offset", offset);
        self.transport
            .get(&self.url, self.credential.as_deref(), &params)
    }

    fn page_from(&self, body: Value) -> Option<ResultPage> {
        let response: SearchResponse = match serde_json::from_value(body) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Unexpected response shape: {}", e);
                return None;
            }
        };
        if !response.success {
            if let Some(error) = &response.error {
                tracing::debug!("Unsuccessful response: {}", error);
            }
            return None;
        }
        let result = response.result.filter(|r| !r.is_null())?;

        if !self.has_records {
            return match result {
                Value::Object(map) => Some(ResultPage {
                    records: vec![map],
                    total: 1,
                }),
                _ => None,
            };
        }

        let result: SearchResult = serde_json::from_value(result).ok()?;
        match result.records {
            Some(records) if !records.is_empty() && result.total > 0 => Some(ResultPage {
                records,
                total: result.total,
            }),
            _ => None,
        }
    }
}

impl<T: Transport> Iterator for ResultsIterator<T> {
    type Item = Vec<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

/// Pages through the media attached to search results.
///
/// Each page is a list of `(record id, media)` tuples, one per record with media. Pages whose
/// records carry no media are skipped, up to a bound, so callers never see an
/// empty page before the end of the results.
#[derive(Debug)]
pub struct AssetIterator<T> {
    inner: ResultsIterator<T>,
    max_empty_pages: usize,
}

impl<T: Transport> AssetIterator<T> {
    pub fn new(inner: ResultsIterator<T>) -> Self {
        Self {
            inner,
            max_empty_pages: DEFAULT_MAX_EMPTY_PAGES,
        }
    }

    /// Sets how many consecutive media-less pages are skipped before the
    /// iteration is abandoned.
    pub fn with_max_empty_pages(mut self, max_empty_pages: usize) -> Self {
        self.max_empty_pages = max_empty_pages;
        self
    }

    /// The record pager underneath.
    pub fn records(&self) -> &ResultsIterator<T> {
        &self.inner
    }

    pub fn offset(&self) -> u64 {
        self.inner.offset()
    }

    pub fn state(&self) -> PagerState {
        self.inner.state()
    }

    pub fn set_page_size(&mut self, page_size: u64) {
        self.inner.set_page_size(page_size);
    }

    /// Fetches the next non-empty page of assets, or `None` once the results run out.
    pub fn advance(&mut self) -> Option<Vec<AssetTuple>> {
        let mut skipped = 0;
        loop {
            let records = self.inner.advance()?;
            let assets = extract_assets(&records);
            if !assets.is_empty() {
                return Some(assets);
            }
            skipped += 1;
            if skipped > self.max_empty_pages {
                tracing::warn!(
                    "Skipped {} pages without media at offset {}, giving up.",
                    skipped,
                    self.inner.offset()
                );
                return self.inner.finish();
            }
            tracing::debug!("Page without media skipped.");
        }
    }

    /// Lazily yields individual assets across all remaining pages.
    pub fn all(&mut self) -> impl Iterator<Item = AssetTuple> + '_ {
        self.inner.set_page_size(ALL_PAGE_SIZE);
        self.by_ref().flatten()
    }

    /// Returns the first asset of the result set.
    ///
    /// Pages are fetched at the construction page size, so the skip bound
    /// covers as many records as it does for [`advance`](Self::advance).
    pub fn first(&mut self) -> Result<AssetTuple, Error> {
        self.inner.restart();
        let page = self.advance();
        self.inner.restart();
        page.and_then(|assets| assets.into_iter().next()).ok_or(Error::NoResults)
    }

    /// Not supported: the number of records says nothing about the number of assets.
    pub fn count(&self) -> Result<u64, Error> {
        Err(Error::Unsupported("counting assets"))
    }
}

impl<T: Transport> Iterator for AssetIterator<T> {
    type Item = Vec<AssetTuple>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

/// Pairs each record's `associatedMedia` with the record's id, one tuple per record.
///
/// Media stored as JSON text is decoded first. Records without media, with
/// null media, or with media that cannot be decoded, contribute nothing.
pub fn extract_assets(records: &[Record]) -> Vec<AssetTuple> {
    let mut assets = Vec::new();
    for record in records {
        let record_id = match record.get(ID_FIELD) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let media = match record.get(MEDIA_FIELD) {
            Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
                Ok(media) => media,
                Err(e) => {
                    tracing::debug!("Undecodable media on record {}: {}", record_id, e);
                    continue;
                }
            },
            Some(media) => media.clone(),
            None => continue,
        };
        if !media.is_null() {
            assets.push(AssetTuple {
                record_id,
                asset: media,
            });
        }
    }
    assets
}
