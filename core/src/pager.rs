//! Cursor pagination over list endpoints.
//!
//! # Overview
//! List endpoints return one page at a time together with an opaque `start`
//! cursor for the following page. [`Pager`] hides the asymmetry between the
//! first request (no cursor) and every later one (the cursor from the page
//! before), and offers two ways to consume a collection:
//!
//! - [`Pager::get_next`] fetches exactly one page per call;
//! - [`Pager::get_all`] drains the collection and returns every item in page
//!   order.
//!
//! # State
//! ```text
//! NotStarted --page with cursor--> HasMore --page with cursor--> HasMore
//!     |                               |
//!     +--page without cursor----------+--page without cursor--> Exhausted
//! ```
//! A failed fetch never moves the state, so calling `get_next` again repeats
//! the same request. `get_next` in `Exhausted` fails with
//! [`ApiError::PagerExhausted`] without touching the network.
//!
//! Cursors are strictly sequential, so pages cannot be fetched in parallel.
//! A `Pager` is meant for one thread; wrap it in a lock to share it.

use tracing::debug;

use crate::error::ApiError;

/// List options that carry a `start` cursor.
pub trait PagedOptions: Clone {
    /// Check required fields before any request is made.
    fn validate(&self) -> Result<(), ApiError>;

    /// Cursor that will be sent with the next request.
    fn start_token(&self) -> Option<&str>;

    fn set_start(&mut self, start: Option<String>);
}

/// A decoded page of a cursor-paginated collection.
pub trait PagedCollection {
    type Item;

    /// Cursor for the following page, or `None` when this page is the last.
    fn next_start(&self) -> Option<&str>;

    fn into_items(self) -> Vec<Self::Item>;
}

/// Something that can fetch one page of a collection for the given options.
///
/// Implemented once per paginated collection, keyed by its options type.
pub trait PageSource<O: PagedOptions> {
    type Page: PagedCollection;

    fn fetch_page(&self, options: &O) -> Result<Self::Page, ApiError>;
}

/// Item type produced by a `PageSource`.
pub type PageItem<S, O> = <<S as PageSource<O>>::Page as PagedCollection>::Item;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    NotStarted,
    HasMore(String),
    Exhausted,
}

/// Stateful iterator over the pages of one listing.
///
/// Create one per listing; to start over, build a fresh pager from the same
/// options.
pub struct Pager<'a, S, O>
where
    S: PageSource<O>,
    O: PagedOptions,
{
    source: &'a S,
    options: O,
    cursor: Cursor,
}

impl<'a, S, O> Pager<'a, S, O>
where
    S: PageSource<O>,
    O: PagedOptions,
{
    /// Validate `options` and build a pager positioned before the first page.
    ///
    /// Any `start` already set on `options` is discarded; the first request
    /// always asks for the beginning of the collection.
    pub fn new(source: &'a S, mut options: O) -> Result<Self, ApiError> {
        options.validate()?;
        options.set_start(None);
        Ok(Self {
            source,
            options,
            cursor: Cursor::NotStarted,
        })
    }

    /// True until a page without a `next` cursor has been returned.
    pub fn has_next(&self) -> bool {
        !matches!(self.cursor, Cursor::Exhausted)
    }

    /// Options as they will be sent with the next request.
    pub fn options(&self) -> &O {
        &self.options
    }

    /// Fetch the next page and return its items.
    ///
    /// A page may be empty without being the last one.
    pub fn get_next(&mut self) -> Result<Vec<PageItem<S, O>>, ApiError> {
        let start = match &self.cursor {
            Cursor::NotStarted => None,
            Cursor::HasMore(start) => Some(start.clone()),
            Cursor::Exhausted => return Err(ApiError::PagerExhausted),
        };
        debug!(start = ?start, "fetching page");
        self.options.set_start(start);

        let page = self.source.fetch_page(&self.options)?;

        self.cursor = match page.next_start() {
            Some(next) => Cursor::HasMore(next.to_string()),
            None => {
                debug!("reached last page");
                Cursor::Exhausted
            }
        };
        Ok(page.into_items())
    }

    /// Fetch every remaining page and return all items in page order.
    ///
    /// Stops at the first error and returns only that error; items gathered
    /// from earlier pages are dropped. Use `get_next` to keep partial results.
    pub fn get_all(&mut self) -> Result<Vec<PageItem<S, O>>, ApiError> {
        let mut all = Vec::new();
        while self.has_next() {
            all.extend(self.get_next()?);
        }
        Ok(all)
    }
}
