//! Limit/offset pagination primitives shared by backend listing endpoints.
//!
//! [`PageRequest`] validates client-supplied bounds once at the system
//! boundary so repositories and services can trust them, and [`Page`] is the
//! envelope a listing returns. Both serialise with camelCase field names to
//! match the rest of the HTTP surface.

use serde::{Deserialize, Serialize};

/// Default number of items returned when the caller does not specify a limit.
pub const DEFAULT_LIMIT: usize = 20;

/// Largest limit a caller may request.
pub const MAX_LIMIT: usize = 100;

/// Validation errors raised by [`PageRequest::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// A limit of zero would make every listing empty.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// The requested limit exceeds the service ceiling.
    #[error("limit must be at most {max}")]
    LimitTooLarge {
        /// The configured ceiling the request exceeded.
        max: usize,
    },
}

/// Validated limit/offset pair describing one page of a listing.
///
/// ## Invariants
/// - `limit` is between 1 and [`MAX_LIMIT`] inclusive.
/// - `offset` is unbounded; a past-the-end offset yields an empty page rather
///   than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageRequestDto", into = "PageRequestDto")]
pub struct PageRequest {
    limit: usize,
    offset: usize,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    /// Returns [`PaginationError`] when the limit is zero or above
    /// [`MAX_LIMIT`].
    pub const fn try_new(limit: usize, offset: usize) -> Result<Self, PaginationError> {
        if limit == 0 {
            return Err(PaginationError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PaginationError::LimitTooLarge { max: MAX_LIMIT });
        }
        Ok(Self { limit, offset })
    }

    /// First page with the default limit.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }

    /// Number of items requested.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Number of items skipped before the page starts.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageRequestDto {
    limit: usize,
    offset: usize,
}

impl From<PageRequest> for PageRequestDto {
    fn from(value: PageRequest) -> Self {
        Self {
            limit: value.limit,
            offset: value.offset,
        }
    }
}

impl TryFrom<PageRequestDto> for PageRequest {
    type Error = PaginationError;

    fn try_from(value: PageRequestDto) -> Result<Self, Self::Error> {
        Self::try_new(value.limit, value.offset)
    }
}

/// One page of results together with the bounds that produced it.
///
/// The envelope intentionally omits a total count: computing one forces a
/// full collection scan on document stores and no current caller needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in the listing's stable order.
    pub items: Vec<T>,
    /// Limit the page was produced with.
    pub limit: usize,
    /// Offset the page was produced with.
    pub offset: usize,
}

impl<T> Page<T> {
    /// Build a page from items and the request that selected them.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest) -> Self {
        Self {
            items,
            limit: request.limit(),
            offset: request.offset(),
        }
    }

    /// Map the page's items while keeping the bounds.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}
