//! Store port for the course catalog. Adapters (MongoDB, in-memory) map their
//! failures into [`StoreError`] so callers never see driver types.

use crate::model::{Course, CourseRecord};
use async_trait::async_trait;
use std::str::FromStr;
use thiserror::Error;

/// Sort orders the listing endpoint recognizes. Anything else is rejected
/// upstream; there is no silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Course name, ascending.
    Alphabetical,
    /// Course date, descending (most recent first).
    Date,
}

/// Raised for a `sort_by` value outside the recognized set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized sort option {0:?}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alphabetical" => Ok(SortKey::Alphabetical),
            "date" => Ok(SortKey::Date),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

/// Failures surfaced by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store connection failed: {message}")]
    Connection { message: String },
    /// A query or update failed during execution.
    #[error("store query failed: {message}")]
    Query { message: String },
}

impl StoreError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into() }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query { message: message.into() }
    }
}

/// Persistence port for courses. One method per store operation the service
/// performs; nothing here spans more than a single call.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Insert-or-update keyed by course name. Only the seed fields are
    /// written, so an existing course keeps its identifier and whatever
    /// rating counters it has accumulated.
    async fn upsert_course(&self, record: &CourseRecord) -> Result<(), StoreError>;

    /// Make sure the listing indexes exist (name ascending, date descending).
    /// Safe to call repeatedly.
    async fn ensure_indexes(&self) -> Result<(), StoreError>;

    /// All courses matching the optional domain filter, in the given order.
    /// The filter is exact set membership on the course's domain list.
    async fn list_courses(
        &self,
        sort: SortKey,
        domain: Option<&str>,
    ) -> Result<Vec<Course>, StoreError>;

    /// Exact lookup by identifier. An identifier the store cannot parse is
    /// reported as absent rather than as an error.
    async fn find_course(&self, id: &str) -> Result<Option<Course>, StoreError>;

    /// Atomically bump one rating counter: positive when `positive` is true,
    /// negative otherwise. Returns whether any course matched the identifier.
    async fn increment_rating(&self, id: &str, positive: bool) -> Result<bool, StoreError>;
}
