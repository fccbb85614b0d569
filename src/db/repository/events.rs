//! Event, notice and localization repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::models::{Event, GcnNotice, Localization};

/// Repository trait for event-side database operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Check if the database connection is healthy.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Create the event at `dateobs` or merge `tags` into the existing one.
    ///
    /// Idempotent: repeated upserts for the same dateobs never create a
    /// second row. Returns the event as stored after the merge.
    async fn upsert_event(
        &self,
        dateobs: DateTime<Utc>,
        tags: &[String],
    ) -> RepositoryResult<Event>;

    /// Retrieve an event by its dateobs key.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` if no event exists at `dateobs`.
    async fn get_event(&self, dateobs: DateTime<Utc>) -> RepositoryResult<Event>;

    /// List all events, most recent first.
    async fn list_events(&self) -> RepositoryResult<Vec<Event>>;

    /// Insert a notice.
    ///
    /// Returns `true` if the notice was stored, `false` if a notice with the
    /// same ivorn already exists (re-delivery is a no-op).
    async fn insert_notice(&self, notice: &GcnNotice) -> RepositoryResult<bool>;

    /// All notices belonging to an event, in arrival order.
    async fn notices_for_event(&self, dateobs: DateTime<Utc>)
        -> RepositoryResult<Vec<GcnNotice>>;

    /// Store a localization for an event. Same-named localizations for the
    /// same event are replaced.
    async fn store_localization(&self, localization: &Localization) -> RepositoryResult<()>;

    /// All localizations belonging to an event.
    async fn localizations_for_event(
        &self,
        dateobs: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Localization>>;
}
