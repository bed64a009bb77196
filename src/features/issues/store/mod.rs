//! Persistence seam for issue reports.

mod pg_issue_store;

pub use pg_issue_store::PgIssueStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::features::issues::models::{IssueFilter, IssueReport, IssueStatusUpdate, NewIssueReport};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused the operation for lack of privileges
    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Backend(String),
}

/// Storage for issue reports.
///
/// Reports are immutable after insert except for the status fields.
#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Insert one report; the store assigns `id` and `created_at`
    async fn insert(&self, report: NewIssueReport) -> Result<IssueReport, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<IssueReport>, StoreError>;

    /// Page of reports, newest first, plus the total matching count
    async fn list(
        &self,
        filter: &IssueFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<IssueReport>, i64), StoreError>;

    /// Apply a status change. Returns `None` when the report does not exist
    /// or is no longer in `update.from`.
    async fn update_status(
        &self,
        id: Uuid,
        update: &IssueStatusUpdate,
    ) -> Result<Option<IssueReport>, StoreError>;
}
