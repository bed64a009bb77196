use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::identity::{resolve_reporter_id, IdentityError};
use crate::core::config::IdentityConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::session::ReporterSession;
use crate::features::issues::models::{
    IssueFilter, IssueReport, IssueStatus, IssueStatusUpdate, NewIssueReport, SaveReportRequest,
};
use crate::features::issues::store::{IssueStore, StoreError};
use crate::shared::types::{Meta, PaginationQuery};

/// Why a report could not be saved. `Display` is the caller-facing message.
#[derive(Debug, Error)]
pub enum SaveReportError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Permission denied: the report store refused this write. Check that reporters are allowed to create reports. ({0})")]
    PermissionDenied(String),

    #[error("{0}")]
    Storage(String),
}

impl From<StoreError> for SaveReportError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PermissionDenied(msg) => SaveReportError::PermissionDenied(msg),
            StoreError::Backend(msg) => SaveReportError::Storage(msg),
        }
    }
}

impl From<SaveReportError> for AppError {
    fn from(err: SaveReportError) -> Self {
        let message = err.to_string();
        match err {
            SaveReportError::Identity(IdentityError::AuthenticationRequired) => {
                AppError::Unauthorized(message)
            }
            SaveReportError::Identity(IdentityError::IdentityResolution) => {
                AppError::ServiceUnavailable(message)
            }
            SaveReportError::PermissionDenied(_) => AppError::Forbidden(message),
            SaveReportError::Storage(_) => AppError::Storage(message),
        }
    }
}

/// Service for issue report persistence and the official review workflow
pub struct IssueService {
    store: Arc<dyn IssueStore>,
    identity: IdentityConfig,
}

impl IssueService {
    pub fn new(store: Arc<dyn IssueStore>, identity: IdentityConfig) -> Self {
        Self { store, identity }
    }

    pub fn reporter_id(&self, session: &ReporterSession) -> std::result::Result<String, IdentityError> {
        resolve_reporter_id(session, &self.identity)
    }

    /// Persist one report with status `Submitted`.
    ///
    /// Exactly one store write on success, none when the reporter cannot be
    /// identified. Identical requests are stored as separate reports.
    pub async fn save_report(
        &self,
        request: SaveReportRequest,
        session: &ReporterSession,
    ) -> std::result::Result<IssueReport, SaveReportError> {
        let reported_by_id = self.reporter_id(session).inspect_err(|e| {
            tracing::warn!("Rejected report submission: {}", e);
        })?;

        let SaveReportRequest {
            form,
            classification,
            urgency,
            summary,
            media_urls,
        } = request;

        let date_reported = form
            .date_reported
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| Utc::now().to_rfc3339());

        let report = NewIssueReport {
            title: form.title,
            description: form.description,
            location: form.location,
            category_manual: form.category_manual,
            ai_classification: classification,
            ai_urgency_assessment: urgency,
            ai_summary: summary,
            media_urls,
            status: IssueStatus::Submitted,
            reported_by_id,
            date_reported,
        };

        let saved = self.store.insert(report).await.map_err(|e| {
            tracing::error!("Failed to save issue report: {}", e);
            SaveReportError::from(e)
        })?;

        tracing::info!(
            "Saved issue report {} for reporter {}",
            saved.id,
            saved.reported_by_id
        );
        Ok(saved)
    }

    /// Report detail for an official or the report's owner.
    /// Anyone else gets NotFound so report ids are not disclosed.
    pub async fn get_for_viewer(&self, id: Uuid, viewer: &AuthenticatedUser) -> Result<IssueReport> {
        let report = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Issue report {} not found", id)))?;

        if viewer.has_official_access() || report.reported_by_id == viewer.sub {
            Ok(report)
        } else {
            Err(AppError::NotFound(format!("Issue report {} not found", id)))
        }
    }

    pub async fn list(
        &self,
        filter: &IssueFilter,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<IssueReport>, Meta)> {
        let (reports, total) = self
            .store
            .list(filter, pagination.limit(), pagination.offset())
            .await?;
        Ok((reports, pagination.meta(total)))
    }

    /// Reports filed by the session's reporter, newest first
    pub async fn list_mine(
        &self,
        session: &ReporterSession,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<IssueReport>, Meta)> {
        let reporter_id = self
            .reporter_id(session)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;
        self.list(&IssueFilter::for_reporter(&reporter_id), pagination)
            .await
    }

    /// Move a report to a new status on behalf of an official
    pub async fn update_status(
        &self,
        id: Uuid,
        next: IssueStatus,
        note: Option<String>,
        official: &AuthenticatedUser,
    ) -> Result<IssueReport> {
        let current = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Issue report {} not found", id)))?;

        if !current.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Cannot change status from {} to {}",
                current.status, next
            )));
        }

        let update = IssueStatusUpdate {
            from: current.status,
            to: next,
            updated_by: official.sub.clone(),
            note,
        };
        let updated = self.store.update_status(id, &update).await?.ok_or_else(|| {
            AppError::Conflict(format!(
                "Issue report {} changed status while the update was in progress",
                id
            ))
        })?;

        tracing::info!(
            "Issue report {} moved from {} to {} by {}",
            id,
            update.from,
            update.to,
            official.sub
        );
        Ok(updated)
    }
}
