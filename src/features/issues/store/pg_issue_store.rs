use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{IssueStore, StoreError};
use crate::features::intake::models::{ClassificationResult, SummaryResult, UrgencyAssessment};
use crate::features::issues::models::{
    IssueFilter, IssueReport, IssueStatus, IssueStatusUpdate, NewIssueReport,
};

/// PostgreSQL SQLSTATE for insufficient_privilege
const INSUFFICIENT_PRIVILEGE: &str = "42501";

const REPORT_COLUMNS: &str = r#"
    id, title, description, location, category_manual,
    ai_classification, ai_urgency_assessment, ai_summary,
    media_urls, status, reported_by_id, date_reported, created_at,
    status_updated_at, status_updated_by, status_note
"#;

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::issue_status IS NULL OR status = $1)
      AND ($2::text IS NULL OR ai_urgency_assessment->>'urgency' = $2)
      AND ($3::text IS NULL OR category_manual = $3 OR ai_classification->>'category' = $3)
      AND ($4::text IS NULL OR reported_by_id = $4)
"#;

#[derive(Debug, FromRow)]
struct IssueReportRow {
    id: Uuid,
    title: String,
    description: String,
    location: String,
    category_manual: Option<String>,
    ai_classification: Option<Json<ClassificationResult>>,
    ai_urgency_assessment: Option<Json<UrgencyAssessment>>,
    ai_summary: Option<Json<SummaryResult>>,
    media_urls: Vec<String>,
    status: IssueStatus,
    reported_by_id: String,
    date_reported: String,
    created_at: DateTime<Utc>,
    status_updated_at: Option<DateTime<Utc>>,
    status_updated_by: Option<String>,
    status_note: Option<String>,
}

impl From<IssueReportRow> for IssueReport {
    fn from(row: IssueReportRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            category_manual: row.category_manual,
            ai_classification: row.ai_classification.map(|j| j.0),
            ai_urgency_assessment: row.ai_urgency_assessment.map(|j| j.0),
            ai_summary: row.ai_summary.map(|j| j.0),
            media_urls: row.media_urls,
            status: row.status,
            reported_by_id: row.reported_by_id,
            date_reported: row.date_reported,
            created_at: row.created_at,
            status_updated_at: row.status_updated_at,
            status_updated_by: row.status_updated_by,
            status_note: row.status_note,
        }
    }
}

/// Map a database error, singling out permission failures
fn map_db_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) {
            return StoreError::PermissionDenied(db_err.message().to_string());
        }
    }
    StoreError::Backend(e.to_string())
}

/// `IssueStore` backed by the `issue_reports` table
pub struct PgIssueStore {
    pool: PgPool,
}

impl PgIssueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IssueStore for PgIssueStore {
    async fn insert(&self, report: NewIssueReport) -> Result<IssueReport, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO issue_reports (
                title, description, location, category_manual,
                ai_classification, ai_urgency_assessment, ai_summary,
                media_urls, status, reported_by_id, date_reported
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {REPORT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, IssueReportRow>(&sql)
            .bind(&report.title)
            .bind(&report.description)
            .bind(&report.location)
            .bind(&report.category_manual)
            .bind(report.ai_classification.as_ref().map(Json))
            .bind(report.ai_urgency_assessment.as_ref().map(Json))
            .bind(report.ai_summary.as_ref().map(Json))
            .bind(&report.media_urls)
            .bind(report.status)
            .bind(&report.reported_by_id)
            .bind(&report.date_reported)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert issue report: {:?}", e);
                map_db_error(e)
            })?;

        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<IssueReport>, StoreError> {
        let sql = format!("SELECT {REPORT_COLUMNS} FROM issue_reports WHERE id = $1");

        let row = sqlx::query_as::<_, IssueReportRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get issue report {}: {:?}", id, e);
                map_db_error(e)
            })?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        filter: &IssueFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<IssueReport>, i64), StoreError> {
        let urgency = filter.urgency.map(|u| u.as_str());

        let count_sql = format!("SELECT COUNT(*) FROM issue_reports {FILTER_CLAUSE}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.status)
            .bind(urgency)
            .bind(filter.category.as_deref())
            .bind(filter.reported_by_id.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count issue reports: {:?}", e);
                map_db_error(e)
            })?;

        let list_sql = format!(
            "SELECT {REPORT_COLUMNS} FROM issue_reports {FILTER_CLAUSE} \
             ORDER BY created_at DESC LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, IssueReportRow>(&list_sql)
            .bind(filter.status)
            .bind(urgency)
            .bind(filter.category.as_deref())
            .bind(filter.reported_by_id.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list issue reports: {:?}", e);
                map_db_error(e)
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn update_status(
        &self,
        id: Uuid,
        update: &IssueStatusUpdate,
    ) -> Result<Option<IssueReport>, StoreError> {
        let sql = format!(
            r#"
            UPDATE issue_reports
            SET status = $3, status_updated_at = NOW(),
                status_updated_by = $4, status_note = $5
            WHERE id = $1 AND status = $2
            RETURNING {REPORT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, IssueReportRow>(&sql)
            .bind(id)
            .bind(update.from)
            .bind(update.to)
            .bind(&update.updated_by)
            .bind(&update.note)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update status of issue report {}: {:?}", id, e);
                map_db_error(e)
            })?;

        Ok(row.map(Into::into))
    }
}
