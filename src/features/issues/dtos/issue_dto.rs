use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::intake::models::{
    ClassificationResult, SummaryResult, UrgencyAssessment, UrgencyLevel,
};
use crate::features::issues::models::{
    IssueFilter, IssueReport, IssueStatus, ReportForm, SaveReportRequest,
};
use crate::shared::validation::{validate_media_urls, validate_not_blank};

/// Report fields typed in by the citizen
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportFormDto {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub location: String,

    #[validate(length(max = 100))]
    pub category_manual: Option<String>,

    /// Client-observed timestamp; server time is used when omitted
    pub date_reported: Option<String>,
}

impl From<ReportFormDto> for ReportForm {
    fn from(dto: ReportFormDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            location: dto.location,
            category_manual: dto.category_manual.filter(|c| !c.trim().is_empty()),
            date_reported: dto.date_reported,
        }
    }
}

/// Request body for saving a report with AI annotations already computed
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveReportDto {
    #[serde(flatten)]
    #[validate(nested)]
    pub form: ReportFormDto,

    #[validate(nested)]
    pub ai_classification: Option<ClassificationResult>,

    #[validate(nested)]
    pub ai_urgency_assessment: Option<UrgencyAssessment>,

    #[validate(nested)]
    pub ai_summary: Option<SummaryResult>,

    /// Public media URLs, in display order
    #[serde(default)]
    #[validate(custom(function = "validate_media_urls"))]
    pub media_urls: Vec<String>,
}

impl From<SaveReportDto> for SaveReportRequest {
    fn from(dto: SaveReportDto) -> Self {
        Self {
            form: dto.form.into(),
            classification: dto.ai_classification,
            urgency: dto.ai_urgency_assessment,
            summary: dto.ai_summary,
            media_urls: dto.media_urls,
        }
    }
}

/// Request body for the full pipeline: AI annotation followed by save
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportDto {
    #[serde(flatten)]
    #[validate(nested)]
    pub form: ReportFormDto,

    #[serde(default)]
    #[validate(custom(function = "validate_media_urls"))]
    pub media_urls: Vec<String>,
}

/// Result of a successful save
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveReportResponseDto {
    pub success: bool,
    pub issue_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueReportResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_manual: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_classification: Option<ClassificationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_urgency_assessment: Option<UrgencyAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<SummaryResult>,
    pub media_urls: Vec<String>,
    pub status: IssueStatus,
    pub reported_by_id: String,
    pub date_reported: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_note: Option<String>,
}

impl From<IssueReport> for IssueReportResponseDto {
    fn from(r: IssueReport) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            location: r.location,
            category_manual: r.category_manual,
            ai_classification: r.ai_classification,
            ai_urgency_assessment: r.ai_urgency_assessment,
            ai_summary: r.ai_summary,
            media_urls: r.media_urls,
            status: r.status,
            reported_by_id: r.reported_by_id,
            date_reported: r.date_reported,
            created_at: r.created_at,
            status_updated_at: r.status_updated_at,
            status_updated_by: r.status_updated_by,
            status_note: r.status_note,
        }
    }
}

/// Filters for the official report list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct IssueFilterQuery {
    pub status: Option<IssueStatus>,
    pub urgency: Option<UrgencyLevel>,
    /// Matches the manual or the AI-suggested category
    pub category: Option<String>,
}

impl From<IssueFilterQuery> for IssueFilter {
    fn from(q: IssueFilterQuery) -> Self {
        Self {
            status: q.status,
            urgency: q.urgency,
            category: q.category.filter(|c| !c.trim().is_empty()),
            reported_by_id: None,
        }
    }
}

/// Request body for an official status change
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueStatusDto {
    pub status: IssueStatus,

    #[validate(length(max = 2000))]
    pub note: Option<String>,
}
