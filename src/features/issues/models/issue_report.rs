use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::IssueStatus;
use crate::features::intake::models::{
    ClassificationResult, SummaryResult, UrgencyAssessment, UrgencyLevel,
};

/// A stored citizen report
#[derive(Debug, Clone, PartialEq)]
pub struct IssueReport {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category_manual: Option<String>,
    pub ai_classification: Option<ClassificationResult>,
    pub ai_urgency_assessment: Option<UrgencyAssessment>,
    pub ai_summary: Option<SummaryResult>,
    pub media_urls: Vec<String>,
    pub status: IssueStatus,
    pub reported_by_id: String,
    /// Timestamp string as observed by the submitting client
    pub date_reported: String,
    pub created_at: DateTime<Utc>,
    pub status_updated_at: Option<DateTime<Utc>>,
    pub status_updated_by: Option<String>,
    pub status_note: Option<String>,
}

/// Data for inserting a report. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIssueReport {
    pub title: String,
    pub description: String,
    pub location: String,
    pub category_manual: Option<String>,
    pub ai_classification: Option<ClassificationResult>,
    pub ai_urgency_assessment: Option<UrgencyAssessment>,
    pub ai_summary: Option<SummaryResult>,
    pub media_urls: Vec<String>,
    pub status: IssueStatus,
    pub reported_by_id: String,
    pub date_reported: String,
}

/// Official status change, applied only if the report is still in `from`
#[derive(Debug, Clone)]
pub struct IssueStatusUpdate {
    pub from: IssueStatus,
    pub to: IssueStatus,
    pub updated_by: String,
    pub note: Option<String>,
}

/// List filters. `category` matches the reporter's manual category or the
/// AI-suggested one.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub status: Option<IssueStatus>,
    pub urgency: Option<UrgencyLevel>,
    pub category: Option<String>,
    pub reported_by_id: Option<String>,
}

impl IssueFilter {
    pub fn for_reporter(reported_by_id: &str) -> Self {
        Self {
            reported_by_id: Some(reported_by_id.to_string()),
            ..Default::default()
        }
    }
}
