use crate::features::intake::models::{ClassificationResult, SummaryResult, UrgencyAssessment};

/// Fields the reporter fills in
#[derive(Debug, Clone, PartialEq)]
pub struct ReportForm {
    pub title: String,
    pub description: String,
    pub location: String,
    pub category_manual: Option<String>,
    /// Client-observed submission time; the server time is used when absent
    pub date_reported: Option<String>,
}

/// Everything needed to persist one report
#[derive(Debug, Clone)]
pub struct SaveReportRequest {
    pub form: ReportForm,
    pub classification: Option<ClassificationResult>,
    pub urgency: Option<UrgencyAssessment>,
    pub summary: Option<SummaryResult>,
    pub media_urls: Vec<String>,
}
