use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::session::ReporterSession;
use crate::features::intake::IntakeService;
use crate::features::issues::models::{IssueReport, ReportForm, SaveReportRequest};
use crate::features::issues::services::{IssueService, SaveReportError};

/// Full intake pipeline: classification, urgency, summary, then one save.
///
/// The three model calls run one after another. Their failures never block
/// the save; each flow substitutes its own default.
pub struct SubmissionService {
    intake_service: Arc<IntakeService>,
    issue_service: Arc<IssueService>,
}

impl SubmissionService {
    pub fn new(intake_service: Arc<IntakeService>, issue_service: Arc<IssueService>) -> Self {
        Self {
            intake_service,
            issue_service,
        }
    }

    pub async fn submit(
        &self,
        form: ReportForm,
        media_urls: Vec<String>,
        session: &ReporterSession,
    ) -> Result<IssueReport> {
        // Fail before spending model calls on a report that cannot be saved
        self.issue_service
            .reporter_id(session)
            .map_err(|e| AppError::from(SaveReportError::from(e)))?;

        let report_content = format!("{}\n{}", form.title, form.description);
        let classification = self.intake_service.categorize(&report_content).await?;
        let urgency = self
            .intake_service
            .assess_urgency(&form.title, &form.description)
            .await?;
        let summary = self
            .intake_service
            .summarize(&form.title, &form.description)
            .await?;

        let request = SaveReportRequest {
            form,
            classification: Some(classification),
            urgency: Some(urgency),
            summary: Some(summary),
            media_urls,
        };
        Ok(self.issue_service.save_report(request, session).await?)
    }
}
