mod identity;
mod issue_service;
mod submission_service;

pub use identity::resolve_reporter_id;
pub use issue_service::{IssueService, SaveReportError};
pub use submission_service::SubmissionService;
