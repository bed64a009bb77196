mod issue_report;
mod issue_status;
mod report_form;

pub use issue_report::{IssueFilter, IssueReport, IssueStatusUpdate, NewIssueReport};
pub use issue_status::IssueStatus;
pub use report_form::{ReportForm, SaveReportRequest};
