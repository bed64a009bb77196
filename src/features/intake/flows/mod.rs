mod categorize;
mod summary;
mod urgency;

pub use categorize::{CategorizeFlow, CategorizeInput};
pub use summary::SummaryFlow;
pub use urgency::UrgencyFlow;

use minijinja::{context, Value};
use validator::Validate;

use crate::shared::llm::FlowInput;
use crate::shared::validation::validate_not_blank;

/// Title and description of a report, shared by the urgency and summary flows
#[derive(Debug, Clone, Validate)]
pub struct IssueTextInput {
    #[validate(custom(function = "validate_not_blank"))]
    pub issue_title: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub issue_description: String,
}

impl IssueTextInput {
    pub fn new(issue_title: impl Into<String>, issue_description: impl Into<String>) -> Self {
        Self {
            issue_title: issue_title.into(),
            issue_description: issue_description.into(),
        }
    }
}

impl FlowInput for IssueTextInput {
    fn prompt_context(&self) -> Value {
        context! {
            issue_title => self.issue_title,
            issue_description => self.issue_description,
        }
    }
}
