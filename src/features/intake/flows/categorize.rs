use std::sync::Arc;

use minijinja::{context, Value};
use validator::Validate;

use crate::features::intake::models::ClassificationResult;
use crate::shared::constants::ISSUE_CATEGORIES;
use crate::shared::llm::{FlowDefinition, FlowError, FlowInput, LanguageModel, PromptFlow};
use crate::shared::prompts::PromptEngine;
use crate::shared::validation::validate_not_blank;

const CATEGORIZE_FLOW: FlowDefinition = FlowDefinition {
    name: "categorize",
    template: "intake/categorize.jinja",
    task: "Your task is to assign a category to a citizen's issue report.",
};

#[derive(Debug, Clone, Validate)]
pub struct CategorizeInput {
    /// Free text describing the issue, usually title and description together
    #[validate(custom(function = "validate_not_blank"))]
    pub report_content: String,
}

impl FlowInput for CategorizeInput {
    fn prompt_context(&self) -> Value {
        context! {
            report_content => self.report_content,
            categories => ISSUE_CATEGORIES,
        }
    }
}

/// Suggests a category for a report. Falls back to "Other" with zero
/// confidence when the model output is unusable.
pub struct CategorizeFlow {
    flow: PromptFlow<CategorizeInput, ClassificationResult>,
}

impl CategorizeFlow {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Arc<PromptEngine>) -> Self {
        Self {
            flow: PromptFlow::new(CATEGORIZE_FLOW, model, prompts),
        }
    }

    pub async fn run(&self, input: &CategorizeInput) -> Result<ClassificationResult, FlowError> {
        match self.flow.invoke(input).await {
            Ok(result) => Ok(result),
            Err(FlowError::ModelOutput(e)) => {
                tracing::warn!("{} flow fell back to default: {}", self.flow.name(), e);
                Ok(ClassificationResult::fallback())
            }
            Err(e) => Err(e),
        }
    }
}
