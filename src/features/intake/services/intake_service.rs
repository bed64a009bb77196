use std::sync::Arc;

use crate::core::error::Result;
use crate::features::intake::flows::{
    CategorizeFlow, CategorizeInput, IssueTextInput, SummaryFlow, UrgencyFlow,
};
use crate::features::intake::models::{ClassificationResult, SummaryResult, UrgencyAssessment};
use crate::shared::llm::LanguageModel;
use crate::shared::prompts::PromptEngine;

/// AI suggestions for a report: category, urgency and summary.
///
/// Each call is one model invocation. Unusable model output is replaced by
/// the flow's default; only invalid input surfaces as an error.
pub struct IntakeService {
    categorize: CategorizeFlow,
    urgency: UrgencyFlow,
    summary: SummaryFlow,
}

impl IntakeService {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Arc<PromptEngine>) -> Self {
        Self {
            categorize: CategorizeFlow::new(model.clone(), prompts.clone()),
            urgency: UrgencyFlow::new(model.clone(), prompts.clone()),
            summary: SummaryFlow::new(model, prompts),
        }
    }

    pub async fn categorize(&self, report_content: &str) -> Result<ClassificationResult> {
        let input = CategorizeInput {
            report_content: report_content.to_string(),
        };
        let result = self.categorize.run(&input).await?;
        tracing::debug!(
            "Categorized report as {} ({:.2})",
            result.category,
            result.confidence
        );
        Ok(result)
    }

    pub async fn assess_urgency(
        &self,
        issue_title: &str,
        issue_description: &str,
    ) -> Result<UrgencyAssessment> {
        let input = IssueTextInput::new(issue_title, issue_description);
        let result = self.urgency.run(&input).await?;
        tracing::debug!("Assessed urgency as {}", result.urgency);
        Ok(result)
    }

    pub async fn summarize(
        &self,
        issue_title: &str,
        issue_description: &str,
    ) -> Result<SummaryResult> {
        let input = IssueTextInput::new(issue_title, issue_description);
        Ok(self.summary.run(&input).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::intake::models::UrgencyLevel;
    use crate::shared::test_helpers::ScriptedModel;

    fn service(model: ScriptedModel) -> IntakeService {
        IntakeService::new(Arc::new(model), Arc::new(PromptEngine::builtin()))
    }

    #[tokio::test]
    async fn test_each_operation_makes_one_model_call() {
        let model = Arc::new(
            ScriptedModel::new()
                .with_response(r#"{"category": "Electricity", "confidence": 0.8}"#)
                .with_response(r#"{"urgency": "Medium", "reasoning": "Dark street."}"#)
                .with_response(r#"{"summary": "A streetlight is out."}"#),
        );
        let service = IntakeService::new(model.clone(), Arc::new(PromptEngine::builtin()));

        let category = service.categorize("Streetlight out").await.unwrap();
        let urgency = service.assess_urgency("Streetlight out", "Dark").await.unwrap();
        let summary = service.summarize("Streetlight out", "Dark").await.unwrap();

        assert_eq!(category.category, "Electricity");
        assert_eq!(urgency.urgency, UrgencyLevel::Medium);
        assert_eq!(summary.summary, "A streetlight is out.");
        assert_eq!(model.call_count(), 3);
    }

    #[tokio::test]
    async fn test_invalid_input_is_validation_error() {
        let service = service(ScriptedModel::new());

        assert!(matches!(
            service.categorize("").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.summarize("Title", " ").await,
            Err(AppError::Validation(_))
        ));
    }
}
