use std::sync::Arc;

use super::IssueTextInput;
use crate::features::intake::models::SummaryResult;
use crate::shared::llm::{FlowDefinition, FlowError, LanguageModel, PromptFlow};
use crate::shared::prompts::PromptEngine;

const SUMMARY_FLOW: FlowDefinition = FlowDefinition {
    name: "summary",
    template: "intake/summary.jinja",
    task: "Your task is to summarize a citizen's issue report for officials.",
};

/// One or two sentence summary of a report. Missing, empty or invalid output
/// becomes the fixed "Could not generate summary." result.
pub struct SummaryFlow {
    flow: PromptFlow<IssueTextInput, SummaryResult>,
}

impl SummaryFlow {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Arc<PromptEngine>) -> Self {
        Self {
            flow: PromptFlow::new(SUMMARY_FLOW, model, prompts),
        }
    }

    pub async fn run(&self, input: &IssueTextInput) -> Result<SummaryResult, FlowError> {
        match self.flow.invoke(input).await {
            Ok(result) => Ok(result),
            Err(FlowError::ModelOutput(e)) => {
                tracing::warn!("{} flow fell back to default: {}", self.flow.name(), e);
                Ok(SummaryResult::fallback())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::ScriptedModel;

    fn flow(model: Arc<ScriptedModel>) -> SummaryFlow {
        SummaryFlow::new(model, Arc::new(PromptEngine::builtin()))
    }

    fn input() -> IssueTextInput {
        IssueTextInput::new("Streetlight out", "The light at Oak and 3rd has been dark all week.")
    }

    #[tokio::test]
    async fn test_passes_summary_through() {
        let model = Arc::new(ScriptedModel::new().with_response(
            r#"{"summary": "Streetlight at Oak and 3rd is out.", "confidence": 0.8}"#,
        ));
        let result = flow(model).run(&input()).await.unwrap();

        assert_eq!(result.summary, "Streetlight at Oak and 3rd is out.");
        assert_eq!(result.confidence, Some(0.8));
    }

    #[tokio::test]
    async fn test_confidence_is_optional() {
        let model = Arc::new(ScriptedModel::new().with_response(r#"{"summary": "Light out."}"#));
        let result = flow(model).run(&input()).await.unwrap();
        assert_eq!(result.confidence, None);
    }

    #[tokio::test]
    async fn test_no_output_uses_exact_default() {
        let model = Arc::new(ScriptedModel::new().with_failure("empty completion"));
        let result = flow(model).run(&input()).await.unwrap();

        assert_eq!(
            result,
            SummaryResult {
                summary: "Could not generate summary.".to_string(),
                confidence: Some(0.0),
            }
        );
    }

    #[tokio::test]
    async fn test_empty_summary_counts_as_no_output() {
        let model = Arc::new(ScriptedModel::new().with_response(r#"{"summary": "  "}"#));
        let result = flow(model).run(&input()).await.unwrap();
        assert_eq!(result, SummaryResult::fallback());
    }
}
