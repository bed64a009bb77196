use std::sync::Arc;

use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

use super::IssueTextInput;
use crate::features::intake::models::{UrgencyAssessment, UrgencyLevel};
use crate::shared::llm::{
    FlowDefinition, FlowError, LanguageModel, LlmResponse, ModelOutputError, PromptFlow,
};
use crate::shared::prompts::PromptEngine;

const URGENCY_FLOW: FlowDefinition = FlowDefinition {
    name: "urgency",
    template: "intake/urgency.jinja",
    task: "Your task is to assess how urgently a citizen's issue report needs attention.",
};

pub const URGENCY_NO_OUTPUT_REASONING: &str = "AI model did not return a valid assessment.";
pub const URGENCY_INVALID_LEVEL_REASONING: &str = "AI returned an invalid urgency level.";

/// Urgency as the model reports it. The level stays a string here so an
/// unexpected label can be coerced instead of failing the whole parse.
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct UrgencyModelOutput {
    /// Exactly one of: Emergency, High, Medium, Low, Unknown
    pub urgency: String,

    /// One or two sentences explaining the chosen level
    #[serde(default)]
    pub reasoning: String,

    /// Confidence in the assessment, from 0 to 1
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: Option<f64>,
}

impl LlmResponse for UrgencyModelOutput {}

/// Turn a model outcome into an assessment whose level is always one of the
/// five tiers.
pub fn resolve_urgency(outcome: Result<UrgencyModelOutput, ModelOutputError>) -> UrgencyAssessment {
    let output = match outcome {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!("urgency flow fell back to default: {}", e);
            return UrgencyAssessment {
                urgency: UrgencyLevel::Unknown,
                reasoning: URGENCY_NO_OUTPUT_REASONING.to_string(),
                confidence: Some(0.0),
            };
        }
    };

    match UrgencyLevel::from_label(&output.urgency) {
        Some(urgency) => UrgencyAssessment {
            urgency,
            reasoning: output.reasoning,
            confidence: output.confidence,
        },
        None => {
            tracing::warn!("Model returned unknown urgency level {:?}", output.urgency);
            let reasoning = if output.reasoning.trim().is_empty() {
                URGENCY_INVALID_LEVEL_REASONING.to_string()
            } else {
                output.reasoning
            };
            UrgencyAssessment {
                urgency: UrgencyLevel::Unknown,
                reasoning,
                confidence: output.confidence,
            }
        }
    }
}

pub struct UrgencyFlow {
    flow: PromptFlow<IssueTextInput, UrgencyModelOutput>,
}

impl UrgencyFlow {
    pub fn new(model: Arc<dyn LanguageModel>, prompts: Arc<PromptEngine>) -> Self {
        Self {
            flow: PromptFlow::new(URGENCY_FLOW, model, prompts),
        }
    }

    pub async fn run(&self, input: &IssueTextInput) -> Result<UrgencyAssessment, FlowError> {
        let outcome = match self.flow.invoke(input).await {
            Ok(output) => Ok(output),
            Err(FlowError::ModelOutput(e)) => Err(e),
            Err(e) => return Err(e),
        };
        Ok(resolve_urgency(outcome))
    }
}
