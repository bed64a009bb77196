use minijinja::{context, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

use super::client::LanguageModel;
use super::parser::parse_llm_json;
use super::response::LlmResponse;
use crate::core::error::AppError;
use crate::shared::prompts::{PromptEngine, TemplateError, SYSTEM_TEMPLATE};

/// Input contract for a flow.
///
/// Validation rules come from `Validate`; template placeholders come from
/// `prompt_context`. The two are kept apart on purpose so renaming a field
/// never silently changes what the template sees.
pub trait FlowInput: Validate + Send + Sync {
    /// Values for every placeholder the flow's template references
    fn prompt_context(&self) -> Value;
}

/// The model produced nothing usable. Flows recover from this locally.
#[derive(Debug, Error)]
pub enum ModelOutputError {
    #[error("Model call failed: {0}")]
    Unavailable(String),

    #[error("Model output could not be parsed: {0}")]
    Unparseable(String),

    #[error("Model output failed validation: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum FlowError {
    /// Input rejected before any model call
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Prompt(#[from] TemplateError),

    #[error(transparent)]
    ModelOutput(#[from] ModelOutputError),
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Validation(msg) => AppError::Validation(msg),
            FlowError::Prompt(e) => AppError::Internal(e.to_string()),
            FlowError::ModelOutput(e) => AppError::ExternalServiceError(e.to_string()),
        }
    }
}

/// Static description of a flow: its name (for logs), its template, and the
/// task sentence placed in the shared system prompt.
#[derive(Debug, Clone, Copy)]
pub struct FlowDefinition {
    pub name: &'static str,
    pub template: &'static str,
    pub task: &'static str,
}

/// One schema-validated call to the hosted model.
///
/// `invoke` validates the input, renders the system prompt (task + output
/// JSON schema) and the flow template, makes exactly one model call, then
/// parses and validates the output. It never applies domain defaults.
pub struct PromptFlow<I, O> {
    definition: FlowDefinition,
    model: Arc<dyn LanguageModel>,
    prompts: Arc<PromptEngine>,
    _contract: PhantomData<fn(&I) -> O>,
}

impl<I, O> PromptFlow<I, O>
where
    I: FlowInput,
    O: LlmResponse,
{
    pub fn new(
        definition: FlowDefinition,
        model: Arc<dyn LanguageModel>,
        prompts: Arc<PromptEngine>,
    ) -> Self {
        Self {
            definition,
            model,
            prompts,
            _contract: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub async fn invoke(&self, input: &I) -> Result<O, FlowError> {
        input
            .validate()
            .map_err(|e| FlowError::Validation(e.to_string()))?;

        let system_prompt = self.prompts.render(
            SYSTEM_TEMPLATE,
            context! {
                task => self.definition.task,
                json_schema => O::json_schema_string(),
            },
        )?;
        let user_prompt = self
            .prompts
            .render(self.definition.template, input.prompt_context())?;

        tracing::debug!(
            flow = self.definition.name,
            "Invoking model ({} chars of prompt)",
            system_prompt.len() + user_prompt.len()
        );

        let text = self
            .model
            .generate(&system_prompt, &user_prompt)
            .await
            .map_err(|e| ModelOutputError::Unavailable(e.to_string()))?;

        let output: O =
            parse_llm_json(&text).map_err(|e| ModelOutputError::Unparseable(e.to_string()))?;

        output
            .validate()
            .map_err(|e| ModelOutputError::Invalid(e.to_string()))?;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::ScriptedModel;
    use crate::shared::validation::validate_not_blank;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Debug, Validate)]
    struct EchoInput {
        #[validate(custom(function = "validate_not_blank"))]
        issue_title: String,
        issue_description: String,
    }

    impl FlowInput for EchoInput {
        fn prompt_context(&self) -> Value {
            context! {
                issue_title => self.issue_title,
                issue_description => self.issue_description,
            }
        }
    }

    /// Input whose context omits a placeholder the template needs
    #[derive(Debug)]
    struct IncompleteInput;

    impl Validate for IncompleteInput {
        fn validate(&self) -> Result<(), validator::ValidationErrors> {
            Ok(())
        }
    }

    impl FlowInput for IncompleteInput {
        fn prompt_context(&self) -> Value {
            context! { issue_title => "only the title" }
        }
    }

    #[derive(Debug, Deserialize, JsonSchema, Validate)]
    struct Scored {
        #[validate(custom(function = "validate_not_blank"))]
        summary: String,
        #[validate(range(min = 0.0, max = 1.0))]
        confidence: f64,
    }

    impl LlmResponse for Scored {}

    const ECHO_FLOW: FlowDefinition = FlowDefinition {
        name: "echo",
        template: "intake/summary.jinja",
        task: "Your task is to echo things.",
    };

    fn flow<I: FlowInput>(model: Arc<ScriptedModel>) -> PromptFlow<I, Scored> {
        PromptFlow::new(ECHO_FLOW, model, Arc::new(PromptEngine::builtin()))
    }

    fn input() -> EchoInput {
        EchoInput {
            issue_title: "Broken streetlight".to_string(),
            issue_description: "Dark corner on 5th Ave".to_string(),
        }
    }

    #[tokio::test]
    async fn test_invoke_returns_validated_output() {
        let model =
            Arc::new(ScriptedModel::new().with_response(r#"{"summary": "ok", "confidence": 0.9}"#));
        let output = flow::<EchoInput>(model.clone()).invoke(&input()).await.unwrap();

        assert_eq!(output.summary, "ok");
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_prompts_carry_schema_and_input_text() {
        let model =
            Arc::new(ScriptedModel::new().with_response(r#"{"summary": "ok", "confidence": 0.9}"#));
        flow::<EchoInput>(model.clone()).invoke(&input()).await.unwrap();

        let (system, user) = model.calls().remove(0);
        assert!(system.contains("Your task is to echo things."));
        assert!(system.contains("\"confidence\""));
        assert!(user.contains("Broken streetlight"));
        assert!(user.contains("Dark corner on 5th Ave"));
    }

    #[tokio::test]
    async fn test_invalid_input_skips_model_call() {
        let model = Arc::new(ScriptedModel::new());
        let bad = EchoInput {
            issue_title: "   ".to_string(),
            issue_description: "x".to_string(),
        };

        let result = flow::<EchoInput>(model.clone()).invoke(&bad).await;
        assert!(matches!(result, Err(FlowError::Validation(_))));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_placeholder_is_prompt_error() {
        let model = Arc::new(ScriptedModel::new());
        let result = flow::<IncompleteInput>(model.clone())
            .invoke(&IncompleteInput)
            .await;

        assert!(matches!(result, Err(FlowError::Prompt(_))));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_is_model_output_error() {
        let model = Arc::new(ScriptedModel::new().with_failure("gateway timeout"));
        let result = flow::<EchoInput>(model).invoke(&input()).await;

        assert!(matches!(
            result,
            Err(FlowError::ModelOutput(ModelOutputError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn test_prose_is_unparseable() {
        let model = Arc::new(ScriptedModel::new().with_response("I'd rather not say."));
        let result = flow::<EchoInput>(model).invoke(&input()).await;

        assert!(matches!(
            result,
            Err(FlowError::ModelOutput(ModelOutputError::Unparseable(_)))
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_is_invalid() {
        let model =
            Arc::new(ScriptedModel::new().with_response(r#"{"summary": "ok", "confidence": 7}"#));
        let result = flow::<EchoInput>(model).invoke(&input()).await;

        assert!(matches!(
            result,
            Err(FlowError::ModelOutput(ModelOutputError::Invalid(_)))
        ));
    }
}
