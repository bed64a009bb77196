use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::llm::LlmResponse;
use crate::shared::validation::validate_not_blank;

pub const SUMMARY_FALLBACK_TEXT: &str = "Could not generate summary.";

/// Short summary of a report for officials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate, ToSchema)]
pub struct SummaryResult {
    /// One or two sentence summary of the issue
    #[validate(custom(function = "validate_not_blank"))]
    pub summary: String,

    /// Confidence in the summary, from 0 to 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: Option<f64>,
}

impl LlmResponse for SummaryResult {}

impl SummaryResult {
    pub fn fallback() -> Self {
        Self {
            summary: SUMMARY_FALLBACK_TEXT.to_string(),
            confidence: Some(0.0),
        }
    }
}
