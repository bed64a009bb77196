use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::constants::FALLBACK_CATEGORY;
use crate::shared::llm::LlmResponse;
use crate::shared::validation::validate_not_blank;

/// Suggested category for a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Validate, ToSchema)]
pub struct ClassificationResult {
    /// Best-fitting category name from the list given in the prompt
    #[validate(custom(function = "validate_not_blank"))]
    pub category: String,

    /// Confidence in the category, from 0 to 1
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
}

impl LlmResponse for ClassificationResult {}

impl ClassificationResult {
    /// Result used when the model gave nothing usable
    pub fn fallback() -> Self {
        Self {
            category: FALLBACK_CATEGORY.to_string(),
            confidence: 0.0,
        }
    }
}
