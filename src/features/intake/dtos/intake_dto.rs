use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for category suggestion
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorizeRequestDto {
    /// Report text to classify, typically the title and description joined
    pub report_content: String,
}

/// Request body for urgency assessment and summarization
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueTextRequestDto {
    pub issue_title: String,
    pub issue_description: String,
}
