use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::intake::dtos::{CategorizeRequestDto, IssueTextRequestDto};
use crate::features::intake::models::{ClassificationResult, SummaryResult, UrgencyAssessment};
use crate::features::intake::services::IntakeService;
use crate::shared::constants::ISSUE_CATEGORIES;
use crate::shared::types::ApiResponse;

/// State for intake handlers
#[derive(Clone)]
pub struct IntakeState {
    pub intake_service: Arc<IntakeService>,
}

/// List the category taxonomy offered to reporters and the model
#[utoipa::path(
    get,
    path = "/api/intake/categories",
    responses(
        (status = 200, description = "Issue categories", body = ApiResponse<Vec<String>>)
    ),
    tag = "intake"
)]
pub async fn list_categories() -> Json<ApiResponse<Vec<String>>> {
    let categories = ISSUE_CATEGORIES.iter().map(|c| c.to_string()).collect();
    Json(ApiResponse::success(Some(categories), None, None))
}

/// Suggest a category for report text
#[utoipa::path(
    post,
    path = "/api/intake/categorize",
    request_body = CategorizeRequestDto,
    responses(
        (status = 200, description = "Suggested category", body = ApiResponse<ClassificationResult>),
        (status = 400, description = "Empty report content")
    ),
    tag = "intake"
)]
pub async fn categorize(
    State(state): State<IntakeState>,
    AppJson(dto): AppJson<CategorizeRequestDto>,
) -> Result<Json<ApiResponse<ClassificationResult>>> {
    let result = state.intake_service.categorize(&dto.report_content).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Assess how urgent a report is
#[utoipa::path(
    post,
    path = "/api/intake/urgency",
    request_body = IssueTextRequestDto,
    responses(
        (status = 200, description = "Urgency assessment", body = ApiResponse<UrgencyAssessment>),
        (status = 400, description = "Empty title or description")
    ),
    tag = "intake"
)]
pub async fn assess_urgency(
    State(state): State<IntakeState>,
    AppJson(dto): AppJson<IssueTextRequestDto>,
) -> Result<Json<ApiResponse<UrgencyAssessment>>> {
    let result = state
        .intake_service
        .assess_urgency(&dto.issue_title, &dto.issue_description)
        .await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Summarize a report in one or two sentences
#[utoipa::path(
    post,
    path = "/api/intake/summary",
    request_body = IssueTextRequestDto,
    responses(
        (status = 200, description = "Report summary", body = ApiResponse<SummaryResult>),
        (status = 400, description = "Empty title or description")
    ),
    tag = "intake"
)]
pub async fn summarize(
    State(state): State<IntakeState>,
    AppJson(dto): AppJson<IssueTextRequestDto>,
) -> Result<Json<ApiResponse<SummaryResult>>> {
    let result = state
        .intake_service
        .summarize(&dto.issue_title, &dto.issue_description)
        .await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}
