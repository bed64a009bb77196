use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireOfficial;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::session::ReporterSession;
use crate::features::issues::dtos::{
    IssueFilterQuery, IssueReportResponseDto, SaveReportDto, SaveReportResponseDto,
    SubmitReportDto, UpdateIssueStatusDto,
};
use crate::features::issues::services::{IssueService, SubmissionService};
use crate::shared::types::{ApiResponse, PaginationQuery};

/// State for issue handlers
#[derive(Clone)]
pub struct IssueState {
    pub issue_service: Arc<IssueService>,
    pub submission_service: Arc<SubmissionService>,
}

/// Save a report together with AI annotations computed earlier
///
/// Success returns `data: {success: true, issueId}`. Failure returns the
/// standard error envelope: `success: false` with the reason in `message`
/// and `data` null.
#[utoipa::path(
    post,
    path = "/api/issues",
    request_body = SaveReportDto,
    responses(
        (status = 201, description = "Report saved", body = ApiResponse<SaveReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Reporter is not authenticated; `message` holds the reason"),
        (status = 403, description = "Store refused the write; `message` holds the reason"),
        (status = 503, description = "Reporter identity could not be determined")
    ),
    security((), ("bearer_auth" = [])),
    tag = "issues"
)]
pub async fn save_report(
    session: ReporterSession,
    State(state): State<IssueState>,
    AppJson(dto): AppJson<SaveReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<SaveReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .issue_service
        .save_report(dto.into(), &session)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(SaveReportResponseDto {
                success: true,
                issue_id: report.id,
            }),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// Annotate a report with AI category, urgency and summary, then save it
#[utoipa::path(
    post,
    path = "/api/issues/submit",
    request_body = SubmitReportDto,
    responses(
        (status = 201, description = "Report annotated and saved", body = ApiResponse<IssueReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Reporter is not authenticated"),
        (status = 403, description = "Store refused the write")
    ),
    security((), ("bearer_auth" = [])),
    tag = "issues"
)]
pub async fn submit_report(
    session: ReporterSession,
    State(state): State<IssueState>,
    AppJson(dto): AppJson<SubmitReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<IssueReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .submission_service
        .submit(dto.form.into(), dto.media_urls, &session)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// List reports filed by the current reporter
#[utoipa::path(
    get,
    path = "/api/issues/mine",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Reporter's reports", body = ApiResponse<Vec<IssueReportResponseDto>>),
        (status = 401, description = "Reporter is not authenticated")
    ),
    security((), ("bearer_auth" = [])),
    tag = "issues"
)]
pub async fn list_my_reports(
    session: ReporterSession,
    State(state): State<IssueState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<IssueReportResponseDto>>>> {
    let (reports, meta) = state
        .issue_service
        .list_mine(&session, &pagination)
        .await?;
    let dtos: Vec<IssueReportResponseDto> = reports.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(meta))))
}

/// List all reports (officials only)
#[utoipa::path(
    get,
    path = "/api/issues",
    params(PaginationQuery, IssueFilterQuery),
    responses(
        (status = 200, description = "Paginated reports", body = ApiResponse<Vec<IssueReportResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Official access required")
    ),
    security(("bearer_auth" = [])),
    tag = "issues"
)]
pub async fn list_reports(
    RequireOfficial(_official): RequireOfficial,
    State(state): State<IssueState>,
    Query(pagination): Query<PaginationQuery>,
    Query(filter): Query<IssueFilterQuery>,
) -> Result<Json<ApiResponse<Vec<IssueReportResponseDto>>>> {
    let (reports, meta) = state
        .issue_service
        .list(&filter.into(), &pagination)
        .await?;
    let dtos: Vec<IssueReportResponseDto> = reports.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(meta))))
}

/// Get report detail (officials, or the reporter who filed it)
#[utoipa::path(
    get,
    path = "/api/issues/{id}",
    params(
        ("id" = Uuid, Path, description = "Issue report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<IssueReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "issues"
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(state): State<IssueState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<IssueReportResponseDto>>> {
    let report = state.issue_service.get_for_viewer(id, &user).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// Move a report through the review workflow (officials only)
#[utoipa::path(
    patch,
    path = "/api/issues/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Issue report ID")
    ),
    request_body = UpdateIssueStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<IssueReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Official access required"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Transition not allowed from the current status")
    ),
    security(("bearer_auth" = [])),
    tag = "issues"
)]
pub async fn update_report_status(
    RequireOfficial(official): RequireOfficial,
    State(state): State<IssueState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateIssueStatusDto>,
) -> Result<Json<ApiResponse<IssueReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .issue_service
        .update_status(id, dto.status, dto.note, &official)
        .await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}
