use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::intake::models as intake_models;
use crate::features::intake::{dtos as intake_dtos, handlers as intake_handlers};
use crate::features::issues::models as issues_models;
use crate::features::issues::{dtos as issues_dtos, handlers as issues_handlers};
use crate::features::media::{dtos as media_dtos, handlers as media_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Intake (AI flows)
        intake_handlers::list_categories,
        intake_handlers::categorize,
        intake_handlers::assess_urgency,
        intake_handlers::summarize,
        // Issues
        issues_handlers::save_report,
        issues_handlers::submit_report,
        issues_handlers::list_my_reports,
        issues_handlers::list_reports,
        issues_handlers::get_report,
        issues_handlers::update_report_status,
        // Media
        media_handlers::upload_media,
    ),
    components(
        schemas(
            Meta,
            // Intake
            intake_dtos::CategorizeRequestDto,
            intake_dtos::IssueTextRequestDto,
            intake_models::ClassificationResult,
            intake_models::UrgencyLevel,
            intake_models::UrgencyAssessment,
            intake_models::SummaryResult,
            ApiResponse<Vec<String>>,
            ApiResponse<intake_models::ClassificationResult>,
            ApiResponse<intake_models::UrgencyAssessment>,
            ApiResponse<intake_models::SummaryResult>,
            // Issues
            issues_models::IssueStatus,
            issues_dtos::ReportFormDto,
            issues_dtos::SaveReportDto,
            issues_dtos::SubmitReportDto,
            issues_dtos::SaveReportResponseDto,
            issues_dtos::IssueReportResponseDto,
            issues_dtos::UpdateIssueStatusDto,
            ApiResponse<issues_dtos::SaveReportResponseDto>,
            ApiResponse<issues_dtos::IssueReportResponseDto>,
            ApiResponse<Vec<issues_dtos::IssueReportResponseDto>>,
            // Media
            media_dtos::UploadMediaDto,
            media_dtos::MediaUploadResponseDto,
            ApiResponse<media_dtos::MediaUploadResponseDto>,
        )
    ),
    tags(
        (name = "intake", description = "AI categorization, urgency assessment and summarization"),
        (name = "issues", description = "Citizen issue reports and the review workflow"),
        (name = "media", description = "Photo and video uploads for reports"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Civic Intake API",
        version = "0.1.0",
        description = "API documentation for the civic issue intake service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/intake/categories",
            "/api/intake/categorize",
            "/api/intake/urgency",
            "/api/intake/summary",
            "/api/issues",
            "/api/issues/submit",
            "/api/issues/mine",
            "/api/issues/{id}",
            "/api/issues/{id}/status",
            "/api/media",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Intake (staging)".to_string(),
            version: "9.9.9".to_string(),
            description: "staging build".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Intake (staging)");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
