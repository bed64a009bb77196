use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::issues::handlers::{self, IssueState};
use crate::features::issues::services::{IssueService, SubmissionService};

/// Create routes for the issues feature
///
/// Submission routes accept anonymous sessions and let the service decide.
/// Review routes require an official; detail also admits the owner.
pub fn routes(
    issue_service: Arc<IssueService>,
    submission_service: Arc<SubmissionService>,
) -> Router {
    let state = IssueState {
        issue_service,
        submission_service,
    };

    Router::new()
        .route(
            "/api/issues",
            post(handlers::save_report).get(handlers::list_reports),
        )
        .route("/api/issues/submit", post(handlers::submit_report))
        .route("/api/issues/mine", get(handlers::list_my_reports))
        .route("/api/issues/{id}", get(handlers::get_report))
        .route(
            "/api/issues/{id}/status",
            patch(handlers::update_report_status),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::IdentityConfig;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::intake::IntakeService;
    use crate::shared::prompts::PromptEngine;
    use crate::shared::test_helpers::{
        create_citizen_user, create_official_user, with_user, InMemoryIssueStore, ScriptedModel,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn router(store: Arc<InMemoryIssueStore>) -> Router {
        let intake = Arc::new(IntakeService::new(
            Arc::new(ScriptedModel::new()),
            Arc::new(PromptEngine::builtin()),
        ));
        let issues = Arc::new(IssueService::new(store, IdentityConfig::default()));
        let submission = Arc::new(SubmissionService::new(intake, issues.clone()));
        routes(issues, submission)
    }

    fn server_as(store: Arc<InMemoryIssueStore>, user: Option<AuthenticatedUser>) -> TestServer {
        let app = match user {
            Some(user) => with_user(router(store), user),
            None => router(store),
        };
        TestServer::new(app).unwrap()
    }

    fn report_body() -> Value {
        json!({
            "title": "Flooded underpass",
            "description": "Water is knee deep under the rail bridge.",
            "location": "Rail bridge, Station Rd",
            "mediaUrls": ["https://cdn.example.org/b.jpg", "https://cdn.example.org/a.jpg"]
        })
    }

    #[tokio::test]
    async fn test_anonymous_save_is_rejected_without_write() {
        let store = Arc::new(InMemoryIssueStore::new());
        let server = server_as(store.clone(), None);

        let response = server.post("/api/issues").json(&report_body()).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert_eq!(
            body["message"],
            "User is not authenticated. Cannot save report."
        );
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_authenticated_save_returns_issue_id() {
        let store = Arc::new(InMemoryIssueStore::new());
        let server = server_as(store.clone(), Some(create_citizen_user("citizen-5")));

        let response = server.post("/api/issues").json(&report_body()).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["success"], true);
        let stored = store.reports();
        assert_eq!(body["data"]["issueId"], stored[0].id.to_string());
        assert_eq!(
            stored[0].media_urls,
            vec!["https://cdn.example.org/b.jpg", "https://cdn.example.org/a.jpg"]
        );
    }

    #[tokio::test]
    async fn test_save_rejects_blank_title() {
        let store = Arc::new(InMemoryIssueStore::new());
        let server = server_as(store.clone(), Some(create_citizen_user("citizen-5")));
        let mut body = report_body();
        body["title"] = json!(" ");

        let response = server.post("/api/issues").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_saves_with_default_annotations_when_model_is_down() {
        let store = Arc::new(InMemoryIssueStore::new());
        let server = server_as(store.clone(), Some(create_citizen_user("citizen-5")));

        let response = server.post("/api/issues/submit").json(&report_body()).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["status"], "Submitted");
        assert_eq!(body["data"]["aiUrgencyAssessment"]["urgency"], "Unknown");
        assert_eq!(body["data"]["aiClassification"]["category"], "Other");
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_list_requires_official() {
        let store = Arc::new(InMemoryIssueStore::new());

        let citizen = server_as(store.clone(), Some(create_citizen_user("citizen-5")));
        citizen
            .get("/api/issues")
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let anonymous = server_as(store.clone(), None);
        anonymous
            .get("/api/issues")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let official = server_as(store, Some(create_official_user()));
        official.get("/api/issues").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_mine_and_status_workflow() {
        let store = Arc::new(InMemoryIssueStore::new());
        let citizen = server_as(store.clone(), Some(create_citizen_user("citizen-5")));
        citizen.post("/api/issues").json(&report_body()).await;
        let id = store.reports()[0].id;

        let mine: Value = citizen.get("/api/issues/mine").await.json();
        assert_eq!(mine["meta"]["total"], 1);

        citizen
            .patch(&format!("/api/issues/{}/status", id))
            .json(&json!({ "status": "Resolved" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let official = server_as(store.clone(), Some(create_official_user()));
        let response = official
            .patch(&format!("/api/issues/{}/status", id))
            .json(&json!({ "status": "InProgress", "note": "Pumps on the way" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["status"], "InProgress");
        assert_eq!(body["data"]["statusNote"], "Pumps on the way");

        let filtered: Value = official
            .get("/api/issues")
            .add_query_param("status", "InProgress")
            .await
            .json();
        assert_eq!(filtered["meta"]["total"], 1);

        let detail = citizen.get(&format!("/api/issues/{}", id)).await;
        detail.assert_status_ok();
    }
}
