use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::intake::handlers::{self, IntakeState};
use crate::features::intake::services::IntakeService;

/// Create routes for the intake feature
///
/// All routes are public; they only return suggestions and never write.
pub fn routes(intake_service: Arc<IntakeService>) -> Router {
    let state = IntakeState { intake_service };

    Router::new()
        .route("/api/intake/categories", get(handlers::list_categories))
        .route("/api/intake/categorize", post(handlers::categorize))
        .route("/api/intake/urgency", post(handlers::assess_urgency))
        .route("/api/intake/summary", post(handlers::summarize))
        .with_state(state)
}
