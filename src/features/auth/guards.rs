//! Role-based authorization guards.
//!
//! Officials (and admins) review citizen reports and own the status workflow.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for official-level access.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireOfficial(user): RequireOfficial) { ... }
/// ```
pub struct RequireOfficial(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireOfficial
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.has_official_access() {
            return Err(AppError::Forbidden("Official access required".to_string()));
        }

        Ok(RequireOfficial(user.clone()))
    }
}
