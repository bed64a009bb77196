use crate::features::auth::model::AuthenticatedUser;

/// Per-request reporter context.
///
/// Built from the validated bearer token at the start of each request and
/// dropped with it. Services receive it explicitly; there is no process-wide
/// "current user".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReporterSession {
    user_id: Option<String>,
}

impl ReporterSession {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn from_user(user: &AuthenticatedUser) -> Self {
        Self::authenticated(user.sub.clone())
    }

    /// Authenticated user id, ignoring blank subjects
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.trim().is_empty())
    }
}
