use thiserror::Error;

use crate::core::config::IdentityConfig;
use crate::features::auth::session::ReporterSession;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("User is not authenticated. Cannot save report.")]
    AuthenticationRequired,

    #[error("Could not determine reporter identity. Cannot save report.")]
    IdentityResolution,
}

/// Decide who is filing a report.
///
/// An authenticated session always wins. Without one, mock identity mode
/// substitutes the configured placeholder reporter; otherwise the request is
/// rejected.
pub fn resolve_reporter_id(
    session: &ReporterSession,
    identity: &IdentityConfig,
) -> Result<String, IdentityError> {
    if let Some(user_id) = session.user_id() {
        return Ok(user_id.to_string());
    }

    if !identity.mock_mode {
        return Err(IdentityError::AuthenticationRequired);
    }

    identity
        .mock_reporter_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(IdentityError::IdentityResolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock(reporter: Option<&str>) -> IdentityConfig {
        IdentityConfig {
            mock_mode: true,
            mock_reporter_id: reporter.map(str::to_string),
        }
    }

    #[test]
    fn test_authenticated_session_wins() {
        let session = ReporterSession::authenticated("citizen-9");
        assert_eq!(
            resolve_reporter_id(&session, &IdentityConfig::default()),
            Ok("citizen-9".to_string())
        );
        assert_eq!(
            resolve_reporter_id(&session, &mock(Some("mock-citizen"))),
            Ok("citizen-9".to_string())
        );
    }

    #[test]
    fn test_anonymous_without_mock_mode() {
        let err = resolve_reporter_id(&ReporterSession::anonymous(), &IdentityConfig::default())
            .unwrap_err();
        assert_eq!(err, IdentityError::AuthenticationRequired);
        assert_eq!(
            err.to_string(),
            "User is not authenticated. Cannot save report."
        );
    }

    #[test]
    fn test_mock_mode_uses_placeholder() {
        assert_eq!(
            resolve_reporter_id(&ReporterSession::anonymous(), &mock(Some("mock-citizen"))),
            Ok("mock-citizen".to_string())
        );
    }

    #[test]
    fn test_mock_mode_without_placeholder() {
        for reporter in [None, Some(""), Some("  ")] {
            let err = resolve_reporter_id(&ReporterSession::anonymous(), &mock(reporter))
                .unwrap_err();
            assert_eq!(err, IdentityError::IdentityResolution);
            assert_eq!(
                err.to_string(),
                "Could not determine reporter identity. Cannot save report."
            );
        }
    }
}
