//! Error responses.
//!
//! Users only ever see a redirect for bad input, failed logins and denied
//! access. Missing pages and server faults get an RFC 7807 body.

use std::fmt;
use std::time::Duration;

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use inkwell_core::DomainError;
use inkwell_shared::ErrorResponse;

/// Where anonymous or under-privileged visitors are sent.
pub const LOGIN_PATH: &str = "/login";
/// Failure-safe landing page.
pub const HOME_PATH: &str = "/";

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Answer with `303 See Other` to the given path.
    Redirect(String),
    NotFound(String),
    TooManyRequests { retry_after: Duration },
    Internal(String),
}

impl AppError {
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect(to.into())
    }

    /// Policy for page reads: a missing resource is a 404, a store failure
    /// a 500, anything identity-related a trip to the login page.
    pub fn on_read(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                Self::NotFound(format!("{entity_type} not found"))
            }
            DomainError::Authentication | DomainError::Authorization => {
                Self::redirect(LOGIN_PATH)
            }
            DomainError::Validation(_) | DomainError::Duplicate(_) => Self::redirect(HOME_PATH),
            fault => Self::Internal(fault.to_string()),
        }
    }

    /// Policy for form submissions and owner-only pages: never render an
    /// error, always redirect somewhere safe.
    ///
    /// Missing or foreign posts go home, identity failures to the login page,
    /// everything else (bad input, store failures) back to `fallback`.
    pub fn on_write(err: DomainError, fallback: &str) -> Self {
        match err {
            DomainError::Authentication | DomainError::Authorization => {
                Self::redirect(LOGIN_PATH)
            }
            DomainError::NotFound { .. } => Self::redirect(HOME_PATH),
            DomainError::Validation(msg) | DomainError::Duplicate(msg) => {
                tracing::debug!(reason = %msg, redirect = %fallback, "Form rejected");
                Self::redirect(fallback)
            }
            fault => {
                tracing::error!(error = %fault, redirect = %fallback, "Write aborted");
                Self::redirect(fallback)
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Redirect(to) => write!(f, "Redirect to {to}"),
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::TooManyRequests { retry_after } => {
                write!(f, "Too many requests, retry after {}s", retry_after.as_secs())
            }
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Redirect(_) => StatusCode::SEE_OTHER,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Redirect(to) => see_other(to),
            AppError::NotFound(detail) => {
                HttpResponse::NotFound().json(ErrorResponse::not_found(detail))
            }
            AppError::TooManyRequests { retry_after } => {
                let secs = retry_after.as_secs().max(1);
                HttpResponse::TooManyRequests()
                    .insert_header((header::RETRY_AFTER, secs.to_string()))
                    .json(ErrorResponse::too_many_requests(secs))
            }
            AppError::Internal(detail) => {
                // Details stay in the logs.
                tracing::error!("Internal error: {}", detail);
                HttpResponse::InternalServerError().json(ErrorResponse::internal_error())
            }
        }
    }
}

/// A `303 See Other` to `to`.
pub fn see_other(to: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, to))
        .finish()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::error::RepoError;
    use uuid::Uuid;

    fn location(err: &AppError) -> Option<String> {
        err.error_response()
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    #[test]
    fn test_write_failures_always_redirect() {
        let store = AppError::on_write(DomainError::Store(RepoError::Query("x".into())), "/compose");
        assert_eq!(store.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(location(&store).as_deref(), Some("/compose"));

        let foreign = AppError::on_write(DomainError::post_not_found(Uuid::new_v4()), "/compose");
        assert_eq!(location(&foreign).as_deref(), Some("/"));

        let anonymous = AppError::on_write(DomainError::Authentication, "/compose");
        assert_eq!(location(&anonymous).as_deref(), Some("/login"));
    }

    #[test]
    fn test_read_failures() {
        let missing = AppError::on_read(DomainError::post_not_found(Uuid::new_v4()));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

        let store = AppError::on_read(DomainError::Store(RepoError::Connection("down".into())));
        assert_eq!(store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let forbidden = AppError::on_read(DomainError::Authorization);
        assert_eq!(location(&forbidden).as_deref(), Some("/login"));
    }
}
