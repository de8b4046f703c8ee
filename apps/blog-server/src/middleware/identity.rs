//! Session cookie handling and identity extractors.
//!
//! Every extractor resolves the session cookie through
//! [`AuthService::resolve_session`](inkwell_core::services::AuthService::resolve_session)
//! once per request and caches the result in the request extensions.
//!
//! ```ignore
//! async fn compose(user: Authenticated) -> impl Responder {
//!     format!("Writing as {}", user.email)
//! }
//! ```

use std::ops::Deref;

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;

use inkwell_core::domain::{CurrentUser, Identity, Session};
use inkwell_core::services::{require_admin, require_authenticated};
use inkwell_shared::dto::Viewer;

use crate::config::SessionConfig;
use crate::middleware::error::AppError;
use crate::state::AppState;

/// Identity of the current request plus the raw token it came from.
/// Never fails: visitors without a valid session are anonymous.
#[derive(Debug, Clone)]
pub struct CurrentIdentity {
    pub identity: Identity,
    pub token: Option<String>,
}

impl CurrentIdentity {
    pub fn viewer(&self) -> Viewer {
        viewer_of(&self.identity)
    }
}

impl Deref for CurrentIdentity {
    type Target = Identity;

    fn deref(&self) -> &Identity {
        &self.identity
    }
}

impl FromRequest for CurrentIdentity {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        if let Some(cached) = req.extensions().get::<CurrentIdentity>() {
            let cached = cached.clone();
            return Box::pin(async move { Ok(cached) });
        }

        let req = req.clone();
        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>() else {
                tracing::error!("AppState not found in app data");
                return Ok(CurrentIdentity {
                    identity: Identity::Anonymous,
                    token: None,
                });
            };

            let token = req
                .cookie(&state.settings.session.cookie_name)
                .map(|c| c.value().to_string());
            let identity = state.auth.resolve_session(token.as_deref()).await;

            let resolved = CurrentIdentity { identity, token };
            req.extensions_mut().insert(resolved.clone());
            Ok(resolved)
        })
    }
}

/// A signed-in user. Anonymous requests are redirected to the login page.
#[derive(Debug, Clone)]
pub struct Authenticated(pub CurrentUser);

impl Deref for Authenticated {
    type Target = CurrentUser;

    fn deref(&self) -> &CurrentUser {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let current = CurrentIdentity::from_request(req, payload);
        Box::pin(async move {
            let current = current.await?;
            require_authenticated(&current.identity)
                .map(|user| Authenticated(user.clone()))
                .map_err(|e| AppError::on_read(e).into())
        })
    }
}

/// A signed-in admin. Everyone else is redirected to the login page.
#[derive(Debug, Clone)]
pub struct Admin(pub CurrentUser);

impl FromRequest for Admin {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let current = CurrentIdentity::from_request(req, payload);
        Box::pin(async move {
            let current = current.await?;
            require_admin(&current.identity)
                .map(|user| Admin(user.clone()))
                .map_err(|e| {
                    tracing::debug!(error = %e, "Admin page denied");
                    AppError::on_read(e).into()
                })
        })
    }
}

/// Page-level view of an identity.
pub fn viewer_of(identity: &Identity) -> Viewer {
    match identity.user() {
        Some(user) => Viewer {
            authenticated: true,
            is_admin: user.is_admin,
            email: Some(user.email.clone()),
        },
        None => Viewer::default(),
    }
}

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(config: &SessionConfig, session: &Session) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone(), session.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(CookieDuration::seconds(session.remaining().num_seconds()))
        .finish()
}

/// Cookie that makes the browser forget the session token.
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(config.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn test_session_cookie_attributes() {
        let config = SessionConfig::default();
        let session = Session::new(Uuid::new_v4(), Duration::hours(1));

        let cookie = session_cookie(&config, &session);

        assert_eq!(cookie.name(), "inkwell_session");
        assert_eq!(cookie.value(), session.token);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        let max_age = cookie.max_age().unwrap().whole_seconds();
        assert!((3590..=3600).contains(&max_age));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie(&SessionConfig::default());

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age().unwrap().whole_seconds(), 0);
    }

    #[test]
    fn test_viewer_of_anonymous() {
        let viewer = viewer_of(&Identity::Anonymous);
        assert!(!viewer.authenticated);
        assert!(viewer.email.is_none());
    }
}
