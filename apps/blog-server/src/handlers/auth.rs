//! Registration, login and logout.

use actix_web::{HttpResponse, web};

use inkwell_shared::dto::{FormPage, LoginForm, RegisterForm};

use crate::middleware::error::{AppError, AppResult, HOME_PATH, LOGIN_PATH, see_other};
use crate::middleware::identity::{CurrentIdentity, removal_cookie, session_cookie};
use crate::state::AppState;

const REGISTER_PATH: &str = "/register";

/// GET /register
pub async fn register_page(current: CurrentIdentity) -> HttpResponse {
    HttpResponse::Ok().json(FormPage {
        form: "register".to_string(),
        action: REGISTER_PATH.to_string(),
        viewer: current.viewer(),
    })
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    form: web::Form<RegisterForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let is_admin = form.requests_admin() && state.settings.admin_signup_enabled;
    if form.requests_admin() && !is_admin {
        tracing::debug!("Admin signup requested while disabled; registering a regular user");
    }

    state
        .auth
        .register(&form.email, &form.password, is_admin)
        .await
        .map_err(|e| AppError::on_write(e, REGISTER_PATH))?;

    Ok(see_other(LOGIN_PATH))
}

/// GET /login
pub async fn login_page(current: CurrentIdentity) -> HttpResponse {
    HttpResponse::Ok().json(FormPage {
        form: "login".to_string(),
        action: LOGIN_PATH.to_string(),
        viewer: current.viewer(),
    })
}

/// POST /login - opens a session and hands its token to the browser.
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let session = state
        .auth
        .login(&form.username, &form.password)
        .await
        .map_err(|e| AppError::on_write(e, LOGIN_PATH))?;

    let mut response = see_other(HOME_PATH);
    response
        .add_cookie(&session_cookie(&state.settings.session, &session))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

/// POST /logout
pub async fn logout(state: web::Data<AppState>, current: CurrentIdentity) -> HttpResponse {
    if let Some(token) = current.token.as_deref() {
        // The cookie is cleared either way.
        if let Err(e) = state.auth.logout(token).await {
            tracing::warn!(error = %e, "Failed to delete session on logout");
        }
    }

    let mut response = see_other(HOME_PATH);
    if let Err(e) = response.add_cookie(&removal_cookie(&state.settings.session)) {
        tracing::error!(error = %e, "Failed to attach removal cookie");
    }
    response
}
