//! HTTP handlers and route configuration.

mod auth;
mod health;
mod pages;
mod posts;


use actix_web::{HttpRequest, error::UrlencodedError, web};

use inkwell_core::domain::Post;
use inkwell_shared::dto::PostView;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::AppState;

/// Register shared state and every route on `cfg`.
pub fn configure_app(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.clone()))
        .app_data(web::FormConfig::default().error_handler(reject_form));
    configure_routes(cfg, state);
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.route("/", web::get().to(pages::home))
        .route("/about", web::get().to(pages::about))
        .route("/contact", web::get().to(pages::contact))
        .route("/health", web::get().to(health::health_check))
        // Credential endpoints
        .service(
            web::resource("/register")
                .wrap(RateLimitMiddleware::new(
                    state.login_limiter.clone(),
                    state.settings.trust_proxy_headers,
                ))
                .route(web::get().to(auth::register_page))
                .route(web::post().to(auth::register)),
        )
        .service(
            web::resource("/login")
                .wrap(RateLimitMiddleware::new(
                    state.login_limiter.clone(),
                    state.settings.trust_proxy_headers,
                ))
                .route(web::get().to(auth::login_page))
                .route(web::post().to(auth::login)),
        )
        .route("/logout", web::post().to(auth::logout))
        // Protected routes
        .route("/admin", web::get().to(pages::admin))
        .service(
            web::resource("/compose")
                .route(web::get().to(posts::compose_page))
                .route(web::post().to(posts::compose)),
        )
        .service(
            web::scope("/posts")
                .route("/{id}", web::get().to(posts::show))
                .route("/{id}/edit", web::get().to(posts::edit_page))
                .route("/{id}/edit", web::post().to(posts::update))
                .route("/{id}/delete", web::post().to(posts::delete)),
        );
}

/// Malformed form bodies send the visitor back to the form they came from.
fn reject_form(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, path = %req.path(), "Form body rejected");
    AppError::redirect(req.path()).into()
}

pub(crate) fn post_view(post: &Post) -> PostView {
    PostView {
        id: post.id,
        author_id: post.author_id,
        title: post.title.clone(),
        content: post.content.clone(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}
