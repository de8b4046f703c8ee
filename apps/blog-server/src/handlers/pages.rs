//! Public and admin pages.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::Identity;
use inkwell_shared::dto::{AdminPage, ContentPage, HomePage};

use crate::content::{ABOUT_CONTENT, CONTACT_CONTENT, HOME_STARTING_CONTENT};
use crate::handlers::post_view;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::identity::{Admin, CurrentIdentity, viewer_of};
use crate::state::AppState;

/// GET /
pub async fn home(state: web::Data<AppState>, current: CurrentIdentity) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await.map_err(AppError::on_read)?;

    Ok(HttpResponse::Ok().json(HomePage {
        starting_content: HOME_STARTING_CONTENT.to_string(),
        posts: posts.iter().map(post_view).collect(),
        viewer: current.viewer(),
    }))
}

/// GET /about
pub async fn about(current: CurrentIdentity) -> HttpResponse {
    static_page("about", ABOUT_CONTENT, &current)
}

/// GET /contact
pub async fn contact(current: CurrentIdentity) -> HttpResponse {
    static_page("contact", CONTACT_CONTENT, &current)
}

fn static_page(page: &str, content: &str, current: &CurrentIdentity) -> HttpResponse {
    HttpResponse::Ok().json(ContentPage {
        page: page.to_string(),
        content: content.to_string(),
        viewer: current.viewer(),
    })
}

/// GET /admin - admins only.
pub async fn admin(state: web::Data<AppState>, admin: Admin) -> AppResult<HttpResponse> {
    let post_count = state.posts.list().await.map_err(AppError::on_read)?.len();
    let identity = Identity::Authenticated(admin.0);

    Ok(HttpResponse::Ok().json(AdminPage {
        viewer: viewer_of(&identity),
        post_count,
    }))
}
