//! Post pages and author-only edits.
//!
//! Path ids are parsed by hand so a malformed id is handled like an unknown
//! one instead of surfacing as an extractor error.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_core::services::require_ownership;
use inkwell_core::DomainError;
use inkwell_shared::dto::{EditPage, FormPage, PostForm, PostPage};

use crate::handlers::post_view;
use crate::middleware::error::{AppError, AppResult, HOME_PATH, see_other};
use crate::middleware::identity::{Authenticated, CurrentIdentity};
use crate::state::AppState;

const COMPOSE_PATH: &str = "/compose";

fn parse_post_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::post_not_found(Uuid::nil()))
}

/// GET /compose
pub async fn compose_page(_user: Authenticated, current: CurrentIdentity) -> HttpResponse {
    HttpResponse::Ok().json(FormPage {
        form: "compose".to_string(),
        action: COMPOSE_PATH.to_string(),
        viewer: current.viewer(),
    })
}

/// POST /compose
pub async fn compose(
    user: Authenticated,
    state: web::Data<AppState>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .compose(&user, &form.title, &form.body)
        .await
        .map_err(|e| AppError::on_write(e, COMPOSE_PATH))?;

    Ok(see_other(HOME_PATH))
}

/// GET /posts/{id}
pub async fn show(
    state: web::Data<AppState>,
    current: CurrentIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path).map_err(AppError::on_read)?;
    let post = state.posts.get(id).await.map_err(AppError::on_read)?;
    let editable = require_ownership(&current, id, Some(&post)).is_ok();

    Ok(HttpResponse::Ok().json(PostPage {
        post: post_view(&post),
        editable,
        viewer: current.viewer(),
    }))
}

/// GET /posts/{id}/edit - owner only.
pub async fn edit_page(
    user: Authenticated,
    state: web::Data<AppState>,
    current: CurrentIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = async {
        let id = parse_post_id(&path)?;
        state.posts.find_owned(&user, id).await
    }
    .await
    .map_err(|e| AppError::on_write(e, HOME_PATH))?;

    Ok(HttpResponse::Ok().json(EditPage {
        post: post_view(&post),
        viewer: current.viewer(),
    }))
}

/// POST /posts/{id}/edit - owner only.
pub async fn update(
    user: Authenticated,
    state: web::Data<AppState>,
    path: web::Path<String>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path).map_err(|e| AppError::on_write(e, HOME_PATH))?;
    state
        .posts
        .update_owned(&user, id, &form.title, &form.body)
        .await
        .map_err(|e| AppError::on_write(e, HOME_PATH))?;

    Ok(see_other(HOME_PATH))
}

/// POST /posts/{id}/delete - owner only.
pub async fn delete(
    user: Authenticated,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path).map_err(|e| AppError::on_write(e, HOME_PATH))?;
    state
        .posts
        .delete_owned(&user, id)
        .await
        .map_err(|e| AppError::on_write(e, HOME_PATH))?;

    Ok(see_other(HOME_PATH))
}
