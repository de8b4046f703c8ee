//! Data Transfer Objects - form payloads and the page data handed to renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `POST /register` form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    /// Checkbox value; only the literal `"true"` requests the admin role.
    #[serde(rename = "isAdmin", default)]
    pub is_admin: Option<String>,
}

impl RegisterForm {
    pub fn requests_admin(&self) -> bool {
        self.is_admin.as_deref() == Some("true")
    }
}

/// `POST /login` form. The identifier is the account email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

/// `POST /compose` and `POST /posts/{id}/edit` form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostForm {
    #[serde(rename = "postTitle")]
    pub title: String,
    #[serde(rename = "postBody", default)]
    pub body: String,
}

/// Who is looking at the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Viewer {
    pub authenticated: bool,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A post as shown in listings and on its own page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePage {
    pub starting_content: String,
    pub posts: Vec<PostView>,
    pub viewer: Viewer,
}

/// `GET /posts/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    pub post: PostView,
    /// True when the viewer may edit or delete this post.
    pub editable: bool,
    pub viewer: Viewer,
}

/// `GET /posts/{id}/edit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPage {
    pub post: PostView,
    pub viewer: Viewer,
}

/// Static pages: about, contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPage {
    pub page: String,
    pub content: String,
    pub viewer: Viewer,
}

/// Pages that only show a form: register, login, compose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormPage {
    pub form: String,
    pub action: String,
    pub viewer: Viewer,
}

/// `GET /admin`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminPage {
    pub viewer: Viewer,
    pub post_count: usize,
}
