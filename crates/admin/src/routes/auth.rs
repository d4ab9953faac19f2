//! Authentication route handlers for admin.
//!
//! Email and password login with lockout, and logout.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{LOGIN_PATH, OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::routes::dashboard::DASHBOARD_PATH;
use crate::services::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "login.html")]
struct LoginPageTemplate {
    page_title: String,
    email: String,
    error: Option<String>,
}

impl LoginPageTemplate {
    fn new(email: impl Into<String>, error: Option<String>) -> Self {
        Self {
            page_title: "Connexion".to_string(),
            email: email.into(),
            error,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page).post(login))
        .route("/admin/logout", post(logout))
}

fn render_login(status: StatusCode, template: &LoginPageTemplate) -> Response {
    let body = template
        .render()
        .unwrap_or_else(|_| String::from("Error rendering template"));
    (status, Html(body)).into_response()
}

/// Render the login page, or skip it when already signed in.
///
/// GET /admin/login
async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    render_login(StatusCode::OK, &LoginPageTemplate::new("", None))
}

/// Check credentials and open an admin session.
///
/// POST /admin/login
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let service = AdminAuthService::new(state.pool(), state.login_attempts());

    let user = match service.authenticate(&form.email, &form.password).await {
        Ok(user) => user,
        Err(e) => {
            let (status, message) = match &e {
                AdminAuthError::LockedOut => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "Trop de tentatives échouées. Réessayez plus tard.",
                ),
                AdminAuthError::InvalidCredentials | AdminAuthError::InvalidEmail(_) => (
                    StatusCode::UNAUTHORIZED,
                    "Email ou mot de passe incorrect.",
                ),
                AdminAuthError::NotAdmin => (
                    StatusCode::FORBIDDEN,
                    "Accès réservé aux administrateurs.",
                ),
                AdminAuthError::Hash(_) | AdminAuthError::Repository(_) => {
                    tracing::error!(error = %e, "login failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Une erreur interne est survenue.",
                    )
                }
            };
            let template = LoginPageTemplate::new(form.email, Some(message.to_string()));
            return render_login(status, &template);
        }
    };

    let admin = CurrentAdmin::from(&user);
    if let Err(e) = set_current_admin(&session, &admin).await {
        tracing::error!(error = %e, "failed to store admin session");
        let template = LoginPageTemplate::new(
            form.email,
            Some("Une erreur interne est survenue.".to_string()),
        );
        return render_login(StatusCode::INTERNAL_SERVER_ERROR, &template);
    }

    set_sentry_user(admin.id, Some(admin.email.as_str()));
    tracing::info!(user_id = %admin.id, "admin logged in");

    Redirect::to(DASHBOARD_PATH).into_response()
}

/// Logout and clear session.
///
/// POST /admin/logout
async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!(error = %e, "failed to clear admin session");
    }
    clear_sentry_user();

    Redirect::to(LOGIN_PATH)
}
