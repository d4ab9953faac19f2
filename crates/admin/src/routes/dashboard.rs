//! Dashboard route handler.

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use tracing::instrument;

use crate::{
    dto::{CategorySales, DashboardStats, RecentActivity, SalesTrend, TopSellingProductDto},
    filters,
    middleware::auth::RequireAdminAuth,
    models::CurrentAdmin,
    services::ServiceError,
    state::AppState,
};

pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Shown instead of the dashboard when any of its data fails to load.
const LOAD_ERROR: &str = "Erreur lors du chargement du tableau de bord";

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(DASHBOARD_PATH, get(dashboard))
        .route("/admin/dashboard/", get(redirect_to_dashboard))
        .route("/admin/dashboard/{*rest}", get(redirect_to_dashboard))
}

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
        }
    }
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub page_title: String,
    pub active_menu: String,
    pub admin_user: AdminUserView,
    pub stats: DashboardStats,
    pub recent_activity: Vec<RecentActivity>,
    pub sales_trends: SalesTrend,
    pub top_products: Vec<TopSellingProductDto>,
    pub sales_by_category: Vec<CategorySales>,
    pub total_promotions: i64,
    pub active_promotions: i64,
    pub expired_promotions: i64,
}

/// Generic error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub page_title: String,
    pub error: String,
}

impl ErrorTemplate {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            page_title: "Erreur".to_string(),
            error: error.into(),
        }
    }
}

async fn load_dashboard(
    state: &AppState,
    admin: &CurrentAdmin,
) -> Result<DashboardTemplate, ServiceError> {
    let stats = state.dashboard().dashboard_stats().await?;
    let recent_activity = state.dashboard().recent_activity().await?;

    let promotions = state.promotions();
    let total_promotions = promotions.total_promotions().await?;
    let active_promotions = promotions.active_promotions().await?;
    let expired_promotions = promotions.expired_promotions().await?;

    Ok(DashboardTemplate {
        page_title: "Tableau de bord".to_string(),
        active_menu: "dashboard".to_string(),
        admin_user: AdminUserView::from(admin),
        sales_trends: stats.sales_trends.clone().unwrap_or_default(),
        top_products: stats.top_products.clone(),
        sales_by_category: stats.sales_by_category.clone(),
        stats,
        recent_activity,
        total_promotions,
        active_promotions,
        expired_promotions,
    })
}

fn render_error(message: &str) -> Response {
    let body = ErrorTemplate::new(message).render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        message.to_string()
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
}

/// Dashboard page handler.
///
/// GET /admin/dashboard
#[instrument(skip(admin, state), fields(admin = %admin.email))]
pub async fn dashboard(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Response {
    let template = match load_dashboard(&state, &admin).await {
        Ok(template) => template,
        Err(e) => {
            tracing::error!(error = %e, "failed to load dashboard");
            return render_error(LOAD_ERROR);
        }
    };

    match template.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {}", e);
            render_error(LOAD_ERROR)
        }
    }
}

/// Any path below the dashboard lands on the dashboard.
///
/// GET /admin/dashboard/ and /admin/dashboard/{*rest}
async fn redirect_to_dashboard(RequireAdminAuth(_): RequireAdminAuth) -> Redirect {
    Redirect::to(DASHBOARD_PATH)
}
