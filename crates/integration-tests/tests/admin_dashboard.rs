//! Dashboard page: rendering, sub-path redirects, failure view and role gate.

use axum::http::StatusCode;
use bacoge_admin::dto::{DashboardStats, OrderStatusCounts, RecentActivity, SalesTrend};
use bacoge_core::{OrderId, OrderStatus};
use bacoge_integration_tests::{
    FakeDashboard, FakePromotions, body_text, default_app, get, location, login, send, test_app,
    test_state,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::dec;

fn populated_dashboard() -> FakeDashboard {
    let stats = DashboardStats {
        total_users: 42,
        total_orders: 17,
        total_revenue: dec!(1234.5),
        order_status_count: OrderStatusCounts {
            completed: 9,
            ..OrderStatusCounts::default()
        },
        ..DashboardStats::default()
    };
    let placed = Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0).single().expect("valid date");
    let activity = vec![RecentActivity::order(
        OrderId::new(1042),
        OrderStatus::Shipped,
        dec!(89.9),
        placed,
    )];

    FakeDashboard {
        stats,
        activity,
        fail: false,
    }
}

#[tokio::test]
async fn test_dashboard_renders_for_admin() {
    let promotions = FakePromotions {
        total: 7,
        active: 3,
        expired: 2,
    };
    let app = test_app(test_state(populated_dashboard(), promotions));
    let cookie = login(&app, "ADMIN").await;

    let response = send(&app, get("/admin/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Tableau de bord"));
    assert!(html.contains("Camille Martin"));
    assert!(html.contains("1\u{202f}234,50 €"));
    assert!(html.contains("Nouvelle commande #1042"));
    assert!(html.contains("<dt>Actives</dt><dd>3</dd>"));
    assert!(html.contains("<dt>Expirées</dt><dd>2</dd>"));
}

#[tokio::test]
async fn test_dashboard_renders_sales_trend_table() {
    let april = NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date");
    let may = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
    let mut dashboard = populated_dashboard();
    dashboard.stats.sales_trends = Some(SalesTrend::from_monthly(&[
        (april, dec!(1000)),
        (may, dec!(1250)),
    ]));
    let app = test_app(test_state(dashboard, FakePromotions::default()));
    let cookie = login(&app, "ADMIN").await;

    let response = send(&app, get("/admin/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(!html.contains("Pas encore assez de données."));
    assert!(html.contains("<td>avr. 2024</td>"));
    assert!(html.contains("<td>1\u{202f}000,00 €</td>"));
    assert!(html.contains("<td>mai 2024</td>"));
    assert!(html.contains("<td>1\u{202f}250,00 €</td>"));
    assert!(html.contains("trend-up"));
    assert!(html.contains("25,0 %"));
}

#[tokio::test]
async fn test_dashboard_without_trend_data_still_renders() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let response = send(&app, get("/admin/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Pas encore assez de données."));
    assert!(html.contains("Aucune activité récente."));
}

#[tokio::test]
async fn test_dashboard_sub_paths_redirect() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    for path in [
        "/admin/dashboard/",
        "/admin/dashboard/overview",
        "/admin/dashboard/a/b/c",
    ] {
        let response = send(&app, get(path, Some(&cookie))).await;
        assert!(response.status().is_redirection(), "{path}");
        assert_eq!(location(&response), Some("/admin/dashboard"));
    }
}

#[tokio::test]
async fn test_admin_root_redirects_to_dashboard() {
    let app = default_app();

    let response = send(&app, get("/admin", None)).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/admin/dashboard"));
}

#[tokio::test]
async fn test_service_failure_renders_error_view() {
    let failing = FakeDashboard {
        fail: true,
        ..FakeDashboard::default()
    };
    let app = test_app(test_state(failing, FakePromotions::default()));
    let cookie = login(&app, "ADMIN").await;

    let response = send(&app, get("/admin/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let html = body_text(response).await;
    assert!(html.contains("Erreur lors du chargement du tableau de bord"));
    assert!(!html.contains("stats unavailable"));
}

#[tokio::test]
async fn test_anonymous_user_is_sent_to_login() {
    let app = default_app();

    let response = send(&app, get("/admin/dashboard", None)).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/admin/login"));
}

#[tokio::test]
async fn test_client_role_is_forbidden() {
    let app = default_app();
    let cookie = login(&app, "CLIENT").await;

    let response = send(&app, get("/admin/dashboard", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
