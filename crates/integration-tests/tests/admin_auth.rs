//! Login page, lockout and logout.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use bacoge_integration_tests::{
    FakeDashboard, FakePromotions, body_text, default_app, get, location, login, send, test_app,
    test_state,
};

fn login_form(email: &str, password: &str) -> Request<Body> {
    Request::post("/admin/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("email={email}&password={password}")))
        .expect("valid request")
}

#[tokio::test]
async fn test_login_page_renders() {
    let app = default_app();

    let response = send(&app, get("/admin/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<form method=\"post\" action=\"/admin/login\""));
    assert!(html.contains("name=\"password\""));
}

#[tokio::test]
async fn test_login_page_skipped_when_signed_in() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let response = send(&app, get("/admin/login", Some(&cookie))).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/admin/dashboard"));
}

#[tokio::test]
async fn test_locked_out_email_gets_429() {
    let state = test_state(FakeDashboard::default(), FakePromotions::default());
    let email = "chef.chantier@bacoge.com";
    for _ in 0..state.config().security.login.max_attempts {
        state.login_attempts().record_failure(email).await;
    }
    let app = test_app(state);

    let response = send(&app, login_form(email, "whatever")).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let html = body_text(response).await;
    assert!(html.contains("Trop de tentatives"));
    assert!(html.contains(email));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let logout = Request::post("/admin/logout")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .expect("valid request");
    let response = send(&app, logout).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), Some("/admin/login"));

    let response = send(&app, get("/admin/dashboard", Some(&cookie))).await;
    assert_eq!(location(&response), Some("/admin/login"));
}
