//! JSON API gatekeeping and request validation. Every case here is decided
//! before any query runs.

use axum::http::StatusCode;
use bacoge_integration_tests::{body_json, default_app, get, json_request, login, send};

#[tokio::test]
async fn test_api_requires_session() {
    let app = default_app();

    let response = send(&app, get("/admin/api/categories", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["status"], 401);
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["message"], "Authentication required");
    assert!(body["timestamp"].is_string());
    assert!(body["details"].is_null());
}

#[tokio::test]
async fn test_api_rejects_client_role() {
    let app = default_app();
    let cookie = login(&app, "CLIENT").await;

    let response = send(&app, get("/admin/api/users", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn test_chart_days_out_of_range() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let response = send(&app, get("/admin/api/orders/chart?days=400", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["message"], "One or more fields have validation errors");
    assert!(body["details"]["days"].is_string());
}

#[tokio::test]
async fn test_bad_query_parameter() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let response = send(&app, get("/admin/api/orders/chart?days=trente", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["message"], "Invalid or missing request parameter");
    assert!(body["details"]["parameter"].is_string());
}

#[tokio::test]
async fn test_bad_path_parameter() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let response = send(&app, get("/admin/api/users/abc", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid or missing request parameter");
}

#[tokio::test]
async fn test_report_window_must_be_ordered() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let path = "/admin/api/users/report?start=2024-06-01T00:00:00Z&end=2024-05-01T00:00:00Z";
    let response = send(&app, get(path, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["message"], "end must not be before start");
    assert_eq!(body["details"]["argument"], "end must not be before start");
}

#[tokio::test]
async fn test_category_validation_errors() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let request = json_request(
        "POST",
        "/admin/api/categories",
        &cookie,
        r#"{"name": "   ", "description": null}"#,
    );
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"]["name"], "Le nom de la catégorie est obligatoire");
    assert_eq!(body["details"]["status"], "Le statut est obligatoire");
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let request = json_request("PATCH", "/admin/api/reviews/5/status", &cookie, "{\"status\":");
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Malformed request body");
    assert!(body["details"]["body"].is_string());
}

#[tokio::test]
async fn test_unknown_review_status_is_malformed() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let request = json_request(
        "PATCH",
        "/admin/api/reviews/5/status",
        &cookie,
        r#"{"status": "SHELVED"}"#,
    );
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Malformed request body");
}

#[tokio::test]
async fn test_address_without_any_name_is_illegal_argument() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let request = json_request(
        "POST",
        "/admin/api/addresses",
        &cookie,
        r#"{
            "street": "12 rue des Tuiliers",
            "city": "Lyon",
            "postalCode": "69008",
            "country": "France",
            "type": "SHIPPING",
            "userId": 3
        }"#,
    );
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(
        body["details"]["argument"],
        "at least one of 'name' or 'addressName' must be set"
    );
}

#[tokio::test]
async fn test_image_upload_requires_multipart_body() {
    let app = default_app();
    let cookie = login(&app, "ADMIN").await;

    let request = json_request(
        "POST",
        "/admin/api/categories/7/image",
        &cookie,
        r#"{"file": "brique.png"}"#,
    );
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["message"], "Invalid multipart/form-data");
    assert!(body["details"]["multipart"].is_string());
}
