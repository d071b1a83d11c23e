//! Smoke tests for the embedded frontend and API surface wiring.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bandstand::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("bandstand-smoke-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = bandstand::api::create_app_state_from_config(config)
        .await
        .expect("failed to create app state");
    bandstand::api::router(state).await
}

#[tokio::test]
async fn smoke_index_page_is_served() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with(mime::TEXT_HTML.as_ref()));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Bandstand"));
}

#[tokio::test]
async fn smoke_unknown_frontend_route_falls_back_to_index() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/venues/listing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with(mime::TEXT_HTML.as_ref()));
}

#[tokio::test]
async fn smoke_unknown_api_route_is_404_envelope() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/bookings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body_json["success"], false);
    assert!(body_json["error"].is_string());
}

#[tokio::test]
async fn smoke_system_status_reports_counts() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body_json["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body_json["data"]["venues"], 0);
    assert_eq!(body_json["data"]["artists"], 0);
    assert_eq!(body_json["data"]["shows"], 0);
}

#[tokio::test]
async fn smoke_listing_endpoints_respond() {
    let app = spawn_app().await;

    for uri in ["/api/venues", "/api/artists", "/api/shows"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{uri} failed");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body_json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body_json["success"], true);
    }
}
