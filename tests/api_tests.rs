//! End-to-end CRUD flows over the JSON API.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bandstand::config::Config;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path =
        std::env::temp_dir().join(format!("bandstand-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = bandstand::api::create_app_state_from_config(config)
        .await
        .expect("failed to create app state");
    bandstand::api::router(state).await
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn search(app: &Router, uri: &str, term: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(Body::from(format!("search_term={}", term)))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn create_venue(app: &Router, name: &str, city: &str, state: &str) -> i32 {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/venues",
        &serde_json::json!({
            "name": name,
            "city": city,
            "state": state,
            "address": "1015 Folsom Street",
            "genres": ["Jazz", "Folk"],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_i64().expect("venue id") as i32
}

async fn create_artist(app: &Router, name: &str, city: &str, state: &str) -> i32 {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/artists",
        &serde_json::json!({
            "name": name,
            "city": city,
            "state": state,
            "phone": "326-123-5000",
            "genres": ["Rock n Roll"],
            "seeking_venue": true,
            "seeking_description": "Looking for shows in the Bay Area",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_i64().expect("artist id") as i32
}

#[tokio::test]
async fn test_empty_listings_are_ok() {
    let app = spawn_app().await;

    for uri in ["/api/venues", "/api/artists", "/api/shows"] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri} failed");
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
    }
}

#[tokio::test]
async fn test_created_venue_appears_in_grouped_listing() {
    let app = spawn_app().await;

    let id = create_venue(&app, "The Musical Hop", "San Francisco", "CA").await;
    create_venue(&app, "The Dueling Pianos Bar", "New York", "NY").await;

    let (status, body) = get_json(&app, "/api/venues").await;
    assert_eq!(status, StatusCode::OK);

    let areas = body["data"].as_array().unwrap();
    assert_eq!(areas.len(), 2);

    let sf = areas
        .iter()
        .find(|a| a["city"] == "San Francisco" && a["state"] == "CA")
        .expect("San Francisco group");
    let venues = sf["venues"].as_array().unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0]["id"].as_i64(), Some(i64::from(id)));
    assert_eq!(venues[0]["name"], "The Musical Hop");
    assert_eq!(venues[0]["num_upcoming_shows"], 0);
}

#[tokio::test]
async fn test_venue_search_is_case_insensitive() {
    let app = spawn_app().await;

    create_venue(&app, "The Musical Hop", "San Francisco", "CA").await;
    create_venue(&app, "Park Square Live Music & Coffee", "San Francisco", "CA").await;

    let (status, body) = search(&app, "/api/venues/search", "Hop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["data"][0]["name"], "The Musical Hop");

    let (_, body) = search(&app, "/api/venues/search", "hop").await;
    assert_eq!(body["data"]["count"], 1);

    let (_, body) = search(&app, "/api/venues/search", "music").await;
    assert_eq!(body["data"]["count"], 2);

    let (_, body) = search(&app, "/api/venues/search", "nope").await;
    assert_eq!(body["data"]["count"], 0);
}

#[tokio::test]
async fn test_future_show_is_upcoming_for_artist_and_venue() {
    let app = spawn_app().await;

    let venue_id = create_venue(&app, "The Musical Hop", "San Francisco", "CA").await;
    let artist_id = create_artist(&app, "Guns N Petals", "San Francisco", "CA").await;

    let start_time = (chrono::Utc::now() + chrono::Duration::days(30)).to_rfc3339();
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/shows",
        &serde_json::json!({
            "artist_id": artist_id,
            "venue_id": venue_id,
            "start_time": start_time,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app, &format!("/api/venues/{venue_id}")).await;
    assert_eq!(body["data"]["num_upcoming_shows"], 1);
    assert_eq!(body["data"]["num_past_shows"], 0);
    assert_eq!(
        body["data"]["upcoming_shows"][0]["artist_name"],
        "Guns N Petals"
    );

    let (_, body) = get_json(&app, &format!("/api/artists/{artist_id}")).await;
    assert_eq!(body["data"]["num_upcoming_shows"], 1);
    assert_eq!(body["data"]["num_past_shows"], 0);
    assert_eq!(
        body["data"]["upcoming_shows"][0]["venue_name"],
        "The Musical Hop"
    );

    // Grouped venue listing picks up the count as well.
    let (_, body) = get_json(&app, "/api/venues").await;
    assert_eq!(body["data"][0]["venues"][0]["num_upcoming_shows"], 1);
}

#[tokio::test]
async fn test_past_show_is_not_upcoming() {
    let app = spawn_app().await;

    let venue_id = create_venue(&app, "The Musical Hop", "San Francisco", "CA").await;
    let artist_id = create_artist(&app, "Guns N Petals", "San Francisco", "CA").await;

    let start_time = (chrono::Utc::now() - chrono::Duration::days(30)).to_rfc3339();
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/shows",
        &serde_json::json!({
            "artist_id": artist_id,
            "venue_id": venue_id,
            "start_time": start_time,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_json(&app, &format!("/api/venues/{venue_id}")).await;
    assert_eq!(body["data"]["num_past_shows"], 1);
    assert_eq!(body["data"]["num_upcoming_shows"], 0);
}

#[tokio::test]
async fn test_show_listing_is_denormalized() {
    let app = spawn_app().await;

    let venue_id = create_venue(&app, "The Musical Hop", "San Francisco", "CA").await;
    let artist_id = create_artist(&app, "Guns N Petals", "San Francisco", "CA").await;

    let start_time = (chrono::Utc::now() + chrono::Duration::days(7)).to_rfc3339();
    send_json(
        &app,
        "POST",
        "/api/shows",
        &serde_json::json!({
            "artist_id": artist_id,
            "venue_id": venue_id,
            "start_time": start_time,
        }),
    )
    .await;

    let (status, body) = get_json(&app, "/api/shows").await;
    assert_eq!(status, StatusCode::OK);

    let shows = body["data"].as_array().unwrap();
    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0]["artist_name"], "Guns N Petals");
    assert_eq!(shows[0]["venue_name"], "The Musical Hop");
    assert_eq!(shows[0]["artist_id"].as_i64(), Some(i64::from(artist_id)));
    assert_eq!(shows[0]["venue_id"].as_i64(), Some(i64::from(venue_id)));
}

#[tokio::test]
async fn test_deleting_venue_removes_its_shows() {
    let app = spawn_app().await;

    let venue_id = create_venue(&app, "The Musical Hop", "San Francisco", "CA").await;
    let artist_id = create_artist(&app, "Guns N Petals", "San Francisco", "CA").await;

    let start_time = (chrono::Utc::now() + chrono::Duration::days(7)).to_rfc3339();
    send_json(
        &app,
        "POST",
        "/api/shows",
        &serde_json::json!({
            "artist_id": artist_id,
            "venue_id": venue_id,
            "start_time": start_time,
        }),
    )
    .await;

    let (status, body) = send_json(
        &app,
        "DELETE",
        &format!("/api/venues/{venue_id}"),
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = get_json(&app, &format!("/api/venues/{venue_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get_json(&app, "/api/shows").await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    // The artist survives the venue delete.
    let (status, _) = get_json(&app, &format!("/api/artists/{artist_id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_partial_artist_update_preserves_other_fields() {
    let app = spawn_app().await;

    let artist_id = create_artist(&app, "Guns N Petals", "San Francisco", "CA").await;

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/artists/{artist_id}"),
        &serde_json::json!({ "name": "Guns N Roses" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Guns N Roses");

    let (_, body) = get_json(&app, &format!("/api/artists/{artist_id}")).await;
    assert_eq!(body["data"]["name"], "Guns N Roses");
    assert_eq!(body["data"]["city"], "San Francisco");
    assert_eq!(body["data"]["state"], "CA");
    assert_eq!(body["data"]["phone"], "326-123-5000");
    assert_eq!(body["data"]["genres"][0], "Rock n Roll");
    assert_eq!(body["data"]["seeking_venue"], true);
}

#[tokio::test]
async fn test_show_with_dangling_reference_is_rejected() {
    let app = spawn_app().await;

    let venue_id = create_venue(&app, "The Musical Hop", "San Francisco", "CA").await;

    let start_time = (chrono::Utc::now() + chrono::Duration::days(7)).to_rfc3339();
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/shows",
        &serde_json::json!({
            "artist_id": 999,
            "venue_id": venue_id,
            "start_time": start_time,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // Nothing was inserted.
    let (_, body) = get_json(&app, "/api/shows").await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_show_with_invalid_timestamp_is_rejected() {
    let app = spawn_app().await;

    let venue_id = create_venue(&app, "The Musical Hop", "San Francisco", "CA").await;
    let artist_id = create_artist(&app, "Guns N Petals", "San Francisco", "CA").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/shows",
        &serde_json::json!({
            "artist_id": artist_id,
            "venue_id": venue_id,
            "start_time": "next tuesday",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_create_venue_without_name_is_rejected() {
    let app = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/venues",
        &serde_json::json!({ "city": "San Francisco", "state": "CA" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = get_json(&app, "/api/venues").await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_missing_venue_is_404() {
    let app = spawn_app().await;

    let (status, body) = get_json(&app, "/api/venues/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = send_json(
        &app,
        "DELETE",
        "/api/venues/42",
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_names_are_permitted() {
    let app = spawn_app().await;

    let first = create_venue(&app, "The Musical Hop", "San Francisco", "CA").await;
    let second = create_venue(&app, "The Musical Hop", "New York", "NY").await;
    assert_ne!(first, second);

    let (_, body) = search(&app, "/api/venues/search", "Musical Hop").await;
    assert_eq!(body["data"]["count"], 2);
}
