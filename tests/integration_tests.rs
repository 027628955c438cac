//! Integration tests for the festival server
//!
//! These tests drive the full router (store, localization policy, admin auth)
//! in-process without binding a socket.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use festival_server::config::Config;
use festival_server::i18n::contains_leaf;
use festival_server::routes::{router, AppState};
use festival_server::store::DocumentStore;

const ADMIN_KEY: &str = "test-admin-key";
const SCHEDULE_ID: &str = "65a1f0c2e4b0a1b2c3d4e5f6";

// ==================== Test Helpers ====================

fn create_test_config() -> Config {
    Config {
        port: 8080,
        admin_api_key: Some(ADMIN_KEY.to_string()),
        seed_file: None,
    }
}

fn seed() -> Value {
    json!({
        "schedules": [{
            "_id": {"$oid": SCHEDULE_ID},
            "title": {"en": "Day 1", "hi": "दिन 1"},
            "day": 1,
            "date": {"$date": "2025-01-10T00:00:00Z"},
            "events": [{
                "time": "9:00",
                "activity": {"en": "Opening", "hi": "उद्घाटन"},
                "location": {"en": "", "hi": ""}
            }],
            "createdAt": {"$date": "2025-01-01T00:00:00Z"}
        }],
        "competitions": [
            {"name": {"en": "Rangoli", "hi": "रंगोली"}, "maxParticipants": 40},
            {"name": "Legacy quiz night", "maxParticipants": 10}
        ]
    })
}

fn create_test_app(config: Config) -> Router {
    let store = DocumentStore::from_seed(seed()).expect("Seed should load");
    router(AppState::new(config, store))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn admin(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-api-key", ADMIN_KEY);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

// ==================== Public Routes ====================

#[tokio::test]
async fn test_health() {
    let app = create_test_app(create_test_config());
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_schedule_localized_to_hindi() {
    let app = create_test_app(create_test_config());
    let (status, body) = send(&app, get(&format!("/api/schedules/{}?lang=hi", SCHEDULE_ID))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "_id": {"$oid": SCHEDULE_ID},
            "title": "दिन 1",
            "day": 1,
            "date": {"$date": "2025-01-10T00:00:00Z"},
            "events": [{"time": "9:00", "activity": "उद्घाटन", "location": ""}],
            "createdAt": {"$date": "2025-01-01T00:00:00.000Z"}
        })
    );
}

#[tokio::test]
async fn test_schedule_raw_without_lang() {
    let app = create_test_app(create_test_config());
    let (status, body) = send(&app, get(&format!("/api/schedules/{}", SCHEDULE_ID))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], json!({"en": "Day 1", "hi": "दिन 1"}));
}

#[tokio::test]
async fn test_unrecognized_lang_returns_raw() {
    let app = create_test_app(create_test_config());
    let (_, body) = send(&app, get("/api/competitions?lang=fr")).await;
    assert!(contains_leaf(&body));
}

#[tokio::test]
async fn test_list_localized_tolerates_legacy_strings() {
    let app = create_test_app(create_test_config());
    let (status, body) = send(&app, get("/api/competitions?lang=hi")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("रंगोली"), json!("Legacy quiz night")]);
    assert!(!contains_leaf(&body));
}

#[tokio::test]
async fn test_empty_collection_lists_empty() {
    let app = create_test_app(create_test_config());
    let (status, body) = send(&app, get("/api/quizzes?lang=en")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_unknown_resource_is_not_found() {
    let app = create_test_app(create_test_config());
    let (status, body) = send(&app, get("/api/contacts")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "unknown resource: contacts"}));
}

#[tokio::test]
async fn test_missing_and_malformed_ids() {
    let app = create_test_app(create_test_config());

    let (status, _) = send(&app, get("/api/schedules/ffffffffffffffffffffffff")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/api/schedules/day-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "malformed id: day-1"}));
}

// ==================== Admin Routes ====================

#[tokio::test]
async fn test_admin_requires_key() {
    let app = create_test_app(create_test_config());

    let (status, body) = send(&app, get("/admin/schedules")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "unauthorized"}));

    let request = Request::get("/admin/schedules")
        .header("x-api-key", "wrong")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_disabled_without_configured_key() {
    let config = Config {
        admin_api_key: None,
        ..create_test_config()
    };
    let app = create_test_app(config);
    let (status, _) = send(&app, admin("GET", "/admin/schedules", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_list_is_raw() {
    let app = create_test_app(create_test_config());
    let (status, body) = send(&app, admin("GET", "/admin/schedules", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], json!({"en": "Day 1", "hi": "दिन 1"}));
}

#[tokio::test]
async fn test_admin_crud_flow() {
    let app = create_test_app(create_test_config());

    // Create
    let quiz = json!({
        "question": {"en": "Capital of India?", "hi": "भारत की राजधानी?"},
        "options": [
            {"text": {"en": "Delhi", "hi": "दिल्ली"}, "isCorrect": true},
            {"text": {"en": "Pune", "hi": "पुणे"}, "isCorrect": false}
        ]
    });
    let (status, created) = send(&app, admin("POST", "/admin/quizzes", Some(quiz))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["_id"]["$oid"].as_str().unwrap().to_string();
    assert!(created["createdAt"]["$date"].is_string());

    // Public read, localized
    let (_, localized) = send(&app, get(&format!("/api/quizzes/{}?lang=hi", id))).await;
    assert_eq!(localized["question"], json!("भारत की राजधानी?"));
    assert_eq!(localized["options"][0], json!({"text": "दिल्ली", "isCorrect": true}));
    assert_eq!(localized["_id"], created["_id"]);

    // Replace
    let replacement = json!({"question": {"en": "Capital of Rajasthan?", "hi": "राजस्थान की राजधानी?"}});
    let (status, replaced) = send(
        &app,
        admin("PUT", &format!("/admin/quizzes/{}", id), Some(replacement)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["_id"], created["_id"]);
    assert_eq!(replaced["createdAt"], created["createdAt"]);
    assert!(replaced.get("options").is_none());

    // Delete
    let (status, _) = send(&app, admin("DELETE", &format!("/admin/quizzes/{}", id), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, get(&format!("/api/quizzes/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, admin("DELETE", &format!("/admin/quizzes/{}", id), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_create_rejects_non_object() {
    let app = create_test_app(create_test_config());
    let (status, body) = send(&app, admin("POST", "/admin/gallery", Some(json!(["x"])))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "bad request: body must be a JSON object"}));
}

#[tokio::test]
async fn test_admin_replace_missing_document() {
    let app = create_test_app(create_test_config());
    let (status, _) = send(
        &app,
        admin(
            "PUT",
            "/admin/ebooks/ffffffffffffffffffffffff",
            Some(json!({"title": "x"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_create_malformed_json_uses_error_envelope() {
    let app = create_test_app(create_test_config());
    let request = Request::post("/admin/quizzes")
        .header("x-api-key", ADMIN_KEY)
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().expect("error envelope");
    assert!(message.starts_with("bad request: "));
}

#[tokio::test]
async fn test_admin_replace_without_content_type_uses_error_envelope() {
    let app = create_test_app(create_test_config());
    let request = Request::put(format!("/admin/schedules/{}", SCHEDULE_ID))
        .header("x-api-key", ADMIN_KEY)
        .body(Body::from(r#"{"day": 2}"#))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("bad request: "));

    // The document is untouched
    let (_, raw) = send(&app, admin("GET", &format!("/admin/schedules/{}", SCHEDULE_ID), None)).await;
    assert_eq!(raw["day"], json!(1));
}

// ==================== Languages ====================

#[tokio::test]
async fn test_list_languages() {
    let app = create_test_app(create_test_config());
    let (status, body) = send(&app, get("/api/languages")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "default": "en",
            "languages": [
                {"code": "en", "name": "English", "nativeName": "English"},
                {"code": "hi", "name": "Hindi", "nativeName": "हिन्दी"}
            ]
        })
    );
}
