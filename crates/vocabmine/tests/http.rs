use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tempfile::TempDir;
use tower::util::ServiceExt;

use vocabmine::handlers::{AppState, router};
use vocabmine::known::KnownWordStore;

fn make_state() -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("book_words.json"),
        r#"{
            "totalUniqueWords": 2,
            "totalWordCount": 7,
            "generatedAt": "2024-01-01T00:00:00Z",
            "words": [
                { "word": "bird", "count": 4 },
                { "word": "cat", "count": 3 }
            ]
        }"#,
    )
    .unwrap();

    let store = KnownWordStore::new(dir.path().join("known-words.json"));
    store.save(&HashSet::from(["cat".to_string()])).unwrap();

    let state = AppState {
        reports_dir: dir.path().to_path_buf(),
        store: Arc::new(store),
    };
    (dir, state)
}

async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_ok() {
    let (_dir, state) = make_state();
    let app = router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn frontend_serves_review_page() {
    let (_dir, state) = make_state();
    let app = router(state);
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Vocabmine Review"));
}

#[tokio::test]
async fn reports_endpoint_lists_word_files() {
    let (_dir, state) = make_state();
    let app = router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/reports")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!(["book_words.json"]));
}

#[tokio::test]
async fn words_endpoint_filters_known_words() {
    let (_dir, state) = make_state();
    let app = router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/words?file=book_words.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_words"], 2);
    assert_eq!(body["filtered_out"], 1);
    let words = body["words"].as_array().unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0]["word"], "bird");
    assert_eq!(words[0]["count"], 4);
}

#[tokio::test]
async fn words_endpoint_rejects_escaping_paths() {
    let (_dir, state) = make_state();
    let app = router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/words?file=../outside_words.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("relative path")
    );
}

#[tokio::test]
async fn words_endpoint_missing_report_is_404() {
    let (_dir, state) = make_state();
    let app = router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/words?file=nope_words.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn known_endpoint_returns_current_set() {
    let (_dir, state) = make_state();
    let app = router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/known")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["words"], serde_json::json!(["cat"]));
}

#[tokio::test]
async fn add_known_persists_lowercased_words() {
    let (_dir, state) = make_state();
    let store = Arc::clone(&state.store);
    let app = router(state);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/known")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"words":["Bird"]}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 2);

    let known = store.load();
    assert!(known.contains("bird"));
    assert!(known.contains("cat"));
}

#[tokio::test]
async fn add_known_rejects_empty_payload() {
    let (_dir, state) = make_state();
    let app = router(state);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/known")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"words":[]}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
