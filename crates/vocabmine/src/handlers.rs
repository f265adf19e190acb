//! HTTP surface of the review server.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::known::KnownWordStore;
use crate::processor::RankedWord;

#[derive(Clone)]
pub struct AppState {
    pub reports_dir: PathBuf,
    pub store: Arc<KnownWordStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(frontend))
        .route("/healthz", get(healthz))
        .route("/api/reports", get(reports))
        .route("/api/words", get(words))
        .route("/api/known", get(known_words).post(add_known))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

const REVIEW_HTML: &str = include_str!("../templates/review.html");

async fn frontend() -> Html<&'static str> {
    Html(REVIEW_HTML)
}

/// Relative paths of `*_words.json` report files under the reports root.
async fn reports(State(state): State<AppState>) -> Json<Vec<String>> {
    let mut files = Vec::new();
    collect_reports(&state.reports_dir, &state.reports_dir, &mut files);
    files.sort();
    Json(files)
}

fn collect_reports(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if path.is_dir() {
            if name.starts_with('.') || name == "target" {
                continue;
            }
            collect_reports(root, &path, out);
        } else if name.ends_with("_words.json")
            && let Ok(rel) = path.strip_prefix(root)
        {
            out.push(rel.to_string_lossy().into_owned());
        }
    }
}

#[derive(Deserialize)]
pub struct WordsQuery {
    pub file: String,
}

#[derive(Serialize)]
struct WordsResponse {
    words: Vec<RankedWord>,
    total_words: usize,
    filtered_out: usize,
}

/// The subset of a report file the review flow needs.
#[derive(Deserialize)]
struct ReportFile {
    words: Vec<RankedWord>,
}

/// Entries of one report with already-known words filtered out.
async fn words(
    State(state): State<AppState>,
    Query(params): Query<WordsQuery>,
) -> Result<Json<WordsResponse>, ApiError> {
    let rel = Path::new(&params.file);
    if rel.as_os_str().is_empty() {
        return Err(ApiError::bad_request("file is required"));
    }
    // Only plain relative components; no escaping the reports root.
    if rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(ApiError::bad_request(
            "file must be a relative path inside the reports directory",
        ));
    }

    let path = state.reports_dir.join(rel);
    if !path.is_file() {
        return Err(ApiError::NotFound);
    }
    let data = fs::read_to_string(&path).map_err(|err| {
        warn!("could not read {}: {err}", path.display());
        ApiError::Internal
    })?;
    let report: ReportFile = serde_json::from_str(&data)
        .map_err(|err| ApiError::bad_request(format!("not a word report: {err}")))?;

    let known = state.store.load();
    let total_words = report.words.len();
    let words: Vec<RankedWord> = report
        .words
        .into_iter()
        .filter(|w| !known.contains(&w.word.to_lowercase()))
        .collect();
    let filtered_out = total_words - words.len();

    Ok(Json(WordsResponse {
        words,
        total_words,
        filtered_out,
    }))
}

async fn known_words(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut words: Vec<String> = state.store.load().into_iter().collect();
    words.sort();
    Json(json!({ "count": words.len(), "words": words }))
}

#[derive(Deserialize)]
pub struct AddKnownBody {
    pub words: Vec<String>,
}

/// Add words to the known set; returns the new count.
async fn add_known(
    State(state): State<AppState>,
    Json(body): Json<AddKnownBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.words.is_empty() {
        return Err(ApiError::bad_request("words is required"));
    }
    let count = state.store.add(body.words).map_err(|err| {
        warn!("could not update known words: {err}");
        ApiError::Internal
    })?;
    Ok(Json(json!({ "count": count })))
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
