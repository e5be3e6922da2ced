//! HTTP API server.
//!
//! Exposes the repository, description, and search operations as a JSON API
//! for the web front end and other tools.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/repositories` | List downloaded repositories |
//! | `POST` | `/repositories` | Download a repository (`{repo_url}`) |
//! | `DELETE` | `/repositories/{owner}/{repo}` | Remove a repository and its descriptions |
//! | `POST` | `/repositories/{owner}/{repo}/describe` | Describe every file (`{limit?}`) |
//! | `POST` | `/descriptions` | Store a description (`{resource_path, description}`) |
//! | `POST` | `/descriptions/generate` | Generate and store one description |
//! | `POST` | `/descriptions/lookup` | Fetch a stored description |
//! | `POST` | `/search` | Semantic search (`{query, limit?}`) |
//! | `POST` | `/grep` | Regex search (`{pattern, repository?}`) |
//! | `POST` | `/diff` | Unified diff of two files (`{left, right}`) |
//! | `POST` | `/explain` | Explain a file (`{resource_path, question?}`) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "invalid_resource", "message": "invalid resource path \"\": path is empty" } }
//! ```
//!
//! Error codes: `invalid_resource` (400), `bad_request` (400), `not_found` (404),
//! `generation_failed` (502), `index_unavailable` (503), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser front end
//! can be served from a different origin.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::context::Scribe;
use crate::error::ScribeError;
use crate::get::{explain_resource, get_description};
use crate::grep::{grep_files, FileMatches};
use crate::ingest::{describe_repository, describe_resource, IngestSummary};
use crate::models::{IndexedDocument, Repository, SearchHit};
use crate::repo::{diff_files, fetch_repository, list_repositories, remove_repository, RemovalSummary};
use crate::search::search_descriptions;

/// Build the router with every route and the CORS layer.
pub fn router(ctx: Scribe) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route(
            "/repositories",
            get(handle_list_repositories).post(handle_download),
        )
        .route(
            "/repositories/{owner}/{repo}",
            axum::routing::delete(handle_remove),
        )
        .route(
            "/repositories/{owner}/{repo}/describe",
            post(handle_describe_repository),
        )
        .route("/descriptions", post(handle_upsert))
        .route("/descriptions/generate", post(handle_generate))
        .route("/descriptions/lookup", post(handle_lookup))
        .route("/search", post(handle_search))
        .route("/grep", post(handle_grep))
        .route("/diff", post(handle_diff))
        .route("/explain", post(handle_explain))
        .layer(cors)
        .with_state(ctx)
}

/// Serve the API on `[server].bind` until the process is terminated.
pub async fn run_server(ctx: Scribe) -> anyhow::Result<()> {
    let bind_addr = ctx.config.server.bind.clone();
    let app = router(ctx);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "server listening");
    println!("scribe server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code, message = %self.message, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal",
        message: message.into(),
    }
}

impl From<ScribeError> for AppError {
    fn from(err: ScribeError) -> Self {
        let status = match err {
            ScribeError::InvalidResource { .. } => StatusCode::BAD_REQUEST,
            ScribeError::GenerationFailed(_) => StatusCode::BAD_GATEWAY,
            ScribeError::IndexUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        AppError {
            status,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

/// Maps service errors by type first, then by message, the same way the
/// CLI reports them.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(scribe) = err.chain().find_map(|e| e.downcast_ref::<ScribeError>()) {
            return AppError {
                message: format!("{:#}", err),
                ..AppError::from(scribe.clone())
            };
        }

        let msg = format!("{:#}", err);
        let lower = msg.to_lowercase();
        if lower.contains("not found") {
            not_found(msg)
        } else if lower.starts_with("invalid")
            || lower.starts_with("unsupported")
            || lower.starts_with("repository url")
        {
            bad_request(msg)
        } else {
            internal(msg)
        }
    }
}

async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| internal(format!("task failed: {}", e)))?
        .map_err(AppError::from)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ Repositories ============

#[derive(Deserialize)]
struct DownloadRequest {
    repo_url: String,
}

#[derive(Serialize)]
struct RepositoriesResponse {
    repositories: Vec<Repository>,
}

async fn handle_list_repositories(
    State(ctx): State<Scribe>,
) -> Result<Json<RepositoriesResponse>, AppError> {
    let repositories = list_repositories(&ctx.pool).await?;
    Ok(Json(RepositoriesResponse { repositories }))
}

async fn handle_download(
    State(ctx): State<Scribe>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Repository>), AppError> {
    let Json(req) = payload?;
    if req.repo_url.trim().is_empty() {
        return Err(bad_request("repo_url must not be empty"));
    }
    let repo = fetch_repository(&ctx, &req.repo_url).await?;
    Ok((StatusCode::CREATED, Json(repo)))
}

async fn handle_remove(
    State(ctx): State<Scribe>,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<RemovalSummary>, AppError> {
    let summary = remove_repository(&ctx, &format!("{}/{}", owner, repo)).await?;
    Ok(Json(summary))
}

#[derive(Deserialize, Default)]
struct DescribeRepositoryRequest {
    #[serde(default)]
    limit: Option<usize>,
}

async fn handle_describe_repository(
    State(ctx): State<Scribe>,
    Path((owner, repo)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<IngestSummary>, AppError> {
    // The body is optional; an empty one means "describe everything".
    let req: DescribeRepositoryRequest = if body.iter().all(u8::is_ascii_whitespace) {
        DescribeRepositoryRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| bad_request(format!("Invalid JSON body: {}", e)))?
    };
    let summary = describe_repository(&ctx, &format!("{}/{}", owner, repo), req.limit, false).await?;
    Ok(Json(summary))
}

// ============ Descriptions ============

#[derive(Deserialize)]
struct UpsertRequest {
    resource_path: String,
    description: String,
}

#[derive(Deserialize)]
struct ResourceRequest {
    resource_path: String,
}

async fn handle_upsert(
    State(ctx): State<Scribe>,
    payload: Result<Json<UpsertRequest>, JsonRejection>,
) -> Result<Json<IndexedDocument>, AppError> {
    let Json(req) = payload?;
    let doc = ctx
        .manager
        .upsert_description(&req.resource_path, &req.description)
        .await?;
    Ok(Json(doc))
}

async fn handle_generate(
    State(ctx): State<Scribe>,
    payload: Result<Json<ResourceRequest>, JsonRejection>,
) -> Result<Json<IndexedDocument>, AppError> {
    let Json(req) = payload?;
    let doc = describe_resource(&ctx, &req.resource_path).await?;
    Ok(Json(doc))
}

async fn handle_lookup(
    State(ctx): State<Scribe>,
    payload: Result<Json<ResourceRequest>, JsonRejection>,
) -> Result<Json<IndexedDocument>, AppError> {
    let Json(req) = payload?;
    let doc = get_description(&ctx, &req.resource_path).await?;
    Ok(Json(doc))
}

// ============ Search ============

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

async fn handle_search(
    State(ctx): State<Scribe>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Json(req) = payload?;
    if req.query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }
    let results = search_descriptions(&ctx, &req.query, req.limit).await?;
    Ok(Json(SearchResponse { results }))
}

#[derive(Deserialize)]
struct GrepRequest {
    pattern: String,
    #[serde(default)]
    repository: Option<String>,
}

#[derive(Serialize)]
struct GrepResponse {
    files: Vec<FileMatches>,
}

async fn handle_grep(
    State(ctx): State<Scribe>,
    payload: Result<Json<GrepRequest>, JsonRejection>,
) -> Result<Json<GrepResponse>, AppError> {
    let Json(req) = payload?;
    if req.pattern.is_empty() {
        return Err(bad_request("pattern must not be empty"));
    }
    let config = ctx.config.clone();
    let files = blocking(move || {
        grep_files(&config.repos, req.repository.as_deref(), &req.pattern)
    })
    .await?;
    Ok(Json(GrepResponse { files }))
}

// ============ Diff / explain ============

#[derive(Deserialize)]
struct DiffRequest {
    left: String,
    right: String,
}

#[derive(Serialize)]
struct DiffResponse {
    diff: String,
}

async fn handle_diff(
    State(ctx): State<Scribe>,
    payload: Result<Json<DiffRequest>, JsonRejection>,
) -> Result<Json<DiffResponse>, AppError> {
    let Json(req) = payload?;
    let config = ctx.config.clone();
    let diff = blocking(move || diff_files(&config.repos, &req.left, &req.right)).await?;
    Ok(Json(DiffResponse { diff }))
}

#[derive(Deserialize)]
struct ExplainRequest {
    resource_path: String,
    #[serde(default)]
    question: Option<String>,
}

#[derive(Serialize)]
struct ExplainResponse {
    explanation: String,
}

async fn handle_explain(
    State(ctx): State<Scribe>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, AppError> {
    let Json(req) = payload?;
    let explanation = explain_resource(&ctx, &req.resource_path, req.question.as_deref()).await?;
    Ok(Json(ExplainResponse { explanation }))
}
