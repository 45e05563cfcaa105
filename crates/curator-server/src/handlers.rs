//! HTTP request handlers for the Curator service.
//!
//! Article CRUD, conflict reports, heuristic scans and LLM reviews over axum.

use crate::cors;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use curator_analyzer::{scan_batch, AnalyzerError, BatchScan, ReviewAnalysis, Reviewer, ScanInput};
use curator_domain::traits::{ArticleStore, LlmProvider};
use curator_domain::{Article, ArticleId, NewArticle};
use curator_engine::{Engine, EngineError, Report};
use curator_llm::LlmError;
use curator_store::{SqliteStore, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// LLM provider shared between requests
pub type SharedProvider = Arc<dyn LlmProvider<Error = LlmError> + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Article store
    pub store: Arc<Mutex<SqliteStore>>,
    /// Scoring engine
    pub engine: Arc<Engine>,
    /// LLM reviewer, when one is configured
    pub reviewer: Option<Arc<Reviewer<SharedProvider>>>,
    /// Largest article set one request may analyse
    pub max_articles: usize,
}

impl AppState {
    fn store(&self) -> Result<MutexGuard<'_, SqliteStore>, AppError> {
        self.store
            .lock()
            .map_err(|_| AppError::InternalError("store lock poisoned".to_string()))
    }

    fn check_size(&self, count: usize) -> Result<(), AppError> {
        if count > self.max_articles {
            return Err(AppError::PayloadTooLarge {
                count,
                max: self.max_articles,
            });
        }
        Ok(())
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of stored articles
    pub article_count: usize,
    /// Whether LLM reviews are available
    pub llm_enabled: bool,
}

/// Article submission
#[derive(Debug, Deserialize)]
pub struct SaveArticleRequest {
    /// Title
    #[serde(default)]
    pub title: String,
    /// Body
    #[serde(default)]
    pub content: String,
    /// Author
    #[serde(default)]
    pub author: Option<String>,
    /// Version label
    #[serde(default)]
    pub version: Option<String>,
    /// Scan result produced client-side, stored alongside the article
    #[serde(default)]
    pub analysis: Option<Value>,
}

/// Response to an article submission
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveArticleResponse {
    /// Always true on 2xx
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Identifier of the stored article
    pub article_id: ArticleId,
}

/// Optional article list sent to the analysis endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ArticlesBody {
    /// Articles to analyse instead of the stored ones
    #[serde(default)]
    pub articles: Option<Value>,
}

/// LLM review request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Review a stored article
    #[serde(default)]
    pub article_id: Option<String>,
    /// Review ad hoc content
    #[serde(default)]
    pub content: Option<String>,
}

/// LLM review response
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Model output verbatim
    pub analysis: String,
    /// Structured form, when parseable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<ReviewAnalysis>,
    /// Article the review was stored against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_id: Option<ArticleId>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Malformed request
    BadRequest(String),
    /// Unknown article
    NotFound(String),
    /// Too many articles for one request
    PayloadTooLarge {
        /// Articles submitted
        count: usize,
        /// Configured cap
        max: usize,
    },
    /// No LLM configured
    LlmUnavailable,
    /// LLM call failed
    LlmError(String),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge { count, max } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("{} articles submitted, at most {} allowed", count, max),
            ),
            AppError::LlmUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "LLM review is not configured".to_string(),
            ),
            AppError::LlmError(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::InternalError(msg) => {
                warn!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => AppError::NotFound(format!("Article not found: {}", id)),
            StoreError::InvalidData(msg) => AppError::BadRequest(msg),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidInput(msg) => AppError::BadRequest(msg),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<AnalyzerError> for AppError {
    fn from(e: AnalyzerError) -> Self {
        match e {
            AnalyzerError::EmptyContent => AppError::BadRequest(e.to_string()),
            other => AppError::LlmError(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Background task failed: {}", e))
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Parse an optional JSON body; an empty body means "use the store"
fn parse_articles_body(body: &Bytes) -> Result<Option<Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let parsed: ArticlesBody = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;
    Ok(parsed.articles.filter(|a| !matches!(a, Value::Array(items) if items.is_empty())))
}

/// GET /health - Service health
async fn health_check(State(state): State<AppState>) -> Result<Json<HealthCheckResponse>, AppError> {
    let article_count = state.store()?.count_articles()?;
    Ok(Json(HealthCheckResponse {
        status: "healthy".to_string(),
        article_count,
        llm_enabled: state.reviewer.is_some(),
    }))
}

/// GET /articles - Every stored article, most recently touched first
async fn list_articles(State(state): State<AppState>) -> Result<Json<Vec<Article>>, AppError> {
    let articles = state.store()?.list_articles()?;
    Ok(Json(articles))
}

/// POST /articles - Store a new article
async fn save_article(
    State(state): State<AppState>,
    Json(request): Json<SaveArticleRequest>,
) -> Result<(StatusCode, Json<SaveArticleResponse>), AppError> {
    if request.title.trim().is_empty() || request.content.trim().is_empty() {
        return Err(AppError::BadRequest("Title and content are required".to_string()));
    }

    // Fall back to the version the client-side scan found
    let version = request.version.or_else(|| {
        request
            .analysis
            .as_ref()
            .and_then(|a| a.pointer("/version_info/latest_version"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    let new_article = NewArticle {
        title: request.title,
        content: request.content,
        author: request.author,
        version,
    };

    let mut store = state.store()?;
    let article = store.save_article(new_article)?;

    if let Some(analysis) = &request.analysis {
        if let Err(e) = store.save_analysis(&article.id, &analysis.to_string()) {
            warn!(article_id = %article.id, error = %e, "Failed to save analysis");
        }
    }

    info!(article_id = %article.id, "Article saved");
    Ok((
        StatusCode::CREATED,
        Json(SaveArticleResponse {
            success: true,
            message: "Article saved successfully".to_string(),
            article_id: article.id,
        }),
    ))
}

/// POST /detect-conflicts - Full conflict and relevance report
///
/// Analyses the `articles` array from the body when given, otherwise every
/// stored article.
async fn detect_conflicts(State(state): State<AppState>, body: Bytes) -> Result<Json<Report>, AppError> {
    let now = unix_now();
    let engine = Arc::clone(&state.engine);

    let report = match parse_articles_body(&body)? {
        Some(value) => {
            let count = value.as_array().map(Vec::len).unwrap_or(0);
            state.check_size(count)?;
            tokio::task::spawn_blocking(move || engine.generate_report_from_value(&value, now)).await??
        }
        None => {
            let articles = state.store()?.list_articles()?;
            state.check_size(articles.len())?;
            tokio::task::spawn_blocking(move || engine.generate_report(&articles, now)).await??
        }
    };

    info!(
        articles = report.summary.total_articles,
        conflicts = report.summary.conflicts_found,
        health = report.recommendations.total_kb_health_score,
        "Conflict report generated"
    );
    Ok(Json(report))
}

/// POST /analyze-all - Heuristic scan of many articles
async fn analyze_all(State(state): State<AppState>, body: Bytes) -> Result<Json<BatchScan>, AppError> {
    let inputs: Vec<ScanInput> = match parse_articles_body(&body)? {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| AppError::BadRequest(format!("Invalid articles: {}", e)))?,
        None => state.store()?.list_articles()?.iter().map(ScanInput::from).collect(),
    };

    if inputs.is_empty() {
        return Err(AppError::BadRequest("No articles found to analyze".to_string()));
    }
    state.check_size(inputs.len())?;

    Ok(Json(scan_batch(&inputs)))
}

/// POST /analyze - LLM review of one article or ad hoc content
async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let reviewer = state.reviewer.clone().ok_or(AppError::LlmUnavailable)?;

    match (request.article_id, request.content) {
        (Some(id), _) => {
            let id = ArticleId::new(id);
            let article = state
                .store()?
                .get_article(&id)?
                .ok_or_else(|| AppError::NotFound(format!("Article not found: {}", id)))?;

            let outcome = tokio::task::spawn_blocking(move || reviewer.review(&article)).await??;

            let record = serde_json::to_string(&outcome)
                .map_err(|e| AppError::InternalError(e.to_string()))?;
            state.store()?.save_analysis(&id, &record)?;

            Ok(Json(AnalyzeResponse {
                analysis: outcome.raw_analysis,
                parsed: outcome.parsed,
                article_id: Some(id),
            }))
        }
        (None, Some(content)) => {
            let outcome = tokio::task::spawn_blocking(move || reviewer.review_content(&content)).await??;
            Ok(Json(AnalyzeResponse {
                analysis: outcome.raw_analysis,
                parsed: outcome.parsed,
                article_id: None,
            }))
        }
        (None, None) => Err(AppError::BadRequest(
            "Either article_id or content is required".to_string(),
        )),
    }
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/health", get(health_check))
        .route("/articles", get(list_articles).post(save_article))
        .route("/detect-conflicts", post(detect_conflicts))
        .route("/analyze-all", post(analyze_all))
        .route("/analyze", post(analyze))
        .layer(middleware::from_fn(cors::cors))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        AppState {
            store: Arc::new(Mutex::new(SqliteStore::new(":memory:").unwrap())),
            engine: Arc::new(Engine::default()),
            reviewer: None,
            max_articles: 10,
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_empty_body_means_store() {
        assert!(parse_articles_body(&Bytes::from_static(b"  \n")).unwrap().is_none());
        assert!(parse_articles_body(&Bytes::from_static(b"{}")).unwrap().is_none());
        assert!(parse_articles_body(&Bytes::from_static(br#"{"articles": []}"#))
            .unwrap()
            .is_none());
        assert!(parse_articles_body(&Bytes::from_static(b"{oops")).is_err());
    }

    #[test]
    fn test_size_cap() {
        let state = create_test_state();
        assert!(state.check_size(10).is_ok());
        assert!(matches!(
            state.check_size(11),
            Err(AppError::PayloadTooLarge { count: 11, max: 10 })
        ));
    }
}
