//! HTTP API for stories, studiables, audio and service health.

use crate::service::{
    ContentService, CreateStoryRequest, CreateStudiableRequest, StoryCreated, StoryView,
    StudiableCreated, StudiableDetail,
};
use aprendia_core::{Story, StoryId, Studiable, StudiableId};
use aprendia_error::AprendiaError;
use aprendia_interface::{ContentRepository, GenerationClient};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, instrument, warn};

/// Error response carrying `{"detail": message}`.
#[derive(Debug)]
pub struct ApiError(AprendiaError);

impl From<AprendiaError> for ApiError {
    fn from(err: AprendiaError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self.0, "Request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "detail": self.0.summary() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Where cached audio is read from and published.
#[derive(Debug, Clone)]
pub struct AudioMount {
    pub url_prefix: String,
    pub dir: PathBuf,
}

/// Builds the router.
///
/// `cors_origins` that fail to parse as header values are skipped with a
/// warning; a single `*` allows any origin.
pub fn create_router<G, R>(
    service: Arc<ContentService<G, R>>,
    audio: AudioMount,
    cors_origins: &[String],
) -> Router
where
    G: GenerationClient + 'static,
    R: ContentRepository + 'static,
{
    let api = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics::<G, R>))
        .route("/stories", post(create_story::<G, R>).get(list_stories::<G, R>))
        .route("/stories/:story_id", get(get_story::<G, R>))
        .route(
            "/stories/:story_id/studiables",
            post(create_studiable::<G, R>).get(list_studiables::<G, R>),
        )
        .route("/studiables/:studiable_id", get(get_studiable::<G, R>))
        .with_state(service);

    let prefix = audio.url_prefix.trim_end_matches('/');
    let api = if prefix.is_empty() {
        warn!("Audio URL prefix is the root; audio files are not served");
        api
    } else {
        api.nest_service(prefix, ServeDir::new(&audio.dir))
    };

    api.layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}

/// Service name and version.
#[instrument(skip_all)]
async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Aprendia API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health check endpoint.
#[instrument(skip_all)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Job counters.
#[instrument(skip_all)]
async fn get_metrics<G, R>(
    State(service): State<Arc<ContentService<G, R>>>,
) -> impl IntoResponse
where
    G: GenerationClient + 'static,
    R: ContentRepository + 'static,
{
    Json(service.metrics())
}

#[instrument(skip(service, request))]
async fn create_story<G, R>(
    State(service): State<Arc<ContentService<G, R>>>,
    Json(request): Json<CreateStoryRequest>,
) -> ApiResult<StoryCreated>
where
    G: GenerationClient + 'static,
    R: ContentRepository + 'static,
{
    Ok(Json(service.create_story(request).await?))
}

#[instrument(skip(service))]
async fn list_stories<G, R>(
    State(service): State<Arc<ContentService<G, R>>>,
) -> ApiResult<Vec<Story>>
where
    G: GenerationClient + 'static,
    R: ContentRepository + 'static,
{
    Ok(Json(service.list_stories().await?))
}

#[instrument(skip(service))]
async fn get_story<G, R>(
    State(service): State<Arc<ContentService<G, R>>>,
    Path(story_id): Path<StoryId>,
) -> ApiResult<StoryView>
where
    G: GenerationClient + 'static,
    R: ContentRepository + 'static,
{
    Ok(Json(service.story(story_id).await?))
}

#[instrument(skip(service, request))]
async fn create_studiable<G, R>(
    State(service): State<Arc<ContentService<G, R>>>,
    Path(story_id): Path<StoryId>,
    Json(request): Json<CreateStudiableRequest>,
) -> ApiResult<StudiableCreated>
where
    G: GenerationClient + 'static,
    R: ContentRepository + 'static,
{
    Ok(Json(service.create_studiable(story_id, request).await?))
}

#[instrument(skip(service))]
async fn list_studiables<G, R>(
    State(service): State<Arc<ContentService<G, R>>>,
    Path(story_id): Path<StoryId>,
) -> ApiResult<Vec<Studiable>>
where
    G: GenerationClient + 'static,
    R: ContentRepository + 'static,
{
    Ok(Json(service.list_studiables(story_id).await?))
}

#[instrument(skip(service))]
async fn get_studiable<G, R>(
    State(service): State<Arc<ContentService<G, R>>>,
    Path(studiable_id): Path<StudiableId>,
) -> ApiResult<StudiableDetail>
where
    G: GenerationClient + 'static,
    R: ContentRepository + 'static,
{
    Ok(Json(service.studiable(studiable_id).await?))
}
