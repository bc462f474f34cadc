use super::assets::INDEX_HTML;
use super::data::GraphData;
use crate::config::Config;
use crate::export::{self, ExportError, ExportFormat};
use crate::layout::{LayoutError, LayoutKind, Position};
use crate::model::Issue;
use crate::session::{Session, SessionError};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{Method, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinError;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub session: Mutex<Session>,
    pub config: Config,
}

impl AppState {
    pub fn new(session: Session, config: Config) -> Self {
        Self {
            session: Mutex::new(session),
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    layout: Option<LayoutKind>,
}

#[derive(Debug, Deserialize)]
pub struct NewTask {
    #[serde(rename = "type")]
    task_type: String,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewType {
    #[serde(rename = "type")]
    task_type: String,
}

#[derive(Debug, Serialize)]
struct Created {
    #[serde(rename = "taskId")]
    task_id: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<Issue>,
}

/// Handler failure mapped onto an HTTP status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    issues: Vec<Issue>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            issues: Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            issues: self.issues,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let status = match &err {
            SessionError::UnknownTask(_) => StatusCode::NOT_FOUND,
            SessionError::DuplicateType(_) => StatusCode::CONFLICT,
            SessionError::EmptyType | SessionError::Load(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let issues = match &err {
            SessionError::Load(load) => load.issues().to_vec(),
            _ => Vec::new(),
        };
        Self {
            status,
            message: err.to_string(),
            issues,
        }
    }
}

impl From<LayoutError> for ApiError {
    fn from(err: LayoutError) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Layout(layout) => layout.into(),
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        }
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

/// Build the viewer's router over shared state.
///
/// Cross-origin access is read-only; the editing routes are only reachable
/// from the viewer page itself.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/workflow", get(workflow_handler).put(upload_handler))
        .route("/api/graph", get(graph_handler))
        .route("/api/tasks", post(add_task_handler))
        .route("/api/tasks/{id}", delete(delete_task_handler))
        .route(
            "/api/tasks/{id}/position",
            put(pin_handler).delete(unpin_handler),
        )
        .route("/api/types", post(register_type_handler))
        .route("/api/export/{format}", get(export_handler))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server for the interactive viewer
pub async fn serve(
    session: Session,
    config: Config,
    port: u16,
    open_browser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(session, config));
    let app = router(state);

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}", addr);

    println!("Starting flowmap viewer...");
    println!("Open in browser: {}", crate::style::url(&url));
    println!("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!("could not open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "viewer listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn workflow_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let session = state.session.lock().await;
    let json = session.export_json()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], json).into_response())
}

async fn upload_handler(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<Vec<Issue>>, ApiError> {
    let mut session = state.session.lock().await;
    let warnings = session.load_str(&body)?.to_vec();
    Ok(Json(warnings))
}

async fn graph_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LayoutQuery>,
) -> Result<Json<GraphData>, ApiError> {
    let kind = query.layout.unwrap_or(state.config.default_layout);
    let session = snapshot(&state).await;
    let data = tokio::task::spawn_blocking(move || {
        GraphData::from_session(&session, &state.config, kind)
    })
    .await??;
    Ok(Json(data))
}

/// Copy of the session for work that must not run under the lock.
async fn snapshot(state: &AppState) -> Session {
    state.session.lock().await.clone()
}

async fn add_task_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewTask>,
) -> Result<(StatusCode, Json<Created>), ApiError> {
    let mut session = state.session.lock().await;
    let task_id = session.add_task(&body.task_type, body.name.as_deref())?;
    Ok((StatusCode::CREATED, Json(Created { task_id })))
}

async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.lock().await;
    session.delete_task(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn register_type_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewType>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.lock().await;
    match session.register_type(&body.task_type) {
        Ok(()) => Ok(StatusCode::CREATED),
        Err(err @ (SessionError::EmptyType | SessionError::DuplicateType(_))) => {
            Err(ApiError::new(StatusCode::CONFLICT, err.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

async fn pin_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(position): Json<Position>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.lock().await;
    session.pin(&id, position)?;
    debug!(task_id = %id, x = position.x, y = position.y, "pinned");
    Ok(StatusCode::NO_CONTENT)
}

async fn unpin_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.lock().await;
    if session.unpin(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("Task is not pinned: {}", id),
        ))
    }
}

async fn export_handler(
    State(state): State<Arc<AppState>>,
    Path(format): Path<String>,
    Query(query): Query<LayoutQuery>,
) -> Result<Response, ApiError> {
    let format = match format.as_str() {
        "json" => ExportFormat::Json,
        "svg" => ExportFormat::Svg,
        "png" => ExportFormat::Png,
        other => {
            return Err(ApiError::new(
                StatusCode::NOT_FOUND,
                format!("Unknown export format: {}", other),
            ));
        }
    };
    let kind = query.layout.unwrap_or(state.config.default_layout);

    let session = snapshot(&state).await;
    let body = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ApiError> {
        Ok(match format {
            ExportFormat::Json => session.export_json()?.into_bytes(),
            ExportFormat::Svg => session.render_svg(kind, &state.config)?.into_bytes(),
            ExportFormat::Png => {
                let svg = session.render_svg(kind, &state.config)?;
                export::to_png(&svg, 1.0, Some("white"))?
            }
        })
    })
    .await??;

    let headers = [
        (header::CONTENT_TYPE, format.mime_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.default_file_name()),
        ),
    ];
    Ok((headers, body).into_response())
}
