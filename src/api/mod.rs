//! HTTP API through which an agent runtime drives the dashboard.
//!
//! Dashboard calls touch the focus store's file backend, so handlers run them
//! on the blocking pool.

// Allow clippy lint triggered by utoipa's OpenApi derive macro
#![allow(clippy::needless_for_each)]

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use capability_core::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::build_info;
use crate::core::Dashboard;

/// Shared application state.
pub struct AppState {
    /// Registry, dispatcher and focus store.
    pub dashboard: Dashboard,

    /// API token for authentication (if configured).
    pub token: Option<String>,
}

type SharedState = Arc<AppState>;

/// `OpenAPI` documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ClearPlate API",
        description = "Capability registry and tool dispatch for the ClearPlate dashboard",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(health, version, list_capabilities, invoke_tool, render_component, reset_focus),
    components(schemas(ErrorBody, ViolationBody, VersionResponse))
)]
struct ApiDoc;

/// Error response body.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Every violated constraint, for validation and contract errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationBody>,
}

/// One violated schema constraint.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ViolationBody {
    /// Path of the offending field; empty for the whole body.
    pub field: String,
    /// What was wrong.
    pub reason: String,
}

/// Response body for the version endpoint.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VersionResponse {
    /// Version with build hash.
    pub version: String,
}

/// A dispatch failure rendered as an HTTP response.
struct ApiError(DispatchError);

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DispatchError::NotFound(_) => StatusCode::NOT_FOUND,
            DispatchError::NotATool(_) | DispatchError::NotAComponent(_) => {
                StatusCode::BAD_REQUEST
            }
            DispatchError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            DispatchError::ContractViolation { .. } | DispatchError::Handler { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            error: self.0.kind().to_string(),
            message: self.0.to_string(),
            violations: self
                .0
                .violations()
                .iter()
                .map(|v| ViolationBody {
                    field: v.field.clone(),
                    reason: v.reason.clone(),
                })
                .collect(),
        };

        (status, Json(body)).into_response()
    }
}

/// Parse a JSON body; an empty body means `{}`.
fn parse_body(body: &Bytes) -> Result<Value, Response> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_slice(body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "invalid_json".to_string(),
                message: e.to_string(),
                violations: Vec::new(),
            }),
        )
            .into_response()
    })
}

fn internal_error(kind: &str, message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: kind.to_string(),
            message,
            violations: Vec::new(),
        }),
    )
        .into_response()
}

/// Run a dashboard call on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "dashboard task failed");
        internal_error("internal", e.to_string())
    })
}

/// Authentication middleware.
///
/// Validates the `Authorization: Bearer <token>` header if a token is configured.
async fn auth_middleware(
    State(state): State<SharedState>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    // If no token configured, allow all requests (localhost-only mode)
    let Some(ref expected_token) = state.token else {
        return next.run(request).await;
    };

    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match auth_header {
        Some(token) if token == expected_token => next.run(request).await,
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                error: "unauthorized".to_string(),
                message: "Missing or invalid Authorization header. Use: Bearer <token>"
                    .to_string(),
                violations: Vec::new(),
            }),
        )
            .into_response(),
    }
}

/// Build the router over `state`.
pub fn router(state: SharedState) -> Router {
    // Protected routes (require auth if token configured)
    let protected_routes = Router::new()
        .route("/api/capabilities", get(list_capabilities))
        .route("/api/tools/{name}", post(invoke_tool))
        .route("/api/components/{name}", post(render_component))
        .route("/api/focus/reset", post(reset_focus))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP API server.
///
/// # Errors
///
/// Returns an error if the server fails to bind or start.
pub async fn serve(
    host: &str,
    port: u16,
    dashboard: Dashboard,
    token: Option<String>,
) -> anyhow::Result<()> {
    let auth_enabled = token.is_some();
    let state: SharedState = Arc::new(AppState { dashboard, token });
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if auth_enabled {
        tracing::info!(addr = %addr, "starting HTTP API server (auth enabled)");
    } else {
        tracing::warn!(addr = %addr, "starting HTTP API server (NO AUTH - localhost only recommended)");
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service healthy", body = String))
)]
async fn health() -> &'static str {
    "ok"
}

/// Version and build hash.
#[utoipa::path(
    get,
    path = "/api/version",
    responses((status = 200, description = "Build version", body = VersionResponse))
)]
async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: build_info::version_string(),
    })
}

/// List registered tools and components with their JSON schemas.
#[utoipa::path(
    get,
    path = "/api/capabilities",
    responses((status = 200, description = "Capability definitions in registration order"))
)]
async fn list_capabilities(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.dashboard.definitions())
}

/// Invoke a tool with raw JSON arguments.
#[utoipa::path(
    post,
    path = "/api/tools/{name}",
    params(("name" = String, Path, description = "Tool name")),
    responses(
        (status = 200, description = "Validated tool result"),
        (status = 400, description = "Not a tool or malformed JSON", body = ErrorBody),
        (status = 404, description = "Unknown capability", body = ErrorBody),
        (status = 422, description = "Arguments failed the input schema", body = ErrorBody),
        (status = 500, description = "Handler failed or broke its output schema", body = ErrorBody)
    )
)]
async fn invoke_tool(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let args = match parse_body(&body) {
        Ok(args) => args,
        Err(response) => return response,
    };

    match blocking(move || state.dashboard.invoke(&name, &args)).await {
        Ok(Ok(result)) => Json(result).into_response(),
        Ok(Err(e)) => ApiError::from(e).into_response(),
        Err(response) => response,
    }
}

/// Validate component props for the renderer.
#[utoipa::path(
    post,
    path = "/api/components/{name}",
    params(("name" = String, Path, description = "Component name")),
    responses(
        (status = 200, description = "Validated props"),
        (status = 400, description = "Not a component or malformed JSON", body = ErrorBody),
        (status = 404, description = "Unknown capability", body = ErrorBody),
        (status = 422, description = "Props failed the schema", body = ErrorBody)
    )
)]
async fn render_component(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let props = match parse_body(&body) {
        Ok(props) => props,
        Err(response) => return response,
    };

    match blocking(move || state.dashboard.render(&name, &props)).await {
        Ok(Ok(props)) => Json(props).into_response(),
        Ok(Err(e)) => ApiError::from(e).into_response(),
        Err(response) => response,
    }
}

/// Restore the default focus items.
#[utoipa::path(
    post,
    path = "/api/focus/reset",
    responses(
        (status = 200, description = "Default focus items"),
        (status = 500, description = "Store write failed", body = ErrorBody)
    )
)]
async fn reset_focus(State(state): State<SharedState>) -> Response {
    let reset = blocking(move || {
        let store = state.dashboard.store();
        store.reset().map(|()| store.load_all())
    })
    .await;

    match reset {
        Ok(Ok(items)) => Json(items).into_response(),
        Ok(Err(e)) => internal_error("storage", e.to_string()),
        Err(response) => response,
    }
}
