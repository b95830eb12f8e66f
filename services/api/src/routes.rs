use crate::infra::{cors_layer, AppState};
use axum::extract::Request;
use axum::http::{header, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use proviz_intake::applications::{application_router, ApplicationStore, IntakeService, Notifier};
use proviz_intake::config::ConfigError;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_application_routes<S, N>(service: Arc<IntakeService<S, N>>) -> axum::Router
where
    S: ApplicationStore + 'static,
    N: Notifier + 'static,
{
    application_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

/// Full application: routes, shared state, and the cross-origin policy.
pub(crate) fn build_app<S, N>(
    service: Arc<IntakeService<S, N>>,
    state: AppState,
    cors_origin: &str,
) -> Result<axum::Router, ConfigError>
where
    S: ApplicationStore + 'static,
    N: Notifier + 'static,
{
    Ok(with_application_routes(service)
        .layer(Extension(state))
        .layer(cors_layer(cors_origin)?)
        .layer(middleware::from_fn(preflight_no_content)))
}

/// The CORS layer answers every OPTIONS request itself with `200`; preflights are
/// reported as `204 No Content` instead.
async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if is_options && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
