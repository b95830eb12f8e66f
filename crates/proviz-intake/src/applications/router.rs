use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::domain::ApplicationCandidate;
use super::notify::Notifier;
use super::service::{IntakeService, NotificationStatus, SubmitError};
use super::store::ApplicationStore;

pub const SUBMITTED_MESSAGE: &str = "Application submitted successfully!";
const SAVE_FAILED_MESSAGE: &str = "Error saving application.";
const FETCH_FAILED_MESSAGE: &str = "Error fetching applications.";

/// Router exposing the intake form endpoint and the admin listing.
///
/// Cross-origin preflights are answered by the CORS layer the binary wraps around it.
pub fn application_router<S, N>(service: Arc<IntakeService<S, N>>) -> Router
where
    S: ApplicationStore + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/apply", post(submit_handler::<S, N>))
        .route("/api/applications", get(list_handler::<S, N>))
        .with_state(service)
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification: Option<NotificationStatus>,
}

pub(crate) async fn submit_handler<S, N>(
    State(service): State<Arc<IntakeService<S, N>>>,
    payload: Result<Json<ApplicationCandidate>, JsonRejection>,
) -> Response
where
    S: ApplicationStore + 'static,
    N: Notifier + 'static,
{
    let candidate = match payload {
        Ok(Json(candidate)) => candidate,
        Err(rejection) => {
            let payload = json!({
                "message": "Invalid application payload.",
                "error": rejection.body_text(),
            });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.submit(candidate).await {
        Ok(ack) => {
            let notification = match ack.notification {
                NotificationStatus::Sent => None,
                other => Some(other),
            };
            let body = SubmitResponse {
                message: SUBMITTED_MESSAGE,
                notification,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(SubmitError::Validation(error)) => {
            let missing: Vec<&str> = error.missing().iter().map(|field| field.as_str()).collect();
            let payload = json!({
                "message": format!("Missing required fields: {}.", missing.join(", ")),
                "error": error.to_string(),
                "missing": missing,
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(SubmitError::Persistence(error)) => {
            let payload = json!({
                "message": SAVE_FAILED_MESSAGE,
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_handler<S, N>(State(service): State<Arc<IntakeService<S, N>>>) -> Response
where
    S: ApplicationStore + 'static,
    N: Notifier + 'static,
{
    match service.list_all().await {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(_) => {
            let payload = json!({ "message": FETCH_FAILED_MESSAGE });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
