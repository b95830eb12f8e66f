use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;
use tower::ServiceExt;

use crate::applications::domain::{
    Application, ApplicationCandidate, ApplicationId, NewApplication,
};
use crate::applications::notify::{Delivery, NotificationError, Notifier};
use crate::applications::store::{ApplicationStore, MemoryApplicationStore, StoreError};
use crate::applications::{application_router, IntakeService};

pub(super) fn ada() -> ApplicationCandidate {
    ApplicationCandidate::new(
        "Ada",
        "555-0100",
        "ada@example.com",
        "I want to learn AI.",
    )
}

pub(super) fn grace() -> ApplicationCandidate {
    ApplicationCandidate::new(
        "Grace",
        "555-0199",
        "grace@example.com",
        "Compilers first, then machine learning.",
    )
}

pub(super) fn build_service() -> (
    IntakeService<MemoryApplicationStore, RecordingNotifier>,
    Arc<MemoryApplicationStore>,
    Arc<RecordingNotifier>,
) {
    let store = Arc::new(MemoryApplicationStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = IntakeService::new(store.clone(), notifier.clone());
    (service, store, notifier)
}

#[derive(Default, Clone)]
pub(super) struct RecordingNotifier {
    notified: Arc<Mutex<Vec<ApplicationId>>>,
}

impl RecordingNotifier {
    pub(super) fn notified(&self) -> Vec<ApplicationId> {
        self.notified.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, application: &Application) -> Result<Delivery, NotificationError> {
        self.notified
            .lock()
            .expect("notifier mutex poisoned")
            .push(application.id.clone());
        Ok(Delivery::Sent)
    }
}

#[derive(Default, Clone)]
pub(super) struct FailingNotifier {
    attempts: Arc<AtomicUsize>,
}

impl FailingNotifier {
    pub(super) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Notifier for FailingNotifier {
    async fn notify(&self, _application: &Application) -> Result<Delivery, NotificationError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotificationError::Transport(
            "smtp relay refused connection".to_string(),
        ))
    }
}

pub(super) struct UnavailableStore;

impl ApplicationStore for UnavailableStore {
    async fn create(&self, _application: NewApplication) -> Result<Application, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<Application>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_service<S, N>(service: IntakeService<S, N>) -> axum::Router
where
    S: ApplicationStore + 'static,
    N: Notifier + 'static,
{
    application_router(Arc::new(service))
}

pub(super) async fn post_json(router: axum::Router, body: &Value) -> Response {
    router
        .oneshot(
            Request::post("/api/apply")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(body).expect("encode body")))
                .expect("request builds"),
        )
        .await
        .expect("route executes")
}

pub(super) async fn get_applications(router: axum::Router) -> Response {
    router
        .oneshot(
            Request::get("/api/applications")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
