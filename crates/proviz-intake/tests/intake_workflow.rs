//! End-to-end intake scenarios driven through the public router, backed by the
//! file document store so records are read back from disk.

mod common {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use proviz_intake::applications::{
        Application, Delivery, NotificationError, NotificationMessage, Notifier,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    /// Notifier double that renders every notice and can be told to fail.
    #[derive(Default, Clone)]
    pub struct OutboxNotifier {
        pub fail: bool,
        pub attempts: Arc<AtomicUsize>,
        pub outbox: Arc<std::sync::Mutex<Vec<NotificationMessage>>>,
    }

    impl OutboxNotifier {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }

        pub fn outbox(&self) -> Vec<NotificationMessage> {
            self.outbox.lock().expect("outbox mutex poisoned").clone()
        }
    }

    impl Notifier for OutboxNotifier {
        async fn notify(&self, application: &Application) -> Result<Delivery, NotificationError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(NotificationError::Transport("relay timed out".to_string()));
            }
            self.outbox
                .lock()
                .expect("outbox mutex poisoned")
                .push(NotificationMessage::for_application(application));
            Ok(Delivery::Sent)
        }
    }

    pub async fn send(router: &axum::Router, request: Request<Body>) -> (u16, Value) {
        let response: Response = router
            .clone()
            .oneshot(request)
            .await
            .expect("route executes");
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json payload")
        };
        (status, body)
    }

    pub fn apply(body: &Value) -> Request<Body> {
        Request::post("/api/apply")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).expect("encode")))
            .expect("request builds")
    }

    pub fn list() -> Request<Body> {
        Request::get("/api/applications")
            .body(Body::empty())
            .expect("request builds")
    }
}

use std::sync::Arc;

use common::{apply, list, send, OutboxNotifier};
use proviz_intake::applications::{
    application_router, ApplicationStore, FileApplicationStore, IntakeService, SUBMITTED_MESSAGE,
};
use serde_json::json;
use tempfile::TempDir;

async fn file_backed_router(
    dir: &TempDir,
    notifier: OutboxNotifier,
) -> (axum::Router, Arc<FileApplicationStore>) {
    let store = Arc::new(
        FileApplicationStore::open(dir.path().join("applications.jsonl"))
            .await
            .expect("store opens"),
    );
    let service = IntakeService::new(store.clone(), Arc::new(notifier));
    (application_router(Arc::new(service)), store)
}

#[tokio::test]
async fn ada_submission_is_listed_and_announced() {
    let dir = TempDir::new().expect("temp dir");
    let notifier = OutboxNotifier::default();
    let (router, _) = file_backed_router(&dir, notifier.clone()).await;

    let (status, body) = send(
        &router,
        apply(&json!({
            "name": "Ada",
            "phone": "555-0100",
            "email": "ada@example.com",
            "statement": "I want to learn AI.",
        })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "message": SUBMITTED_MESSAGE }));

    let (status, listed) = send(&router, list()).await;
    assert_eq!(status, 200);
    let listed = listed.as_array().expect("array payload").clone();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Ada");
    assert_eq!(listed[0]["phone"], "555-0100");
    assert_eq!(listed[0]["email"], "ada@example.com");
    assert_eq!(listed[0]["statement"], "I want to learn AI.");
    assert!(!listed[0]["_id"].is_null());

    let outbox = notifier.outbox();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].subject, "New Application Submitted");
    assert_eq!(
        outbox[0].body,
        "A new application has been submitted:\n\nName: Ada\nPhone: 555-0100\nEmail: ada@example.com\nStatement: I want to learn AI.\n"
    );
}

#[tokio::test]
async fn empty_name_is_rejected_and_store_is_unchanged() {
    let dir = TempDir::new().expect("temp dir");
    let notifier = OutboxNotifier::default();
    let (router, _) = file_backed_router(&dir, notifier.clone()).await;

    let (status, body) = send(
        &router,
        apply(&json!({ "name": "", "phone": "555", "email": "a@b.com", "statement": "hi" })),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["missing"], json!(["name"]));
    let (_, listed) = send(&router, list()).await;
    assert_eq!(listed, json!([]));
    assert_eq!(notifier.attempts(), 0);
}

#[tokio::test]
async fn listing_counts_only_valid_submissions() {
    let dir = TempDir::new().expect("temp dir");
    let (router, _) = file_backed_router(&dir, OutboxNotifier::default()).await;

    let valid = json!({ "name": "Lin", "phone": "1", "email": "lin@example.com", "statement": "s" });
    let invalid = [
        json!({}),
        json!({ "name": "Lin", "phone": "", "email": "lin@example.com", "statement": "s" }),
    ];

    for _ in 0..3 {
        let (status, _) = send(&router, apply(&valid)).await;
        assert_eq!(status, 200);
    }
    for payload in &invalid {
        let (status, _) = send(&router, apply(payload)).await;
        assert_eq!(status, 400);
    }

    let (_, listed) = send(&router, list()).await;
    let listed = listed.as_array().expect("array payload").clone();
    assert_eq!(listed.len(), 3);
    let ids: std::collections::HashSet<_> = listed
        .iter()
        .map(|record| record["_id"].as_str().expect("id").to_string())
        .collect();
    assert_eq!(ids.len(), 3, "identical payloads get distinct ids");
}

#[tokio::test]
async fn failed_notification_still_acknowledges_and_persists() {
    let dir = TempDir::new().expect("temp dir");
    let notifier = OutboxNotifier::failing();
    let (router, store) = file_backed_router(&dir, notifier.clone()).await;

    let (status, body) = send(
        &router,
        apply(&json!({
            "name": "Ada",
            "phone": "555-0100",
            "email": "ada@example.com",
            "statement": "I want to learn AI.",
        })),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], SUBMITTED_MESSAGE);
    assert_eq!(body["notification"], "failed");
    assert_eq!(notifier.attempts(), 1);

    drop(router);
    drop(store);
    let reopened = FileApplicationStore::open(dir.path().join("applications.jsonl"))
        .await
        .expect("store reopens");
    assert_eq!(reopened.list_all().await.expect("list succeeds").len(), 1);
}
