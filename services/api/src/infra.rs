use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use metrics_exporter_prometheus::PrometheusHandle;
use proviz_intake::applications::{
    Application, ApplicationStore, Delivery, DisabledNotifier, FileApplicationStore,
    MemoryApplicationStore, NewApplication, NotificationError, Notifier, SmtpNotifier,
    StoreError,
};
use proviz_intake::config::{ConfigError, NotificationConfig, StoreConfig};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store backend selected by `APP_STORE_URL`.
#[derive(Debug)]
pub(crate) enum ConfiguredStore {
    Memory(MemoryApplicationStore),
    File(FileApplicationStore),
}

impl ApplicationStore for ConfiguredStore {
    async fn create(&self, application: NewApplication) -> Result<Application, StoreError> {
        match self {
            ConfiguredStore::Memory(store) => store.create(application).await,
            ConfiguredStore::File(store) => store.create(application).await,
        }
    }

    async fn list_all(&self) -> Result<Vec<Application>, StoreError> {
        match self {
            ConfiguredStore::Memory(store) => store.list_all().await,
            ConfiguredStore::File(store) => store.list_all().await,
        }
    }
}

pub(crate) async fn open_store(config: &StoreConfig) -> Result<ConfiguredStore, StoreError> {
    match config {
        StoreConfig::Memory => {
            warn!("using in-memory application store; submissions are lost on restart");
            Ok(ConfiguredStore::Memory(MemoryApplicationStore::new()))
        }
        StoreConfig::File { path } => {
            let store = FileApplicationStore::open(path).await?;
            info!(path = %path.display(), "using file application store");
            Ok(ConfiguredStore::File(store))
        }
    }
}

/// Notifier selected by whether mail credentials are configured.
#[derive(Debug)]
pub(crate) enum ConfiguredNotifier {
    Smtp(SmtpNotifier),
    Disabled(DisabledNotifier),
}

impl Notifier for ConfiguredNotifier {
    async fn notify(&self, application: &Application) -> Result<Delivery, NotificationError> {
        match self {
            ConfiguredNotifier::Smtp(notifier) => notifier.notify(application).await,
            ConfiguredNotifier::Disabled(notifier) => notifier.notify(application).await,
        }
    }
}

pub(crate) fn build_notifier(
    config: &NotificationConfig,
) -> Result<ConfiguredNotifier, NotificationError> {
    match &config.mail {
        Some(mail) => {
            let notifier = SmtpNotifier::from_config(mail)?;
            info!(relay = %mail.smtp_host, recipient = %mail.recipient, "mail notifications enabled");
            Ok(ConfiguredNotifier::Smtp(notifier))
        }
        None => {
            info!("mail notifications disabled (no SMTP credentials configured)");
            Ok(ConfiguredNotifier::Disabled(DisabledNotifier))
        }
    }
}

/// Single-origin CORS policy. PUT and DELETE are allowed although no route serves them.
pub(crate) fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidCorsOrigin {
        origin: origin.to_string(),
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]))
}
