use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Durable document file used when `APP_STORE_URL` is unset.
pub const DEFAULT_STORE_URL: &str = "file://applications.jsonl";

/// Top-level configuration for the intake service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub store: StoreConfig,
    pub notifications: NotificationConfig,
}

impl AppConfig {
    /// Load `.env` (when present) and then read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let cors_origin =
            env::var("APP_CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let store = StoreConfig::parse(
            &env::var("APP_STORE_URL").unwrap_or_else(|_| DEFAULT_STORE_URL.to_string()),
        )?;

        let notifications = NotificationConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                cors_origin,
            },
            telemetry: TelemetryConfig { log_level },
            store,
            notifications,
        })
    }
}

/// Settings controlling the HTTP server binding and its cross-origin policy.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The single origin allowed to call the API from a browser.
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which application store backs the service.
///
/// Parsed from a connection string: `file://<path>` appends JSON documents to a file, one
/// per line; `memory://` keeps records in process memory and loses them on restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    File { path: PathBuf },
}

impl StoreConfig {
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let trimmed = url.trim();
        if trimmed.eq_ignore_ascii_case("memory://") || trimmed.eq_ignore_ascii_case("memory") {
            return Ok(Self::Memory);
        }

        match trimmed.strip_prefix("file://") {
            Some(path) if !path.is_empty() => Ok(Self::File {
                path: PathBuf::from(path),
            }),
            _ => Err(ConfigError::UnsupportedStoreUrl {
                url: trimmed.to_string(),
            }),
        }
    }
}

/// Outbound mail settings. `mail` is `None` when no credentials are configured, in which
/// case submissions are stored without a notification.
#[derive(Debug, Clone, Default)]
pub struct NotificationConfig {
    pub mail: Option<MailConfig>,
}

impl NotificationConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let username = optional_var("APP_SMTP_USERNAME");
        let password = optional_var("APP_SMTP_PASSWORD");

        let (username, password) = match (username, password) {
            (None, None) => return Ok(Self::default()),
            (Some(username), Some(password)) => (username, password),
            _ => {
                return Err(ConfigError::IncompleteMailSettings(
                    "APP_SMTP_USERNAME/APP_SMTP_PASSWORD",
                ))
            }
        };

        let recipient = optional_var("APP_NOTIFY_RECIPIENT")
            .ok_or(ConfigError::IncompleteMailSettings("APP_NOTIFY_RECIPIENT"))?;
        let smtp_host =
            optional_var("APP_SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string());
        let timeout_secs = optional_var("APP_SMTP_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTimeout)?;

        Ok(Self {
            mail: Some(MailConfig {
                smtp_host,
                username,
                password,
                recipient,
                timeout: Duration::from_secs(timeout_secs),
            }),
        })
    }
}

/// SMTP relay credentials and the fixed recipient for submission notices.
#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub username: String,
    pub password: String,
    pub recipient: String,
    pub timeout: Duration,
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    InvalidCorsOrigin { origin: String },
    UnsupportedStoreUrl { url: String },
    IncompleteMailSettings(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "APP_SMTP_TIMEOUT_SECS must be a whole number of seconds")
            }
            ConfigError::InvalidCorsOrigin { origin } => {
                write!(f, "APP_CORS_ORIGIN '{origin}' is not a valid header value")
            }
            ConfigError::UnsupportedStoreUrl { url } => write!(
                f,
                "APP_STORE_URL '{url}' is not supported (expected memory:// or file://<path>)"
            ),
            ConfigError::IncompleteMailSettings(missing) => {
                write!(f, "mail notifications are partially configured, missing {missing}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
