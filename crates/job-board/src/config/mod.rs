use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_STORAGE_HOST: &str = "https://storage.googleapis.com";

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub intake: IntakeConfig,
    pub supabase: Option<SupabaseConfig>,
    pub cloud_storage: Option<CloudStorageConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match optional_var("APP_LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat)?,
            None if environment == AppEnvironment::Production => LogFormat::Json,
            None => LogFormat::Compact,
        };

        let max_upload_bytes = match optional_var("APP_MAX_UPLOAD_BYTES") {
            Some(raw) => Some(
                raw.parse::<usize>()
                    .map_err(|_| ConfigError::InvalidUploadLimit)?,
            ),
            None => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            intake: IntakeConfig { max_upload_bytes },
            supabase: SupabaseConfig::from_env()?,
            cloud_storage: CloudStorageConfig::from_env(environment)?,
        })
    }

    /// Structured store settings, required outside of in-memory mode.
    pub fn require_supabase(&self) -> Result<&SupabaseConfig, ConfigError> {
        self.supabase
            .as_ref()
            .ok_or(ConfigError::Unconfigured("structured store (SUPABASE_*)"))
    }

    /// Blob store settings, required outside of in-memory mode.
    pub fn require_cloud_storage(&self) -> Result<&CloudStorageConfig, ConfigError> {
        self.cloud_storage
            .as_ref()
            .ok_or(ConfigError::Unconfigured("blob store (GCS_BUCKET_NAME)"))
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Log line layout. Production defaults to one JSON object per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Request handling knobs for the application intake endpoint.
///
/// `max_upload_bytes` of `None` leaves the request body unbounded.
#[derive(Debug, Clone, Default)]
pub struct IntakeConfig {
    pub max_upload_bytes: Option<usize>,
}

/// Supabase project settings. The anon key backs public reads, the
/// service-role key backs applicant inserts.
#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub service_role_key: String,
}

impl SupabaseConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let url = optional_var("SUPABASE_URL");
        let anon_key = optional_var("SUPABASE_ANON_KEY");
        let service_role_key = optional_var("SUPABASE_SERVICE_ROLE_KEY");

        match (url, anon_key, service_role_key) {
            (None, None, None) => Ok(None),
            (Some(url), Some(anon_key), Some(service_role_key)) => Ok(Some(Self {
                url,
                anon_key,
                service_role_key,
            })),
            (url, anon_key, _) => {
                let missing = if url.is_none() {
                    "SUPABASE_URL"
                } else if anon_key.is_none() {
                    "SUPABASE_ANON_KEY"
                } else {
                    "SUPABASE_SERVICE_ROLE_KEY"
                };
                Err(ConfigError::MissingVar(missing))
            }
        }
    }
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Google Cloud Storage bucket settings for resume uploads.
///
/// `service_account_key` holds the service account JSON document. It may
/// only be omitted outside production, for storage emulators.
#[derive(Clone)]
pub struct CloudStorageConfig {
    pub bucket: String,
    pub service_account_key: Option<String>,
    pub upload_endpoint: String,
    pub public_base_url: String,
}

impl CloudStorageConfig {
    fn from_env(environment: AppEnvironment) -> Result<Option<Self>, ConfigError> {
        let Some(bucket) = optional_var("GCS_BUCKET_NAME") else {
            return Ok(None);
        };

        let service_account_key = optional_var("GCP_KEY_JSON");
        if service_account_key.is_none() && environment == AppEnvironment::Production {
            return Err(ConfigError::MissingVar("GCP_KEY_JSON"));
        }

        Ok(Some(Self {
            bucket,
            service_account_key,
            upload_endpoint: optional_var("GCS_UPLOAD_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_STORAGE_HOST.to_string()),
            public_base_url: optional_var("GCS_PUBLIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_STORAGE_HOST.to_string()),
        }))
    }
}

impl fmt::Debug for CloudStorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudStorageConfig")
            .field("bucket", &self.bucket)
            .field("upload_endpoint", &self.upload_endpoint)
            .field("public_base_url", &self.public_base_url)
            .field("service_account", &self.service_account_key.is_some())
            .finish_non_exhaustive()
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidUploadLimit,
    InvalidLogFormat,
    MissingVar(&'static str),
    Unconfigured(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUploadLimit => {
                write!(f, "APP_MAX_UPLOAD_BYTES must be a non-negative integer")
            }
            ConfigError::InvalidLogFormat => {
                write!(f, "APP_LOG_FORMAT must be `compact` or `json`")
            }
            ConfigError::MissingVar(name) => write!(f, "{name} must be set"),
            ConfigError::Unconfigured(component) => {
                write!(f, "{component} is not configured")
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
