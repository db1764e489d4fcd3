use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the dashboard.
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

/// Top-level configuration for the dashboard.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("AI_BOS_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("AI_BOS_API_URL")
            .unwrap_or_else(|_| ApiConfig::DEFAULT_BASE_URL.to_string());
        let api = ApiConfig::new(base_url)?;

        let timeout_secs = env::var("AI_BOS_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let data_dir = PathBuf::from(
            env::var("AI_BOS_DATA_DIR").unwrap_or_else(|_| ".ai-bos".to_string()),
        );
        let export_dir = env::var("AI_BOS_EXPORT_DIR").ok().map(PathBuf::from);

        let log_level = env::var("AI_BOS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            api: ApiConfig {
                timeout: Duration::from_secs(timeout_secs),
                ..api
            },
            storage: StorageConfig {
                data_dir,
                export_dir,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Location and limits of the remote calculation service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// Validates the base URL and applies the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl { value: base_url });
        }

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(30),
        })
    }

    /// Root of the versioned endpoint set.
    pub fn endpoint_root(&self) -> String {
        format!("{}/api/v1", self.base_url)
    }
}

/// Where history and exported artifacts live on disk.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub export_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("exports"))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTimeout,
    InvalidApiUrl { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeout => {
                write!(f, "AI_BOS_API_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::InvalidApiUrl { value } => {
                write!(f, "API base URL '{value}' must start with http:// or https://")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
