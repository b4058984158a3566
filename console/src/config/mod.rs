use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub session_secret: Secret<String>,
}

#[derive(Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the managed backend (auth + REST query surface).
    pub url: String,
    /// Public API key sent as the `apikey` header on every call.
    pub api_key: Secret<String>,
    /// Per-call timeout; on expiry the caller resolves to the most
    /// restrictive outcome rather than waiting on the backend.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    5_000
}

#[derive(Deserialize, Clone)]
pub struct ObservabilitySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: default_otlp_endpoint(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");

    // Check if we're already in console directory or need to navigate to it
    let configuration_directory = if base_path.ends_with("console") {
        base_path.join("config")
    } else {
        base_path.join("console").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings = settings.try_deserialize::<Settings>()?;
    validate(&settings)?;
    Ok(settings)
}

/// Backend URL and API key must be present before the server accepts a
/// single request; their absence is a startup failure, never a per-request
/// error.
fn validate(settings: &Settings) -> Result<(), config::ConfigError> {
    if settings.backend.url.trim().is_empty() {
        return Err(config::ConfigError::Message(
            "backend.url must not be empty".to_string(),
        ));
    }
    if settings.backend.api_key.expose_secret().trim().is_empty() {
        return Err(config::ConfigError::Message(
            "backend.api_key must not be empty".to_string(),
        ));
    }
    Ok(())
}
