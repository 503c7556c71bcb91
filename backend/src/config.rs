//! Configuration for the Offline Doctor gateway.

use std::path::Path;
use std::time::Duration;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "DOCTOR_CONFIG";

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Inference backend connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    /// Model selected at startup.
    #[serde(default = "default_model")]
    pub model: String,
    /// Reachability probe timeout.
    #[serde(default = "default_status_timeout")]
    pub status_timeout_secs: u64,
    /// Model listing timeout.
    #[serde(default = "default_list_timeout")]
    pub list_timeout_secs: u64,
    /// Model pull timeout. Pulls download whole models, hence the long default.
    #[serde(default = "default_pull_timeout")]
    pub pull_timeout_secs: u64,
    #[serde(default = "default_generate_timeout")]
    pub generate_timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_model(),
            status_timeout_secs: default_status_timeout(),
            list_timeout_secs: default_list_timeout(),
            pull_timeout_secs: default_pull_timeout(),
            generate_timeout_secs: default_generate_timeout(),
        }
    }
}

/// Sampling options sent with every generation request.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Backend process management at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleConfig {
    /// Spawn `<binary> serve` when the backend is not reachable.
    #[serde(default = "default_true")]
    pub auto_start: bool,
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Grace period between spawning the backend and probing it again.
    #[serde(default = "default_startup_wait")]
    pub startup_wait_secs: u64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            auto_start: default_true(),
            binary: default_binary(),
            startup_wait_secs: default_startup_wait(),
        }
    }
}

impl LifecycleConfig {
    pub fn startup_wait(&self) -> Duration {
        Duration::from_secs(self.startup_wait_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated allowed origins, `*` for any.
    #[serde(default = "default_cors_origins")]
    pub origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_cors_origins(),
        }
    }
}

impl CorsConfig {
    /// Explicit origins, or `None` when any origin is allowed.
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .origins
            .split(',')
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            None
        } else {
            Some(origins)
        }
    }
}

// Default values
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    5000
}
fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "llama3.1:8b".to_string()
}
fn default_status_timeout() -> u64 {
    5
}
fn default_list_timeout() -> u64 {
    10
}
fn default_pull_timeout() -> u64 {
    300
}
fn default_generate_timeout() -> u64 {
    60
}
fn default_temperature() -> f32 {
    0.3
}
fn default_top_p() -> f32 {
    0.9
}
fn default_max_tokens() -> u32 {
    500
}
fn default_true() -> bool {
    true
}
fn default_binary() -> String {
    "ollama".to_string()
}
fn default_startup_wait() -> u64 {
    3
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_cors_origins() -> String {
    "*".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (DOCTOR__SECTION__KEY format)
    /// 2. The file named by `DOCTOR_CONFIG`, or config.toml (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(std::env::var(CONFIG_PATH_ENV).ok().as_deref())
    }

    /// Load with an explicit configuration file, which must then exist.
    /// Without one, an optional `config.toml` is picked up.
    pub fn load_with(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("config").required(false),
        };

        let config = ConfigLoader::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("DOCTOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a single file, without environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }
}
