use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub logs: LogsConfig,
}

/// Where the `/api/...` routes are served from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "default_summarize_backend")]
    pub summarize: BackendConfig,
    #[serde(default = "default_style_backend")]
    pub style: BackendConfig,
    #[serde(default = "default_complete_backend")]
    pub complete: BackendConfig,
}

/// The backend each form expects behind the gateway. Only the port is
/// used, to tell the user what should be running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            summarize: default_summarize_backend(),
            style: default_style_backend(),
            complete: default_complete_backend(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_summarize_backend() -> BackendConfig {
    BackendConfig { port: 8000 }
}

fn default_style_backend() -> BackendConfig {
    BackendConfig { port: 8001 }
}

fn default_complete_backend() -> BackendConfig {
    BackendConfig { port: 8002 }
}

fn default_log_level() -> String {
    "info".to_string()
}
