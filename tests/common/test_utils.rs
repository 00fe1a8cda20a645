use inference_hub::{
    Result,
    config::{Config, GatewayConfig},
    services::ImageFile,
};
use tempfile::TempDir;
use tokio::fs;

pub const SUMMARIZE_FALLBACK: &str =
    "Error connecting to summarization service. Make sure the backend is running on port 8000.";
pub const STYLE_FALLBACK: &str =
    "Error connecting to style transfer service. Make sure the backend is running on port 8001.";
pub const COMPLETE_FALLBACK: &str =
    "Error connecting to text completion service. Make sure the backend is running on port 8002.";

/// Create a test configuration pointing at `base_url`
pub fn create_test_config(base_url: &str) -> Config {
    Config {
        gateway: GatewayConfig {
            base_url: base_url.to_string(),
        },
        ..Default::default()
    }
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

pub fn content_image() -> ImageFile {
    ImageFile::new("content.jpg", "image/jpeg", b"content-bytes".to_vec())
}

pub fn style_image() -> ImageFile {
    ImageFile::new("style.png", "image/png", b"style-bytes".to_vec())
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
gateway:
  base_url: "http://127.0.0.1:3000"

services:
  summarize:
    port: 9000
  style:
    port: 9001
  complete:
    port: 9002

logs:
  level: "debug"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
services:
  summarize:
    port: "not-a-number"
"#;
