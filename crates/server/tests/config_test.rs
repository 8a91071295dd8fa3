//! Tests for configuration loading and environment variable substitution.

use bokji_server::config::{get_config, ConfigError};
use std::io::Write;

const CONFIG_TEMPLATE: &str = r#"
port: 8181
index_dir: "data/index"
corpus_path: "data/corpus.json"

embedding:
  api_url: "http://localhost:8000/v1/embeddings"
  model_name: "text-embedding-3-small"
  api_key: "${CONFIG_TEST_EMBEDDING_KEY}"

providers:
  default:
    provider: "local"
    api_url: "http://localhost:8000/v1/chat/completions"
    model_name: "test-model"

tasks:
  chat: "default"
  judge: "default"
"#;

#[test]
fn config_loads_with_env_substitution() {
    // Arrange
    std::env::set_var("CONFIG_TEST_EMBEDDING_KEY", "secret-key");
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    file.write_all(CONFIG_TEMPLATE.as_bytes()).unwrap();

    // Act
    let config = get_config(file.path().to_str()).unwrap();

    // Assert
    assert_eq!(config.port, 8181);
    assert_eq!(config.index_dir, "data/index");
    assert_eq!(config.corpus_path, "data/corpus.json");
    assert_eq!(config.embedding.api_key.as_deref(), Some("secret-key"));
    assert_eq!(config.tasks.chat, "default");

    let provider = config.providers.get("default").unwrap();
    assert_eq!(provider.provider, "local");
    assert_eq!(provider.model_name, "test-model");
}

#[test]
fn missing_config_file_is_reported() {
    let err = get_config(Some("/nonexistent/config.yml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
    assert!(err.to_string().contains("/nonexistent/config.yml"));
}
