//! # Application Configuration
//!
//! This module defines the configuration structure for the `bokji-server` and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables. This approach allows for a structured, flexible, and maintainable
//! configuration setup.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory holding the persisted index snapshot.
    #[serde(default = "default_index_dir")]
    pub index_dir: String,
    /// Path to the canonical corpus JSON file.
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,

    /// Configuration for the text embedding model.
    pub embedding: EmbeddingConfig,
    /// A map of named, reusable AI provider configurations.
    pub providers: HashMap<String, ProviderConfig>,
    /// A map of model-backed tasks, each naming the provider it runs on.
    pub tasks: TasksConfig,
}

fn default_port() -> u16 {
    9090
}
fn default_index_dir() -> String {
    "db/index".to_string()
}
fn default_corpus_path() -> String {
    "db/corpus.json".to_string()
}

/// Configuration for the embedding model provider.
#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub model_name: String,
    pub api_key: Option<String>,
}

/// A reusable configuration for a specific AI provider instance.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider (e.g., "gemini", "local").
    pub provider: String,
    /// The API URL. Optional for providers like Gemini where it can be derived.
    pub api_url: Option<String>,
    /// The API key, which can be null for local providers.
    pub api_key: Option<String>,
    pub model_name: String,
}

/// Which provider each model-backed task runs on: answer generation and the
/// cheap yes/no judgments (guardrail relevance, context filter, verification).
#[derive(Debug, Deserialize, Clone)]
pub struct TasksConfig {
    #[serde(default = "default_task_provider")]
    pub chat: String,
    #[serde(default = "default_task_provider")]
    pub judge: String,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            chat: default_task_provider(),
            judge: default_task_provider(),
        }
    }
}

fn default_task_provider() -> String {
    "default".to_string()
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(format!("Invalid substitution pattern: {e}")))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| "".to_string())
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// This function reads the configuration from a file. It also merges in environment
/// variables, allowing for overrides and substitution in the YAML file.
/// - Top-level keys like `port` are overridden by `PORT`.
/// - Nested keys are overridden by `BOKJI_...` variables (e.g., `BOKJI_EMBEDDING__API_URL`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let main_config_path = if let Some(override_path) = config_path_override {
        override_path.to_string()
    } else {
        let user_config_path = format!("{base_path}/config.yml");
        if std::path::Path::new(&user_config_path).exists() {
            info!("Loading user-defined configuration from '{user_config_path}'.");
            user_config_path
        } else {
            let provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "local".to_string());
            let fallback_path = format!("{base_path}/config.{provider}.yml");
            info!("'{user_config_path}' not found. Falling back to '{fallback_path}' based on AI_PROVIDER='{provider}'.");
            fallback_path
        }
    };

    let main_content = read_and_substitute(&main_config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Main config file not found at '{main_config_path}'. Please ensure 'config.yml' \
exists or your AI_PROVIDER is set to load a valid template ('local' or 'gemini')."
        ))
    })?;

    let settings = ConfigBuilder::builder()
        .add_source(File::from_str(&main_content, FileFormat::Yaml))
        // Environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("BOKJI")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
