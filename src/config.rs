//! Configuration
//! 
//! Optional YAML file, then environment overrides (`.env` is honoured).
//! A missing file means defaults; a malformed one is an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::calculator::EmissionFactorTable;

pub const DEFAULT_CONFIG_FILE: &str = "eco_footprint.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Ollama,
    #[serde(rename = "openai")]
    OpenAI,
    /// Canned responses, no network
    Static,
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" => Ok(ProviderKind::OpenAI),
            "static" | "offline" => Ok(ProviderKind::Static),
            other => anyhow::bail!("Unknown provider '{}' (expected ollama, openai or static)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub temperature: f32,
    /// JSON file backing the key-value store
    pub data_file: PathBuf,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    /// Memoise tip generations for identical surveys
    pub cache_responses: bool,
    pub factors: EmissionFactorTable,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            model: "llama3.2:3b".to_string(),
            base_url: None,
            api_key: None,
            temperature: 0.7,
            data_file: PathBuf::from("eco_footprint_data.json"),
            log_level: "eco_footprint=info".to_string(),
            cache_responses: true,
            factors: EmissionFactorTable::default(),
        }
    }
}

impl AppConfig {
    /// Read `path` (defaults when absent), then apply the process environment
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(path).await?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.factors.check().context("Invalid emission factors")?;
        Ok(config)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Environment overrides, looked up through `var` so tests can inject them
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(provider) = var("ECO_PROVIDER") {
            self.provider = provider.parse()?;
        }
        if let Some(model) = var("ECO_MODEL") {
            self.model = model;
        }
        if let Some(url) = var("ECO_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(key) = var("ECO_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(file) = var("ECO_DATA_FILE") {
            self.data_file = PathBuf::from(file);
        }
        if let Some(level) = var("ECO_LOG") {
            self.log_level = level;
        }
        Ok(())
    }
}
