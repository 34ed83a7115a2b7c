use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::json;
use std::sync::Arc;

use crate::config::{AppConfig, ProviderKind};

/// External text-generation service. Output is free-form text the caller
/// has to parse; a call may fail or return anything.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn generate(&self, model: &str, prompt: String, system: Option<String>) -> Result<String>;
}

pub struct OllamaProvider {
    client: ollama_rs::Ollama,
}

impl OllamaProvider {
    pub fn new(client: ollama_rs::Ollama) -> Self {
        Self { client }
    }

    /// `base_url` like `http://localhost:11434`; `None` uses the Ollama default.
    pub fn from_base_url(base_url: Option<&str>) -> Result<Self> {
        let client = match base_url {
            None => ollama_rs::Ollama::default(),
            Some(raw) => {
                let url = Url::parse(raw).with_context(|| format!("Invalid Ollama URL '{}'", raw))?;
                let host = url.host_str().context("Ollama URL has no host")?;
                let port = url.port_or_known_default().unwrap_or(11434);
                ollama_rs::Ollama::builder()
                    .host(format!("{}://{}", url.scheme(), host).as_str())
                    .port(port)
                    .build()
            }
        };
        Ok(Self::new(client))
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    async fn generate(&self, model: &str, prompt: String, system: Option<String>) -> Result<String> {
        use ollama_rs::generation::chat::{request::ChatMessageRequest, ChatMessage};

        let mut messages = Vec::new();
        if let Some(sys) = system {
            messages.push(ChatMessage::system(sys));
        }
        messages.push(ChatMessage::user(prompt));

        let res = self
            .client
            .send_chat_messages(ChatMessageRequest::new(model.to_string(), messages))
            .await
            .context("Ollama chat request failed")?;

        Ok(res.message.content)
    }
}

pub struct OpenAICompatibleProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    temperature: f32,
}

impl OpenAICompatibleProvider {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl LLMProvider for OpenAICompatibleProvider {
    async fn generate(&self, model: &str, prompt: String, system: Option<String>) -> Result<String> {
        let mut messages = Vec::new();
        if let Some(sys) = system {
            messages.push(json!({ "role": "system", "content": sys }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        let body = json!({
            "model": model,
            "messages": messages,
            "temperature": self.temperature,
            "response_format": { "type": "json_object" },
        });

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .json(&body);

        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await?.error_for_status()?;
        let json: serde_json::Value = res.json().await?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .context("Failed to parse content from OpenAI response")?;

        Ok(content.to_string())
    }
}

/// Offline provider answering from fixed strings.
///
/// Each rule is a `(needle, response)` pair; the first needle found in the
/// lowercased prompt wins. Without a match the fallback is returned, or an
/// error when there is none.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    rules: Vec<(String, String)>,
    fallback: Option<String>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_to(mut self, needle: &str, response: impl Into<String>) -> Self {
        self.rules.push((needle.to_lowercase(), response.into()));
        self
    }

    pub fn with_fallback(mut self, response: impl Into<String>) -> Self {
        self.fallback = Some(response.into());
        self
    }

    /// Canned tips and quiz for running without a model
    pub fn offline() -> Self {
        Self::new()
            .respond_to("personalized tips", OFFLINE_TIPS)
            .respond_to("quiz", OFFLINE_QUIZ)
    }
}

#[async_trait]
impl LLMProvider for StaticProvider {
    async fn generate(&self, _model: &str, prompt: String, _system: Option<String>) -> Result<String> {
        let p = prompt.to_lowercase();
        self.rules
            .iter()
            .find(|(needle, _)| p.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .or_else(|| self.fallback.clone())
            .context("No canned response for prompt")
    }
}

const OFFLINE_TIPS: &str = r#"{"tips": [
  "**Share the ride.** Carpool or take the bus on school days to cut transport emissions.",
  "**Switch to LEDs.** Energy-saving bulbs use about a sixth of the power of incandescent ones.",
  "**Carry a bottle.** A refillable bottle replaces the plastic ones you buy each week."
]}"#;

const OFFLINE_QUIZ: &str = r#"{"questions": [
  {"question": "Which gas contributes most to human-caused global warming?",
   "options": ["Oxygen", "Carbon dioxide", "Nitrogen", "Helium"],
   "correctAnswerIndex": 1,
   "explanation": "Burning fossil fuels releases large amounts of carbon dioxide, the main long-lived greenhouse gas."},
  {"question": "Which way of getting to school has the lowest carbon footprint?",
   "options": ["Car", "Motorcycle", "Bicycle", "Bus"],
   "correctAnswerIndex": 2,
   "explanation": "Cycling is human-powered and produces no direct emissions."},
  {"question": "What does 'CO2e' stand for?",
   "options": ["Carbon dioxide equivalent", "Carbon oxide energy", "Climate output estimate", "Carbon offset exchange"],
   "correctAnswerIndex": 0,
   "explanation": "CO2e expresses the warming effect of all greenhouse gases in terms of carbon dioxide."},
  {"question": "Which food choice usually has the highest emissions per meal?",
   "options": ["Lentils", "Seasonal vegetables", "Beef", "Rice"],
   "correctAnswerIndex": 2,
   "explanation": "Cattle farming produces methane and needs a lot of land and feed."},
  {"question": "Why does segregating waste help the climate?",
   "options": ["It makes bins lighter", "It lets more material be recycled", "It heats homes", "It has no effect"],
   "correctAnswerIndex": 1,
   "explanation": "Sorted waste can be recycled, avoiding emissions from producing new material and from landfill."}
]}"#;

/// Build the provider selected in configuration
pub fn build_provider(config: &AppConfig) -> Result<Arc<dyn LLMProvider>> {
    let provider: Arc<dyn LLMProvider> = match config.provider {
        ProviderKind::Ollama => Arc::new(OllamaProvider::from_base_url(config.base_url.as_deref())?),
        ProviderKind::OpenAI => {
            let base_url = config
                .base_url
                .clone()
                .context("The openai provider needs base_url (or ECO_BASE_URL)")?;
            Arc::new(OpenAICompatibleProvider::new(base_url, config.api_key.clone()).with_temperature(config.temperature))
        }
        ProviderKind::Static => Arc::new(StaticProvider::offline()),
    };
    Ok(provider)
}
