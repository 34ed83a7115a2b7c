use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::parse::extract_json;
use super::prompt::{PromptBuilder, TIPS_SYSTEM, TIP_COUNT};
use crate::agent::LLMProvider;
use crate::calculator::SurveyRecord;
use crate::error::GenerationError;

/// Reply shape for the tip request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TipsOutput {
    /// Personalized markdown tips for reducing the carbon footprint.
    pub tips: Vec<String>,
}

/// Asks the model for reduction tips based on the raw survey answers
/// (not the computed emissions).
pub struct TipGenerator {
    provider: Arc<dyn LLMProvider>,
    prompts: Arc<PromptBuilder>,
    model: String,
}

impl TipGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, prompts: Arc<PromptBuilder>, model: impl Into<String>) -> Self {
        Self { provider, prompts, model: model.into() }
    }

    /// Single attempt, no retry. The tip count is requested, not enforced.
    pub async fn generate(&self, survey: &SurveyRecord) -> Result<Vec<String>, GenerationError> {
        let prompt = self.prompts.tips_prompt(survey)?;
        let raw = self
            .provider
            .generate(&self.model, prompt, Some(TIPS_SYSTEM.to_string()))
            .await
            .map_err(GenerationError::Provider)?;

        let output: TipsOutput = extract_json(&raw)?;
        let tips: Vec<String> = output
            .tips
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if tips.len() != TIP_COUNT {
            debug!("Model returned {} tips instead of {}", tips.len(), TIP_COUNT);
        }
        info!("Generated {} tips", tips.len());
        Ok(tips)
    }
}
