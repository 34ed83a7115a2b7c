//! Footprint Service
//! 
//! Orchestrates one submission: validate, calculate, ask for tips, record.
//! The calculation itself stays pure; everything with side effects is here.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::advisor::{PromptBuilder, QuizGenerator, QuizQuestion, TipGenerator};
use crate::agent::{CachedProvider, LLMCache, LLMProvider};
use crate::calculator::{calculate, CalculationResult, EmissionFactorTable, SurveyRecord};
use crate::config::AppConfig;
use crate::error::FootprintError;
use crate::storage::{HistoryStore, KeyValueStore, PledgeStore};
use crate::validation::{validate, SurveyDraft};

pub struct FootprintService {
    factors: EmissionFactorTable,
    tips: TipGenerator,
    quiz: QuizGenerator,
    history: HistoryStore,
    pledges: PledgeStore,
}

impl FootprintService {
    pub fn new(
        factors: EmissionFactorTable,
        tips: TipGenerator,
        quiz: QuizGenerator,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            factors,
            tips,
            quiz,
            history: HistoryStore::new(store.clone()),
            pledges: PledgeStore::new(store),
        }
    }

    /// Wire generators and stores from configuration. Only the tip provider
    /// is cached; a quiz request has no input and should vary between loads.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn LLMProvider>,
        store: Arc<dyn KeyValueStore>,
    ) -> anyhow::Result<Self> {
        let prompts = Arc::new(PromptBuilder::new()?);
        let tip_provider: Arc<dyn LLMProvider> = if config.cache_responses {
            Arc::new(CachedProvider::new(provider.clone(), Arc::new(LLMCache::new())))
        } else {
            provider.clone()
        };
        Ok(Self::new(
            config.factors.clone(),
            TipGenerator::new(tip_provider, prompts.clone(), config.model.clone()),
            QuizGenerator::new(provider, prompts, config.model.clone()),
            store,
        ))
    }

    pub fn factors(&self) -> &EmissionFactorTable {
        &self.factors
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn pledges(&self) -> &PledgeStore {
        &self.pledges
    }

    /// Numbers only, no tips
    pub fn calculate(&self, survey: &SurveyRecord) -> CalculationResult {
        calculate(survey, &self.factors)
    }

    /// Calculation plus tips. A generation failure fails the whole call.
    pub async fn calculate_and_get_tips(&self, survey: &SurveyRecord) -> Result<CalculationResult, FootprintError> {
        let result = self.calculate(survey);
        let tips = self.tips.generate(survey).await?;
        Ok(result.with_tips(tips))
    }

    /// Calculation plus tips, degrading to no tips when generation fails
    pub async fn calculate_with_fallback_tips(&self, survey: &SurveyRecord) -> CalculationResult {
        let result = self.calculate(survey);
        match self.tips.generate(survey).await {
            Ok(tips) => result.with_tips(tips),
            Err(e) => {
                warn!("Tip generation failed, showing result without tips: {}", e);
                result
            }
        }
    }

    /// Form submission: validate, calculate with tips, then append to history.
    /// Nothing is recorded unless the calculation succeeded.
    pub async fn submit(&self, draft: &SurveyDraft) -> Result<CalculationResult, FootprintError> {
        let survey = validate(draft)?;
        let result = match self.calculate_and_get_tips(&survey).await {
            Ok(result) => result,
            Err(e) => {
                error!("Calculation failed: {}", e);
                return Err(e);
            }
        };

        if let Err(e) = self.history.record(result.clone()).await {
            warn!("Result calculated but not saved to history: {:#}", e);
        }
        info!("Submission complete: {} kg CO2e/week", result.total_emissions);
        Ok(result)
    }

    /// Empty on any failure; the caller offers a retry
    pub async fn load_quiz(&self) -> Vec<QuizQuestion> {
        match self.quiz.generate().await {
            Ok(questions) => questions,
            Err(e) => {
                error!("Failed to load quiz: {}", e);
                Vec::new()
            }
        }
    }
}
