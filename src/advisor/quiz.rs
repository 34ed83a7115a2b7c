//! Environmental Quiz
//! 
//! Generation of a fixed-shape multiple-choice quiz and the scoring state
//! for playing through it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::parse::extract_json;
use super::prompt::{PromptBuilder, QUIZ_OPTION_COUNT, QUIZ_QUESTION_COUNT, QUIZ_SYSTEM};
use crate::agent::LLMProvider;
use crate::error::GenerationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// The quiz question.
    pub question: String,
    /// Exactly four possible answers.
    pub options: Vec<String>,
    /// Index of the correct answer in `options`, 0 to 3.
    pub correct_answer_index: usize,
    /// A brief explanation of the correct answer.
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuizOutput {
    /// Exactly five quiz questions.
    pub questions: Vec<QuizQuestion>,
}

impl QuizOutput {
    /// Reject anything but 5 questions of 4 options with an in-range answer
    pub fn check_shape(&self) -> Result<(), GenerationError> {
        if self.questions.len() != QUIZ_QUESTION_COUNT {
            return Err(GenerationError::Malformed(format!(
                "expected {} questions, got {}",
                QUIZ_QUESTION_COUNT,
                self.questions.len()
            )));
        }
        for (i, q) in self.questions.iter().enumerate() {
            if q.options.len() != QUIZ_OPTION_COUNT {
                return Err(GenerationError::Malformed(format!(
                    "question {} has {} options",
                    i + 1,
                    q.options.len()
                )));
            }
            if q.correct_answer_index >= QUIZ_OPTION_COUNT {
                return Err(GenerationError::Malformed(format!(
                    "question {} has answer index {}",
                    i + 1,
                    q.correct_answer_index
                )));
            }
        }
        Ok(())
    }
}

pub struct QuizGenerator {
    provider: Arc<dyn LLMProvider>,
    prompts: Arc<PromptBuilder>,
    model: String,
}

impl QuizGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, prompts: Arc<PromptBuilder>, model: impl Into<String>) -> Self {
        Self { provider, prompts, model: model.into() }
    }

    pub async fn generate(&self) -> Result<Vec<QuizQuestion>, GenerationError> {
        let raw = self
            .provider
            .generate(&self.model, self.prompts.quiz_prompt(), Some(QUIZ_SYSTEM.to_string()))
            .await
            .map_err(GenerationError::Provider)?;

        let output: QuizOutput = extract_json(&raw)?;
        output.check_shape()?;
        info!("Generated quiz with {} questions", output.questions.len());
        Ok(output.questions)
    }
}

/// Outcome of answering the current question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerStatus {
    Unanswered,
    Correct,
    Incorrect,
}

/// Play-through state: one answer per question, then advance.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    index: usize,
    score: usize,
    status: AnswerStatus,
}

impl QuizSession {
    const EXCELLENT_ABOVE: usize = 3;

    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self { questions, index: 0, score: 0, status: AnswerStatus::Unanswered }
    }

    pub fn current(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.index)
    }

    /// 1-based position of the current question
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn status(&self) -> AnswerStatus {
        self.status
    }

    /// Record an answer for the current question. Repeat answers are ignored
    /// and report the first outcome.
    pub fn answer(&mut self, option: usize) -> AnswerStatus {
        if self.status != AnswerStatus::Unanswered {
            return self.status;
        }
        let Some(correct) = self.current().map(|q| q.correct_answer_index) else {
            return AnswerStatus::Unanswered;
        };
        self.status = if option == correct {
            self.score += 1;
            AnswerStatus::Correct
        } else {
            AnswerStatus::Incorrect
        };
        self.status
    }

    /// Move on once the current question has been answered
    pub fn advance(&mut self) -> bool {
        if self.status == AnswerStatus::Unanswered || self.index + 1 >= self.questions.len() {
            return false;
        }
        self.index += 1;
        self.status = AnswerStatus::Unanswered;
        true
    }

    pub fn is_finished(&self) -> bool {
        !self.questions.is_empty()
            && self.index + 1 == self.questions.len()
            && self.status != AnswerStatus::Unanswered
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn closing_message(&self) -> &'static str {
        if self.score > Self::EXCELLENT_ABOVE {
            "Excellent work, Eco-Champion!"
        } else {
            "Good effort! Keep learning and growing."
        }
    }
}
