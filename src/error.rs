//! Error Types
//! 
//! Typed failures for the calculator pipeline. Glue code (config, REPL,
//! provider I/O) stays on `anyhow` and converts at these boundaries.

use thiserror::Error;

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Dotted path, e.g. `transport.daysPerWeek`
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Every field that failed validation, in form order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

/// An emission factor table that breaks the calculator's directional rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactorError {
    #[error("{0} must be finite and non-negative")]
    Negative(&'static str),

    #[error("{0} must lie in (0, 1)")]
    OutsideUnitInterval(&'static str),

    #[error("inefficiencyPenalty must be finite and greater than 1")]
    PenaltyNotAboveOne,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generation request failed: {0:#}")]
    Provider(anyhow::Error),

    #[error("failed to render prompt: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("model returned malformed output: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum FootprintError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("tip generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl FootprintError {
    pub const GENERIC_MESSAGE: &'static str =
        "Oh no! Something went wrong. There was a problem with your request. Please try again.";

    /// Text shown to the user. Field errors are specific; everything else
    /// collapses to one generic retry message.
    pub fn user_message(&self) -> String {
        match self {
            FootprintError::Validation(errors) => errors
                .fields()
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            _ => Self::GENERIC_MESSAGE.to_string(),
        }
    }

    pub fn is_user_retryable(&self) -> bool {
        !matches!(self, FootprintError::Validation(_))
    }
}
