//! EcoFootprint Explorers
//! 
//! Weekly carbon-footprint calculator for students:
//! - Deterministic emissions calculation by category
//! - Input validation with per-field errors
//! - Model-generated reduction tips and quizzes behind a provider trait
//! - Capped result history and a tree pledge on a pluggable key-value store

pub mod advisor;
pub mod agent;
pub mod calculator;
pub mod config;
pub mod error;
pub mod service;
pub mod storage;
pub mod telemetry;
pub mod validation;

// Re-exports for convenience
pub use calculator::{calculate, CalculationResult, EmissionFactorTable, SurveyRecord};
pub use error::{FactorError, FootprintError};
pub use service::FootprintService;
