//! Advisor Module
//! 
//! Tip and quiz generation over an `LLMProvider`. Output is untrusted text:
//! it is parsed, shape-checked, and turned into typed values or a
//! `GenerationError`.

mod parse;
mod prompt;
mod quiz;
mod tips;

pub use parse::extract_json;
pub use prompt::{PromptBuilder, QUIZ_OPTION_COUNT, QUIZ_QUESTION_COUNT, TIP_COUNT};
pub use quiz::{AnswerStatus, QuizGenerator, QuizOutput, QuizQuestion, QuizSession};
pub use tips::{TipGenerator, TipsOutput};
