//! Agent Module
//! 
//! Seam to the external text-generation service: the provider trait, its
//! concrete backends and a caching decorator.

mod cache;
mod provider;

pub use cache::{CachedProvider, LLMCache};
pub use provider::{build_provider, LLMProvider, OllamaProvider, OpenAICompatibleProvider, StaticProvider};
