//! `stallbook-ai`
//!
//! **Responsibility:** ingredient ordering suggestions from a generative-text model.
//!
//! This crate is not part of the domain model:
//! - It does not depend on the inventory/sales/accounting crates; callers pass text in.
//! - It never mutates shop state.
//! - It returns suggestions, not records.

pub mod gemini;
pub mod llm;
pub mod suggest;

pub use gemini::{GeminiClient, GeminiClientConfig};
pub use llm::{LlmClient, LlmError, LlmRequest, MockLlmClient};
pub use suggest::{IngredientSuggester, IngredientSuggestions, SuggestError, SuggestionInput};
