//! Ingredient ordering suggestions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::{LlmClient, LlmError, LlmRequest};

const SYSTEM_PROMPT: &str = "You are an AI assistant specialized in providing ingredient \
suggestions for shawarma restaurants. Based on the provided sales data, current season, and \
menu, suggest optimal quantities for each ingredient to order and prepare. Consider sales \
trends, seasonality, and predicted waste reduction to minimize waste and maximize profits. \
Always provide a clear reasoning for the suggestion.";

const MAX_OUTPUT_LOG_CHARS: usize = 2_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionInput {
    /// Historical sales as CSV text.
    pub sales_data: String,
    pub season: String,
    pub menu: String,
}

impl SuggestionInput {
    fn validate(&self) -> Result<(), SuggestError> {
        if self.season.trim().is_empty() {
            return Err(SuggestError::InvalidInput("season is required".to_string()));
        }
        if self.menu.trim().is_empty() {
            return Err(SuggestError::InvalidInput("menu is required".to_string()));
        }
        Ok(())
    }
}

/// Suggested quantity per ingredient name, with the model's reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientSuggestions {
    pub ingredient_suggestions: BTreeMap<String, f64>,
    pub reasoning: String,
}

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("invalid suggestion input: {0}")]
    InvalidInput(String),

    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model returned an unusable answer: {0}")]
    Malformed(String),
}

pub fn build_prompt(input: &SuggestionInput) -> String {
    format!(
        "Sales Data (CSV):\n{}\n\nCurrent Season: {}\n\nMenu: {}\n\n\
         Respond with a JSON object of the shape \
         {{\"ingredientSuggestions\": {{\"<ingredient name>\": <quantity>}}, \"reasoning\": \"...\"}}. \
         Quantities are plain numbers. Return JSON only.\n",
        input.sales_data.trim_end(),
        input.season.trim(),
        input.menu.trim(),
    )
}

/// Parse the model's answer, tolerating a fenced ```json block or surrounding prose.
pub fn parse_suggestions(text: &str) -> Result<IngredientSuggestions, SuggestError> {
    let json = extract_json(text)
        .ok_or_else(|| SuggestError::Malformed("no JSON object in model output".to_string()))?;
    let parsed: IngredientSuggestions = serde_json::from_str(json)
        .map_err(|e| SuggestError::Malformed(format!("invalid suggestion JSON: {e}")))?;

    if let Some((name, qty)) = parsed
        .ingredient_suggestions
        .iter()
        .find(|(_, q)| !q.is_finite() || **q < 0.0)
    {
        return Err(SuggestError::Malformed(format!(
            "suggested quantity for {name} is not a non-negative number: {qty}"
        )));
    }
    Ok(parsed)
}

fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

fn truncate_for_log(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub struct IngredientSuggester<C> {
    client: C,
    model: String,
    temperature: f32,
}

impl<C: LlmClient> IngredientSuggester<C> {
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: 0.2,
        }
    }

    pub async fn suggest(&self, input: &SuggestionInput) -> Result<IngredientSuggestions, SuggestError> {
        input.validate()?;

        let request = LlmRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: build_prompt(input),
            model: self.model.clone(),
            temperature: self.temperature,
            json_response: true,
        };
        tracing::info!(
            model = %self.model,
            season = %input.season,
            sales_data_len = input.sales_data.len(),
            "requesting ingredient suggestions"
        );

        let output = self.client.complete(request).await?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(
                llm_output = %truncate_for_log(&output, MAX_OUTPUT_LOG_CHARS),
                "raw suggestion output"
            );
        }

        let suggestions = parse_suggestions(&output)
            .inspect_err(|e| tracing::warn!(error = %e, "could not parse suggestions"))?;
        tracing::info!(
            ingredients = suggestions.ingredient_suggestions.len(),
            "ingredient suggestions ready"
        );
        Ok(suggestions)
    }
}
