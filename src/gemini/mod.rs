//! Client for the Gemini `generateContent` REST API.

mod client;
mod prompt;
mod schema;
mod template;

pub use client::{GeminiClient, DEFAULT_BASE_URL};
pub use template::{expand_template, pad_weeks, TEMPLATE_WEEKS};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use threemeals_core::{
    AlternativesProvider, FullMealPlan, Meal, MealType, PlanGenerator, ProviderError,
    UserPreferences,
};

use crate::config::Config;

/// How a full plan is requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStrategy {
    /// Ask for every day of the plan in one response.
    #[default]
    Full,
    /// Ask for one week and rotate it across four weeks.
    Template,
}

impl fmt::Display for PlanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStrategy::Full => write!(f, "full"),
            PlanStrategy::Template => write!(f, "template"),
        }
    }
}

impl FromStr for PlanStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(PlanStrategy::Full),
            "template" => Ok(PlanStrategy::Template),
            _ => Err(format!(
                "Invalid plan strategy '{}'. Valid options: full, template",
                s
            )),
        }
    }
}

fn missing_key() -> ProviderError {
    ProviderError::NotConfigured(
        "API key not configured. Please set GEMINI_API_KEY environment variable.".to_string(),
    )
}

/// Stands in for the model when no API key is configured, so everything
/// else keeps working and model calls fail one request at a time.
pub struct MissingKey;

#[async_trait]
impl PlanGenerator for MissingKey {
    async fn generate(&self, _prefs: &UserPreferences) -> Result<FullMealPlan, ProviderError> {
        Err(missing_key())
    }
}

#[async_trait]
impl AlternativesProvider for MissingKey {
    async fn alternatives(
        &self,
        _prefs: &UserPreferences,
        _meal_type: MealType,
        _current: &Meal,
        _avoid_titles: &[String],
    ) -> Result<Vec<Meal>, ProviderError> {
        Err(missing_key())
    }
}

/// The generator and alternatives provider for this configuration.
pub fn model_from_config(
    config: &Config,
) -> (Arc<dyn PlanGenerator>, Arc<dyn AlternativesProvider>) {
    match GeminiClient::from_config(config) {
        Ok(client) => {
            tracing::info!("Using model {}", client.model());
            let client = Arc::new(client);
            (client.clone(), client)
        }
        Err(e) => {
            tracing::warn!("{}", e);
            (Arc::new(MissingKey), Arc::new(MissingKey))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_strategy_from_str() {
        assert_eq!("Template".parse::<PlanStrategy>().unwrap(), PlanStrategy::Template);
        assert_eq!("full".parse::<PlanStrategy>().unwrap(), PlanStrategy::Full);
        assert!("weekly".parse::<PlanStrategy>().is_err());
    }

    #[tokio::test]
    async fn test_missing_key_fails_each_call() {
        let err = MissingKey
            .generate(&UserPreferences::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
