use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use threemeals_core::{
    AlternativesProvider, FullMealPlan, Meal, MealType, PlanGenerator, ProviderError,
    UserPreferences, ALTERNATIVES_PER_SWAP,
};

use crate::config::Config;

use super::template::{expand_template, pad_weeks};
use super::{missing_key, prompt, schema, PlanStrategy};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Generates plans and alternatives with a Gemini model.
///
/// Constructed once from configuration and shared by reference.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    strategy: PlanStrategy,
    plan_days: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            strategy: PlanStrategy::Full,
            plan_days: 30,
        }
    }

    /// Builds a client from an optional key, failing when none is set.
    pub fn from_key(api_key: Option<&str>, model: &str) -> Result<Self, ProviderError> {
        match api_key {
            Some(key) if !key.trim().is_empty() => Ok(Self::new(key, model)),
            _ => Err(missing_key()),
        }
    }

    /// Builds the client described by the `gemini` and `plan` settings.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Ok(
            Self::from_key(config.api_key.value.as_deref(), &config.model.value)?
                .with_strategy(config.plan_strategy.value)
                .with_plan_days(config.plan_days.value),
        )
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_strategy(mut self, strategy: PlanStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_plan_days(mut self, days: u32) -> Self {
        self.plan_days = days;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one prompt and returns the model's text.
    async fn generate_content(&self, prompt: String, schema: Value) -> Result<String, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });

        tracing::debug!("Calling {} ({})", self.model, url);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error: Value = response.json().await.unwrap_or(Value::Null);
            let message = error["error"]["message"]
                .as_str()
                .unwrap_or("Unknown error")
                .to_string();
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(text)
    }
}

fn parse_plan(text: &str) -> Result<FullMealPlan, ProviderError> {
    serde_json::from_str(text).map_err(|e| {
        tracing::error!("JSON parse error. Response length: {}", text.len());
        ProviderError::Parse(format!(
            "{}. The response may have been too large. Please try again.",
            e
        ))
    })
}

#[async_trait]
impl PlanGenerator for GeminiClient {
    async fn generate(&self, prefs: &UserPreferences) -> Result<FullMealPlan, ProviderError> {
        let mut plan = match self.strategy {
            PlanStrategy::Full => {
                let text = self
                    .generate_content(prompt::full_plan(prefs, self.plan_days), schema::meal_plan())
                    .await?;
                let mut plan = parse_plan(&text)?;
                plan.weeks = pad_weeks(plan.weeks, self.plan_days.div_ceil(7));
                plan
            }
            PlanStrategy::Template => {
                let text = self
                    .generate_content(prompt::template_plan(prefs), schema::meal_plan())
                    .await?;
                expand_template(parse_plan(&text)?)?
            }
        };

        for week in &mut plan.weeks {
            week.dedup_groceries();
        }

        let repeats = plan.repeated_main_titles();
        if repeats > 0 && self.strategy == PlanStrategy::Full {
            tracing::warn!("Generated plan repeats {} main meal titles", repeats);
        }
        plan.validate()?;
        Ok(plan)
    }
}

#[async_trait]
impl AlternativesProvider for GeminiClient {
    async fn alternatives(
        &self,
        prefs: &UserPreferences,
        meal_type: MealType,
        current: &Meal,
        avoid_titles: &[String],
    ) -> Result<Vec<Meal>, ProviderError> {
        let text = self
            .generate_content(
                prompt::alternatives(prefs, meal_type, current, avoid_titles),
                schema::alternatives(),
            )
            .await?;
        let meals: Vec<Meal> =
            serde_json::from_str(&text).map_err(|e| ProviderError::Parse(e.to_string()))?;

        let avoided: Vec<String> = avoid_titles.iter().map(|t| t.trim().to_lowercase()).collect();
        let meals: Vec<Meal> = meals
            .into_iter()
            .filter(|m| !m.title.trim().is_empty())
            .filter(|m| !avoided.contains(&m.title.trim().to_lowercase()))
            .take(ALTERNATIVES_PER_SWAP)
            .collect();

        if meals.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(meals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::Router;

    /// Serves `body` with `status` for every request.
    async fn mock_gemini(status: StatusCode, body: Value) -> String {
        let app = Router::new().fallback(move || {
            let body = body.clone();
            async move { (status, axum::Json(body)).into_response() }
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn wrap_text(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    fn week_json(days: u32) -> String {
        let days: Vec<Value> = (1..=days)
            .map(|n| {
                json!({
                    "day": n,
                    "breakfast": { "title": format!("Breakfast {}", n), "prepNotes": "" },
                    "lunch": { "title": format!("Lunch {}", n), "prepNotes": "" },
                    "dinner": { "title": format!("Dinner {}", n), "prepNotes": "" },
                    "snack": { "title": "Banana", "prepNotes": "Slice" }
                })
            })
            .collect();
        json!({
            "days": days,
            "weeks": [{ "week": 1, "groceryList": ["Oats"], "batchPrepTips": ["Cook rice"] }]
        })
        .to_string()
    }

    fn prefs() -> UserPreferences {
        UserPreferences {
            age: "2 years".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_key_requires_key() {
        assert!(matches!(
            GeminiClient::from_key(None, "m"),
            Err(ProviderError::NotConfigured(_))
        ));
        assert!(GeminiClient::from_key(Some("  "), "m").is_err());
        assert!(GeminiClient::from_key(Some("k"), "m").is_ok());
    }

    #[tokio::test]
    async fn test_template_strategy_expands_to_28_days() {
        let url = mock_gemini(StatusCode::OK, wrap_text(&week_json(7))).await;
        let client = GeminiClient::new("key", "test-model")
            .with_base_url(url)
            .with_strategy(PlanStrategy::Template);

        let plan = client.generate(&prefs()).await.unwrap();
        assert_eq!(plan.days.len(), 28);
        assert_eq!(plan.weeks.len(), 4);
        assert_eq!(plan.days[0].snacks[0].title, "Banana");
    }

    #[tokio::test]
    async fn test_full_strategy_pads_weeks() {
        let url = mock_gemini(StatusCode::OK, wrap_text(&week_json(30))).await;
        let client = GeminiClient::new("key", "test-model").with_base_url(url);

        let plan = client.generate(&prefs()).await.unwrap();
        assert_eq!(plan.days.len(), 30);
        assert_eq!(plan.weeks.len(), 5);
        assert!(plan.uncovered_weeks().is_empty());
    }

    #[tokio::test]
    async fn test_generated_groceries_are_deduplicated() {
        let mut body: Value = serde_json::from_str(&week_json(30)).unwrap();
        body["weeks"][0]["groceryList"] = json!(["Oats", "Bananas", "oats", " Bananas"]);
        let url = mock_gemini(StatusCode::OK, wrap_text(&body.to_string())).await;
        let client = GeminiClient::new("key", "test-model").with_base_url(url);

        let plan = client.generate(&prefs()).await.unwrap();
        assert_eq!(plan.weeks.len(), 5);
        for week in &plan.weeks {
            assert_eq!(week.grocery_list, vec!["Oats", "Bananas"]);
        }
    }

    #[tokio::test]
    async fn test_empty_text_is_an_error() {
        let url = mock_gemini(StatusCode::OK, wrap_text("  ")).await;
        let client = GeminiClient::new("key", "m").with_base_url(url);
        assert!(matches!(
            client.generate(&prefs()).await,
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_truncated_json_is_a_parse_error() {
        let url = mock_gemini(StatusCode::OK, wrap_text("{\"days\": [")).await;
        let client = GeminiClient::new("key", "m").with_base_url(url);
        let err = client.generate(&prefs()).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse meal plan"));
    }

    #[tokio::test]
    async fn test_upstream_error_message() {
        let url = mock_gemini(
            StatusCode::FORBIDDEN,
            json!({ "error": { "code": 403, "message": "API key not valid" } }),
        )
        .await;
        let client = GeminiClient::new("bad", "m").with_base_url(url);
        match client.generate(&prefs()).await {
            Err(ProviderError::Upstream { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.days.len())),
        }
    }

    #[tokio::test]
    async fn test_alternatives_filter_avoided_titles() {
        let meals = json!([
            { "title": "Pasta", "prepNotes": "", "prepTime": "5 mins", "cookTime": "10 mins" },
            { "title": "Rice Bowl", "prepNotes": "", "prepTime": "5 mins", "cookTime": "15 mins" },
            { "title": "Soup", "prepNotes": "", "prepTime": "10 mins", "cookTime": "20 mins" },
            { "title": "Wrap", "prepNotes": "", "prepTime": "5 mins", "cookTime": "0 mins" }
        ])
        .to_string();
        let url = mock_gemini(StatusCode::OK, wrap_text(&meals)).await;
        let client = GeminiClient::new("key", "m").with_base_url(url);

        let alts = client
            .alternatives(
                &prefs(),
                MealType::Dinner,
                &Meal::new("Fish", ""),
                &["pasta".to_string()],
            )
            .await
            .unwrap();
        let titles: Vec<_> = alts.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Rice Bowl", "Soup", "Wrap"]);
        assert_eq!(alts[2].cook_time.as_deref(), Some("0 mins"));
    }
}
