use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use threemeals_core::{
    AlternativesProvider, EmailList, FullMealPlan, Meal, MealType, PlanGenerator, ProviderError,
    RemotePersistence, StoredPlan, UserPreferences,
};

use crate::api::{
    AlternativesRequest, ErrorBody, GetPlanRequest, SaveEmailRequest, SaveEmailResponse,
    EMAILS_PATH, GENERATE_PLAN_PATH, GET_ALTERNATIVES_PATH, GET_PLAN_PATH, SAVE_EMAIL_PATH,
};

/// Talks to a hosted `threemeals-server`. Covers generation, alternatives
/// and persistence, so a CLI pointed at a server needs no API key.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn handle<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            };
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ProviderError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Self::handle(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Self::handle(response).await
    }
}

#[async_trait]
impl PlanGenerator for HttpBackend {
    async fn generate(&self, prefs: &UserPreferences) -> Result<FullMealPlan, ProviderError> {
        let plan: FullMealPlan = self.post_json(GENERATE_PLAN_PATH, prefs).await?;
        plan.validate()?;
        Ok(plan)
    }
}

#[async_trait]
impl AlternativesProvider for HttpBackend {
    async fn alternatives(
        &self,
        prefs: &UserPreferences,
        meal_type: MealType,
        current: &Meal,
        avoid_titles: &[String],
    ) -> Result<Vec<Meal>, ProviderError> {
        let request = AlternativesRequest {
            prefs: prefs.clone(),
            meal_type,
            current_meal: current.clone(),
            existing_titles: avoid_titles.to_vec(),
        };
        self.post_json(GET_ALTERNATIVES_PATH, &request).await
    }
}

#[async_trait]
impl RemotePersistence for HttpBackend {
    async fn save(
        &self,
        email: &str,
        meal_plan: &FullMealPlan,
        prefs: &UserPreferences,
    ) -> Result<bool, ProviderError> {
        let request = SaveEmailRequest {
            email: email.to_string(),
            meal_plan: Some(meal_plan.clone()),
            prefs: Some(prefs.clone()),
        };
        let response: SaveEmailResponse = self.post_json(SAVE_EMAIL_PATH, &request).await?;
        Ok(response.success)
    }

    async fn get(&self, email: &str) -> Result<StoredPlan, ProviderError> {
        let request = GetPlanRequest {
            email: email.to_string(),
        };
        self.post_json(GET_PLAN_PATH, &request).await
    }

    async fn list_emails(&self) -> Result<EmailList, ProviderError> {
        self.get_json(EMAILS_PATH).await
    }
}
