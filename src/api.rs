//! Request and response bodies of the hosted API, shared by the server
//! handlers and the HTTP client.

use serde::{Deserialize, Serialize};

use threemeals_core::{FullMealPlan, Meal, MealType, UserPreferences};

pub const GENERATE_PLAN_PATH: &str = "/api/generate-plan";
pub const GET_ALTERNATIVES_PATH: &str = "/api/get-alternatives";
pub const SAVE_EMAIL_PATH: &str = "/api/save-email";
pub const GET_PLAN_PATH: &str = "/api/get-plan";
pub const EMAILS_PATH: &str = "/api/emails";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativesRequest {
    pub prefs: UserPreferences,
    pub meal_type: MealType,
    pub current_meal: Meal,
    #[serde(default)]
    pub existing_titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEmailRequest {
    #[serde(default)]
    pub email: String,
    pub meal_plan: Option<FullMealPlan>,
    pub prefs: Option<UserPreferences>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEmailResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPlanRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
