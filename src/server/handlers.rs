use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use threemeals_core::{EmailList, FullMealPlan, Meal, StoredPlan, UserPreferences};

use super::AppState;
use crate::api::{
    AlternativesRequest, ErrorBody, GetPlanRequest, SaveEmailRequest, SaveEmailResponse,
};

/// Error response: `{ "error": message }` with a status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn generate_plan(
    State(state): State<AppState>,
    Json(prefs): Json<UserPreferences>,
) -> Result<Json<FullMealPlan>, ApiError> {
    match state.generator.generate(&prefs).await {
        Ok(plan) => {
            tracing::info!("Generated plan with {} days", plan.days.len());
            Ok(Json(plan))
        }
        Err(e) => {
            tracing::error!("Error generating meal plan: {}", e);
            Err(ApiError::internal(e.to_string()))
        }
    }
}

pub async fn get_alternatives(
    State(state): State<AppState>,
    Json(request): Json<AlternativesRequest>,
) -> Result<Json<Vec<Meal>>, ApiError> {
    state
        .alternatives
        .alternatives(
            &request.prefs,
            request.meal_type,
            &request.current_meal,
            &request.existing_titles,
        )
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error getting alternatives: {}", e);
            ApiError::internal(e.to_string())
        })
}

pub async fn save_email(
    State(state): State<AppState>,
    Json(request): Json<SaveEmailRequest>,
) -> Result<Json<SaveEmailResponse>, ApiError> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("Email required"));
    }
    let (Some(meal_plan), Some(prefs)) = (request.meal_plan, request.prefs) else {
        return Err(ApiError::bad_request("Meal plan required"));
    };

    match state.persistence.save(email, &meal_plan, &prefs).await {
        Ok(success) => Ok(Json(SaveEmailResponse { success })),
        Err(e) => {
            tracing::error!("Error saving email: {}", e);
            Err(ApiError::internal("Failed to save email"))
        }
    }
}

pub async fn get_plan(
    State(state): State<AppState>,
    Json(request): Json<GetPlanRequest>,
) -> Result<Json<StoredPlan>, ApiError> {
    let email = request.email.trim();
    if email.is_empty() {
        return Err(ApiError::bad_request("Email required"));
    }

    state.persistence.get(email).await.map(Json).map_err(|e| {
        tracing::error!("Error fetching plan: {}", e);
        ApiError::internal("Failed to fetch plan")
    })
}

pub async fn list_emails(State(state): State<AppState>) -> Result<Json<EmailList>, ApiError> {
    state.persistence.list_emails().await.map(Json).map_err(|e| {
        tracing::error!("Error fetching emails: {}", e);
        ApiError::internal("Failed to fetch emails")
    })
}
