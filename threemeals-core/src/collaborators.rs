//! Seams to the outside world.
//!
//! The planner only ever talks to these traits. Implementations (the model
//! client, the storage backends, the hosted-API client) are constructed
//! once by the application and handed in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ExportError, ProviderError};
use crate::models::{FullMealPlan, Meal, MealType, UserPreferences};

/// Number of alternatives requested for a swap.
pub const ALTERNATIVES_PER_SWAP: usize = 3;

/// Produces a complete plan from preferences.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, prefs: &UserPreferences) -> Result<FullMealPlan, ProviderError>;
}

/// Suggests replacement meals for a single slot.
#[async_trait]
pub trait AlternativesProvider: Send + Sync {
    async fn alternatives(
        &self,
        prefs: &UserPreferences,
        meal_type: MealType,
        current: &Meal,
        avoid_titles: &[String],
    ) -> Result<Vec<Meal>, ProviderError>;
}

/// Result of looking a plan up by email. `exists: false` is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPlan {
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_plan: Option<FullMealPlan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefs: Option<UserPreferences>,
}

impl StoredPlan {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn found(meal_plan: FullMealPlan, prefs: UserPreferences) -> Self {
        Self {
            exists: true,
            meal_plan: Some(meal_plan),
            prefs: Some(prefs),
        }
    }
}

/// One captured email with the time it was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailLogEntry {
    pub email: String,
    pub timestamp: DateTime<Utc>,
}

/// The email log, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmailList {
    pub count: usize,
    pub emails: Vec<EmailLogEntry>,
}

impl EmailList {
    pub fn new(emails: Vec<EmailLogEntry>) -> Self {
        Self {
            count: emails.len(),
            emails,
        }
    }
}

/// Plans stored by email so a returning user can pick up where they left off.
#[async_trait]
pub trait RemotePersistence: Send + Sync {
    /// Stores the plan and records the email in the log. Returns the
    /// backend's `success` flag.
    async fn save(
        &self,
        email: &str,
        meal_plan: &FullMealPlan,
        prefs: &UserPreferences,
    ) -> Result<bool, ProviderError>;

    async fn get(&self, email: &str) -> Result<StoredPlan, ProviderError>;

    async fn list_emails(&self) -> Result<EmailList, ProviderError>;
}

/// Turns the working copy into a printable document.
pub trait DocumentExporter {
    /// Writes the document and returns where it went.
    fn export(&self, plan: &FullMealPlan, prefs: &UserPreferences)
        -> Result<PathBuf, ExportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_plan_missing_serializes_without_plan() {
        let json = serde_json::to_string(&StoredPlan::missing()).unwrap();
        assert_eq!(json, r#"{"exists":false}"#);
    }

    #[test]
    fn test_email_list_counts() {
        let list = EmailList::new(vec![EmailLogEntry {
            email: "a@b.co".into(),
            timestamp: Utc::now(),
        }]);
        assert_eq!(list.count, 1);
    }
}
