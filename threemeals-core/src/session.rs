//! Best-effort persistence of the planning session.
//!
//! The whole session is one JSON record under [`SESSION_KEY`]. Saving and
//! loading never fail from the caller's point of view: a failed write is
//! logged and dropped, and an unreadable record loads as an empty session.

use serde::{Deserialize, Serialize};

use crate::models::{FullMealPlan, UserPreferences};
use crate::storage::KeyValueStorage;

pub const SESSION_KEY: &str = "3meals_session";

/// The persisted unit. Absent fields load as their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionRecord {
    pub meal_plan: Option<FullMealPlan>,
    pub email: String,
    pub email_captured: bool,
    pub prefs: UserPreferences,
}

impl SessionRecord {
    /// Nothing worth restoring: no plan, no captured email and no answers.
    pub fn is_empty(&self) -> bool {
        self.meal_plan.is_none() && !self.email_captured && self.prefs == UserPreferences::default()
    }
}

pub struct SessionStore {
    storage: Box<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Writes the record. Empty records are not written.
    pub fn save(&self, record: &SessionRecord) {
        if record.is_empty() {
            return;
        }
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize session: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(SESSION_KEY, &json) {
            tracing::warn!("Failed to save session: {}", e);
        }
    }

    /// Reads the saved record, or an empty one if there is none or it
    /// cannot be read.
    pub fn load(&self) -> SessionRecord {
        let json = match self.storage.get(SESSION_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return SessionRecord::default(),
            Err(e) => {
                tracing::warn!("Failed to read saved session: {}", e);
                return SessionRecord::default();
            }
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable saved session: {}", e);
            SessionRecord::default()
        })
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove(SESSION_KEY) {
            tracing::warn!("Failed to clear saved session: {}", e);
        }
    }
}
