use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use threemeals_core::{
    EmailList, EmailLogEntry, FullMealPlan, KeyValueStorage, ProviderError, RemotePersistence,
    StoredPlan, UserPreferences,
};

const EMAILS_KEY: &str = "emails";
const EMAIL_LIST_KEY: &str = "email_list";

fn plan_key(email: &str) -> String {
    format!("plan:{}", email)
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanDocument {
    meal_plan: FullMealPlan,
    prefs: UserPreferences,
    saved_at: DateTime<Utc>,
}

/// Key-value backend laid out as JSON documents:
///
/// - `plan:{email}`: the stored plan and preferences
/// - `emails`: email to last-saved timestamp
/// - `email_list`: every save, newest first
pub struct KvPersistence {
    storage: Box<dyn KeyValueStorage>,
    write_lock: Mutex<()>,
}

fn storage_error(e: impl std::fmt::Display) -> ProviderError {
    ProviderError::Storage(e.to_string())
}

impl KvPersistence {
    pub fn new(storage: impl KeyValueStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            write_lock: Mutex::new(()),
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ProviderError> {
        match self.storage.get(key).map_err(storage_error)? {
            Some(json) => serde_json::from_str(&json).map(Some).map_err(storage_error),
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ProviderError> {
        let json = serde_json::to_string(value).map_err(storage_error)?;
        self.storage.set(key, &json).map_err(storage_error)
    }
}

#[async_trait]
impl RemotePersistence for KvPersistence {
    async fn save(
        &self,
        email: &str,
        meal_plan: &FullMealPlan,
        prefs: &UserPreferences,
    ) -> Result<bool, ProviderError> {
        // The email hash and list are read-modify-write
        let _guard = self.write_lock.lock().await;
        let timestamp = Utc::now();

        self.write(
            &plan_key(email),
            &PlanDocument {
                meal_plan: meal_plan.clone(),
                prefs: prefs.clone(),
                saved_at: timestamp,
            },
        )?;

        let mut emails: BTreeMap<String, DateTime<Utc>> =
            self.read(EMAILS_KEY)?.unwrap_or_default();
        emails.insert(email.to_string(), timestamp);
        self.write(EMAILS_KEY, &emails)?;

        let mut list: Vec<EmailLogEntry> = self.read(EMAIL_LIST_KEY)?.unwrap_or_default();
        list.insert(
            0,
            EmailLogEntry {
                email: email.to_string(),
                timestamp,
            },
        );
        self.write(EMAIL_LIST_KEY, &list)?;

        Ok(true)
    }

    async fn get(&self, email: &str) -> Result<StoredPlan, ProviderError> {
        Ok(match self.read::<PlanDocument>(&plan_key(email))? {
            Some(doc) => StoredPlan::found(doc.meal_plan, doc.prefs),
            None => StoredPlan::missing(),
        })
    }

    async fn list_emails(&self) -> Result<EmailList, ProviderError> {
        let list: Vec<EmailLogEntry> = self.read(EMAIL_LIST_KEY)?.unwrap_or_default();
        Ok(EmailList::new(list))
    }
}
