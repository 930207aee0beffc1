use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use threemeals_core::{
    EmailList, EmailLogEntry, FullMealPlan, ProviderError, RemotePersistence, StoredPlan,
    UserPreferences,
};

/// Initialize the database connection pool and run migrations
pub async fn init_db(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Relational backend: one row per email plus an append-only email log.
pub struct SqlitePersistence {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct PlanRow {
    meal_plan: String,
    prefs: String,
}

fn storage_error(e: impl std::fmt::Display) -> ProviderError {
    ProviderError::Storage(e.to_string())
}

impl SqlitePersistence {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        Ok(Self::new(init_db(path).await?))
    }
}

#[async_trait]
impl RemotePersistence for SqlitePersistence {
    async fn save(
        &self,
        email: &str,
        meal_plan: &FullMealPlan,
        prefs: &UserPreferences,
    ) -> Result<bool, ProviderError> {
        let plan_json = serde_json::to_string(meal_plan).map_err(storage_error)?;
        let prefs_json = serde_json::to_string(prefs).map_err(storage_error)?;
        let saved_at = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        sqlx::query(
            r#"
            INSERT INTO plans (email, id, meal_plan, prefs, saved_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(email) DO UPDATE SET
                meal_plan = excluded.meal_plan,
                prefs = excluded.prefs,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(email)
        .bind(Uuid::new_v4().to_string())
        .bind(&plan_json)
        .bind(&prefs_json)
        .bind(&saved_at)
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        sqlx::query("INSERT INTO email_log (email, saved_at) VALUES (?, ?)")
            .bind(email)
            .bind(&saved_at)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(true)
    }

    async fn get(&self, email: &str) -> Result<StoredPlan, ProviderError> {
        let row: Option<PlanRow> =
            sqlx::query_as("SELECT meal_plan, prefs FROM plans WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_error)?;

        let Some(row) = row else {
            return Ok(StoredPlan::missing());
        };
        let meal_plan: FullMealPlan =
            serde_json::from_str(&row.meal_plan).map_err(storage_error)?;
        let prefs: UserPreferences = serde_json::from_str(&row.prefs).map_err(storage_error)?;
        Ok(StoredPlan::found(meal_plan, prefs))
    }

    async fn list_emails(&self) -> Result<EmailList, ProviderError> {
        let rows = sqlx::query("SELECT email, saved_at FROM email_log ORDER BY id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        let mut emails = Vec::with_capacity(rows.len());
        for row in rows {
            let saved_at: String = row.get("saved_at");
            let timestamp = DateTime::parse_from_rfc3339(&saved_at)
                .map(|t| t.with_timezone(&Utc))
                .map_err(storage_error)?;
            emails.push(EmailLogEntry {
                email: row.get("email"),
                timestamp,
            });
        }
        Ok(EmailList::new(emails))
    }
}
