//! Remote persistence backends behind one [`RemotePersistence`] interface.

mod http;
mod kv;
mod sqlite;

pub use http::HttpBackend;
pub use kv::KvPersistence;
pub use sqlite::{init_db, SqlitePersistence};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use threemeals_core::{FileStorage, RemotePersistence};

use crate::config::Config;

/// Storage used by the server for plans saved by email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Kv,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Kv => write!(f, "kv"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "kv" => Ok(StorageBackend::Kv),
            _ => Err(format!(
                "Invalid storage backend '{}'. Valid options: sqlite, kv",
                s
            )),
        }
    }
}

/// Opens the backend named by the configuration.
pub async fn open_backend(config: &Config) -> Result<Arc<dyn RemotePersistence>, sqlx::Error> {
    match config.storage_backend.value {
        StorageBackend::Sqlite => {
            tracing::info!(
                "Using SQLite storage at {}",
                config.database_path.value.display()
            );
            Ok(Arc::new(
                SqlitePersistence::open(&config.database_path.value).await?,
            ))
        }
        StorageBackend::Kv => {
            tracing::info!("Using key-value storage in {}", config.kv_dir().display());
            Ok(Arc::new(KvPersistence::new(FileStorage::new(config.kv_dir()))))
        }
    }
}
