use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::gemini::PlanStrategy;
use crate::persistence::StorageBackend;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_PLAN_DAYS: u32 = 30;
pub const DEFAULT_PORT: u16 = 8080;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    fn defaulted(value: T) -> Self {
        Self::new(value, ConfigSource::Default)
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Where the session and key-value documents live
    pub data_dir: ConfigValue<PathBuf>,
    /// Hosted API used by the CLI; when unset the CLI talks to the model directly
    pub server_url: ConfigValue<Option<String>>,
    #[serde(serialize_with = "mask_secret")]
    pub api_key: ConfigValue<Option<String>>,
    pub model: ConfigValue<String>,
    /// 28 or 30
    pub plan_days: ConfigValue<u32>,
    pub plan_strategy: ConfigValue<PlanStrategy>,
    pub storage_backend: ConfigValue<StorageBackend>,
    /// SQLite database for the `sqlite` backend
    pub database_path: ConfigValue<PathBuf>,
    pub port: ConfigValue<u16>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal structs for deserializing the config file
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    server_url: Option<String>,
    gemini: GeminiSection,
    plan: PlanSection,
    storage: StorageSection,
    server: ServerSection,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct GeminiSection {
    api_key: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PlanSection {
    days: Option<u32>,
    strategy: Option<PlanStrategy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StorageSection {
    backend: Option<StorageBackend>,
    database_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ServerSection {
    port: Option<u16>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an explicit environment lookup.
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut data_dir = ConfigValue::defaulted(Self::default_data_dir());
        let mut server_url = ConfigValue::defaulted(None);
        let mut api_key = ConfigValue::defaulted(None);
        let mut model = ConfigValue::defaulted(DEFAULT_MODEL.to_string());
        let mut plan_days = ConfigValue::defaulted(DEFAULT_PLAN_DAYS);
        let mut plan_strategy = ConfigValue::defaulted(PlanStrategy::default());
        let mut storage_backend = ConfigValue::defaulted(StorageBackend::default());
        let mut database_path: Option<ConfigValue<PathBuf>> = None;
        let mut port = ConfigValue::defaulted(DEFAULT_PORT);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file.data_dir {
                data_dir = ConfigValue::new(resolve_relative(&path, dir), ConfigSource::File);
            }
            if let Some(url) = file.server_url {
                server_url = ConfigValue::new(Some(url), ConfigSource::File);
            }
            if let Some(key) = file.gemini.api_key {
                api_key = ConfigValue::new(Some(key), ConfigSource::File);
            }
            if let Some(name) = file.gemini.model {
                model = ConfigValue::new(name, ConfigSource::File);
            }
            if let Some(days) = file.plan.days {
                plan_days = ConfigValue::new(
                    check_plan_days(days, || path.display().to_string())?,
                    ConfigSource::File,
                );
            }
            if let Some(strategy) = file.plan.strategy {
                plan_strategy = ConfigValue::new(strategy, ConfigSource::File);
            }
            if let Some(backend) = file.storage.backend {
                storage_backend = ConfigValue::new(backend, ConfigSource::File);
            }
            if let Some(db_path) = file.storage.database_path {
                database_path = Some(ConfigValue::new(
                    resolve_relative(&path, db_path),
                    ConfigSource::File,
                ));
            }
            if let Some(p) = file.server.port {
                port = ConfigValue::new(p, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Some(dir) = env("THREEMEALS_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Some(url) = env("THREEMEALS_SERVER_URL") {
            server_url = ConfigValue::new(Some(url), ConfigSource::Environment);
        }
        if let Some(key) = env("GEMINI_API_KEY").or_else(|| env("API_KEY")) {
            api_key = ConfigValue::new(Some(key), ConfigSource::Environment);
        }
        if let Some(name) = env("THREEMEALS_MODEL") {
            model = ConfigValue::new(name, ConfigSource::Environment);
        }
        if let Some(days) = env("THREEMEALS_PLAN_DAYS") {
            let origin = || "THREEMEALS_PLAN_DAYS".to_string();
            let parsed = days.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "plan.days",
                value: days.clone(),
                origin: origin(),
            })?;
            plan_days = ConfigValue::new(check_plan_days(parsed, origin)?, ConfigSource::Environment);
        }
        if let Some(strategy) = env("THREEMEALS_PLAN_STRATEGY") {
            let parsed = strategy.parse().map_err(|_| ConfigError::InvalidValue {
                key: "plan.strategy",
                value: strategy.clone(),
                origin: "THREEMEALS_PLAN_STRATEGY".to_string(),
            })?;
            plan_strategy = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Some(backend) = env("THREEMEALS_STORAGE") {
            let parsed = backend.parse().map_err(|_| ConfigError::InvalidValue {
                key: "storage.backend",
                value: backend.clone(),
                origin: "THREEMEALS_STORAGE".to_string(),
            })?;
            storage_backend = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Some(db_path) = env("THREEMEALS_DATABASE_PATH") {
            database_path = Some(ConfigValue::new(
                PathBuf::from(db_path),
                ConfigSource::Environment,
            ));
        }
        if let Some(p) = env("THREEMEALS_PORT") {
            let parsed = p.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "server.port",
                value: p.clone(),
                origin: "THREEMEALS_PORT".to_string(),
            })?;
            port = ConfigValue::new(parsed, ConfigSource::Environment);
        }

        // The database follows the data directory unless set explicitly
        let database_path = database_path
            .unwrap_or_else(|| ConfigValue::defaulted(data_dir.value.join("threemeals.db")));

        Ok(Self {
            data_dir,
            server_url,
            api_key,
            model,
            plan_days,
            plan_strategy,
            storage_backend,
            database_path,
            port,
            config_file,
        })
    }

    /// Directory holding the file-backed key-value documents.
    pub fn kv_dir(&self) -> PathBuf {
        self.data_dir.value.join("kv")
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/threemeals/
    /// - macOS: ~/Library/Application Support/threemeals/
    /// - Windows: %APPDATA%/threemeals/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("threemeals")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/threemeals/
    /// - macOS: ~/Library/Application Support/threemeals/
    /// - Windows: %APPDATA%/threemeals/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("threemeals")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

// Resolve relative paths against config file's directory
fn resolve_relative(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&path))
            .unwrap_or(path)
    } else {
        path
    }
}

fn check_plan_days(days: u32, origin: impl Fn() -> String) -> Result<u32, ConfigError> {
    match days {
        28 | 30 => Ok(days),
        _ => Err(ConfigError::InvalidValue {
            key: "plan.days",
            value: days.to_string(),
            origin: origin(),
        }),
    }
}

fn mask_secret<S: Serializer>(
    value: &ConfigValue<Option<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let masked = ConfigValue::new(
        value.value.as_ref().map(|_| "********"),
        value.source.clone(),
    );
    masked.serialize(serializer)
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue {
        key: &'static str,
        value: String,
        origin: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue { key, value, origin } => {
                write!(f, "Invalid value '{}' for {} (from {})", value, key, origin)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
