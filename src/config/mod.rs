use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every API path is joined onto, e.g. `http://127.0.0.1:8000/api/`
    pub base_url: String,
    /// Public storage root used to build profile picture links
    pub storage_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Overrides the default `$HOME/.config/school-admin` location
    pub config_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("SCHOOL_ADMIN_API_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("SCHOOL_ADMIN_STORAGE_URL") {
            self.api.storage_url = v;
        }
        if let Ok(v) = env::var("SCHOOL_ADMIN_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("SCHOOL_ADMIN_CONFIG_DIR") {
            self.session.config_dir = Some(PathBuf::from(v));
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://127.0.0.1:8000/api/".to_string(),
                storage_url: "http://127.0.0.1:8000/storage/".to_string(),
                timeout_secs: 30,
                user_agent: concat!("school-admin/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            session: SessionConfig { config_dir: None },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.school.example.com/api/".to_string(),
                storage_url: "https://staging.school.example.com/storage/".to_string(),
                timeout_secs: 15,
                user_agent: concat!("school-admin/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            session: SessionConfig { config_dir: None },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://school.example.com/api/".to_string(),
                storage_url: "https://school.example.com/storage/".to_string(),
                timeout_secs: 10,
                user_agent: concat!("school-admin/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            session: SessionConfig { config_dir: None },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
