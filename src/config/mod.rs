use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::store::IdStrategy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub cache_enabled: bool,
    pub id_strategy: IdStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub token_length: usize,
    pub enable_cors: bool,
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
        // Server overrides
        if let Ok(v) = env::var("CRUSH_API_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("CRUSH_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Store overrides
        if let Ok(v) = env::var("CRUSH_STORE_PATH") {
            self.store.path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("CRUSH_STORE_CACHE") {
            self.store.cache_enabled = v.parse().unwrap_or(self.store.cache_enabled);
        }
        if let Ok(v) = env::var("CRUSH_ID_STRATEGY") {
            self.store.id_strategy = v.parse().unwrap_or(self.store.id_strategy);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_TOKEN_LENGTH") {
            self.security.token_length = v.parse().unwrap_or(self.security.token_length);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            store: StoreConfig {
                path: PathBuf::from("./crush.json"),
                cache_enabled: false,
                id_strategy: IdStrategy::NextAfterMax,
            },
            security: SecurityConfig {
                token_length: 16,
                enable_cors: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig::default(),
            store: StoreConfig {
                path: PathBuf::from("./crush.json"),
                cache_enabled: true,
                id_strategy: IdStrategy::NextAfterMax,
            },
            security: SecurityConfig {
                token_length: 16,
                enable_cors: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default(),
            store: StoreConfig {
                path: PathBuf::from("./crush.json"),
                cache_enabled: true,
                id_strategy: IdStrategy::NextAfterMax,
            },
            security: SecurityConfig {
                token_length: 16,
                enable_cors: false,
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
