use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub secret_key: String,
    pub bcrypt_work_factor: u32,
    pub jwt_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

/// bcrypt refuses costs below this.
pub const MIN_BCRYPT_WORK_FACTOR: u32 = 4;

const DEFAULT_DATABASE_URL: &str = "postgresql://localhost:5432/jobly";
const TEST_DATABASE_NAME: &str = "jobly_test";
const DEV_SECRET_KEY: &str = "secret-dev";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("test") => Environment::Test,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Test => Self::test(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if self.environment == Environment::Test {
            match crate::database::DatabaseManager::build_connection_string(&self.database.url, TEST_DATABASE_NAME) {
                Ok(url) => self.database.url = url,
                Err(e) => tracing::warn!("Leaving DATABASE_URL untouched for tests: {}", e),
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // API overrides
        if let Some(port) = env::var("JOBLY_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        match env::var("SECRET_KEY") {
            Ok(v) if !v.is_empty() => self.security.secret_key = v,
            _ if self.is_production() => {
                tracing::warn!("SECRET_KEY is not set; falling back to the development key");
            }
            _ => {}
        }
        if let Ok(v) = env::var("BCRYPT_WORK_FACTOR") {
            self.security.bcrypt_work_factor = v.parse().unwrap_or(self.security.bcrypt_work_factor);
        }
        self.security.bcrypt_work_factor = self.security.bcrypt_work_factor.max(MIN_BCRYPT_WORK_FACTOR);
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            api: ApiConfig {
                port: 3001,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                secret_key: DEV_SECRET_KEY.to_string(),
                bcrypt_work_factor: 12,
                jwt_expiry_hours: 24 * 7,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    /// Cheap hashing and a dedicated database so suites stay fast and isolated.
    pub fn test() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Test;
        config.security.bcrypt_work_factor = MIN_BCRYPT_WORK_FACTOR;
        config.database.enable_query_logging = false;
        config.api.enable_request_logging = false;
        config
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            api: ApiConfig {
                port: 3001,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                secret_key: DEV_SECRET_KEY.to_string(),
                bcrypt_work_factor: 12,
                jwt_expiry_hours: 4,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.security.bcrypt_work_factor, 12);
        assert_eq!(config.api.port, 3001);
        assert!(config.database.enable_query_logging);
    }

    #[test]
    fn test_config_uses_minimum_work_factor() {
        let config = AppConfig::test();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.security.bcrypt_work_factor, MIN_BCRYPT_WORK_FACTOR);
        assert!(!config.api.enable_request_logging);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.is_production());
        assert_eq!(config.security.jwt_expiry_hours, 4);
        assert!(!config.database.enable_query_logging);
    }

    #[test]
    fn secret_key_is_not_serialized() {
        let value = serde_json::to_value(AppConfig::development()).unwrap();
        assert!(value["security"].get("secret_key").is_none());
        assert_eq!(value["security"]["bcrypt_work_factor"], 12);
    }
}
