use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Fallback signing secret, only accepted in development.
const DEV_TOKEN_SECRET: &str = "hearth-development-secret";

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
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    #[serde(skip_serializing)]
    pub token_secret: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("{0} is required in {1:?} mode")]
    RequiredIn(&'static str, Environment),
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
        .validated()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(port) = env::var("HEARTH_API_PORT")
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
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(secret) = env::var("HEARTH_TOKEN_SECRET")
            .ok()
            .or_else(|| env::var("SECRET").ok())
            .filter(|s| !s.is_empty())
        {
            self.security.token_secret = secret;
        }

        self
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.security.token_secret.is_empty() {
            return Err(ConfigError::Missing("SECRET"));
        }
        if self.environment != Environment::Development {
            if self.security.token_secret == DEV_TOKEN_SECRET {
                return Err(ConfigError::RequiredIn("SECRET", self.environment));
            }
            if self.database.url.is_none() {
                return Err(ConfigError::RequiredIn("DATABASE_URL", self.environment));
            }
        }
        Ok(self)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                token_secret: DEV_TOKEN_SECRET.to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                token_secret: String::new(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                enable_cors: true,
                token_secret: String::new(),
            },
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.security.token_secret == DEV_TOKEN_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.database.url.is_none());
        assert_eq!(config.api.port, 3000);
        assert!(config.uses_dev_secret());
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_production_requires_secret_and_database() {
        let config = AppConfig::production();
        assert!(matches!(config.validated(), Err(ConfigError::Missing("SECRET"))));

        let mut config = AppConfig::production();
        config.security.token_secret = "s3cret".to_string();
        assert!(matches!(
            config.validated(),
            Err(ConfigError::RequiredIn("DATABASE_URL", Environment::Production))
        ));

        let mut config = AppConfig::production();
        config.security.token_secret = "s3cret".to_string();
        config.database.url = Some("postgres://localhost/hearth".to_string());
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_staging_rejects_dev_secret() {
        let mut config = AppConfig::staging();
        config.security.token_secret = DEV_TOKEN_SECRET.to_string();
        config.database.url = Some("postgres://localhost/hearth".to_string());
        assert!(matches!(
            config.validated(),
            Err(ConfigError::RequiredIn("SECRET", Environment::Staging))
        ));
    }

    #[test]
    fn test_secret_is_not_serialized() {
        let config = AppConfig::development();
        let json = serde_json::to_value(&config).unwrap();
        assert!(json["security"].get("token_secret").is_none());
    }
}
