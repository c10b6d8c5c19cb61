use portal_core::config as core_config;
use portal_core::error::AppError;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub auth: AuthConfig,
    pub workflow: WorkflowConfig,
    pub security: SecurityConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 secret with the identity provider that issues staff tokens.
    pub jwt_secret: Secret<String>,
    /// When set, tokens must carry this `iss`.
    pub jwt_issuer: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Department whose members place and receive stock orders.
    pub purchasing_department: String,
    /// Buffered board events per subscriber before it starts lagging.
    pub board_event_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Browser origins allowed to call the API.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub otlp_endpoint: Option<String>,
}

impl PortalConfig {
    pub fn load() -> Result<Self, AppError> {
        let mut common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        if let Ok(level) = env::var("LOG_LEVEL") {
            common_config.log_level = level;
        }

        Ok(PortalConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("portal_db"), is_prod)?,
            },
            auth: AuthConfig {
                jwt_secret: Secret::new(get_env(
                    "JWT_SECRET",
                    Some("dev-only-portal-secret"),
                    is_prod,
                )?),
                jwt_issuer: env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty()),
            },
            workflow: WorkflowConfig {
                purchasing_department: get_env(
                    "PURCHASING_DEPARTMENT",
                    Some("Purchasing"),
                    is_prod,
                )?
                .trim()
                .to_string(),
                board_event_capacity: parse_capacity(
                    "BOARD_EVENT_CAPACITY",
                    &get_env("BOARD_EVENT_CAPACITY", Some("256"), is_prod)?,
                )?,
            },
            security: SecurityConfig {
                allowed_origins: split_list(&get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?),
            },
            observability: ObservabilityConfig {
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            },
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_capacity(key: &str, raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be a positive integer, got '{}'",
            key,
            raw
        ))),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
