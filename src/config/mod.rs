use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

use crate::error::AppError;

const DEFAULT_ALLOWED_ORIGINS: &str =
    "https://haryiankkumra.vercel.app,http://127.0.0.1:5500,https://haryiank.me";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub mongo: MongoConfig,
    pub mail: MailConfig,
    pub gemini: GeminiConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Operator address that receives contact-form notifications and is
    /// used as the sender of auto-replies.
    pub admin_email: String,
    pub from_name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let server: ServerConfig = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(AppConfig {
            server,
            mongo: MongoConfig {
                uri: get_env("MONGO_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGO_DATABASE", Some("portfolio_db"), is_prod)?,
            },
            mail: MailConfig {
                host: get_env("MAIL_HOST", Some("smtp.gmail.com"), is_prod)?,
                port: get_env("MAIL_PORT", Some("587"), is_prod)?
                    .parse()
                    .unwrap_or(587),
                user: get_env("MAIL_USER", Some(""), is_prod)?,
                password: get_env("MAIL_PASS", Some(""), is_prod)?,
                admin_email: get_env("ADMIN_EMAIL", Some("admin@example.com"), is_prod)?,
                from_name: get_env("MAIL_FROM_NAME", Some("Haryiank"), is_prod)?,
                enabled: env_flag("MAIL_ENABLED"),
            },
            gemini: GeminiConfig {
                api_key: get_env("GEMINI_API_KEY", Some(""), is_prod)?,
                model: get_env("GEMINI_MODEL", Some("gemini-1.5-flash"), is_prod)?,
                enabled: env_flag("GEMINI_ENABLED"),
            },
            cors: CorsConfig {
                allowed_origins: parse_allowed_origins(
                    &env::var("ALLOWED_ORIGINS")
                        .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
                ),
            },
        })
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

fn env_flag(key: &str) -> bool {
    env::var(key)
        .unwrap_or_else(|_| "false".to_string())
        .parse()
        .unwrap_or(false)
}

fn parse_allowed_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
