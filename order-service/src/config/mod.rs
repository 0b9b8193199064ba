use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Access tokens live for one hour unless `ACCESS_TOKEN_EXPIRY_SECOND` says otherwise.
pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;
/// Refresh tokens live for two hours unless `REFRESH_TOKEN_EXPIRY_SECOND` says otherwise.
pub const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: i64 = 7200;

#[derive(Debug, Clone, Deserialize)]
pub struct OrderConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub seed_user: SeedUserConfig,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

/// Separate read and write pools; every store operation is pinned to one of them.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub write_url: Secret<String>,
    pub read_url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub access_token_expiry_seconds: i64,
    pub refresh_token_expiry_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUserConfig {
    pub email: String,
    pub password: Secret<String>,
}

impl OrderConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let write_url = get_env("WRITE_DATABASE_URL", None, is_prod)?;
        let read_url = match env::var("READ_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => write_url.clone(),
        };

        let config = OrderConfig {
            common: common_config,
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("order-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            database: DatabaseConfig {
                write_url: Secret::new(write_url),
                read_url: Secret::new(read_url),
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", "10")?,
                min_connections: parse_env("DATABASE_MIN_CONNECTIONS", "1")?,
            },
            jwt: JwtConfig {
                secret: Secret::new(get_env("JWT_SECRET", None, is_prod)?),
                access_token_expiry_seconds: parse_env(
                    "ACCESS_TOKEN_EXPIRY_SECOND",
                    &DEFAULT_ACCESS_TOKEN_TTL_SECONDS.to_string(),
                )?,
                refresh_token_expiry_seconds: parse_env(
                    "REFRESH_TOKEN_EXPIRY_SECOND",
                    &DEFAULT_REFRESH_TOKEN_TTL_SECONDS.to_string(),
                )?,
            },
            security: SecurityConfig {
                allowed_origins: get_env(
                    "ALLOWED_ORIGINS",
                    Some("http://localhost:3000"),
                    is_prod,
                )?
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            },
            seed_user: SeedUserConfig {
                email: get_env(
                    "SEED_USER_EMAIL",
                    Some("01901901901@mailinator.com"),
                    is_prod,
                )?,
                password: Secret::new(get_env("SEED_USER_PASSWORD", Some("321dsa"), is_prod)?),
            },
            request_timeout_seconds: parse_env("REQUEST_TIMEOUT_SECONDS", "30")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.jwt.secret.expose_secret().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_SECRET must not be empty"
            )));
        }

        if self.jwt.access_token_expiry_seconds <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "ACCESS_TOKEN_EXPIRY_SECOND must be positive"
            )));
        }

        if self.jwt.refresh_token_expiry_seconds < self.jwt.access_token_expiry_seconds {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "REFRESH_TOKEN_EXPIRY_SECOND must not be shorter than ACCESS_TOKEN_EXPIRY_SECOND"
            )));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_MIN_CONNECTIONS exceeds DATABASE_MAX_CONNECTIONS"
            )));
        }

        if self.environment == Environment::Prod
            && self.security.allowed_origins.iter().any(|o| o == "*")
        {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Wildcard CORS origin not allowed in production"
            )));
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

/// Tunables keep their defaults in prod; only credentials are mandatory there.
fn parse_env<T>(key: &str, default: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e))
    })
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_config(secret: &str) -> OrderConfig {
    OrderConfig {
        common: core_config::Config { port: 8080 },
        environment: Environment::Dev,
        service_name: "order-service-test".to_string(),
        service_version: "0.0.0".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            write_url: Secret::new("postgres://localhost/orders_test".to_string()),
            read_url: Secret::new("postgres://localhost/orders_test".to_string()),
            max_connections: 5,
            min_connections: 1,
        },
        jwt: JwtConfig {
            secret: Secret::new(secret.to_string()),
            access_token_expiry_seconds: DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            refresh_token_expiry_seconds: DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        seed_user: SeedUserConfig {
            email: "seed@example.com".to_string(),
            password: Secret::new("321dsa".to_string()),
        },
        request_timeout_seconds: 30,
    }
}
