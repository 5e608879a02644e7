//! Configuration - settings read from the environment (and `.env`)

use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use tracing::{info, warn};

const DEFAULT_SECRET: &str = "changethis";

// token lifetimes are capped at ten years
const MAX_TOKEN_MINUTES: i64 = 10 * 365 * 24 * 60;
const MAX_TOKEN_HOURS: i64 = 10 * 365 * 24;

#[derive(Debug, Clone)]
pub struct Config {
    pub project_name: String,
    pub app_env: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub email_reset_token_expire_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    pub backend_cors_origins: Vec<String>,
    pub frontend_host: String,
    pub first_superuser: String,
    pub first_superuser_password: String,
}

impl Config {
    /// Load configuration from the process environment.
    /// Calls dotenv() first so a local `.env` file is honoured.
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (the environment in
    /// production, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let app_env = var("APP_ENV", "local");

        let jwt_secret = var("SECRET_KEY", DEFAULT_SECRET);
        let first_superuser_password = var("FIRST_SUPERUSER_PASSWORD", DEFAULT_SECRET);
        for (name, value) in [
            ("SECRET_KEY", &jwt_secret),
            ("FIRST_SUPERUSER_PASSWORD", &first_superuser_password),
        ] {
            if value == DEFAULT_SECRET {
                if app_env == "local" {
                    warn!("{name} is \"{DEFAULT_SECRET}\", change it before deploying");
                } else {
                    return Err(format!(
                        "{name} is \"{DEFAULT_SECRET}\", set a real value for APP_ENV={app_env}"
                    ));
                }
            }
        }

        let frontend_host = var("FRONTEND_HOST", "http://localhost:5173");
        let mut backend_cors_origins: Vec<String> = var("BACKEND_CORS_ORIGINS", "")
            .split(',')
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        if !backend_cors_origins.contains(&frontend_host) {
            backend_cors_origins.push(frontend_host.clone());
        }

        Ok(Config {
            project_name: var("PROJECT_NAME", "Full Stack Backend"),
            database_url: var("DATABASE_URL", "sqlite://app.db"),
            jwt_secret,
            access_token_expire_minutes: parse_lifetime(
                &lookup,
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                60 * 24 * 8,
                MAX_TOKEN_MINUTES,
            )?,
            email_reset_token_expire_hours: parse_lifetime(
                &lookup,
                "EMAIL_RESET_TOKEN_EXPIRE_HOURS",
                48,
                MAX_TOKEN_HOURS,
            )?,
            server_host: var("SERVER_HOST", "127.0.0.1"),
            server_port: parse(&lookup, "SERVER_PORT", 8000)?,
            max_connections: parse(&lookup, "MAX_DB_CONNECTIONS", 10)?,
            backend_cors_origins,
            frontend_host,
            first_superuser: var("FIRST_SUPERUSER", "admin@example.com"),
            first_superuser_password,
            app_env,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Log the configuration (hiding secrets)
    pub fn print_info(&self) {
        info!("Server configuration:");
        info!("   Project: {}", self.project_name);
        info!("   Environment: {}", self.app_env);
        info!("   Server Address: {}", self.server_address());
        info!("   Database: {}", Self::mask_url(&self.database_url));
        info!("   Max DB Connections: {}", self.max_connections);
        info!("   Access token lifetime: {} min", self.access_token_expire_minutes);
        info!("   CORS origins: {:?}", self.backend_cors_origins);
        info!(
            "   JWT Secret: {}",
            if self.jwt_secret == DEFAULT_SECRET {
                "USING DEFAULT (INSECURE!)"
            } else {
                "custom secret configured"
            }
        );
    }

    /// Mask the credentials of a database URL for logging
    fn mask_url(url: &str) -> String {
        match (url.find("://"), url.rfind('@')) {
            (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
                format!("{}***{}", &url[..scheme_end + 3], &url[at_pos..])
            }
            _ => url.to_string(),
        }
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("Invalid {key}: '{raw}' is not a valid number")),
        None => Ok(default),
    }
}

/// Token lifetime in `1..=max`
fn parse_lifetime<F>(lookup: &F, key: &str, default: i64, max: i64) -> Result<i64, String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse(lookup, key, default)?;
    if !(1..=max).contains(&value) {
        return Err(format!("Invalid {key}: {value} must be between 1 and {max}"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.app_env, "local");
        assert_eq!(config.server_port, 8000);
        assert_eq!(config.access_token_expire_minutes, 11520);
        assert_eq!(config.email_reset_token_expire_hours, 48);
        assert_eq!(config.backend_cors_origins, vec!["http://localhost:5173".to_string()]);
    }

    #[test]
    fn test_cors_origins_are_split_and_trimmed() {
        let config = config_from(&[
            ("BACKEND_CORS_ORIGINS", "http://a.test/, http://b.test ,"),
            ("FRONTEND_HOST", "http://a.test"),
        ])
        .unwrap();
        assert_eq!(
            config.backend_cors_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_default_secret_rejected_outside_local() {
        let err = config_from(&[("APP_ENV", "production")]).unwrap_err();
        assert!(err.contains("SECRET_KEY"));

        let err = config_from(&[("APP_ENV", "staging"), ("SECRET_KEY", "s3cr3t")]).unwrap_err();
        assert!(err.contains("FIRST_SUPERUSER_PASSWORD"));

        assert!(
            config_from(&[
                ("APP_ENV", "production"),
                ("SECRET_KEY", "s3cr3t"),
                ("FIRST_SUPERUSER_PASSWORD", "another-s3cr3t"),
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("SERVER_PORT", "eighty")]).unwrap_err();
        assert!(err.contains("SERVER_PORT"));
    }

    #[test]
    fn test_non_positive_token_lifetime_rejected() {
        let err = config_from(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "-10")]).unwrap_err();
        assert!(err.contains("ACCESS_TOKEN_EXPIRE_MINUTES"));

        let err = config_from(&[("EMAIL_RESET_TOKEN_EXPIRE_HOURS", "0")]).unwrap_err();
        assert!(err.contains("EMAIL_RESET_TOKEN_EXPIRE_HOURS"));
    }

    #[test]
    fn test_huge_token_lifetime_rejected() {
        let err = config_from(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "1000000000000")]).unwrap_err();
        assert!(err.contains("ACCESS_TOKEN_EXPIRE_MINUTES"));

        let err = config_from(&[("EMAIL_RESET_TOKEN_EXPIRE_HOURS", "99999999")]).unwrap_err();
        assert!(err.contains("EMAIL_RESET_TOKEN_EXPIRE_HOURS"));

        let config = config_from(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "5256000")]).unwrap();
        assert_eq!(config.access_token_expire_minutes, MAX_TOKEN_MINUTES);
    }

    #[test]
    fn test_mask_url() {
        assert_eq!(
            Config::mask_url("postgres://user:pass@db:5432/app"),
            "postgres://***@db:5432/app"
        );
        assert_eq!(Config::mask_url("sqlite://app.db"), "sqlite://app.db");
    }
}
