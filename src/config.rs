use std::net::IpAddr;

use chrono::{Duration, Utc};

use crate::auth::password::PasswordCost;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub password_cost: PasswordCost,
    pub log_level: String,
    pub admin: Option<AdminBootstrap>,
}

/// Credentials for an administrator account created at startup if missing.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| format!("Missing required environment variable: {key}"))
        };
        let or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        let database_max_connections: u32 = or("DATABASE_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid DATABASE_MAX_CONNECTIONS: {e}"))?;

        let jwt_ttl = parse_duration(&or("JWT_EXPIRES_IN", "1d"))
            .map_err(|e| format!("Invalid JWT_EXPIRES_IN: {e}"))?;
        if Utc::now().checked_add_signed(jwt_ttl).is_none() {
            return Err("Invalid JWT_EXPIRES_IN: token expiry would be out of range".to_string());
        }

        let host: IpAddr = or("APP_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid APP_HOST: {e}"))?;

        let port: u16 = or("APP_PORT", "4000")
            .parse()
            .map_err(|e| format!("Invalid APP_PORT: {e}"))?;

        let max_body_size: usize = or("MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid MAX_BODY_SIZE: {e}"))?;

        let defaults = PasswordCost::default();
        let password_cost = PasswordCost {
            memory_kib: or("PASSWORD_HASH_MEMORY_KIB", &defaults.memory_kib.to_string())
                .parse()
                .map_err(|e| format!("Invalid PASSWORD_HASH_MEMORY_KIB: {e}"))?,
            iterations: or("PASSWORD_HASH_ITERATIONS", &defaults.iterations.to_string())
                .parse()
                .map_err(|e| format!("Invalid PASSWORD_HASH_ITERATIONS: {e}"))?,
        };

        let log_level = or("LOG_LEVEL", "info");

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap {
                name: or("ADMIN_NAME", "Admin"),
                email,
                password,
            }),
            (None, None) => None,
            _ => {
                return Err(
                    "ADMIN_EMAIL and ADMIN_PASSWORD must be set together".to_string(),
                );
            }
        };

        Ok(Config {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_ttl,
            host,
            port,
            max_body_size,
            password_cost,
            log_level,
            admin,
        })
    }
}

/// Parse `30s`, `15m`, `12h`, `7d`, or a bare number of seconds.
fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let (digits, unit) = match value.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&value[..idx], Some(c)),
        Some(_) => (value, None),
        None => return Err("empty duration".to_string()),
    };

    let amount: i64 = digits
        .parse()
        .map_err(|_| format!("'{value}' is not a duration"))?;
    if amount <= 0 {
        return Err(format!("'{value}' must be positive"));
    }

    let duration = match unit {
        None | Some('s') => Duration::try_seconds(amount),
        Some('m') => Duration::try_minutes(amount),
        Some('h') => Duration::try_hours(amount),
        Some('d') => Duration::try_days(amount),
        Some(other) => return Err(format!("unknown duration unit '{other}'")),
    };
    duration.ok_or_else(|| format!("'{value}' is too large"))
}
