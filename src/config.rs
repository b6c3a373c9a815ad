use std::net::SocketAddr;

use anyhow::{bail, Context};

/// Token signing and password hashing parameters.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub iteration_count: u32,
    pub salt_size: usize,
    pub memory_cost_kib: u32,
    pub pending_ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub auth: AuthConfig,
    pub email: EmailConfig,
    pub purge_interval_secs: u64,
}

pub const MIN_SALT_SIZE: usize = 8;
pub const MAX_SALT_SIZE: usize = 48;
/// One year; keeps expiry arithmetic on `OffsetDateTime` in range.
pub const MAX_TTL_MINUTES: i64 = 525_600;

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v.trim().parse::<T>().with_context(|| format!("invalid {key}")),
        Err(_) => Ok(default),
    }
}

impl AuthConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }
        if !(1..=MAX_TTL_MINUTES).contains(&self.ttl_minutes) {
            bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}");
        }
        if self.iteration_count == 0 {
            bail!("AUTH_ITERATION_COUNT must be at least 1");
        }
        if !(MIN_SALT_SIZE..=MAX_SALT_SIZE).contains(&self.salt_size) {
            bail!("AUTH_SALT_SIZE must be between {MIN_SALT_SIZE} and {MAX_SALT_SIZE}");
        }
        if !(1..=MAX_TTL_MINUTES).contains(&self.pending_ttl_minutes) {
            bail!("PENDING_REGISTRATION_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}");
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = parsed_or("APP_PORT", 8080u16)?;
        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let auth = AuthConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "tisa".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "tisa-users".into()),
            ttl_minutes: parsed_or("JWT_TTL_MINUTES", 60)?,
            iteration_count: parsed_or("AUTH_ITERATION_COUNT", 3)?,
            salt_size: parsed_or("AUTH_SALT_SIZE", 16)?,
            memory_cost_kib: parsed_or("AUTH_MEMORY_COST_KIB", argon2::Params::DEFAULT_M_COST)?,
            pending_ttl_minutes: parsed_or("PENDING_REGISTRATION_TTL_MINUTES", 15)?,
        };
        auth.validate()?;

        let email = EmailConfig {
            api_url: std::env::var("EMAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".into()),
            api_key: std::env::var("EMAIL_API_KEY").ok().filter(|v| !v.is_empty()),
            from: std::env::var("EMAIL_FROM").unwrap_or_else(|_| "noreply@tisa.local".into()),
        };

        let config = Self {
            host,
            port,
            database_url,
            auth,
            email,
            purge_interval_secs: parsed_or("PENDING_PURGE_INTERVAL_SECS", 300)?,
        };
        config.listen_addr()?;
        Ok(config)
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid APP_HOST {:?}", self.host))
    }

    /// Config for tests and local tooling: cheap hashing, in-memory store, logged emails.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: None,
            auth: AuthConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                iteration_count: 1,
                salt_size: 16,
                memory_cost_kib: 1024,
                pending_ttl_minutes: 15,
            },
            email: EmailConfig {
                api_url: "http://localhost/emails".into(),
                api_key: None,
                from: "noreply@test.local".into(),
            },
            purge_interval_secs: 300,
        }
    }
}
