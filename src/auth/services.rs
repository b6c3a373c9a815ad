use std::time::Duration;

use anyhow::Context;
use axum::extract::FromRef;
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use subtle::ConstantTimeEq;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{UserInfoReq, UserLoginReq},
        jwt::JwtKeys,
        password,
        repo_types::NewPendingRegistration,
    },
    error::{ApiError, EMAIL_USERNAME_EXIST},
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[a-z0-9_.-]{3,32}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Usernames and emails are compared and stored lowercased.
pub(crate) fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Six-digit numeric code sent to the registration address.
pub fn generate_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

/// Check credentials and hand out a token. Every failure looks the same to the caller.
pub async fn authorize(state: &AppState, req: UserLoginReq) -> Result<String, ApiError> {
    let email = req.email.as_deref().map(normalize).filter(|e| !e.is_empty());
    let username = req.username.as_deref().map(normalize).filter(|u| !u.is_empty());

    let user = match (email, username) {
        (Some(email), _) => state.users.find_by_email(&email).await?,
        (None, Some(username)) => state.users.find_by_username(&username).await?,
        (None, None) => {
            warn!("login without username or email");
            return Err(ApiError::generic());
        }
    };

    let Some(user) = user else {
        warn!("login unknown account");
        return Err(ApiError::generic());
    };

    if !password::verify_password(&req.password, &user.password_hash, &user.salt, &state.config.auth)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::generic());
    }

    let token = JwtKeys::from_ref(state).sign(&user)?;
    info!(user_id = %user.id, username = %user.username, "token granted");
    Ok(token)
}

pub async fn email_exists(state: &AppState, email: &str) -> Result<bool, ApiError> {
    Ok(state.users.email_exists(&normalize(email)).await?)
}

pub async fn username_exists(state: &AppState, username: &str) -> Result<bool, ApiError> {
    Ok(state.users.username_exists(&normalize(username)).await?)
}

/// Store a pending registration and email its code. Returns the pending id.
pub async fn registrate(state: &AppState, req: UserInfoReq) -> Result<Uuid, ApiError> {
    let cfg = &state.config.auth;
    let username = normalize(&req.username);
    let email = normalize(&req.email);

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::bad_request("Invalid email"));
    }
    if !is_valid_username(&username) {
        warn!(username = %username, "invalid username");
        return Err(ApiError::bad_request("Invalid username"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::bad_request("Password too short"));
    }

    if state.users.email_exists(&email).await? || state.users.username_exists(&username).await? {
        warn!(email = %email, username = %username, "email or username already registered");
        return Err(ApiError::bad_request(EMAIL_USERNAME_EXIST));
    }

    let expires_at = OffsetDateTime::now_utc()
        .checked_add(TimeDuration::minutes(cfg.pending_ttl_minutes))
        .context("pending registration expiry out of range")?;
    let verification_code = generate_code();
    let salt = password::create_salt(cfg.salt_size)?;
    let password_hash = password::hash_password(&req.password, &salt, cfg)?;

    let pending = state
        .users
        .create_pending(NewPendingRegistration {
            username,
            email,
            password_hash,
            salt,
            verification_code,
            expires_at,
        })
        .await?;

    state
        .mailer
        .send_verification_code(&pending.email, &pending.verification_code)
        .await
        .context("send verification code")?;

    info!(pending_id = %pending.id, email = %pending.email, "pending registration created");
    Ok(pending.id)
}

fn codes_match(expected: &str, given: &str) -> bool {
    bool::from(expected.as_bytes().ct_eq(given.as_bytes()))
}

/// Confirm a pending registration with its code, create the user and hand out a token.
pub async fn verify(state: &AppState, pending_id: Uuid, code: &str) -> Result<String, ApiError> {
    let Some(pending) = state.users.find_pending(pending_id).await? else {
        warn!(%pending_id, "verify unknown pending registration");
        return Err(ApiError::generic());
    };

    if pending.is_expired(OffsetDateTime::now_utc()) {
        warn!(%pending_id, "verify expired pending registration");
        return Err(ApiError::generic());
    }
    if !codes_match(&pending.verification_code, code) {
        warn!(%pending_id, "verify code mismatch");
        return Err(ApiError::generic());
    }

    let Some(user) = state.users.complete_registration(&pending).await? else {
        warn!(%pending_id, "pending registration already consumed or account taken");
        return Err(ApiError::generic());
    };
    info!(user_id = %user.id, username = %user.username, "user created");

    let token = JwtKeys::from_ref(state).sign(&user)?;
    info!(user_id = %user.id, username = %user.username, "token granted");
    Ok(token)
}

/// Periodically drop expired pending registrations.
pub fn spawn_pending_purge(state: AppState) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs(state.config.purge_interval_secs.max(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match state.users.purge_expired_pending(OffsetDateTime::now_utc()).await {
                Ok(0) => {}
                Ok(removed) => debug!(removed, "purged expired pending registrations"),
                Err(e) => error!(error = %e, "purge expired pending registrations failed"),
            }
        }
    })
}
