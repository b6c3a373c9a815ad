use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,             // lowercased
    pub email: String,                // lowercased
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 PHC string
    #[serde(skip_serializing)]
    pub salt: String,                 // B64 salt the hash was made with
    pub created_at: OffsetDateTime,
}

/// Registration awaiting its emailed code.
#[derive(Debug, Clone, FromRow)]
pub struct PendingRegistration {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub verification_code: String,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl PendingRegistration {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at < now
    }
}

#[derive(Debug, Clone)]
pub struct NewPendingRegistration {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub verification_code: String,
    pub expires_at: OffsetDateTime,
}
