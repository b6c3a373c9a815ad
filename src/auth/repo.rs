use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{NewPendingRegistration, PendingRegistration, User};

/// Storage for users and their pending registrations.
///
/// Usernames and emails are passed in already lowercased.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    async fn username_exists(&self, username: &str) -> anyhow::Result<bool>;

    async fn create_pending(
        &self,
        new: NewPendingRegistration,
    ) -> anyhow::Result<PendingRegistration>;
    async fn find_pending(&self, id: Uuid) -> anyhow::Result<Option<PendingRegistration>>;

    /// Turn a pending registration into a user and drop the pending row, atomically.
    /// `Ok(None)` when the row is already gone or the username/email got taken meanwhile.
    async fn complete_registration(
        &self,
        pending: &PendingRegistration,
    ) -> anyhow::Result<Option<User>>;

    /// Delete pending registrations that expired before `now`. Returns the number removed.
    async fn purge_expired_pending(&self, now: OffsetDateTime) -> anyhow::Result<u64>;
}

pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const USER_COLUMNS: &str = "id, username, email, password_hash, salt, created_at";

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)"#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await
        .context("check email exists")?;
        Ok(exists)
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)"#,
        )
        .bind(username)
        .fetch_one(&self.db)
        .await
        .context("check username exists")?;
        Ok(exists)
    }

    async fn create_pending(
        &self,
        new: NewPendingRegistration,
    ) -> anyhow::Result<PendingRegistration> {
        let pending = sqlx::query_as::<_, PendingRegistration>(
            r#"
            INSERT INTO pending_registrations
                (id, username, email, password_hash, salt, verification_code, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, username, email, password_hash, salt, verification_code,
                      expires_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.salt)
        .bind(&new.verification_code)
        .bind(new.expires_at)
        .fetch_one(&self.db)
        .await
        .context("insert pending registration")?;
        Ok(pending)
    }

    async fn find_pending(&self, id: Uuid) -> anyhow::Result<Option<PendingRegistration>> {
        let pending = sqlx::query_as::<_, PendingRegistration>(
            r#"
            SELECT id, username, email, password_hash, salt, verification_code,
                   expires_at, created_at
            FROM pending_registrations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find pending registration")?;
        Ok(pending)
    }

    async fn complete_registration(
        &self,
        pending: &PendingRegistration,
    ) -> anyhow::Result<Option<User>> {
        let mut tx = self.db.begin().await.context("begin transaction")?;

        let removed = sqlx::query(r#"DELETE FROM pending_registrations WHERE id = $1"#)
            .bind(pending.id)
            .execute(&mut *tx)
            .await
            .context("delete pending registration")?;
        if removed.rows_affected() == 0 {
            return Ok(None);
        }

        let inserted = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, salt)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&pending.username)
        .bind(&pending.email)
        .bind(&pending.password_hash)
        .bind(&pending.salt)
        .fetch_one(&mut *tx)
        .await;

        let user = match inserted {
            Ok(user) => user,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => return Ok(None),
            Err(e) => return Err(anyhow::Error::new(e).context("insert user")),
        };

        tx.commit().await.context("commit registration")?;
        Ok(Some(user))
    }

    async fn purge_expired_pending(&self, now: OffsetDateTime) -> anyhow::Result<u64> {
        let result = sqlx::query(r#"DELETE FROM pending_registrations WHERE expires_at < $1"#)
            .bind(now)
            .execute(&self.db)
            .await
            .context("purge expired pending registrations")?;
        Ok(result.rows_affected())
    }
}
