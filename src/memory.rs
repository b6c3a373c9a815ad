//! In-process store used when no database is configured, and by the test suite.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserRepo,
        repo_types::{NewPendingRegistration, PendingRegistration, User},
    },
    categories::{
        repo::CategoryRepo,
        repo_types::{Category, CategoryFields},
    },
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    pending: HashMap<Uuid, PendingRegistration>,
    categories: HashMap<Uuid, Category>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn pending_count(&self) -> usize {
        self.tables.read().await.pending.len()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let t = self.tables.read().await;
        Ok(t.users.values().any(|u| u.email == email))
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        let t = self.tables.read().await;
        Ok(t.users.values().any(|u| u.username == username))
    }

    async fn create_pending(
        &self,
        new: NewPendingRegistration,
    ) -> anyhow::Result<PendingRegistration> {
        let pending = PendingRegistration {
            id: Uuid::new_v4(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            salt: new.salt,
            verification_code: new.verification_code,
            expires_at: new.expires_at,
            created_at: OffsetDateTime::now_utc(),
        };
        self.tables
            .write()
            .await
            .pending
            .insert(pending.id, pending.clone());
        Ok(pending)
    }

    async fn find_pending(&self, id: Uuid) -> anyhow::Result<Option<PendingRegistration>> {
        Ok(self.tables.read().await.pending.get(&id).cloned())
    }

    async fn complete_registration(
        &self,
        pending: &PendingRegistration,
    ) -> anyhow::Result<Option<User>> {
        let mut t = self.tables.write().await;
        if !t.pending.contains_key(&pending.id) {
            return Ok(None);
        }
        let taken = t
            .users
            .values()
            .any(|u| u.username == pending.username || u.email == pending.email);
        if taken {
            return Ok(None);
        }

        t.pending.remove(&pending.id);
        let user = User {
            id: Uuid::new_v4(),
            username: pending.username.clone(),
            email: pending.email.clone(),
            password_hash: pending.password_hash.clone(),
            salt: pending.salt.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn purge_expired_pending(&self, now: OffsetDateTime) -> anyhow::Result<u64> {
        let mut t = self.tables.write().await;
        let before = t.pending.len();
        t.pending.retain(|_, p| !p.is_expired(now));
        Ok((before - t.pending.len()) as u64)
    }
}

#[async_trait]
impl CategoryRepo for MemoryStore {
    async fn list(&self, parent: Option<Uuid>) -> anyhow::Result<Vec<Category>> {
        let t = self.tables.read().await;
        let mut rows: Vec<Category> = t
            .categories
            .values()
            .filter(|c| parent.is_none() || c.parent_category_id == parent)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn create(&self, fields: CategoryFields) -> anyhow::Result<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            name: fields.name,
            photo_path: fields.photo_path,
            parent_category_id: fields.parent_category_id,
            created_at: OffsetDateTime::now_utc(),
        };
        self.tables
            .write()
            .await
            .categories
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: Uuid, fields: CategoryFields) -> anyhow::Result<Option<Category>> {
        let mut t = self.tables.write().await;
        let Some(category) = t.categories.get_mut(&id) else {
            return Ok(None);
        };
        category.name = fields.name;
        category.photo_path = fields.photo_path;
        category.parent_category_id = fields.parent_category_id;
        Ok(Some(category.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.tables.write().await;
        if t.categories.remove(&id).is_none() {
            return Ok(false);
        }
        for child in t.categories.values_mut() {
            if child.parent_category_id == Some(id) {
                child.parent_category_id = None;
            }
        }
        Ok(true)
    }
}
