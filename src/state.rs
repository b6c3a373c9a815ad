use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::{
    auth::repo::{PgUserRepo, UserRepo},
    categories::repo::{CategoryRepo, PgCategoryRepo},
    config::AppConfig,
    email::{self, EmailSender},
    memory::MemoryStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub categories: Arc<dyn CategoryRepo>,
    pub mailer: Arc<dyn EmailSender>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let mailer = email::from_config(&config.email);

        let Some(database_url) = config.database_url.clone() else {
            warn!("DATABASE_URL not set; using the in-memory store, data is lost on exit");
            return Ok(Self::in_memory(config, mailer));
        };

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        info!("database migrations applied");

        Ok(Self {
            config,
            users: Arc::new(PgUserRepo::new(db.clone())),
            categories: Arc::new(PgCategoryRepo::new(db)),
            mailer,
        })
    }

    /// Both repositories backed by one shared [`MemoryStore`].
    pub fn in_memory(config: Arc<AppConfig>, mailer: Arc<dyn EmailSender>) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(config, store.clone(), store, mailer)
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        categories: Arc<dyn CategoryRepo>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            config,
            users,
            categories,
            mailer,
        }
    }
}
