//! Shared application handles.
//!
//! [`Scribe`] bundles everything an operation needs: configuration, the
//! database pool, the content index, and the description generator. It is
//! built once per process from config (or from explicit parts in tests) and
//! passed by reference; nothing is global.

use std::sync::Arc;

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::embedding::create_provider;
use crate::generate::{create_generator, DescriptionGenerator};
use crate::migrate;
use crate::store::{ContentIndex, SqliteIndex};
use crate::upsert::UpsertManager;

#[derive(Clone)]
pub struct Scribe {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub generator: Arc<dyn DescriptionGenerator>,
    pub manager: UpsertManager,
}

impl Scribe {
    /// Connect to the database, ensure the schema exists, and build the
    /// providers named in the config.
    pub async fn open(config: Config) -> Result<Self> {
        let pool = db::connect(&config).await?;
        migrate::apply_schema(&pool).await?;

        let embedder = Arc::from(create_provider(&config.embedding)?);
        let index: Arc<dyn ContentIndex> = Arc::new(SqliteIndex::new(pool.clone(), embedder));
        let generator = Arc::from(create_generator(&config.llm)?);

        Ok(Self::from_parts(config, pool, index, generator))
    }

    pub fn from_parts(
        config: Config,
        pool: SqlitePool,
        index: Arc<dyn ContentIndex>,
        generator: Arc<dyn DescriptionGenerator>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            pool,
            generator,
            manager: UpsertManager::new(index),
        }
    }

    pub fn index(&self) -> &Arc<dyn ContentIndex> {
        self.manager.index()
    }
}
