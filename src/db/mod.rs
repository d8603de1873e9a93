//! Database module - AppState and the statistics store
//!
//! This module is split into submodules for better separation of concerns:
//! - `postgres` - pool setup and the `StatisticsStore` implementation
//! - `population` - population_statistics queries
//! - `income` - income_distribution queries
//! - `read_only` - ad-hoc SELECT execution

mod income;
mod population;
mod postgres;
mod read_only;

pub use postgres::PgStatisticsStore;

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;
use crate::statistics::{IncomeFilter, IncomeRecord, PopulationFilter, PopulationRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("query exceeded the statement timeout")]
    Timeout,
}

/// Read access to the population/income dataset.
#[async_trait]
pub trait StatisticsStore: Send + Sync {
    async fn population(
        &self,
        filter: &PopulationFilter,
    ) -> Result<Vec<PopulationRecord>, StoreError>;

    async fn income(&self, filter: &IncomeFilter) -> Result<Vec<IncomeRecord>, StoreError>;

    /// Runs an already validated SELECT and returns at most `limit` rows as
    /// JSON objects.
    async fn run_read_only(&self, query: &str, limit: i64) -> Result<Vec<Value>, StoreError>;
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StatisticsStore>,
    pub population_cache: Cache<PopulationFilter, Arc<Vec<PopulationRecord>>>,
    pub income_cache: Cache<IncomeFilter, Arc<Vec<IncomeRecord>>>,
    pub sql_row_limit: i64,
}

impl AppState {
    pub async fn new(config: &Config) -> Result<Self, StoreError> {
        let store = PgStatisticsStore::connect(config).await?;
        if config.run_migrations {
            store.migrate().await?;
        }
        Ok(Self::with_store(
            Arc::new(store),
            config.cache_ttl,
            config.sql_row_limit,
        ))
    }

    pub fn with_store(
        store: Arc<dyn StatisticsStore>,
        cache_ttl: Duration,
        sql_row_limit: i64,
    ) -> Self {
        let population_cache = Cache::builder()
            .time_to_live(cache_ttl)
            .max_capacity(200)
            .build();

        let income_cache = Cache::builder()
            .time_to_live(cache_ttl)
            .max_capacity(200)
            .build();

        AppState {
            store,
            population_cache,
            income_cache,
            sql_row_limit,
        }
    }

    /// Cache-first population lookup.
    pub async fn get_population(
        &self,
        filter: &PopulationFilter,
    ) -> Result<Arc<Vec<PopulationRecord>>, StoreError> {
        if let Some(rows) = self.population_cache.get(filter).await {
            log::debug!("population cache hit for {:?}", filter);
            return Ok(rows);
        }

        let rows = Arc::new(self.store.population(filter).await?);
        self.population_cache
            .insert(filter.clone(), rows.clone())
            .await;
        Ok(rows)
    }

    /// Cache-first income lookup.
    pub async fn get_income(
        &self,
        filter: &IncomeFilter,
    ) -> Result<Arc<Vec<IncomeRecord>>, StoreError> {
        if let Some(rows) = self.income_cache.get(filter).await {
            log::debug!("income cache hit for {:?}", filter);
            return Ok(rows);
        }

        let rows = Arc::new(self.store.income(filter).await?);
        self.income_cache.insert(filter.clone(), rows.clone()).await;
        Ok(rows)
    }

    /// Ad-hoc queries bypass the cache.
    pub async fn run_read_only(&self, query: &str, limit: i64) -> Result<Vec<Value>, StoreError> {
        self.store.run_read_only(query, limit).await
    }
}
