use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use std::time::Duration;

use super::{StatisticsStore, StoreError};
use crate::config::Config;
use crate::statistics::{IncomeFilter, IncomeRecord, PopulationFilter, PopulationRecord};

/// `StatisticsStore` backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStatisticsStore {
    pub(super) pool: PgPool,
    pub(super) statement_timeout: Duration,
}

impl PgStatisticsStore {
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(900))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&config.database_url)
            .await?;

        log::info!(
            "Connected to PostgreSQL (max {} connections)",
            config.max_connections
        );

        Ok(Self::from_pool(pool, config.sql_statement_timeout))
    }

    pub fn from_pool(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        log::info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl StatisticsStore for PgStatisticsStore {
    async fn population(
        &self,
        filter: &PopulationFilter,
    ) -> Result<Vec<PopulationRecord>, StoreError> {
        self.fetch_population(filter).await
    }

    async fn income(&self, filter: &IncomeFilter) -> Result<Vec<IncomeRecord>, StoreError> {
        self.fetch_income(filter).await
    }

    async fn run_read_only(&self, query: &str, limit: i64) -> Result<Vec<Value>, StoreError> {
        self.execute_read_only(query, limit).await
    }
}
