//! Ad-hoc SELECT execution for `execute_sql`.

use serde_json::Value;

use super::{PgStatisticsStore, StoreError};

/// Postgres SQLSTATE for a statement cancelled by `statement_timeout`.
const QUERY_CANCELED: &str = "57014";

impl PgStatisticsStore {
    /// Runs `query` inside a read-only transaction that is always rolled back.
    pub async fn execute_read_only(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;
        // SET does not accept bind parameters.
        let timeout = format!(
            "SET LOCAL statement_timeout = {}",
            self.statement_timeout.as_millis()
        );
        sqlx::query(&timeout).execute(&mut *tx).await?;

        let wrapped = format!(
            "SELECT COALESCE(json_agg(t), '[]'::json) FROM (SELECT * FROM ({query}) AS q LIMIT $1) AS t"
        );
        let result = sqlx::query_scalar::<_, Value>(&wrapped)
            .bind(limit)
            .fetch_one(&mut *tx)
            .await;

        tx.rollback().await?;

        match result {
            Ok(Value::Array(rows)) => Ok(rows),
            Ok(Value::Null) => Ok(Vec::new()),
            Ok(other) => Ok(vec![other]),
            Err(err) if is_timeout(&err) => Err(StoreError::Timeout),
            Err(err) => Err(err.into()),
        }
    }
}

fn is_timeout(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == QUERY_CANCELED)
        .unwrap_or(false)
}
