//! income_distribution queries

use super::{PgStatisticsStore, StoreError};
use crate::statistics::{IncomeFilter, IncomeRecord};

impl PgStatisticsStore {
    pub async fn fetch_income(
        &self,
        filter: &IncomeFilter,
    ) -> Result<Vec<IncomeRecord>, StoreError> {
        let (primary, district) = match &filter.region {
            Some(region) => (Some(region.primary.as_str()), region.district.as_deref()),
            None => (None, None),
        };

        let rows = sqlx::query_as::<_, IncomeRecord>(
            r#"
            SELECT stats_year, province, district, income_bracket,
                   household_count, average_income
            FROM income_distribution
            WHERE stats_year = COALESCE($1::int, (SELECT MAX(stats_year) FROM income_distribution))
              AND ($2::text IS NULL OR province = $2 OR district = $2)
              AND ($3::text IS NULL OR (province = $2 AND district = $3))
              AND ($4::text IS NULL OR income_bracket = $4)
            ORDER BY province, district, income_bracket
            LIMIT $5
            "#,
        )
        .bind(filter.year)
        .bind(primary)
        .bind(district)
        .bind(filter.income_bracket.as_deref())
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn upsert_income(&self, record: &IncomeRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO income_distribution
                (stats_year, province, district, income_bracket, household_count, average_income)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (stats_year, province, district, income_bracket) DO UPDATE SET
                household_count = EXCLUDED.household_count,
                average_income = EXCLUDED.average_income,
                updated_at = NOW()
            "#,
        )
        .bind(record.stats_year)
        .bind(&record.province)
        .bind(&record.district)
        .bind(&record.income_bracket)
        .bind(record.household_count)
        .bind(record.average_income)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
