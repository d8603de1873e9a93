//! population_statistics queries

use super::{PgStatisticsStore, StoreError};
use crate::statistics::{PopulationFilter, PopulationRecord};

impl PgStatisticsStore {
    /// Filtered SELECT; a missing year resolves to the latest year on record.
    pub async fn fetch_population(
        &self,
        filter: &PopulationFilter,
    ) -> Result<Vec<PopulationRecord>, StoreError> {
        let (primary, district) = match &filter.region {
            Some(region) => (Some(region.primary.as_str()), region.district.as_deref()),
            None => (None, None),
        };

        let rows = sqlx::query_as::<_, PopulationRecord>(
            r#"
            SELECT stats_year, province, district, age_group,
                   male_population, female_population, total_population
            FROM population_statistics
            WHERE stats_year = COALESCE($1::int, (SELECT MAX(stats_year) FROM population_statistics))
              AND ($2::text IS NULL OR province = $2 OR district = $2)
              AND ($3::text IS NULL OR (province = $2 AND district = $3))
              AND ($4::text IS NULL OR age_group = $4)
            ORDER BY province, district, age_group
            LIMIT $5
            "#,
        )
        .bind(filter.year)
        .bind(primary)
        .bind(district)
        .bind(filter.age_group.as_deref())
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert or replace a row by its natural key.
    pub async fn upsert_population(&self, record: &PopulationRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO population_statistics
                (stats_year, province, district, age_group,
                 male_population, female_population, total_population)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (stats_year, province, district, age_group) DO UPDATE SET
                male_population = EXCLUDED.male_population,
                female_population = EXCLUDED.female_population,
                total_population = EXCLUDED.total_population,
                updated_at = NOW()
            "#,
        )
        .bind(record.stats_year)
        .bind(&record.province)
        .bind(&record.district)
        .bind(&record.age_group)
        .bind(record.male_population)
        .bind(record.female_population)
        .bind(record.total_population)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
