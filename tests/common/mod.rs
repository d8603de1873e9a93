//! Shared fixtures: an in-memory `StatisticsStore` and a small Seoul dataset.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use market_stats_mcp::db::{AppState, StatisticsStore, StoreError};
use market_stats_mcp::mcp::tools::ToolRegistry;
use market_stats_mcp::mcp::McpService;
use market_stats_mcp::statistics::{
    IncomeFilter, IncomeRecord, PopulationFilter, PopulationRecord,
};

/// Mirrors the SQL filter semantics of the Postgres store.
#[derive(Default)]
pub struct MockStatisticsStore {
    pub population: Vec<PopulationRecord>,
    pub income: Vec<IncomeRecord>,
    pub sql_rows: Vec<Value>,
    pub fail_with_timeout: bool,
    pub population_calls: AtomicUsize,
    pub income_calls: AtomicUsize,
    pub sql_calls: AtomicUsize,
}

impl MockStatisticsStore {
    pub fn seoul() -> Self {
        Self {
            population: seoul_population(),
            income: seoul_income(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl StatisticsStore for MockStatisticsStore {
    async fn population(
        &self,
        filter: &PopulationFilter,
    ) -> Result<Vec<PopulationRecord>, StoreError> {
        self.population_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_with_timeout {
            return Err(StoreError::Timeout);
        }
        let year = filter
            .year
            .or_else(|| self.population.iter().map(|r| r.stats_year).max());

        let mut rows: Vec<PopulationRecord> = self
            .population
            .iter()
            .filter(|r| Some(r.stats_year) == year)
            .filter(|r| {
                filter
                    .region
                    .as_ref()
                    .map_or(true, |region| region.matches(&r.province, &r.district))
            })
            .filter(|r| {
                filter
                    .age_group
                    .as_ref()
                    .map_or(true, |age| &r.age_group == age)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (&a.province, &a.district, &a.age_group).cmp(&(&b.province, &b.district, &b.age_group))
        });
        if let Some(limit) = filter.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn income(&self, filter: &IncomeFilter) -> Result<Vec<IncomeRecord>, StoreError> {
        self.income_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_with_timeout {
            return Err(StoreError::Timeout);
        }
        let year = filter
            .year
            .or_else(|| self.income.iter().map(|r| r.stats_year).max());

        let mut rows: Vec<IncomeRecord> = self
            .income
            .iter()
            .filter(|r| Some(r.stats_year) == year)
            .filter(|r| {
                filter
                    .region
                    .as_ref()
                    .map_or(true, |region| region.matches(&r.province, &r.district))
            })
            .filter(|r| {
                filter
                    .income_bracket
                    .as_ref()
                    .map_or(true, |bracket| &r.income_bracket == bracket)
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (&a.province, &a.district, &a.income_bracket).cmp(&(
                &b.province,
                &b.district,
                &b.income_bracket,
            ))
        });
        if let Some(limit) = filter.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn run_read_only(&self, _query: &str, limit: i64) -> Result<Vec<Value>, StoreError> {
        self.sql_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_with_timeout {
            return Err(StoreError::Timeout);
        }
        Ok(self.sql_rows.iter().take(limit as usize).cloned().collect())
    }
}

pub fn pop(
    year: i32,
    province: &str,
    district: &str,
    age_group: &str,
    male: i64,
    female: i64,
) -> PopulationRecord {
    PopulationRecord {
        stats_year: year,
        province: province.to_string(),
        district: district.to_string(),
        age_group: age_group.to_string(),
        male_population: male,
        female_population: female,
        total_population: male + female,
    }
}

pub fn inc(
    year: i32,
    province: &str,
    district: &str,
    bracket: &str,
    households: i64,
    average: i64,
) -> IncomeRecord {
    IncomeRecord {
        stats_year: year,
        province: province.to_string(),
        district: district.to_string(),
        income_bracket: bracket.to_string(),
        household_count: households,
        average_income: average,
    }
}

/// 마포구 skews young, 노원구 skews old; one stale 2023 row per district.
pub fn seoul_population() -> Vec<PopulationRecord> {
    let s = "서울특별시";
    vec![
        pop(2024, s, "마포구", "20대", 30_000, 40_000),
        pop(2024, s, "마포구", "30대", 25_000, 25_000),
        pop(2024, s, "마포구", "60대", 10_000, 10_000),
        pop(2024, s, "노원구", "20대", 10_000, 10_000),
        pop(2024, s, "노원구", "30대", 10_000, 10_000),
        pop(2024, s, "노원구", "60대", 40_000, 40_000),
        pop(2023, s, "마포구", "20대", 1, 1),
        pop(2023, s, "노원구", "20대", 1, 1),
        pop(2024, "부산광역시", "해운대구", "20대", 20_000, 20_000),
    ]
}

pub fn seoul_income() -> Vec<IncomeRecord> {
    let s = "서울특별시";
    vec![
        inc(2024, s, "마포구", "3000-5000만원", 10_000, 4_000),
        inc(2024, s, "마포구", "5000만원이상", 10_000, 8_000),
        inc(2024, s, "노원구", "3000-5000만원", 20_000, 4_000),
        inc(2024, "부산광역시", "해운대구", "3000-5000만원", 5_000, 4_500),
    ]
}

pub fn app_state(store: Arc<MockStatisticsStore>) -> AppState {
    AppState::with_store(store, Duration::from_secs(60), 100)
}

pub fn service_with(store: Arc<MockStatisticsStore>) -> McpService {
    McpService::new(ToolRegistry::new(), app_state(store))
}

/// Parses the JSON text of a successful tool result.
pub fn tool_payload(result: &Value) -> Value {
    assert_eq!(result["isError"], false, "tool failed: {}", result);
    let text = result["content"][0]["text"]
        .as_str()
        .expect("tool result has text content");
    serde_json::from_str(text).expect("tool text is JSON")
}

pub fn tool_error_text(result: &Value) -> String {
    assert_eq!(result["isError"], true, "tool unexpectedly succeeded: {}", result);
    result["content"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}
