//! `execute_sql`: ad-hoc read-only SELECT against the statistics tables.
//!
//! Queries are screened here before they reach the database; the store then
//! runs them in a read-only transaction with a statement timeout.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::registry::ToolDescriptor;
use crate::db::{AppState, StoreError};
use crate::mcp::validation::{validate_required, ValidationError, ValidationErrors};

pub const TOOL_NAME: &str = "execute_sql";

lazy_static! {
    static ref LEADING_KEYWORD: Regex = Regex::new(r"(?i)^\s*(select|with)\b").unwrap();
    static ref FORBIDDEN_KEYWORD: Regex = Regex::new(
        r"(?i)\b(insert|update|delete|merge|upsert|drop|alter|create|truncate|grant|revoke|copy|call|do|vacuum|analyze|reindex|cluster|lock|listen|notify|set|reset|begin|commit|rollback|savepoint|prepare|execute|refresh|comment|into|pg_sleep|pg_read_file|pg_read_binary_file|pg_terminate_backend|pg_cancel_backend|lo_import|lo_export|dblink)\b"
    )
    .unwrap();
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: concat!(
            "통계 데이터베이스에 읽기 전용 SELECT 쿼리를 실행합니다. ",
            "사용 가능한 테이블: population_statistics(stats_year, province, district, age_group, ",
            "male_population, female_population, total_population), ",
            "income_distribution(stats_year, province, district, income_bracket, household_count, average_income). ",
            "단일 SELECT/WITH 문만 허용되며 데이터 변경 구문, 여러 문장, 주석은 거부됩니다."
        )
        .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "실행할 SELECT 쿼리"
                },
                "limit": {
                    "type": "integer",
                    "description": "최대 행 수 (서버 설정 상한을 넘을 수 없음)"
                }
            },
            "required": ["query"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct ExecuteSqlRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub struct CheckedQuery {
    pub sql: String,
    pub limit: i64,
}

impl ExecuteSqlRequest {
    pub fn validate(&self, max_rows: i64) -> Result<CheckedQuery, String> {
        let mut errors = ValidationErrors::new();
        validate_required(&self.query, "query", "쿼리", &mut errors);

        let limit = self.limit.unwrap_or(max_rows).min(max_rows);
        if limit < 1 {
            errors.add(ValidationError::new("limit", "limit은(는) 1 이상이어야 합니다"));
        }

        let sql = if errors.is_empty() {
            match check_select(&self.query) {
                Ok(sql) => Some(sql),
                Err(err) => {
                    errors.add(err);
                    None
                }
            }
        } else {
            None
        };

        errors.into_result()?;
        Ok(CheckedQuery {
            sql: sql.unwrap_or_default(),
            limit,
        })
    }
}

/// Accepts a single SELECT/WITH statement and returns it without trailing
/// semicolons.
pub fn check_select(raw: &str) -> Result<String, ValidationError> {
    let sql = raw.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace());

    if sql.is_empty() {
        return Err(ValidationError::empty_field("query", "쿼리"));
    }
    if sql.contains(';') {
        return Err(ValidationError::new("query", "여러 개의 SQL 문은 실행할 수 없습니다")
            .with_suggestion("하나의 SELECT 문만 보내 주세요"));
    }
    if sql.contains("--") || sql.contains("/*") {
        return Err(ValidationError::new("query", "SQL 주석은 허용되지 않습니다"));
    }
    if !LEADING_KEYWORD.is_match(sql) {
        return Err(ValidationError::new("query", "SELECT 또는 WITH로 시작하는 쿼리만 허용됩니다"));
    }
    if let Some(found) = FORBIDDEN_KEYWORD.find(sql) {
        return Err(ValidationError::new(
            "query",
            format!("허용되지 않는 키워드가 포함되어 있습니다: {}", found.as_str()),
        )
        .with_suggestion("읽기 전용 SELECT 쿼리만 실행할 수 있습니다"));
    }

    Ok(sql.to_string())
}

#[derive(Debug, Serialize)]
pub struct ExecuteSqlResponse {
    pub row_count: usize,
    /// More rows matched than `limit` allowed.
    pub truncated: bool,
    pub rows: Vec<Value>,
}

pub async fn execute(
    state: &AppState,
    query: CheckedQuery,
) -> Result<ExecuteSqlResponse, StoreError> {
    let mut rows = state
        .run_read_only(&query.sql, query.limit.saturating_add(1))
        .await?;

    let truncated = rows.len() as i64 > query.limit;
    rows.truncate(query.limit as usize);

    Ok(ExecuteSqlResponse {
        row_count: rows.len(),
        truncated,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_select_and_strips_semicolon() {
        let sql = check_select("SELECT district FROM population_statistics ;  ").unwrap();
        assert_eq!(sql, "SELECT district FROM population_statistics");
    }

    #[test]
    fn test_accepts_cte() {
        assert!(check_select(
            "with t as (select district, sum(total_population) p from population_statistics group by district) select * from t order by p desc"
        )
        .is_ok());
    }

    #[test]
    fn test_identifiers_containing_keywords_are_allowed() {
        // `offset` and `updated_at` contain forbidden words only as substrings.
        assert!(check_select("SELECT updated_at FROM income_distribution OFFSET 5").is_ok());
    }

    #[test]
    fn test_rejects_modifications() {
        assert!(check_select("DELETE FROM population_statistics").is_err());
        assert!(check_select("SELECT * FROM population_statistics FOR UPDATE").is_err());
        assert!(check_select("SELECT * INTO backup FROM income_distribution").is_err());
        assert!(check_select(
            "WITH d AS (DELETE FROM income_distribution RETURNING *) SELECT * FROM d"
        )
        .is_err());
    }

    #[test]
    fn test_rejects_multiple_statements_and_comments() {
        assert!(check_select("SELECT 1; DROP TABLE population_statistics").is_err());
        assert!(check_select("SELECT 1 -- hidden").is_err());
        assert!(check_select("SELECT /* x */ 1").is_err());
    }

    #[test]
    fn test_rejects_sleep() {
        let err = check_select("SELECT pg_sleep(10)").unwrap_err();
        assert!(err.message.contains("pg_sleep"));
    }

    #[test]
    fn test_limit_capped_by_server() {
        let request = ExecuteSqlRequest {
            query: "SELECT 1".to_string(),
            limit: Some(10_000),
        };
        assert_eq!(request.validate(500).unwrap().limit, 500);
    }

    #[test]
    fn test_missing_query() {
        let request: ExecuteSqlRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.validate(500).is_err());
    }
}
