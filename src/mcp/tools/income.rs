//! `get_income_distribution`: household income brackets per region.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::population::region_label;
use super::registry::ToolDescriptor;
use crate::db::{AppState, StoreError};
use crate::mcp::validation::{non_empty, validate_range, validate_year, ValidationErrors};
use crate::statistics::scoring::{average_income, round1};
use crate::statistics::{IncomeFilter, IncomeRecord, Region};

pub const TOOL_NAME: &str = "get_income_distribution";

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: concat!(
            "행정구역별 가구 소득 분포를 조회합니다. ",
            "소득 구간별 가구 수와 평균 소득(만원)을 반환하며, ",
            "조회된 행 전체의 가구 가중 평균 소득도 함께 계산합니다."
        )
        .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "region": {
                    "type": "string",
                    "description": "시/도 또는 시/군/구 이름"
                },
                "income_bracket": {
                    "type": "string",
                    "description": "소득 구간 (예: 3000-5000만원)"
                },
                "year": {
                    "type": "integer",
                    "description": "통계 연도 (생략 시 최신 연도)"
                },
                "limit": {
                    "type": "integer",
                    "description": "최대 행 수 (기본값: 100, 최대: 1000)"
                }
            }
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct IncomeRequest {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub income_bracket: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl IncomeRequest {
    pub fn validate(&self) -> Result<IncomeFilter, String> {
        let mut errors = ValidationErrors::new();
        validate_year(self.year, "year", &mut errors);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        validate_range(limit, "limit", "limit", 1, MAX_LIMIT, &mut errors);
        errors.into_result()?;

        Ok(IncomeFilter {
            region: non_empty(self.region.as_ref()).and_then(|r| Region::parse(&r)),
            income_bracket: non_empty(self.income_bracket.as_ref()),
            year: self.year,
            limit: Some(limit),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct IncomeResponse {
    pub filters: serde_json::Value,
    pub count: usize,
    pub total_households: i64,
    /// Household-weighted, in 만원.
    pub average_income: Option<f64>,
    pub rows: Vec<IncomeRecord>,
}

pub async fn execute(state: &AppState, filter: IncomeFilter) -> Result<IncomeResponse, StoreError> {
    let records = state.get_income(&filter).await?;

    Ok(IncomeResponse {
        filters: json!({
            "region": filter.region.as_ref().map(region_label),
            "income_bracket": filter.income_bracket,
            "year": filter.year,
            "limit": filter.limit,
        }),
        count: records.len(),
        total_households: records.iter().map(|r| r.household_count).sum(),
        average_income: average_income(&records).map(round1),
        rows: records.to_vec(),
    })
}
