//! `get_population_statistics`: filtered population rows.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::registry::ToolDescriptor;
use crate::db::{AppState, StoreError};
use crate::mcp::validation::{
    non_empty, validate_age_group, validate_gender, validate_range, validate_year,
    ValidationErrors,
};
use crate::statistics::{Gender, PopulationFilter, Region};

pub const TOOL_NAME: &str = "get_population_statistics";

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: concat!(
            "행정구역별 연령대·성별 인구 통계를 조회합니다. ",
            "지역(시/도 또는 시/군/구), 연령대, 성별, 연도로 필터링할 수 있으며 ",
            "연도를 생략하면 가장 최근 연도의 데이터를 반환합니다."
        )
        .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "region": {
                    "type": "string",
                    "description": "시/도 또는 시/군/구 이름 (예: 서울특별시, 강남구, '서울특별시 중구')"
                },
                "age_group": {
                    "type": "string",
                    "description": "연령대 (예: 20대, 30-39, 10세미만, 70세이상)"
                },
                "gender": {
                    "type": "string",
                    "enum": ["male", "female", "total"],
                    "description": "성별 (기본값: total)"
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
pub struct PopulationRequest {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug)]
pub struct PopulationQuery {
    pub filter: PopulationFilter,
    pub gender: Gender,
}

impl PopulationRequest {
    pub fn validate(&self) -> Result<PopulationQuery, String> {
        let mut errors = ValidationErrors::new();
        let band = validate_age_group(self.age_group.as_deref(), "age_group", &mut errors);
        let gender = validate_gender(self.gender.as_deref(), "gender", &mut errors);
        validate_year(self.year, "year", &mut errors);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        validate_range(limit, "limit", "limit", 1, MAX_LIMIT, &mut errors);
        errors.into_result()?;

        Ok(PopulationQuery {
            filter: PopulationFilter {
                region: non_empty(self.region.as_ref()).and_then(|r| Region::parse(&r)),
                age_group: band.map(|b| b.label().to_string()),
                year: self.year,
                limit: Some(limit),
            },
            gender,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PopulationRow {
    pub stats_year: i32,
    pub province: String,
    pub district: String,
    pub age_group: String,
    pub population: i64,
    pub male_population: i64,
    pub female_population: i64,
    pub total_population: i64,
}

#[derive(Debug, Serialize)]
pub struct PopulationResponse {
    pub filters: serde_json::Value,
    pub count: usize,
    /// Sum of `population` across the returned rows.
    pub total_population: i64,
    pub rows: Vec<PopulationRow>,
}

pub async fn execute(
    state: &AppState,
    query: PopulationQuery,
) -> Result<PopulationResponse, StoreError> {
    let records = state.get_population(&query.filter).await?;

    let rows: Vec<PopulationRow> = records
        .iter()
        .map(|r| PopulationRow {
            stats_year: r.stats_year,
            province: r.province.clone(),
            district: r.district.clone(),
            age_group: r.age_group.clone(),
            population: query.gender.pick(r),
            male_population: r.male_population,
            female_population: r.female_population,
            total_population: r.total_population,
        })
        .collect();

    Ok(PopulationResponse {
        filters: json!({
            "region": query.filter.region.as_ref().map(region_label),
            "age_group": query.filter.age_group,
            "gender": query.gender.as_str(),
            "year": query.filter.year,
            "limit": query.filter.limit,
        }),
        count: rows.len(),
        total_population: rows.iter().map(|r| r.population).sum(),
        rows,
    })
}

pub(crate) fn region_label(region: &Region) -> String {
    match &region.district {
        Some(district) => format!("{} {}", region.primary, district),
        None => region.primary.clone(),
    }
}
