//! `recommend_optimal_location`: rank districts for a business type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::registry::ToolDescriptor;
use super::ToolError;
use crate::db::AppState;
use crate::mcp::validation::{
    non_empty, validate_range, validate_required, validate_year, ValidationErrors,
};
use crate::statistics::scoring::{
    aggregate_bands, average_income, score_locations, target_ratio, LocationCandidate,
    ScoredLocation,
};
use crate::statistics::{
    BusinessType, IncomeFilter, IncomeRecord, PopulationFilter, PopulationRecord, Region,
    ScoreWeights,
};

pub const TOOL_NAME: &str = "recommend_optimal_location";

const DEFAULT_LIMIT: i64 = 5;
const MAX_LIMIT: i64 = 50;

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: concat!(
            "업종에 맞는 최적 입지(시/군/구)를 추천합니다. ",
            "각 지역을 타깃 인구 비율, 인구 규모, 가구 평균 소득의 가중합으로 점수화(0-100)하며 ",
            "가중치는 업종별로 다릅니다. 시/도를 지정하면 해당 시/도 안에서만 비교합니다."
        )
        .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "business_type": {
                    "type": "string",
                    "description": "업종 (예: 카페, 음식점, 미용실, 학원)"
                },
                "province": {
                    "type": "string",
                    "description": "후보를 한정할 시/도 (예: 서울특별시)"
                },
                "year": {
                    "type": "integer",
                    "description": "통계 연도 (생략 시 최신 연도)"
                },
                "limit": {
                    "type": "integer",
                    "description": "추천 지역 수 (기본값: 5, 최대: 50)"
                }
            },
            "required": ["business_type"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug)]
pub struct LocationQuery {
    pub business: BusinessType,
    pub province: Option<Region>,
    pub year: Option<i32>,
    pub limit: usize,
}

impl LocationRequest {
    pub fn validate(&self) -> Result<LocationQuery, String> {
        let mut errors = ValidationErrors::new();
        validate_required(&self.business_type, "business_type", "업종", &mut errors);
        validate_year(self.year, "year", &mut errors);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        validate_range(limit, "limit", "limit", 1, MAX_LIMIT, &mut errors);
        errors.into_result()?;

        Ok(LocationQuery {
            business: BusinessType::parse(&self.business_type),
            province: non_empty(self.province.as_ref()).and_then(|r| Region::parse(&r)),
            year: self.year,
            limit: limit as usize,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RankedLocation {
    pub rank: usize,
    #[serde(flatten)]
    pub location: ScoredLocation,
}

#[derive(Debug, Serialize)]
pub struct WeightsView {
    pub target: f64,
    pub population: f64,
    pub income: f64,
}

impl From<ScoreWeights> for WeightsView {
    fn from(w: ScoreWeights) -> Self {
        Self {
            target: w.target,
            population: w.population,
            income: w.income,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub business_type: &'static str,
    pub province: Option<String>,
    pub stats_year: Option<i32>,
    pub weights: WeightsView,
    pub evaluated_districts: usize,
    pub recommendations: Vec<RankedLocation>,
}

type DistrictKey = (String, String);

/// Scores every district present in `population` and keeps the top `limit`.
pub fn rank_districts(
    business: BusinessType,
    population: &[PopulationRecord],
    income: &[IncomeRecord],
    limit: usize,
) -> (usize, Vec<RankedLocation>) {
    let profile = business.profile();

    let mut by_district: BTreeMap<DistrictKey, Vec<PopulationRecord>> = BTreeMap::new();
    for row in population {
        by_district
            .entry((row.province.clone(), row.district.clone()))
            .or_default()
            .push(row.clone());
    }

    let mut income_by_district: BTreeMap<DistrictKey, Vec<IncomeRecord>> = BTreeMap::new();
    for row in income {
        income_by_district
            .entry((row.province.clone(), row.district.clone()))
            .or_default()
            .push(row.clone());
    }

    let candidates: Vec<LocationCandidate> = by_district
        .into_iter()
        .filter_map(|(key, rows)| {
            let bands = aggregate_bands(&rows);
            if bands.total.total <= 0 {
                return None;
            }
            let avg_income = income_by_district
                .get(&key)
                .and_then(|rows| average_income(rows));
            Some(LocationCandidate {
                province: key.0,
                district: key.1,
                total_population: bands.total.total,
                target_ratio: target_ratio(profile, &bands),
                average_income: avg_income,
            })
        })
        .collect();

    let evaluated = candidates.len();
    let ranked = score_locations(profile.weights, candidates)
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, location)| RankedLocation {
            rank: i + 1,
            location,
        })
        .collect();

    (evaluated, ranked)
}

pub async fn execute(
    state: &AppState,
    query: LocationQuery,
) -> Result<LocationResponse, ToolError> {
    let population_filter = PopulationFilter {
        region: query.province.clone(),
        age_group: None,
        year: query.year,
        limit: None,
    };
    let population = state.get_population(&population_filter).await?;
    if population.is_empty() {
        return Err(ToolError::NoData(
            "추천 후보 지역의 인구 데이터가 없습니다".to_string(),
        ));
    }

    // Income must come from the same year the population rows resolved to.
    let stats_year = population.first().map(|r| r.stats_year);
    let income_filter = IncomeFilter {
        region: query.province.clone(),
        income_bracket: None,
        year: stats_year,
        limit: None,
    };
    let income = state.get_income(&income_filter).await?;
    if income.is_empty() {
        log::warn!("no income rows for location scoring; income term will be zero");
    }

    let (evaluated, recommendations) =
        rank_districts(query.business, &population, &income, query.limit);

    Ok(LocationResponse {
        business_type: query.business.label(),
        province: query.province.map(|r| r.primary),
        stats_year,
        weights: query.business.profile().weights.into(),
        evaluated_districts: evaluated,
        recommendations,
    })
}
