//! `analyze_target_customers`: how much of a region's population a business
//! type is aimed at.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::population::region_label;
use super::registry::ToolDescriptor;
use super::ToolError;
use crate::db::AppState;
use crate::mcp::validation::{non_empty, validate_required, validate_year, ValidationErrors};
use crate::statistics::scoring::{
    aggregate_bands, primary_segment, ratio, round1, round4, target_population,
};
use crate::statistics::{BusinessType, Gender, PopulationFilter, PopulationRecord, Region};

pub const TOOL_NAME: &str = "analyze_target_customers";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: concat!(
            "업종별 타깃 고객층이 특정 지역 인구에서 차지하는 비중을 분석합니다. ",
            "업종마다 정해진 연령대 가중치(및 성별 초점)로 타깃 인구를 계산하고, ",
            "타깃 비율, 점수(0-100), 주요 연령층, 성별 구성과 추천 문구를 반환합니다."
        )
        .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "business_type": {
                    "type": "string",
                    "description": "업종 (예: 카페, 음식점, 베이커리, 미용실, 학원, 헬스장, 편의점, 의류, 약국)"
                },
                "region": {
                    "type": "string",
                    "description": "분석할 시/도 또는 시/군/구 (생략 시 전체)"
                },
                "year": {
                    "type": "integer",
                    "description": "통계 연도 (생략 시 최신 연도)"
                }
            },
            "required": ["business_type"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct TargetCustomersRequest {
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug)]
pub struct TargetCustomersQuery {
    pub business: BusinessType,
    pub region: Option<Region>,
    pub year: Option<i32>,
}

impl TargetCustomersRequest {
    pub fn validate(&self) -> Result<TargetCustomersQuery, String> {
        let mut errors = ValidationErrors::new();
        validate_required(&self.business_type, "business_type", "업종", &mut errors);
        validate_year(self.year, "year", &mut errors);
        errors.into_result()?;

        Ok(TargetCustomersQuery {
            business: BusinessType::parse(&self.business_type),
            region: non_empty(self.region.as_ref()).and_then(|r| Region::parse(&r)),
            year: self.year,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SegmentBreakdown {
    pub age_group: &'static str,
    pub weight: f64,
    pub population: i64,
    pub share: f64,
    pub weighted_population: f64,
}

#[derive(Debug, Serialize)]
pub struct GenderSplit {
    pub male_ratio: f64,
    pub female_ratio: f64,
}

#[derive(Debug, Serialize)]
pub struct TargetAnalysis {
    pub business_type: &'static str,
    pub region: Option<String>,
    pub stats_year: Option<i32>,
    pub total_population: i64,
    pub target_population: i64,
    pub target_ratio: f64,
    pub score: f64,
    pub gender_focus: Option<&'static str>,
    pub primary_segment: Option<&'static str>,
    pub segments: Vec<SegmentBreakdown>,
    pub gender_split: GenderSplit,
    pub recommendation: String,
}

/// Pure analysis over one region's population rows.
pub fn analyze(
    business: BusinessType,
    region: Option<&Region>,
    rows: &[PopulationRecord],
) -> TargetAnalysis {
    let profile = business.profile();
    let population = aggregate_bands(rows);
    let gender = profile.gender_focus.unwrap_or(Gender::Total);

    let target = target_population(profile, &population);
    let target_ratio = ratio(target, population.total.total as f64);
    let primary = primary_segment(profile, &population);

    let segments = profile
        .target_bands
        .iter()
        .map(|(band, weight)| {
            let counts = population.band(*band);
            SegmentBreakdown {
                age_group: band.label(),
                weight: *weight,
                population: counts.get(gender),
                share: round4(population.share(*band)),
                weighted_population: round1(counts.get(gender) as f64 * weight),
            }
        })
        .collect();

    let total = population.total.total as f64;
    let region_name = region.map(region_label);
    let score = round1(target_ratio * 100.0);

    TargetAnalysis {
        business_type: business.label(),
        recommendation: recommendation(
            business,
            region_name.as_deref(),
            score,
            primary.map(|b| (b.label(), population.share(b))),
        ),
        region: region_name,
        stats_year: rows.first().map(|r| r.stats_year),
        total_population: population.total.total,
        target_population: target.round() as i64,
        target_ratio: round4(target_ratio),
        score,
        gender_focus: profile.gender_focus.map(|g| g.as_str()),
        primary_segment: primary.map(|b| b.label()),
        segments,
        gender_split: GenderSplit {
            male_ratio: round4(ratio(population.total.male as f64, total)),
            female_ratio: round4(ratio(population.total.female as f64, total)),
        },
    }
}

fn recommendation(
    business: BusinessType,
    region: Option<&str>,
    score: f64,
    primary: Option<(&str, f64)>,
) -> String {
    let area = region.unwrap_or("전체 지역");
    let level = if score >= 40.0 {
        "타깃 고객층이 매우 풍부합니다"
    } else if score >= 25.0 {
        "타깃 고객층이 적정 수준입니다"
    } else {
        "타깃 고객층이 얇아 배후 수요를 추가로 확인해야 합니다"
    };

    match primary {
        Some((band, share)) => format!(
            "{}의 {} 창업 시 {} (점수 {:.1}). 핵심 고객은 {}이며 지역 인구의 {:.1}%를 차지합니다.",
            area,
            business.label(),
            level,
            score,
            band,
            share * 100.0
        ),
        None => format!(
            "{}에서 {} 타깃 연령대의 인구 데이터를 찾지 못했습니다.",
            area,
            business.label()
        ),
    }
}

pub async fn execute(
    state: &AppState,
    query: TargetCustomersQuery,
) -> Result<TargetAnalysis, ToolError> {
    let filter = PopulationFilter {
        region: query.region.clone(),
        age_group: None,
        year: query.year,
        limit: None,
    };
    let rows = state.get_population(&filter).await?;
    if rows.is_empty() {
        return Err(ToolError::NoData(format!(
            "{} 지역의 인구 데이터가 없습니다",
            query
                .region
                .as_ref()
                .map(region_label)
                .unwrap_or_else(|| "요청한".to_string())
        )));
    }

    Ok(analyze(query.business, query.region.as_ref(), &rows))
}
