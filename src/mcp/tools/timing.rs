//! `get_marketing_timing`: when and where to run campaigns for a business type.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::population::region_label;
use super::registry::ToolDescriptor;
use super::ToolError;
use crate::db::AppState;
use crate::mcp::validation::{
    non_empty, validate_age_group, validate_range, validate_required, validate_year,
    ValidationErrors,
};
use crate::statistics::business::channels_for_band;
use crate::statistics::scoring::{aggregate_bands, primary_segment};
use crate::statistics::{AgeBand, BusinessType, PopulationFilter, Region};

pub const TOOL_NAME: &str = "get_marketing_timing";

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor {
        name: TOOL_NAME.to_string(),
        description: concat!(
            "업종과 타깃 연령대에 맞는 마케팅 시기를 추천합니다. ",
            "피크 시간대, 요일, 성수기 월, 연령대별 추천 채널과 캠페인 시작 시점을 반환합니다. ",
            "연령대를 생략하고 지역을 지정하면 해당 지역 인구에서 주요 고객층을 찾아 사용합니다."
        )
        .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "business_type": {
                    "type": "string",
                    "description": "업종 (예: 카페, 음식점, 학원)"
                },
                "target_age_group": {
                    "type": "string",
                    "description": "타깃 연령대 (예: 20대)"
                },
                "region": {
                    "type": "string",
                    "description": "주요 고객층을 추정할 지역 (선택)"
                },
                "year": {
                    "type": "integer",
                    "description": "지역 인구 통계 연도 (생략 시 최신 연도)"
                },
                "month": {
                    "type": "integer",
                    "description": "기준 월 1-12 (생략 시 이번 달)"
                }
            },
            "required": ["business_type"]
        }),
    }
}

#[derive(Debug, Deserialize)]
pub struct TimingRequest {
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub target_age_group: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
}

#[derive(Debug)]
pub struct TimingQuery {
    pub business: BusinessType,
    pub age_band: Option<AgeBand>,
    pub region: Option<Region>,
    pub year: Option<i32>,
    pub month: u32,
}

impl TimingRequest {
    pub fn validate(&self) -> Result<TimingQuery, String> {
        let mut errors = ValidationErrors::new();
        validate_required(&self.business_type, "business_type", "업종", &mut errors);
        let age_band =
            validate_age_group(self.target_age_group.as_deref(), "target_age_group", &mut errors);
        validate_year(self.year, "year", &mut errors);
        let month = self.month.unwrap_or_else(|| chrono::Local::now().month());
        validate_range(month as i64, "month", "월", 1, 12, &mut errors);
        errors.into_result()?;

        Ok(TimingQuery {
            business: BusinessType::parse(&self.business_type),
            age_band,
            region: non_empty(self.region.as_ref()).and_then(|r| Region::parse(&r)),
            year: self.year,
            month,
        })
    }
}

/// Where the target age band came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    Argument,
    RegionAnalysis,
    BusinessDefault,
}

#[derive(Debug, Serialize)]
pub struct MarketingTiming {
    pub business_type: &'static str,
    pub target_age_group: &'static str,
    pub target_source: TargetSource,
    pub peak_hours: Vec<&'static str>,
    pub peak_days: Vec<&'static str>,
    pub peak_months: Vec<u32>,
    pub channels: Vec<&'static str>,
    pub month: u32,
    pub is_peak_month: bool,
    pub next_peak_month: u32,
    pub months_until_peak: u32,
    pub campaign_lead_days: u32,
    pub recommendations: Vec<String>,
}

/// Builds the timing plan; no I/O.
pub fn plan(
    business: BusinessType,
    band: AgeBand,
    source: TargetSource,
    month: u32,
) -> MarketingTiming {
    let timing = &business.profile().timing;

    let mut channels: Vec<&'static str> = channels_for_band(band).to_vec();
    for channel in timing.channels {
        if !channels.contains(channel) {
            channels.push(channel);
        }
    }

    let (next_peak_month, months_until_peak) = next_peak(timing.peak_months, month);
    let is_peak_month = months_until_peak == 0;

    let mut recommendations = vec![format!(
        "{} 고객은 {} 시간대 방문이 많으므로 이 시간 전후로 게시물과 쿠폰을 발송하세요.",
        band.label(),
        timing.peak_hours.join(", ")
    )];
    recommendations.push(format!(
        "주간 프로모션은 {}에 집중하세요.",
        timing.peak_days.join("·")
    ));
    if is_peak_month {
        recommendations.push(format!(
            "{}월은 {} 성수기입니다. 진행 중인 캠페인의 노출을 최대로 유지하세요.",
            month,
            business.label()
        ));
    } else {
        recommendations.push(format!(
            "다음 성수기는 {}월({}개월 후)입니다. 시작 {}일 전부터 사전 캠페인을 준비하세요.",
            next_peak_month, months_until_peak, timing.lead_days
        ));
    }
    if let Some(primary) = channels.first() {
        recommendations.push(format!(
            "{} 타깃에는 {} 채널의 반응이 가장 좋습니다.",
            band.label(),
            primary
        ));
    }

    MarketingTiming {
        business_type: business.label(),
        target_age_group: band.label(),
        target_source: source,
        peak_hours: timing.peak_hours.to_vec(),
        peak_days: timing.peak_days.to_vec(),
        peak_months: timing.peak_months.to_vec(),
        channels,
        month,
        is_peak_month,
        next_peak_month,
        months_until_peak,
        campaign_lead_days: timing.lead_days,
        recommendations,
    }
}

/// Nearest peak month at or after `month`, wrapping into next year.
fn next_peak(peak_months: &[u32], month: u32) -> (u32, u32) {
    peak_months
        .iter()
        .map(|&peak| (peak, (peak + 12 - month) % 12))
        .min_by_key(|&(_, distance)| distance)
        .unwrap_or((month, 0))
}

/// The most heavily weighted target band of a business type.
fn default_band(business: BusinessType) -> AgeBand {
    business
        .profile()
        .target_bands
        .iter()
        .fold(None, |best: Option<(AgeBand, f64)>, &(band, weight)| match best {
            Some((_, top)) if top >= weight => best,
            _ => Some((band, weight)),
        })
        .map(|(band, _)| band)
        .unwrap_or(AgeBand::Thirties)
}

pub async fn execute(state: &AppState, query: TimingQuery) -> Result<MarketingTiming, ToolError> {
    if let Some(band) = query.age_band {
        return Ok(plan(query.business, band, TargetSource::Argument, query.month));
    }

    if let Some(region) = &query.region {
        let filter = PopulationFilter {
            region: Some(region.clone()),
            age_group: None,
            year: query.year,
            limit: None,
        };
        let rows = state.get_population(&filter).await?;
        let bands = aggregate_bands(&rows);
        match primary_segment(query.business.profile(), &bands) {
            Some(band) => {
                return Ok(plan(
                    query.business,
                    band,
                    TargetSource::RegionAnalysis,
                    query.month,
                ))
            }
            None => log::info!(
                "no population data for {}; using default target band",
                region_label(region)
            ),
        }
    }

    Ok(plan(
        query.business,
        default_band(query.business),
        TargetSource::BusinessDefault,
        query.month,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_peak_wraps_year() {
        assert_eq!(next_peak(&[4, 5, 9, 10], 11), (4, 5));
        assert_eq!(next_peak(&[4, 5, 9, 10], 5), (5, 0));
        assert_eq!(next_peak(&[4, 5, 9, 10], 6), (9, 3));
        assert_eq!(next_peak(&[], 6), (6, 0));
    }

    #[test]
    fn test_plan_peak_month() {
        let timing = plan(BusinessType::Cafe, AgeBand::Twenties, TargetSource::Argument, 4);
        assert!(timing.is_peak_month);
        assert_eq!(timing.next_peak_month, 4);
        assert!(timing.recommendations.iter().any(|r| r.contains("성수기입니다")));
    }

    #[test]
    fn test_channels_put_band_first_without_duplicates() {
        let timing = plan(BusinessType::Cafe, AgeBand::Twenties, TargetSource::Argument, 1);
        assert_eq!(timing.channels[0], "인스타그램");
        let instagram = timing.channels.iter().filter(|c| **c == "인스타그램").count();
        assert_eq!(instagram, 1);
        assert!(timing.channels.contains(&"카카오톡 채널"));
    }

    #[test]
    fn test_default_band_is_heaviest_target() {
        assert_eq!(default_band(BusinessType::Academy), AgeBand::Teens);
        assert_eq!(default_band(BusinessType::Pharmacy), AgeBand::Sixties);
    }

    #[test]
    fn test_month_out_of_range() {
        let request: TimingRequest =
            serde_json::from_value(json!({ "business_type": "카페", "month": 13 })).unwrap();
        assert!(request.validate().unwrap_err().contains("[month]"));
    }
}
