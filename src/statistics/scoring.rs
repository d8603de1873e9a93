//! Weighted-sum heuristics behind the analysis tools. No I/O here.

use std::collections::BTreeMap;

use serde::Serialize;

use super::business::{BusinessProfile, ScoreWeights};
use super::model::{AgeBand, Gender, IncomeRecord, PopulationRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BandCounts {
    pub male: i64,
    pub female: i64,
    pub total: i64,
}

impl BandCounts {
    fn add(&mut self, record: &PopulationRecord) {
        self.male += record.male_population;
        self.female += record.female_population;
        self.total += record.total_population;
    }

    pub fn get(&self, gender: Gender) -> i64 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
            Gender::Total => self.total,
        }
    }
}

/// Population of one area split by age band.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationProfile {
    pub bands: BTreeMap<AgeBand, BandCounts>,
    /// Includes rows whose age group label is not a known band.
    pub total: BandCounts,
}

impl PopulationProfile {
    pub fn band(&self, band: AgeBand) -> BandCounts {
        self.bands.get(&band).copied().unwrap_or_default()
    }

    pub fn share(&self, band: AgeBand) -> f64 {
        ratio(self.band(band).total as f64, self.total.total as f64)
    }
}

pub fn aggregate_bands(rows: &[PopulationRecord]) -> PopulationProfile {
    let mut profile = PopulationProfile::default();
    for row in rows {
        profile.total.add(row);
        if let Some(band) = AgeBand::parse(&row.age_group) {
            profile.bands.entry(band).or_default().add(row);
        }
    }
    profile
}

/// Weighted head count of the people a business is aimed at.
pub fn target_population(business: &BusinessProfile, population: &PopulationProfile) -> f64 {
    let gender = business.gender_focus.unwrap_or(Gender::Total);
    business
        .target_bands
        .iter()
        .map(|(band, weight)| population.band(*band).get(gender) as f64 * weight)
        .sum()
}

pub fn target_ratio(business: &BusinessProfile, population: &PopulationProfile) -> f64 {
    ratio(
        target_population(business, population),
        population.total.total as f64,
    )
}

/// The target band contributing the most weighted people.
pub fn primary_segment(
    business: &BusinessProfile,
    population: &PopulationProfile,
) -> Option<AgeBand> {
    let gender = business.gender_focus.unwrap_or(Gender::Total);
    business
        .target_bands
        .iter()
        .map(|(band, weight)| (*band, population.band(*band).get(gender) as f64 * weight))
        .filter(|(_, weighted)| *weighted > 0.0)
        .fold(None, |best: Option<(AgeBand, f64)>, (band, weighted)| match best {
            Some((_, top)) if top >= weighted => best,
            _ => Some((band, weighted)),
        })
        .map(|(band, _)| band)
}

/// Household-weighted mean income in 만원.
pub fn average_income(rows: &[IncomeRecord]) -> Option<f64> {
    let households: i64 = rows.iter().map(|r| r.household_count).sum();
    if households <= 0 {
        return None;
    }
    let weighted: f64 = rows
        .iter()
        .map(|r| r.household_count as f64 * r.average_income as f64)
        .sum();
    Some(weighted / households as f64)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationCandidate {
    pub province: String,
    pub district: String,
    pub total_population: i64,
    pub target_ratio: f64,
    pub average_income: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLocation {
    pub province: String,
    pub district: String,
    pub score: f64,
    pub total_population: i64,
    pub target_ratio: f64,
    pub average_income: Option<f64>,
    pub target_component: f64,
    pub population_component: f64,
    pub income_component: f64,
}

/// Scores candidates relative to the best candidate on each axis and sorts
/// them best first (ties broken by district name).
pub fn score_locations(
    weights: ScoreWeights,
    candidates: Vec<LocationCandidate>,
) -> Vec<ScoredLocation> {
    let max_ratio = candidates.iter().map(|c| c.target_ratio).fold(0.0, f64::max);
    let max_population = candidates
        .iter()
        .map(|c| c.total_population)
        .max()
        .unwrap_or(0) as f64;
    let max_income = candidates
        .iter()
        .filter_map(|c| c.average_income)
        .fold(0.0, f64::max);

    let mut scored: Vec<ScoredLocation> = candidates
        .into_iter()
        .map(|c| {
            let target_component = weights.target * ratio(c.target_ratio, max_ratio);
            let population_component =
                weights.population * ratio(c.total_population as f64, max_population);
            let income_component =
                weights.income * ratio(c.average_income.unwrap_or(0.0), max_income);
            let score =
                round1(100.0 * (target_component + population_component + income_component));

            ScoredLocation {
                province: c.province,
                district: c.district,
                score,
                total_population: c.total_population,
                target_ratio: round4(c.target_ratio),
                average_income: c.average_income.map(round1),
                target_component: round4(target_component),
                population_component: round4(population_component),
                income_component: round4(income_component),
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.district.cmp(&b.district))
            .then_with(|| a.province.cmp(&b.province))
    });
    scored
}

pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
