//! Statistics domain: dataset rows, business profiles and scoring.

pub mod business;
pub mod model;
pub mod scoring;

pub use business::{BusinessProfile, BusinessType, ScoreWeights};
pub use model::{
    AgeBand, Gender, IncomeFilter, IncomeRecord, PopulationFilter, PopulationRecord, Region,
};
