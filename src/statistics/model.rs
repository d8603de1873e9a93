use serde::{Deserialize, Serialize};

/// One row of `population_statistics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PopulationRecord {
    pub stats_year: i32,
    pub province: String,
    pub district: String,
    pub age_group: String,
    pub male_population: i64,
    pub female_population: i64,
    pub total_population: i64,
}

/// One row of `income_distribution`. `average_income` is in 만원.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IncomeRecord {
    pub stats_year: i32,
    pub province: String,
    pub district: String,
    pub income_bracket: String,
    pub household_count: i64,
    pub average_income: i64,
}

/// Region argument as given by a caller.
///
/// `"강남구"` or `"서울특별시"` match either column; `"서울특별시 중구"` pins
/// both the province and the district.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub primary: String,
    pub district: Option<String>,
}

impl Region {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace();
        let primary = parts.next()?.to_string();
        let rest: Vec<&str> = parts.collect();
        let district = if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        };
        Some(Self { primary, district })
    }

    pub fn matches(&self, province: &str, district: &str) -> bool {
        match &self.district {
            Some(d) => self.primary == province && d == district,
            None => self.primary == province || self.primary == district,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PopulationFilter {
    pub region: Option<Region>,
    pub age_group: Option<String>,
    /// `None` selects the latest year present.
    pub year: Option<i32>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IncomeFilter {
    pub region: Option<Region>,
    pub income_bracket: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<i64>,
}

/// Ten-year age bands as labelled in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeBand {
    Under10,
    Teens,
    Twenties,
    Thirties,
    Forties,
    Fifties,
    Sixties,
    Over70,
}

impl AgeBand {
    pub const ALL: [AgeBand; 8] = [
        AgeBand::Under10,
        AgeBand::Teens,
        AgeBand::Twenties,
        AgeBand::Thirties,
        AgeBand::Forties,
        AgeBand::Fifties,
        AgeBand::Sixties,
        AgeBand::Over70,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Under10 => "10세미만",
            AgeBand::Teens => "10대",
            AgeBand::Twenties => "20대",
            AgeBand::Thirties => "30대",
            AgeBand::Forties => "40대",
            AgeBand::Fifties => "50대",
            AgeBand::Sixties => "60대",
            AgeBand::Over70 => "70세이상",
        }
    }

    /// Accepts `20대`, `20s`, `20-29`, `20`, plus the two open-ended labels.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim().to_lowercase();
        match s.as_str() {
            "10세미만" | "under10" | "0-9" => return Some(AgeBand::Under10),
            "70세이상" | "70+" | "over70" => return Some(AgeBand::Over70),
            _ => {}
        }

        let head = s.split('-').next().unwrap_or_default();
        let digits = head
            .trim_end_matches("대")
            .trim_end_matches("세")
            .trim_end_matches('s')
            .trim();
        let age: u32 = digits.parse().ok()?;
        Some(Self::from_age(age))
    }

    pub fn from_age(age: u32) -> Self {
        match age {
            0..=9 => AgeBand::Under10,
            10..=19 => AgeBand::Teens,
            20..=29 => AgeBand::Twenties,
            30..=39 => AgeBand::Thirties,
            40..=49 => AgeBand::Forties,
            50..=59 => AgeBand::Fifties,
            60..=69 => AgeBand::Sixties,
            _ => AgeBand::Over70,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Total,
}

impl Gender {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "male" | "m" | "남" | "남성" | "남자" => Some(Gender::Male),
            "female" | "f" | "여" | "여성" | "여자" => Some(Gender::Female),
            "total" | "all" | "전체" | "" => Some(Gender::Total),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Total => "total",
        }
    }

    pub fn pick(&self, record: &PopulationRecord) -> i64 {
        match self {
            Gender::Male => record.male_population,
            Gender::Female => record.female_population,
            Gender::Total => record.total_population,
        }
    }
}
