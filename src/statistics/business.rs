//! Business categories and the hand-tuned profile each one is scored with.

use super::model::{AgeBand, Gender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusinessType {
    Cafe,
    Restaurant,
    Bakery,
    BeautySalon,
    Academy,
    Fitness,
    ConvenienceStore,
    Clothing,
    Pharmacy,
    Other,
}

impl BusinessType {
    pub const ALL: [BusinessType; 10] = [
        BusinessType::Cafe,
        BusinessType::Restaurant,
        BusinessType::Bakery,
        BusinessType::BeautySalon,
        BusinessType::Academy,
        BusinessType::Fitness,
        BusinessType::ConvenienceStore,
        BusinessType::Clothing,
        BusinessType::Pharmacy,
        BusinessType::Other,
    ];

    /// Unknown names fall back to `Other`.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim().to_lowercase().replace([' ', '_', '-'], "");
        match s.as_str() {
            "카페" | "커피" | "커피전문점" | "cafe" | "coffee" | "coffeeshop" => BusinessType::Cafe,
            "음식점" | "식당" | "한식" | "restaurant" | "food" => BusinessType::Restaurant,
            "베이커리" | "빵집" | "제과점" | "bakery" => BusinessType::Bakery,
            "미용실" | "헤어샵" | "뷰티" | "네일" | "beautysalon" | "salon" | "beauty" => {
                BusinessType::BeautySalon
            }
            "학원" | "교습소" | "academy" | "education" => BusinessType::Academy,
            "헬스장" | "피트니스" | "필라테스" | "gym" | "fitness" => BusinessType::Fitness,
            "편의점" | "convenience" | "conveniencestore" => BusinessType::ConvenienceStore,
            "의류" | "옷가게" | "패션" | "clothing" | "fashion" | "apparel" => BusinessType::Clothing,
            "약국" | "pharmacy" | "drugstore" => BusinessType::Pharmacy,
            _ => BusinessType::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BusinessType::Cafe => "카페",
            BusinessType::Restaurant => "음식점",
            BusinessType::Bakery => "베이커리",
            BusinessType::BeautySalon => "미용실",
            BusinessType::Academy => "학원",
            BusinessType::Fitness => "헬스장",
            BusinessType::ConvenienceStore => "편의점",
            BusinessType::Clothing => "의류",
            BusinessType::Pharmacy => "약국",
            BusinessType::Other => "기타",
        }
    }

    pub fn profile(&self) -> &'static BusinessProfile {
        match self {
            BusinessType::Cafe => &CAFE,
            BusinessType::Restaurant => &RESTAURANT,
            BusinessType::Bakery => &BAKERY,
            BusinessType::BeautySalon => &BEAUTY_SALON,
            BusinessType::Academy => &ACADEMY,
            BusinessType::Fitness => &FITNESS,
            BusinessType::ConvenienceStore => &CONVENIENCE_STORE,
            BusinessType::Clothing => &CLOTHING,
            BusinessType::Pharmacy => &PHARMACY,
            BusinessType::Other => &OTHER,
        }
    }
}

/// Relative weight of each location-score component. Components sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub target: f64,
    pub population: f64,
    pub income: f64,
}

#[derive(Debug)]
pub struct TimingProfile {
    pub peak_hours: &'static [&'static str],
    pub peak_days: &'static [&'static str],
    pub peak_months: &'static [u32],
    pub channels: &'static [&'static str],
    /// Days before a peak month a campaign should start.
    pub lead_days: u32,
}

#[derive(Debug)]
pub struct BusinessProfile {
    pub target_bands: &'static [(AgeBand, f64)],
    pub gender_focus: Option<Gender>,
    pub weights: ScoreWeights,
    pub timing: TimingProfile,
}

impl BusinessProfile {
    pub fn band_weight(&self, band: AgeBand) -> f64 {
        self.target_bands
            .iter()
            .find(|(b, _)| *b == band)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }
}

/// Channels that reach a given age band best.
pub fn channels_for_band(band: AgeBand) -> &'static [&'static str] {
    match band {
        AgeBand::Under10 => &["맘카페", "네이버 블로그", "인스타그램"],
        AgeBand::Teens => &["인스타그램", "유튜브 쇼츠", "틱톡"],
        AgeBand::Twenties => &["인스타그램", "틱톡", "네이버 플레이스"],
        AgeBand::Thirties => &["인스타그램", "네이버 블로그", "카카오톡 채널"],
        AgeBand::Forties => &["네이버 블로그", "카카오톡 채널", "네이버 플레이스"],
        AgeBand::Fifties => &["카카오톡 채널", "네이버 밴드", "전단지"],
        AgeBand::Sixties | AgeBand::Over70 => &["전단지", "네이버 밴드", "지역 신문"],
    }
}

static CAFE: BusinessProfile = BusinessProfile {
    target_bands: &[
        (AgeBand::Twenties, 1.0),
        (AgeBand::Thirties, 0.8),
        (AgeBand::Teens, 0.4),
        (AgeBand::Forties, 0.4),
    ],
    gender_focus: None,
    weights: ScoreWeights {
        target: 0.5,
        population: 0.3,
        income: 0.2,
    },
    timing: TimingProfile {
        peak_hours: &["08:00-10:00", "12:00-14:00", "15:00-17:00"],
        peak_days: &["금요일", "토요일", "일요일"],
        peak_months: &[4, 5, 9, 10],
        channels: &["인스타그램", "네이버 플레이스", "카카오톡 채널"],
        lead_days: 14,
    },
};

static RESTAURANT: BusinessProfile = BusinessProfile {
    target_bands: &[
        (AgeBand::Thirties, 1.0),
        (AgeBand::Forties, 1.0),
        (AgeBand::Twenties, 0.7),
        (AgeBand::Fifties, 0.7),
    ],
    gender_focus: None,
    weights: ScoreWeights {
        target: 0.4,
        population: 0.4,
        income: 0.2,
    },
    timing: TimingProfile {
        peak_hours: &["11:30-13:30", "18:00-20:30"],
        peak_days: &["금요일", "토요일"],
        peak_months: &[5, 12],
        channels: &["네이버 플레이스", "배달앱", "인스타그램"],
        lead_days: 10,
    },
};

static BAKERY: BusinessProfile = BusinessProfile {
    target_bands: &[
        (AgeBand::Thirties, 1.0),
        (AgeBand::Forties, 0.8),
        (AgeBand::Twenties, 0.7),
    ],
    gender_focus: Some(Gender::Female),
    weights: ScoreWeights {
        target: 0.5,
        population: 0.3,
        income: 0.2,
    },
    timing: TimingProfile {
        peak_hours: &["07:30-09:30", "16:00-19:00"],
        peak_days: &["토요일", "일요일"],
        peak_months: &[2, 5, 12],
        channels: &["인스타그램", "네이버 플레이스", "당근마켓"],
        lead_days: 14,
    },
};

static BEAUTY_SALON: BusinessProfile = BusinessProfile {
    target_bands: &[
        (AgeBand::Twenties, 1.0),
        (AgeBand::Thirties, 1.0),
        (AgeBand::Forties, 0.6),
    ],
    gender_focus: Some(Gender::Female),
    weights: ScoreWeights {
        target: 0.45,
        population: 0.2,
        income: 0.35,
    },
    timing: TimingProfile {
        peak_hours: &["10:00-12:00", "18:00-20:00"],
        peak_days: &["금요일", "토요일"],
        peak_months: &[3, 9, 12],
        channels: &["인스타그램", "네이버 예약", "카카오톡 채널"],
        lead_days: 21,
    },
};

static ACADEMY: BusinessProfile = BusinessProfile {
    target_bands: &[
        (AgeBand::Teens, 1.0),
        (AgeBand::Under10, 0.8),
        (AgeBand::Forties, 0.6),
    ],
    gender_focus: None,
    weights: ScoreWeights {
        target: 0.5,
        population: 0.2,
        income: 0.3,
    },
    timing: TimingProfile {
        peak_hours: &["14:00-17:00", "19:00-21:00"],
        peak_days: &["월요일", "화요일"],
        peak_months: &[1, 2, 7, 12],
        channels: &["네이버 블로그", "맘카페", "전단지"],
        lead_days: 30,
    },
};

static FITNESS: BusinessProfile = BusinessProfile {
    target_bands: &[
        (AgeBand::Twenties, 1.0),
        (AgeBand::Thirties, 1.0),
        (AgeBand::Forties, 0.6),
    ],
    gender_focus: None,
    weights: ScoreWeights {
        target: 0.5,
        population: 0.3,
        income: 0.2,
    },
    timing: TimingProfile {
        peak_hours: &["06:00-08:00", "18:00-22:00"],
        peak_days: &["월요일"],
        peak_months: &[1, 3, 5],
        channels: &["인스타그램", "네이버 플레이스", "당근마켓"],
        lead_days: 21,
    },
};

static CONVENIENCE_STORE: BusinessProfile = BusinessProfile {
    target_bands: &[
        (AgeBand::Twenties, 1.0),
        (AgeBand::Thirties, 0.8),
        (AgeBand::Teens, 0.6),
        (AgeBand::Forties, 0.5),
    ],
    gender_focus: None,
    weights: ScoreWeights {
        target: 0.3,
        population: 0.6,
        income: 0.1,
    },
    timing: TimingProfile {
        peak_hours: &["07:00-09:00", "21:00-24:00"],
        peak_days: &["금요일", "토요일"],
        peak_months: &[6, 7, 8],
        channels: &["카카오톡 채널", "전단지"],
        lead_days: 7,
    },
};

static CLOTHING: BusinessProfile = BusinessProfile {
    target_bands: &[
        (AgeBand::Twenties, 1.0),
        (AgeBand::Thirties, 0.9),
        (AgeBand::Teens, 0.5),
    ],
    gender_focus: Some(Gender::Female),
    weights: ScoreWeights {
        target: 0.4,
        population: 0.2,
        income: 0.4,
    },
    timing: TimingProfile {
        peak_hours: &["12:00-14:00", "19:00-22:00"],
        peak_days: &["금요일", "토요일", "일요일"],
        peak_months: &[3, 4, 9, 10, 11],
        channels: &["인스타그램", "네이버 쇼핑", "카카오톡 채널"],
        lead_days: 21,
    },
};

static PHARMACY: BusinessProfile = BusinessProfile {
    target_bands: &[
        (AgeBand::Sixties, 1.0),
        (AgeBand::Over70, 1.0),
        (AgeBand::Fifties, 0.8),
        (AgeBand::Thirties, 0.5),
    ],
    gender_focus: None,
    weights: ScoreWeights {
        target: 0.5,
        population: 0.4,
        income: 0.1,
    },
    timing: TimingProfile {
        peak_hours: &["09:00-11:00", "17:00-19:00"],
        peak_days: &["월요일", "토요일"],
        peak_months: &[1, 3, 10, 11],
        channels: &["전단지", "네이버 플레이스", "지역 신문"],
        lead_days: 14,
    },
};

static OTHER: BusinessProfile = BusinessProfile {
    target_bands: &[
        (AgeBand::Thirties, 1.0),
        (AgeBand::Forties, 1.0),
        (AgeBand::Twenties, 0.7),
        (AgeBand::Fifties, 0.7),
    ],
    gender_focus: None,
    weights: ScoreWeights {
        target: 0.4,
        population: 0.4,
        income: 0.2,
    },
    timing: TimingProfile {
        peak_hours: &["11:00-13:00", "18:00-20:00"],
        peak_days: &["금요일", "토요일"],
        peak_months: &[5, 12],
        channels: &["네이버 플레이스", "인스타그램", "카카오톡 채널"],
        lead_days: 14,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_korean_and_english_names() {
        assert_eq!(BusinessType::parse("카페"), BusinessType::Cafe);
        assert_eq!(BusinessType::parse("Coffee Shop"), BusinessType::Cafe);
        assert_eq!(BusinessType::parse("beauty_salon"), BusinessType::BeautySalon);
        assert_eq!(BusinessType::parse("편의점"), BusinessType::ConvenienceStore);
        assert_eq!(BusinessType::parse("꽃집"), BusinessType::Other);
    }

    #[test]
    fn test_labels_parse_back() {
        for kind in BusinessType::ALL {
            assert_eq!(BusinessType::parse(kind.label()), kind);
        }
    }

    #[test]
    fn test_every_profile_weights_sum_to_one() {
        for kind in BusinessType::ALL {
            let w = kind.profile().weights;
            let sum = w.target + w.population + w.income;
            assert!((sum - 1.0).abs() < 1e-9, "{} weights sum to {}", kind.label(), sum);
        }
    }

    #[test]
    fn test_every_profile_has_targets_and_valid_months() {
        for kind in BusinessType::ALL {
            let profile = kind.profile();
            assert!(!profile.target_bands.is_empty());
            assert!(profile.timing.peak_months.iter().all(|m| (1..=12).contains(m)));
        }
    }

    #[test]
    fn test_band_weight_lookup() {
        let profile = BusinessType::Cafe.profile();
        assert_eq!(profile.band_weight(AgeBand::Twenties), 1.0);
        assert_eq!(profile.band_weight(AgeBand::Over70), 0.0);
    }
}
