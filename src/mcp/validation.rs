//! Input validation for tool arguments.
//!
//! Errors are collected and reported together so an agent can fix every
//! argument in one retry.

use std::fmt;

use crate::statistics::{AgeBand, Gender};

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{}은(는) 비워 둘 수 없습니다", label))
            .with_suggestion(format!("{} 값을 입력해 주세요", label))
    }

    pub fn out_of_range(field: &str, label: &str, min: i64, max: i64) -> Self {
        Self::new(
            field,
            format!("{}은(는) {}에서 {} 사이여야 합니다", label, min, max),
        )
    }

    pub fn invalid_age_group(field: &str, value: &str) -> Self {
        Self::new(field, format!("연령대 '{}'을(를) 인식할 수 없습니다", value))
            .with_suggestion("예: 20대, 30-39, 10세미만, 70세이상")
    }

    pub fn invalid_gender(field: &str, value: &str) -> Self {
        Self::new(field, format!("성별 '{}'을(를) 인식할 수 없습니다", value))
            .with_suggestion("male, female, total 중 하나를 사용하세요")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn to_mcp_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "입력값 검증 실패: {}개의 오류가 있습니다\n",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.push(String::new());
        parts.push("입력값을 수정한 뒤 다시 시도해 주세요.".to_string());

        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_mcp_message())
        }
    }
}

pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

pub fn validate_range(
    value: i64,
    field: &str,
    label: &str,
    min: i64,
    max: i64,
    errors: &mut ValidationErrors,
) {
    if value < min || value > max {
        errors.add(ValidationError::out_of_range(field, label, min, max));
    }
}

/// Statistics years the dataset can plausibly hold.
pub fn validate_year(value: Option<i32>, field: &str, errors: &mut ValidationErrors) {
    if let Some(year) = value {
        validate_range(year as i64, field, "연도", 1990, 2100, errors);
    }
}

/// Returns the canonical band when the optional value parses.
pub fn validate_age_group(
    value: Option<&str>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<AgeBand> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
    match AgeBand::parse(raw) {
        Some(band) => Some(band),
        None => {
            errors.add(ValidationError::invalid_age_group(field, raw));
            None
        }
    }
}

pub fn validate_gender(value: Option<&str>, field: &str, errors: &mut ValidationErrors) -> Gender {
    let raw = match value {
        Some(raw) => raw,
        None => return Gender::Total,
    };
    match Gender::parse(raw) {
        Some(gender) => gender,
        None => {
            errors.add(ValidationError::invalid_gender(field, raw));
            Gender::Total
        }
    }
}

/// Trims and drops empty strings.
pub fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
