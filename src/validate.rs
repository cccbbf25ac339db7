use chrono::NaiveDate;

use crate::error::{AppError, Result};

pub const GRADE_MIN: f64 = 0.0;
pub const GRADE_MAX: f64 = 20.0;
pub const DEFAULT_CREDITS: i64 = 3;

pub fn parse_id(field: &'static str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid(field, raw))
}

pub fn parse_grade(raw: &str) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| AppError::invalid("grade", raw))?;
    if !(GRADE_MIN..=GRADE_MAX).contains(&value) {
        return Err(AppError::invalid("grade", raw));
    }
    Ok(value)
}

/// Empty input falls back to the column default.
pub fn parse_credits(raw: &str) -> Result<i64> {
    let t = raw.trim();
    if t.is_empty() {
        return Ok(DEFAULT_CREDITS);
    }
    match t.parse::<i64>() {
        Ok(v) if v >= 0 => Ok(v),
        _ => Err(AppError::invalid("credits", raw)),
    }
}

/// Birth dates are optional; when given they must be `YYYY-MM-DD`.
pub fn parse_birthdate(raw: &str) -> Result<Option<String>> {
    let t = raw.trim();
    if t.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .map(|d| Some(d.format("%Y-%m-%d").to_string()))
        .map_err(|_| AppError::invalid("birth date", raw))
}

pub fn required_text(field: &'static str, raw: &str) -> Result<String> {
    let t = raw.trim();
    if t.is_empty() {
        return Err(AppError::invalid(field, raw));
    }
    Ok(t.to_string())
}

pub fn optional_text(raw: &str) -> Option<String> {
    let t = raw.trim();
    (!t.is_empty()).then(|| t.to_string())
}
