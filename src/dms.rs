//! Degrees-minutes-seconds coordinate parsing.
//!
//! NASR publishes positions as `DD-MM-SS.S[NS]` and `DDD-MM-SS.S[EW]`.
//! Two views are derived from each string:
//!
//! - signed decimal degrees, for geometry
//! - a compact token (`354600N`) with fractional seconds truncated, used to
//!   compare boundary shapes without floating point noise

use regex::{Captures, Regex};
use std::sync::LazyLock;
use thiserror::Error;

static DMS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d*)-(\d*)-(\d*\.?\d*)([NSEW])").expect("valid DMS pattern")
});

#[derive(Debug, Error, PartialEq)]
pub enum DmsError {
    #[error("Doesn't match DMS pattern: {0:?}")]
    Pattern(String),
    #[error("Invalid number {field:?} in {input:?}")]
    Number { field: String, input: String },
}

fn captures(dms: &str) -> Result<Captures<'_>, DmsError> {
    DMS_RE
        .captures(dms)
        .ok_or_else(|| DmsError::Pattern(dms.to_string()))
}

fn number(field: &str, input: &str) -> Result<f64, DmsError> {
    field.parse::<f64>().map_err(|_| DmsError::Number {
        field: field.to_string(),
        input: input.to_string(),
    })
}

/// Convert a DMS string to signed decimal degrees (negative for S and W).
pub fn parse_dms(dms: &str) -> Result<f64, DmsError> {
    let caps = captures(dms)?;
    let degrees = number(&caps[1], dms)?;
    let minutes = number(&caps[2], dms)?;
    let seconds = number(&caps[3], dms)?;

    let value = degrees + minutes / 60.0 + seconds / 3600.0;
    match &caps[4] {
        "S" | "W" => Ok(-value),
        _ => Ok(value),
    }
}

/// Compact token for a DMS string: degrees, minutes, whole seconds and
/// hemisphere concatenated. Fractional seconds are dropped, not rounded.
pub fn dms_token(dms: &str) -> Result<String, DmsError> {
    let caps = captures(dms)?;
    let seconds = &caps[3];
    let whole = seconds.split('.').next().unwrap_or(seconds);

    Ok(format!("{}{}{}{}", &caps[1], &caps[2], whole, &caps[4]))
}

/// Fingerprint token for a point: latitude token followed by longitude token.
pub fn point_token(latitude: &str, longitude: &str) -> Result<String, DmsError> {
    Ok(dms_token(latitude)? + &dms_token(longitude)?)
}
