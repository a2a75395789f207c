//! Core data types for ARTCC boundary assembly.

use std::fmt;

/// Altitude structure code carried between the `*` markers of a designator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stratum {
    /// `H`: high altitude (FL180 and above)
    High,
    /// `L`: low altitude (below FL180)
    Low,
    /// `F`: FIR only, used by oceanic and international boundaries
    FirOnly,
    /// Any other structure code found in the file
    Other(String),
}

impl Stratum {
    pub fn from_code(code: &str) -> Self {
        match code {
            "H" => Self::High,
            "L" => Self::Low,
            "F" => Self::FirOnly,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::High => "H",
            Self::Low => "L",
            Self::FirOnly => "F",
            Self::Other(code) => code,
        }
    }

    /// Altitude band in feet as `(low, high)`.
    pub fn altitude_bounds(&self) -> (u32, u32) {
        match self {
            Self::High => (18_000, 60_000),
            _ => (0, 18_000),
        }
    }
}

impl fmt::Display for Stratum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Fields of interest extracted from one fixed-width line.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRecord {
    /// Zero-based line index in the source file
    pub index: usize,
    /// Raw line as read
    pub line: String,
    pub facility: String,
    pub stratum: Stratum,
    /// Five character boundary point designator
    pub designator: String,
    /// Latitude in DMS notation, e.g. `35-46-00.0N`
    pub latitude: String,
    /// Longitude in DMS notation, e.g. `111-50-30.0W`
    pub longitude: String,
    /// Description of the line connecting this point to the next one
    pub description: String,
}

impl fmt::Display for FieldRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  line {}: {}", self.index, self.line.trim_end())?;
        writeln!(
            f,
            "  facility={} stratum={} point={} lat={} lon={}",
            self.facility, self.stratum, self.designator, self.latitude, self.longitude
        )?;
        write!(f, "  description={:?}", self.description)
    }
}

/// Polygon boundary for one (facility, stratum) pair.
///
/// A boundary is open while points are being appended and sealed once the
/// record carrying the ring-closure marker has been ingested. Sealed
/// boundaries always carry an `end` designator.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub facility: String,
    pub stratum: Stratum,
    /// `(longitude, latitude)` in decimal degrees, in input order
    pub points: Vec<(f64, f64)>,
    /// Point designators, parallel to `points`
    pub designators: Vec<String>,
    /// Truncated DMS tokens, parallel to `points`
    pub tokens: Vec<String>,
    pub start: String,
    pub end: Option<String>,
}

impl Boundary {
    pub fn open(record: &FieldRecord) -> Self {
        Self {
            facility: record.facility.clone(),
            stratum: record.stratum.clone(),
            points: Vec::new(),
            designators: Vec::new(),
            tokens: Vec::new(),
            start: record.designator.clone(),
            end: None,
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.end.is_some()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Positional fingerprint: one token per point, space separated.
    pub fn fingerprint(&self) -> String {
        self.tokens.join(" ")
    }

    /// `FACILITY_STRATUM_START_END`
    pub fn composite_id(&self) -> String {
        [
            self.facility.as_str(),
            self.stratum.code(),
            self.start.as_str(),
            self.end.as_deref().unwrap_or_default(),
        ]
        .join("_")
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} {} points={} start={} end={}",
            self.facility,
            self.stratum,
            self.points.len(),
            self.start,
            self.end.as_deref().unwrap_or("<open>")
        )?;
        write!(f, "  fingerprint={}", self.fingerprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(designator: &str) -> FieldRecord {
        FieldRecord {
            index: 0,
            line: String::new(),
            facility: "ZAB".into(),
            stratum: Stratum::High,
            designator: designator.into(),
            latitude: "35-46-00.0N".into(),
            longitude: "111-50-30.0W".into(),
            description: String::new(),
        }
    }

    #[test]
    fn test_stratum_codes() {
        assert_eq!(Stratum::from_code("H"), Stratum::High);
        assert_eq!(Stratum::from_code("L"), Stratum::Low);
        assert_eq!(Stratum::from_code("F"), Stratum::FirOnly);
        assert_eq!(Stratum::from_code("U"), Stratum::Other("U".into()));
        assert_eq!(Stratum::Other("U".into()).to_string(), "U");
    }

    #[test]
    fn test_altitude_bounds() {
        assert_eq!(Stratum::High.altitude_bounds(), (18_000, 60_000));
        assert_eq!(Stratum::Low.altitude_bounds(), (0, 18_000));
        assert_eq!(Stratum::FirOnly.altitude_bounds(), (0, 18_000));
    }

    #[test]
    fn test_composite_id() {
        let mut boundary = Boundary::open(&record("53855"));
        assert!(!boundary.is_sealed());
        boundary.end = Some("01373".into());
        assert_eq!(boundary.composite_id(), "ZAB_H_53855_01373");
    }

    #[test]
    fn test_fingerprint_joins_tokens() {
        let mut boundary = Boundary::open(&record("00100"));
        assert_eq!(boundary.fingerprint(), "");
        boundary.tokens.push("354600N1115030W".into());
        boundary.tokens.push("352400N1120000W".into());
        assert_eq!(boundary.fingerprint(), "354600N1115030W 352400N1120000W");
    }
}
