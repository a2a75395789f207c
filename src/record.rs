//! Fixed-width record extraction for the NASR ARTCC boundary file.
//!
//! # Record layout
//!
//! ```text
//! col  len  field
//! 1    12   ARTCC identifier + *altitude structure* + 5 char point designator
//! 13   40   center name
//! 53   10   altitude structure decode name
//! 63   14   latitude of the boundary point
//! 77   14   longitude of the boundary point
//! 91   300  description of the boundary line connecting points
//! 391  6    sequence number
//! 397  1    'X' when used only in the NAS description
//! ```
//!
//! Example:
//!
//! ```text
//! ZAB *H*53855ALBUQUERQUE                             HIGH      35-46-00.0N   111-50-30.0W  /COMMON ZAB-ZDV-ZLA/TO
//! ```

use crate::dms::DmsError;
use crate::types::{FieldRecord, Stratum};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid facility/designator prefix at line {index}: {line:?}")]
    FacilityDesignator { index: usize, line: String },
    #[error("Missing *stratum* marker at line {index}: {line:?}")]
    MissingStratum { index: usize, line: String },
    #[error("Unable to parse coordinates at line {index}: {line:?}: {source}")]
    Coordinate {
        index: usize,
        line: String,
        #[source]
        source: DmsError,
    },
}

impl ParseError {
    /// Zero-based index of the offending line.
    pub fn index(&self) -> usize {
        match self {
            Self::FacilityDesignator { index, .. }
            | Self::MissingStratum { index, .. }
            | Self::Coordinate { index, .. } => *index,
        }
    }

    /// Raw text of the offending line.
    pub fn line(&self) -> &str {
        match self {
            Self::FacilityDesignator { line, .. }
            | Self::MissingStratum { line, .. }
            | Self::Coordinate { line, .. } => line,
        }
    }
}

/// Zero-based column offsets and widths
const IDENT_COL: (usize, usize) = (0, 12);
const LATITUDE_COL: (usize, usize) = (62, 14);
const LONGITUDE_COL: (usize, usize) = (76, 14);
const DESCRIPTION_COL: (usize, usize) = (90, 300);

/// Width of the trailing point designator
const DESIGNATOR_LEN: usize = 5;

/// Slice a column, yielding whatever is present when the line is short.
fn column(line: &str, (start, len): (usize, usize)) -> String {
    line.chars().skip(start).take(len).collect()
}

impl FieldRecord {
    /// Extract the fields of interest from one line.
    pub fn parse(index: usize, line: &str) -> Result<Self, ParseError> {
        let ident = column(line, IDENT_COL);

        let (facility, designator_field) = match ident.split(' ').collect::<Vec<_>>()[..] {
            [facility, designator] => (facility.to_string(), designator.to_string()),
            _ => {
                return Err(ParseError::FacilityDesignator {
                    index,
                    line: line.to_string(),
                })
            }
        };

        // *H*53855 splits into ["", "H", "53855"]
        let stratum = match designator_field.split('*').collect::<Vec<_>>()[..] {
            [_, code, _, ..] if !code.is_empty() => Stratum::from_code(code),
            _ => {
                return Err(ParseError::MissingStratum {
                    index,
                    line: line.to_string(),
                })
            }
        };

        let chars: Vec<char> = designator_field.chars().collect();
        let designator: String = chars[chars.len().saturating_sub(DESIGNATOR_LEN)..]
            .iter()
            .collect();

        Ok(Self {
            index,
            line: line.to_string(),
            facility,
            stratum,
            designator,
            latitude: column(line, LATITUDE_COL).trim().to_string(),
            longitude: column(line, LONGITUDE_COL).trim().to_string(),
            description: column(line, DESCRIPTION_COL).trim().to_string(),
        })
    }
}

/// Extract every line of an input file, stopping at the first malformed one.
pub fn parse_records(content: &str) -> Result<Vec<FieldRecord>, ParseError> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| {
            FieldRecord::parse(index, line).inspect_err(|_| {
                tracing::error!("Error reading data from line: {}", line);
            })
        })
        .collect()
}

/// Test and fixture helper: lay out a line with fields at their columns.
#[cfg(test)]
pub(crate) fn fixed_width_line(
    ident: &str,
    latitude: &str,
    longitude: &str,
    description: &str,
) -> String {
    format!(
        "{:<12}{:<40}{:<10}{:<14}{:<14}{:<300}{:06}",
        ident, "ALBUQUERQUE", "HIGH", latitude, longitude, description, 100
    )
}
