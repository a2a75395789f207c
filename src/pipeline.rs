//! Batch conversion driver.
//!
//! Runs the stages strictly forward over an in-memory input:
//! text -> records -> boundaries -> facility groups -> rows.

use crate::aggregate::{aggregate, AggregateError, Aggregation};
use crate::classify::{classify, group_by_facility, Classification, Grouping};
use crate::export::{export_rows, write_file, ExportConfig, ExportRow};
use crate::record::{parse_records, ParseError};
use crate::types::Boundary;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Input path does not exist: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Aggregate(#[from] AggregateError),
}

/// Configuration for a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    pub export: ExportConfig,
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub records: usize,
    pub boundaries: usize,
    /// Records in a trailing ring discarded for lack of a sentinel
    pub discarded_records: usize,
    /// Boundaries that replaced an earlier one for the same facility and stratum
    pub overwritten: usize,
    pub facilities: usize,
    pub matching: usize,
    pub divergent: usize,
    pub single_stratum: usize,
    pub rows: usize,
}

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub aggregation: Aggregation,
    pub grouping: Grouping,
    pub classification: Classification,
    pub rows: Vec<ExportRow>,
    pub stats: ConversionStats,
}

/// Convert the full text of a boundary file.
pub fn convert(content: &str, config: &ConvertConfig) -> Result<Conversion, ConvertError> {
    let records = parse_records(content)?;
    tracing::info!("Read {} records", records.len());
    for record in records.iter().take(3) {
        tracing::debug!("Record:\n{}", record);
    }

    let aggregation = aggregate(&records)?;
    if let Some(first) = aggregation.boundaries.first() {
        tracing::debug!("Example processed boundary:\n{}", first);
    }

    let grouping = group_by_facility(&aggregation.boundaries);
    let classification = classify(&grouping.facilities);
    log_classification(&grouping, &classification);

    let rows = export_rows(&aggregation.boundaries, &classification, &config.export);

    let stats = ConversionStats {
        records: records.len(),
        boundaries: aggregation.boundaries.len(),
        discarded_records: aggregation.unterminated.as_ref().map_or(0, Boundary::point_count),
        overwritten: grouping.overwritten,
        facilities: grouping.facilities.len(),
        matching: classification.matching.len(),
        divergent: classification.divergent.len(),
        single_stratum: classification.single_stratum.len(),
        rows: rows.len(),
    };

    Ok(Conversion {
        aggregation,
        grouping,
        classification,
        rows,
        stats,
    })
}

fn log_classification(grouping: &Grouping, classification: &Classification) {
    tracing::info!("Matching altitudes: {:?}", classification.matching);
    tracing::info!("Unmatched altitudes: {:?}", classification.divergent);
    tracing::info!("Only one altitude: {:?}", classification.single_stratum);
    tracing::info!("Total of {} centers", classification.total());

    for facility in &classification.single_stratum {
        let Some(group) = grouping.facilities.get(facility) else {
            continue;
        };
        for boundary in group.boundaries() {
            tracing::debug!(
                "Single stratum {} {}: {}",
                facility,
                boundary.stratum,
                boundary.fingerprint()
            );
        }
    }
}

/// Convert `input` and write the export to `output`.
///
/// Nothing is written when the input is missing or malformed.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConvertConfig,
) -> Result<ConversionStats, ConvertError> {
    let input = input.as_ref();
    if !input.exists() {
        return Err(ConvertError::MissingInput(input.to_path_buf()));
    }

    tracing::info!("Reading from file {}", input.display());
    let content = std::fs::read_to_string(input)?;
    let conversion = convert(&content, config)?;

    write_file(output.as_ref(), &conversion.rows)?;
    tracing::info!(
        "Wrote {} rows to {}",
        conversion.stats.rows,
        output.as_ref().display()
    );

    Ok(conversion.stats)
}
