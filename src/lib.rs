//! ARTCC boundary conversion library.
//!
//! This library turns the NASR ARTCC boundary file (`ARB.txt`) into closed
//! polygons per facility and altitude stratum:
//! - Extract fixed-width records
//! - Assemble rings, closed by the `POINT OF BEGINNING` marker
//! - Compare high and low footprints per facility
//! - Export pipe-delimited rows with embedded GeoJSON polygons
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Record    │───▶│  Aggregate  │───▶│  Classify   │───▶│   Export    │
//! │ (fixed col) │    │ (ring state)│    │ (footprint) │    │ (GeoJSON)   │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//!                          ▲
//!                    ┌─────┴─────┐
//!                    │    DMS    │
//!                    └───────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use arbgeo::pipeline::{convert_file, ConvertConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stats = convert_file("ARB.txt", "FAVs_GeoJSON.csv", &ConvertConfig::default())?;
//!     println!("{} rows written", stats.rows);
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod classify;
pub mod dms;
pub mod export;
pub mod pipeline;
pub mod record;
pub mod types;

pub use aggregate::{aggregate, AggregateError, BoundaryState, InconsistencyReport};
pub use classify::{classify, group_by_facility, Classification, FacilityGroup, FootprintClass};
pub use export::{ExportConfig, ExportRow};
pub use pipeline::{convert, convert_file, ConvertConfig, ConvertError, ConversionStats};
pub use record::ParseError;
pub use types::{Boundary, FieldRecord, Stratum};
