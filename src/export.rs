//! Export rows with embedded GeoJSON polygons.
//!
//! # Output Format
//!
//! ```text
//! Facility|FavID|Inclusion|AltLow|AltHigh|GeoJSON
//! ZAB|ZAB_H_53855_01373|1|18000|60000|{"type": "Polygon", "coordinates": [[[-111.8, 35.7], ...]]}
//! ```
//!
//! Fields are written raw. Characters that would need escaping (the
//! delimiter, line breaks, backslashes) are stripped from values instead.

use crate::classify::Classification;
use crate::types::Boundary;
use geo::algorithm::orient::{Direction, Orient};
use geo::{LineString, Polygon};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Column order expected by the consumer.
pub const HEADER: [&str; 6] = ["Facility", "FavID", "Inclusion", "AltLow", "AltHigh", "GeoJSON"];

const DELIMITER: char = '|';
const LINE_TERMINATOR: &str = "\r\n";

/// Configuration for export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Skip facilities that only have one of the high/low strata
    pub exclude_single_stratum: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            exclude_single_stratum: true,
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub facility: String,
    pub fav_id: String,
    pub inclusion: bool,
    pub alt_low: u32,
    pub alt_high: u32,
    pub geojson: String,
}

impl ExportRow {
    pub fn from_boundary(boundary: &Boundary) -> Self {
        let (alt_low, alt_high) = boundary.stratum.altitude_bounds();
        Self {
            facility: boundary.facility.clone(),
            fav_id: boundary.composite_id(),
            inclusion: true,
            alt_low,
            alt_high,
            geojson: polygon_geojson(&boundary.points),
        }
    }

    pub fn fields(&self) -> [String; 6] {
        [
            self.facility.clone(),
            self.fav_id.clone(),
            if self.inclusion { "1" } else { "0" }.to_string(),
            self.alt_low.to_string(),
            self.alt_high.to_string(),
            self.geojson.clone(),
        ]
    }
}

/// Closed, clockwise-oriented exterior ring of `(lon, lat)` points.
pub fn oriented_ring(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut ring = LineString::from(points.to_vec());
    ring.close();

    Polygon::new(ring, vec![])
        .orient(Direction::Reversed)
        .exterior()
        .coords()
        .map(|c| (c.x, c.y))
        .collect()
}

/// Single ring GeoJSON Polygon, coordinates written in reverse ring order.
pub fn polygon_geojson(points: &[(f64, f64)]) -> String {
    let coordinates: Vec<String> = oriented_ring(points)
        .iter()
        .rev()
        .map(|(lon, lat)| format!("[{:?}, {:?}]", lon, lat))
        .collect();

    format!(
        r#"{{"type": "Polygon", "coordinates": [[{}]]}}"#,
        coordinates.join(",")
    )
}

/// Rows for every boundary retained by the export configuration, in input order.
pub fn export_rows(
    boundaries: &[Boundary],
    classification: &Classification,
    config: &ExportConfig,
) -> Vec<ExportRow> {
    boundaries
        .iter()
        .filter(|b| !(config.exclude_single_stratum && classification.is_single_stratum(&b.facility)))
        .map(ExportRow::from_boundary)
        .collect()
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|&c| !matches!(c, DELIMITER | '\r' | '\n' | '\\'))
        .collect()
}

fn write_line<W: Write>(writer: &mut W, fields: &[&str]) -> io::Result<()> {
    let line = fields
        .iter()
        .map(|f| sanitize(f))
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string());
    writer.write_all(line.as_bytes())?;
    writer.write_all(LINE_TERMINATOR.as_bytes())
}

/// Write the header and all rows.
pub fn write_rows<W: Write>(writer: &mut W, rows: &[ExportRow]) -> io::Result<()> {
    write_line(writer, &HEADER)?;
    for row in rows {
        let fields = row.fields();
        let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
        write_line(writer, &refs)?;
    }
    writer.flush()
}

/// Create (or truncate) `path` and write the export to it.
pub fn write_file(path: impl AsRef<Path>, rows: &[ExportRow]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_rows(&mut writer, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, group_by_facility};
    use crate::types::Stratum;

    /// Counter-clockwise triangle in the lon/lat plane.
    const TRIANGLE: [(f64, f64); 3] = [(-100.0, 30.0), (-99.0, 30.0), (-99.0, 31.0)];

    fn sealed(facility: &str, stratum: Stratum) -> Boundary {
        Boundary {
            facility: facility.into(),
            stratum,
            points: TRIANGLE.to_vec(),
            designators: vec!["00010".into(), "00020".into(), "00030".into()],
            tokens: vec!["a".into(), "b".into(), "c".into()],
            start: "00010".into(),
            end: Some("00030".into()),
        }
    }

    /// Twice the signed area; negative for clockwise rings.
    fn signed_area(ring: &[(f64, f64)]) -> f64 {
        ring.windows(2)
            .map(|w| w[0].0 * w[1].1 - w[1].0 * w[0].1)
            .sum()
    }

    #[test]
    fn test_oriented_ring_is_closed_and_clockwise() {
        let ring = oriented_ring(&TRIANGLE);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
        assert!(signed_area(&ring) < 0.0);

        // Already clockwise input keeps its orientation
        let reversed: Vec<_> = TRIANGLE.iter().rev().copied().collect();
        let ring = oriented_ring(&reversed);
        assert!(signed_area(&ring) < 0.0);
    }

    #[test]
    fn test_polygon_geojson() {
        let geojson = polygon_geojson(&TRIANGLE);
        assert!(geojson.starts_with(r#"{"type": "Polygon", "coordinates": [[["#));
        assert!(geojson.ends_with("]]]}"));
        assert_eq!(geojson.matches("], [").count(), 0);
        assert_eq!(geojson.matches("],[").count(), 3);
        assert!(geojson.contains("[-100.0, 30.0]"));
    }

    #[test]
    fn test_geojson_written_counter_clockwise() {
        let geojson = polygon_geojson(&TRIANGLE);
        let body = geojson
            .trim_start_matches(r#"{"type": "Polygon", "coordinates": [[["#)
            .trim_end_matches("]]]}");
        let ring: Vec<(f64, f64)> = body
            .split("],[")
            .map(|pair| {
                let (lon, lat) = pair.split_once(", ").unwrap();
                (lon.parse().unwrap(), lat.parse().unwrap())
            })
            .collect();

        assert_eq!(ring.len(), 4);
        assert!(signed_area(&ring) > 0.0);
    }

    #[test]
    fn test_row_from_boundary() {
        let high = ExportRow::from_boundary(&sealed("ZAB", Stratum::High));
        assert_eq!(high.facility, "ZAB");
        assert_eq!(high.fav_id, "ZAB_H_00010_00030");
        assert!(high.inclusion);
        assert_eq!((high.alt_low, high.alt_high), (18_000, 60_000));

        let low = ExportRow::from_boundary(&sealed("ZAB", Stratum::Low));
        assert_eq!((low.alt_low, low.alt_high), (0, 18_000));
        assert_eq!(low.fields()[2], "1");
    }

    #[test]
    fn test_export_rows_skips_single_stratum() {
        let boundaries = vec![
            sealed("ZAB", Stratum::High),
            sealed("ZAK", Stratum::FirOnly),
            sealed("ZAB", Stratum::Low),
        ];
        let classification = classify(&group_by_facility(&boundaries).facilities);

        let rows = export_rows(&boundaries, &classification, &ExportConfig::default());
        let ids: Vec<_> = rows.iter().map(|r| r.fav_id.as_str()).collect();
        assert_eq!(ids, vec!["ZAB_H_00010_00030", "ZAB_L_00010_00030"]);

        let config = ExportConfig {
            exclude_single_stratum: false,
        };
        assert_eq!(export_rows(&boundaries, &classification, &config).len(), 3);
    }

    #[test]
    fn test_write_rows() {
        let row = ExportRow::from_boundary(&sealed("ZAB", Stratum::High));
        let mut out = Vec::new();
        write_rows(&mut out, &[row.clone()]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Facility|FavID|Inclusion|AltLow|AltHigh|GeoJSON");
        assert_eq!(
            lines[1],
            format!("ZAB|ZAB_H_00010_00030|1|18000|60000|{}", row.geojson)
        );
        assert_eq!(lines[2], "");
    }

    #[test]
    fn test_write_rows_strips_special_characters() {
        let mut row = ExportRow::from_boundary(&sealed("Z|A\\B", Stratum::High));
        row.fav_id = "ID\r\nX".into();
        let mut out = Vec::new();
        write_rows(&mut out, &[row]).unwrap();

        let text = String::from_utf8(out).unwrap();
        let data = text.lines().nth(1).unwrap();
        assert!(data.starts_with("ZAB|IDX|1|"));
        assert_eq!(data.matches('|').count(), 5);
        assert!(data.contains(r#""type": "Polygon""#));
    }
}
