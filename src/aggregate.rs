//! Boundary assembly from ordered field records.
//!
//! Records for one (facility, stratum) ring are contiguous in the source file
//! and the last record of each ring carries `POINT OF BEGINNING` in its
//! connector description. [`BoundaryState`] walks the records once:
//!
//! ```text
//!              ┌────────── sentinel seen ───────────┐
//!              ▼                                    │
//!   ┌─────────────────┐  next record   ┌────────────┴──┐
//!   │ complete        │───────────────▶│ open          │◀── points
//!   │ (emit, reopen)  │                │ (accumulate)  │
//!   └─────────────────┘                └───────────────┘
//! ```
//!
//! A sealed ring is emitted when the *next* record arrives, or by
//! [`BoundaryState::finish`] at end of input. A ring that never sees its
//! sentinel is discarded; one that closes with fewer than three points
//! aborts the run.

use crate::dms::{parse_dms, point_token};
use crate::record::ParseError;
use crate::types::{Boundary, FieldRecord};
use std::fmt;
use thiserror::Error;

/// Connector description text that closes a ring.
pub const RING_CLOSURE_SENTINEL: &str = "POINT OF BEGINNING";

/// Fewest points a ring may close with, counting the closing record.
pub const MIN_RING_POINTS: usize = 3;

/// Diagnostic context for a facility change without a closing sentinel.
#[derive(Debug, Clone)]
pub struct InconsistencyReport {
    pub previous: Option<FieldRecord>,
    pub current: FieldRecord,
    pub last_emitted: Option<Boundary>,
    pub in_progress: Boundary,
}

impl fmt::Display for InconsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Invalid record boundary")?;
        writeln!(f, "Previous record")?;
        match &self.previous {
            Some(record) => writeln!(f, "{record}")?,
            None => writeln!(f, "  <none>")?,
        }
        writeln!(f, "Current record")?;
        writeln!(f, "{}", self.current)?;
        writeln!(f, "Last recorded boundary")?;
        match &self.last_emitted {
            Some(boundary) => writeln!(f, "{boundary}")?,
            None => writeln!(f, "  <none>")?,
        }
        writeln!(f, "Current boundary")?;
        write!(f, "{}", self.in_progress)
    }
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Facility changed without a ring closure at line {}\n{0}", .0.current.index)]
    StructuralInconsistency(Box<InconsistencyReport>),
    #[error(
        "Ring closed with {} points (need {}) at line {}\nCurrent record\n{record}\nCurrent boundary\n{boundary}",
        .boundary.point_count() + 1,
        MIN_RING_POINTS,
        .record.index
    )]
    DegenerateRing {
        record: Box<FieldRecord>,
        boundary: Box<Boundary>,
    },
}

/// Failure of a single transition, before run-level context is attached.
#[derive(Debug)]
pub enum StepError {
    Parse(ParseError),
    /// Facility switched while a ring was open; carries the open ring.
    FacilityChanged(Boundary),
    /// Closing marker arrived before the ring had enough points.
    DegenerateRing(Boundary),
}

/// Result of draining the state machine at end of input.
#[derive(Debug, Default)]
pub struct Finished {
    /// Sealed ring still waiting to be emitted
    pub sealed: Option<Boundary>,
    /// Ring that never reached its sentinel
    pub unterminated: Option<Boundary>,
}

/// Explicit aggregation state, owned by one pass over the records.
#[derive(Debug)]
pub struct BoundaryState {
    open: Option<Boundary>,
    complete: bool,
    start_new: bool,
}

impl Default for BoundaryState {
    fn default() -> Self {
        Self {
            open: None,
            complete: false,
            start_new: true,
        }
    }
}

impl BoundaryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ring currently accepting points.
    pub fn in_progress(&self) -> Option<&Boundary> {
        self.open.as_ref()
    }

    /// Advance by one record, returning the ring sealed by the previous
    /// record if there was one.
    pub fn step(&mut self, record: &FieldRecord) -> Result<Option<Boundary>, StepError> {
        let mut emitted = None;

        if self.complete {
            self.complete = false;
            emitted = self.open.take();
        }

        if self.start_new {
            self.start_new = false;
            self.open = None;
        }
        let boundary = self.open.get_or_insert_with(|| Boundary::open(record));

        if boundary.facility != record.facility {
            return Err(StepError::FacilityChanged(boundary.clone()));
        }

        if record.description.contains(RING_CLOSURE_SENTINEL) {
            if boundary.point_count() + 1 < MIN_RING_POINTS {
                return Err(StepError::DegenerateRing(boundary.clone()));
            }
            self.complete = true;
            self.start_new = true;
            boundary.end = Some(record.designator.clone());
        }

        let coordinate_error = |source| {
            StepError::Parse(ParseError::Coordinate {
                index: record.index,
                line: record.line.clone(),
                source,
            })
        };
        let latitude = parse_dms(&record.latitude).map_err(coordinate_error)?;
        let longitude = parse_dms(&record.longitude).map_err(coordinate_error)?;
        let token = point_token(&record.latitude, &record.longitude).map_err(coordinate_error)?;

        boundary.points.push((longitude, latitude));
        boundary.tokens.push(token);
        boundary.designators.push(record.designator.clone());

        Ok(emitted)
    }

    /// Drain the machine: a sealed ring is returned for emission, an open one
    /// is returned as unterminated.
    pub fn finish(self) -> Finished {
        match self.open {
            Some(boundary) if self.complete => Finished {
                sealed: Some(boundary),
                unterminated: None,
            },
            Some(boundary) => Finished {
                sealed: None,
                unterminated: Some(boundary),
            },
            None => Finished::default(),
        }
    }
}

/// Aggregated output of one pass.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Sealed boundaries in the order their sentinel was encountered
    pub boundaries: Vec<Boundary>,
    /// Trailing ring discarded for lack of a sentinel
    pub unterminated: Option<Boundary>,
}

/// Group records into sealed boundaries.
pub fn aggregate(records: &[FieldRecord]) -> Result<Aggregation, AggregateError> {
    let mut state = BoundaryState::new();
    let mut boundaries: Vec<Boundary> = Vec::new();

    for (position, record) in records.iter().enumerate() {
        match state.step(record) {
            Ok(Some(boundary)) => {
                tracing::debug!(
                    "Sealed boundary {} ({} points)",
                    boundary.composite_id(),
                    boundary.point_count()
                );
                boundaries.push(boundary);
            }
            Ok(None) => {}
            Err(StepError::Parse(e)) => {
                tracing::error!("Unable to parse line at index {}\n{}", e.index(), e.line());
                return Err(e.into());
            }
            Err(StepError::FacilityChanged(in_progress)) => {
                let previous = position
                    .checked_sub(1)
                    .and_then(|p| records.get(p))
                    .cloned();
                return Err(AggregateError::StructuralInconsistency(Box::new(
                    InconsistencyReport {
                        previous,
                        current: record.clone(),
                        last_emitted: boundaries.last().cloned(),
                        in_progress,
                    },
                )));
            }
            Err(StepError::DegenerateRing(boundary)) => {
                return Err(AggregateError::DegenerateRing {
                    record: Box::new(record.clone()),
                    boundary: Box::new(boundary),
                });
            }
        }
    }

    let finished = state.finish();
    boundaries.extend(finished.sealed);
    if let Some(open) = &finished.unterminated {
        tracing::warn!(
            "Discarding unterminated boundary {} {} starting at {} ({} points)",
            open.facility,
            open.stratum,
            open.start,
            open.point_count()
        );
    }

    Ok(Aggregation {
        boundaries,
        unterminated: finished.unterminated,
    })
}
