//! Per-facility grouping and footprint comparison across altitude strata.

use crate::types::{Boundary, Stratum};
use std::collections::{BTreeMap, BTreeSet};

/// How a facility's high and low boundaries relate laterally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootprintClass {
    /// High and low fingerprints are identical: one vertical column
    Matching,
    /// High and low describe different lateral shapes
    Divergent,
    /// Only one of high/low is present
    SingleStratum,
}

/// Sealed boundaries of one facility, keyed by stratum.
#[derive(Debug, Clone, Default)]
pub struct FacilityGroup {
    strata: BTreeMap<Stratum, Boundary>,
}

impl FacilityGroup {
    /// Insert a boundary, returning the one it replaced for the same stratum.
    pub fn insert(&mut self, boundary: Boundary) -> Option<Boundary> {
        self.strata.insert(boundary.stratum.clone(), boundary)
    }

    pub fn get(&self, stratum: &Stratum) -> Option<&Boundary> {
        self.strata.get(stratum)
    }

    pub fn boundaries(&self) -> impl Iterator<Item = &Boundary> {
        self.strata.values()
    }

    pub fn classify(&self) -> FootprintClass {
        match (self.get(&Stratum::High), self.get(&Stratum::Low)) {
            (Some(high), Some(low)) if high.fingerprint() == low.fingerprint() => {
                FootprintClass::Matching
            }
            (Some(_), Some(_)) => FootprintClass::Divergent,
            _ => FootprintClass::SingleStratum,
        }
    }
}

/// Facility groups plus the number of boundaries that replaced an earlier
/// one for the same (facility, stratum).
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    pub facilities: BTreeMap<String, FacilityGroup>,
    pub overwritten: usize,
}

/// Group sealed boundaries by facility. A repeated (facility, stratum) keeps
/// the later boundary.
pub fn group_by_facility(boundaries: &[Boundary]) -> Grouping {
    let mut grouping = Grouping::default();

    for boundary in boundaries {
        let group = grouping
            .facilities
            .entry(boundary.facility.clone())
            .or_default();
        if let Some(previous) = group.insert(boundary.clone()) {
            tracing::warn!(
                "Boundary {} replaces earlier {} for the same facility and stratum",
                boundary.composite_id(),
                previous.composite_id()
            );
            grouping.overwritten += 1;
        }
    }

    grouping
}

/// Facility codes partitioned by footprint class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub matching: BTreeSet<String>,
    pub divergent: BTreeSet<String>,
    pub single_stratum: BTreeSet<String>,
}

impl Classification {
    pub fn class_of(&self, facility: &str) -> Option<FootprintClass> {
        if self.matching.contains(facility) {
            Some(FootprintClass::Matching)
        } else if self.divergent.contains(facility) {
            Some(FootprintClass::Divergent)
        } else if self.single_stratum.contains(facility) {
            Some(FootprintClass::SingleStratum)
        } else {
            None
        }
    }

    pub fn is_single_stratum(&self, facility: &str) -> bool {
        self.single_stratum.contains(facility)
    }

    pub fn total(&self) -> usize {
        self.matching.len() + self.divergent.len() + self.single_stratum.len()
    }
}

pub fn classify(facilities: &BTreeMap<String, FacilityGroup>) -> Classification {
    let mut classification = Classification::default();

    for (facility, group) in facilities {
        let set = match group.classify() {
            FootprintClass::Matching => &mut classification.matching,
            FootprintClass::Divergent => &mut classification.divergent,
            FootprintClass::SingleStratum => &mut classification.single_stratum,
        };
        set.insert(facility.clone());
    }

    classification
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(facility: &str, stratum: Stratum, tokens: &[&str]) -> Boundary {
        Boundary {
            facility: facility.into(),
            stratum,
            points: vec![(0.0, 0.0); tokens.len()],
            designators: (0..tokens.len()).map(|i| format!("{:05}", i)).collect(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            start: "00000".into(),
            end: Some(format!("{:05}", tokens.len() - 1)),
        }
    }

    const SQUARE: [&str; 3] = ["300000N1000000W", "310000N1000000W", "310000N1010000W"];

    #[test]
    fn test_matching_footprint() {
        let grouping = group_by_facility(&[
            boundary("ZAB", Stratum::High, &SQUARE),
            boundary("ZAB", Stratum::Low, &SQUARE),
        ]);
        let classification = classify(&grouping.facilities);

        assert_eq!(classification.class_of("ZAB"), Some(FootprintClass::Matching));
        assert_eq!(classification.total(), 1);
    }

    #[test]
    fn test_divergent_footprint() {
        let grouping = group_by_facility(&[
            boundary("ZDC", Stratum::High, &SQUARE),
            boundary("ZDC", Stratum::Low, &SQUARE[..2]),
        ]);
        let group = &grouping.facilities["ZDC"];
        assert_eq!(group.classify(), FootprintClass::Divergent);
    }

    #[test]
    fn test_single_stratum() {
        let grouping = group_by_facility(&[
            boundary("ZAK", Stratum::FirOnly, &SQUARE),
            boundary("ZAN", Stratum::High, &SQUARE),
            boundary("ZAN", Stratum::FirOnly, &SQUARE),
        ]);
        let classification = classify(&grouping.facilities);

        assert!(classification.is_single_stratum("ZAK"));
        assert!(classification.is_single_stratum("ZAN"));
        assert!(classification.matching.is_empty());
        assert!(classification.divergent.is_empty());
        assert_eq!(classification.class_of("ZZZ"), None);
    }

    #[test]
    fn test_each_facility_in_exactly_one_class() {
        let grouping = group_by_facility(&[
            boundary("ZAB", Stratum::High, &SQUARE),
            boundary("ZAB", Stratum::Low, &SQUARE),
            boundary("ZDC", Stratum::High, &SQUARE),
            boundary("ZDC", Stratum::Low, &SQUARE[1..]),
            boundary("ZAK", Stratum::FirOnly, &SQUARE),
        ]);
        let classification = classify(&grouping.facilities);

        assert_eq!(classification.total(), grouping.facilities.len());
        assert!(classification.matching.contains("ZAB"));
        assert!(classification.divergent.contains("ZDC"));
        assert!(classification.single_stratum.contains("ZAK"));
    }

    #[test]
    fn test_repeated_stratum_keeps_later_boundary() {
        let mut later = boundary("ZAB", Stratum::High, &SQUARE[..2]);
        later.start = "99999".into();
        let grouping = group_by_facility(&[boundary("ZAB", Stratum::High, &SQUARE), later]);

        assert_eq!(grouping.overwritten, 1);
        let group = &grouping.facilities["ZAB"];
        assert_eq!(group.get(&Stratum::High).unwrap().start, "99999");
        assert_eq!(group.boundaries().count(), 1);
    }
}
