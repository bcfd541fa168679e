use serde::Serialize;
use std::collections::HashSet;
use crate::core::distance::round_km;
use crate::models::{Donor, DonorSummary, GeoPoint};

/// Anything that can be ranked by distance from a reference point
pub trait Candidate {
    fn candidate_id(&self) -> i64;
    fn location(&self) -> GeoPoint;
}

impl Candidate for Donor {
    fn candidate_id(&self) -> i64 {
        self.id
    }

    fn location(&self) -> GeoPoint {
        Donor::location(self)
    }
}

impl Candidate for DonorSummary {
    fn candidate_id(&self) -> i64 {
        self.id
    }

    fn location(&self) -> GeoPoint {
        self.location
    }
}

/// A candidate annotated with its distance from the reference point
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch<T> {
    #[serde(flatten)]
    pub candidate: T,
    /// Kilometers, rounded to two decimals
    #[serde(rename = "distance")]
    pub distance_km: f64,
}

/// Annotate every candidate with its distance from `origin` and sort closest first
///
/// The sort is stable, so candidates at the same rounded distance keep the
/// order they were passed in.
pub fn rank_by_distance<T: Candidate>(origin: GeoPoint, candidates: Vec<T>) -> Vec<RankedMatch<T>> {
    let mut ranked: Vec<RankedMatch<T>> = candidates
        .into_iter()
        .map(|candidate| {
            let distance_km = round_km(origin.distance_to(&candidate.location()));
            RankedMatch { candidate, distance_km }
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    ranked
}

/// Drop candidates whose id appears in `excluded`
pub fn exclude_ids<T: Candidate>(candidates: Vec<T>, excluded: &HashSet<i64>) -> Vec<T> {
    if excluded.is_empty() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|candidate| !excluded.contains(&candidate.candidate_id()))
        .collect()
}
