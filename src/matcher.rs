//! Decide which gazetteer peaks a track visited.
//!
//! A peak counts as visited as soon as a single track point lies within the
//! match radius of its summit coordinate. There is no dwell-time or elevation
//! check, so a ridge traverse passing close to a summit also counts. The
//! radius is generous to absorb GPS horizontal error.
//!
//! Matching is a linear scan over peaks × points with an early exit per peak;
//! the gazetteer holds at most a few hundred entries.

use std::collections::HashSet;

use serde::Serialize;

use crate::geo::haversine_distance;
use crate::types::{Peak, PeakId, Track};

/// Default match radius in meters.
pub const DEFAULT_THRESHOLD_METERS: f64 = 100.0;

/// Closest point of a track to a peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Approach {
    pub point_index: usize,
    pub distance_meters: f64,
}

/// Whether any point of `track` lies within `threshold_meters` of `peak`.
pub fn verify_peak_visit(track: &Track, peak: &Peak, threshold_meters: f64) -> bool {
    track.points().iter().any(|pt| {
        haversine_distance(pt.latitude, pt.longitude, peak.latitude, peak.longitude)
            <= threshold_meters
    })
}

/// Ids of the peaks visited by `track`, in gazetteer order.
///
/// Peak ids must be unique; [`Gazetteer`](crate::gazetteer::Gazetteer)
/// guarantees this for validated input.
pub fn find_visited_peaks(track: &Track, peaks: &[Peak], threshold_meters: f64) -> Vec<PeakId> {
    debug_assert!(has_unique_ids(peaks), "gazetteer contains duplicate peak ids");

    let visited: Vec<PeakId> = peaks
        .iter()
        .filter(|peak| verify_peak_visit(track, peak, threshold_meters))
        .map(|peak| peak.id)
        .collect();

    tracing::debug!(
        points = track.len(),
        peaks = peaks.len(),
        threshold_meters,
        visited = visited.len(),
        "matched track against gazetteer"
    );

    visited
}

/// The track point closest to `peak`, scanning the whole track.
pub fn nearest_approach(track: &Track, peak: &Peak) -> Option<Approach> {
    track
        .points()
        .iter()
        .enumerate()
        .map(|(point_index, pt)| Approach {
            point_index,
            distance_meters: haversine_distance(
                pt.latitude,
                pt.longitude,
                peak.latitude,
                peak.longitude,
            ),
        })
        .min_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters))
}

fn has_unique_ids(peaks: &[Peak]) -> bool {
    let mut seen = HashSet::with_capacity(peaks.len());
    peaks.iter().all(|p| seen.insert(p.id))
}
