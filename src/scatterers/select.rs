//! Selection of the scatterers that have a neighbour on the other track.
use crate::constants::Meter;
use crate::scatterers::{separation_threshold, ScattererPoint};

/// Keep the `candidates` that lie within `separation` of at least one `reference`
/// scatterer (planar squared distance `≤` threshold). The input order is preserved.
pub fn select_adjacent(
    candidates: &[ScattererPoint],
    reference: &[ScattererPoint],
    separation: Meter,
) -> Vec<ScattererPoint> {
    let threshold = separation_threshold(separation);
    candidates
        .iter()
        .filter(|c| reference.iter().any(|r| c.planar_dist2(r) <= threshold))
        .copied()
        .collect()
}

#[cfg(test)]
mod select_test {
    use super::*;
    use crate::scatterers::Track;

    #[test]
    fn test_select_adjacent() {
        let asc = |lon, lat| ScattererPoint::new(lon, lat, 0.0, 1.0, Track::Ascending);
        let dsc = |lon, lat| ScattererPoint::new(lon, lat, 0.0, 1.0, Track::Descending);

        let candidates = [asc(10.0, 45.0), asc(10.5, 45.0), asc(10.0002, 45.0)];
        let reference = [dsc(10.0001, 45.0), dsc(11.0, 45.0)];

        let selected = select_adjacent(&candidates, &reference, 100.0);
        assert_eq!(selected, vec![candidates[0], candidates[2]]);

        assert!(select_adjacent(&candidates, &[], 100.0).is_empty());
    }

    #[test]
    fn test_threshold_boundary() {
        let d = separation_threshold(50.0).sqrt();
        let a = [ScattererPoint::new(0.0, 0.0, 0.0, 0.0, Track::Ascending)];
        let inside = [ScattererPoint::new(0.0, d * (1.0 - 1e-9), 0.0, 0.0, Track::Descending)];
        let outside = [ScattererPoint::new(0.0, d * (1.0 + 1e-9), 0.0, 0.0, Track::Descending)];
        assert_eq!(select_adjacent(&a, &inside, 50.0).len(), 1);
        assert!(select_adjacent(&a, &outside, 50.0).is_empty());
    }
}
