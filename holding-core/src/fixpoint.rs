//! Fix point resolution for a detected holding.
//!
//! Looks for the navigation waypoint the hold is flown around: first one
//! lying practically on top of an inversion point, else the waypoint closest
//! (Manhattan distance in degrees) to any sample between the first and last
//! inversion.

use crate::navdb::NavCatalog;
use crate::trajectory::BoundingBox;
use crate::types::{NavPoint, Position, Waypoint};

/// Half-size (degrees) of the box around the first inversion point that
/// candidate waypoints must fall in.
pub const CANDIDATE_BUFFER: f64 = 0.25;

/// Half-size (degrees) of the box around an inversion point that counts as
/// "on top of" it.
pub const TIGHT_BUFFER: f64 = 0.025;

/// Resolve the fix of the hold described by `segment` (indices into
/// `cleaned`, in scan order).
///
/// `None` when there is no catalog, the segment is empty, or no waypoint lies
/// near the hold; the caller substitutes a placeholder.
pub fn find_fix_point(
    cleaned: &[Position],
    segment: &[usize],
    catalog: Option<&dyn NavCatalog>,
) -> Option<Waypoint> {
    let catalog = catalog?;
    let (&first_idx, &last_idx) = (segment.first()?, segment.last()?);
    let first = cleaned.get(first_idx)?;

    let candidates =
        catalog.waypoints_within(&BoundingBox::around(first.lat, first.lon, CANDIDATE_BUFFER));
    if candidates.is_empty() {
        return None;
    }

    let tight = candidates.iter().find(|w| {
        segment
            .iter()
            .filter_map(|&i| cleaned.get(i))
            .any(|p| w.within(p.lat, p.lon, TIGHT_BUFFER))
    });
    if let Some(w) = tight {
        tracing::debug!(fix = %w.identifier, "fix point on an inversion point");
        return Some((*w).clone());
    }

    let end = last_idx.min(cleaned.len().saturating_sub(1));
    let mut best: Option<&Waypoint> = None;
    let mut best_diff = 270.0;
    for p in cleaned.get(first_idx..=end).unwrap_or_default() {
        for &w in &candidates {
            let diff = (w.latitude() - p.lat).abs() + (w.longitude() - p.lon).abs();
            // later pairs win ties
            if diff <= best_diff {
                best = Some(w);
                best_diff = diff;
            }
        }
    }

    if let Some(w) = best {
        tracing::debug!(fix = %w.identifier, diff_deg = best_diff, "fix point by proximity");
    }
    best.cloned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{lat_at, lon_at, pos_nm, waypoint};
    use crate::navdb::NavDb;

    /// A short eastbound/westbound hold around the origin and its inversion
    /// indices.
    fn hold() -> (Vec<Position>, Vec<usize>) {
        let cleaned = vec![
            pos_nm(0.0, 0.0, 90.0, 0),
            pos_nm(6.0, 0.0, 90.0, 90),
            pos_nm(7.0, -0.5, 180.0, 120),
            pos_nm(6.0, -1.0, 270.0, 150),
            pos_nm(0.0, -1.0, 270.0, 240),
            pos_nm(0.0, 0.0, 90.0, 300),
            pos_nm(6.0, -1.0, 270.0, 450),
        ];
        (cleaned, vec![1, 3, 5, 6])
    }

    #[test]
    fn test_no_catalog() {
        let (cleaned, segment) = hold();
        assert!(find_fix_point(&cleaned, &segment, None).is_none());
    }

    #[test]
    fn test_no_candidates() {
        let (cleaned, segment) = hold();
        let db = NavDb::new(vec![], vec![waypoint(1, "FAR", 52.0, 8.0)]);
        assert!(find_fix_point(&cleaned, &segment, Some(&db)).is_none());
    }

    #[test]
    fn test_tight_match_wins() {
        let (cleaned, segment) = hold();
        let db = NavDb::new(
            vec![],
            vec![
                waypoint(1, "NEAR", lat_at(0.0) + 0.05, lon_at(0.0)),
                waypoint(2, "ONTOP", lat_at(0.0) + 0.01, lon_at(6.0)),
            ],
        );
        let fix = find_fix_point(&cleaned, &segment, Some(&db)).unwrap();
        assert_eq!(fix.identifier, "ONTOP");
    }

    #[test]
    fn test_manhattan_fallback_picks_nearest() {
        let (cleaned, segment) = hold();
        let db = NavDb::new(
            vec![],
            vec![
                waypoint(1, "BBB", 50.2, 8.0),
                waypoint(2, "AAA", 50.1, 8.0),
            ],
        );
        let fix = find_fix_point(&cleaned, &segment, Some(&db)).unwrap();
        assert_eq!(fix.id, 2);
    }

    #[test]
    fn test_manhattan_ties_go_to_later_candidate() {
        let cleaned = vec![pos_nm(6.0, 0.0, 90.0, 0)];
        let db = NavDb::new(
            vec![],
            vec![
                waypoint(1, "NORTH", lat_at(0.0) + 0.1, lon_at(6.0)),
                waypoint(2, "SOUTH", lat_at(0.0) - 0.1, lon_at(6.0)),
            ],
        );
        // both are 0.1 deg from the only sample
        let fix = find_fix_point(&cleaned, &[0], Some(&db)).unwrap();
        assert_eq!(fix.id, 2);
    }

    #[test]
    fn test_empty_segment() {
        let (cleaned, _) = hold();
        let db = NavDb::new(vec![], vec![waypoint(1, "AAA", 50.0, 8.0)]);
        assert!(find_fix_point(&cleaned, &[], Some(&db)).is_none());
    }
}
