//! Pattern scanner: finds racetrack segments in a cleaned trajectory.
//!
//! A holding shows up as a chain of *inversion points*: samples where the
//! aircraft flies roughly the reciprocal of a sample a few minutes earlier, at
//! the same altitude, a few miles away. The scanner walks the trajectory with
//! an index cursor, links inversion points into segments, then merges nearby
//! segments and keeps the longest one.
//!
//! All work is on indices into the immutable cleaned slice.

use crate::fixpoint::find_fix_point;
use crate::geodesic::distance_nm;
use crate::heading::{direction_after, is_inverted_heading, is_same_direction};
use crate::navdb::NavCatalog;
use crate::types::{HoldingResult, Position, Waypoint};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Look-ahead window after the anchor, in samples.
pub const POINTS_TO_TAKE: usize = 12;

/// Heading tolerance (degrees) for an inversion; doubled for the seed run.
pub const INVERTED_HEADING_BUFFER: f64 = 5.0;

/// Two samples within this many feet are at the same level.
pub const ALTITUDE_BUFFER_FT: i32 = 500;

/// Upper bound on the size of a holding, nautical miles.
pub const MAX_HOLDING_RADIUS_NM: f64 = 20.0;

/// Inversion partners must be at least this far apart, nautical miles.
pub const MIN_TURN_SEPARATION_NM: f64 = 2.5;

/// Exclusive bounds (seconds) on the time between inversion partners.
pub const MIN_INVERSION_GAP_SEC: i64 = 90;
pub const MAX_INVERSION_GAP_SEC: i64 = 350;

/// Segments whose last points are within this distance are merged.
pub const MERGE_DISTANCE_NM: f64 = MAX_HOLDING_RADIUS_NM / 2.0;

// ---------------------------------------------------------------------------
// Pair predicates
// ---------------------------------------------------------------------------

pub fn is_same_altitude(a: &Position, b: &Position) -> bool {
    a.altitude_ft > b.altitude_ft - ALTITUDE_BUFFER_FT
        && a.altitude_ft < b.altitude_ft + ALTITUDE_BUFFER_FT
}

pub fn is_recent_enough(a: &Position, b: &Position) -> bool {
    let gap = b.timestamp - a.timestamp;
    gap > MIN_INVERSION_GAP_SEC && gap < MAX_INVERSION_GAP_SEC
}

pub fn is_distant_enough(a: &Position, b: &Position, min_nm: f64) -> bool {
    distance_nm(a, b) >= min_nm
}

pub fn is_close_enough(a: &Position, b: &Position, max_nm: f64) -> bool {
    distance_nm(a, b) <= max_nm
}

/// True if `b` is an inversion partner of the anchor `a`.
fn is_inversion_partner(a: &Position, b: &Position) -> bool {
    is_inverted_heading(a, b)
        && is_same_altitude(a, b)
        && is_recent_enough(a, b)
        && is_distant_enough(a, b, MIN_TURN_SEPARATION_NM)
        && is_close_enough(a, b, MAX_HOLDING_RADIUS_NM)
}

// ---------------------------------------------------------------------------
// Scan
// ---------------------------------------------------------------------------

/// Raw segments of inversion-point indices, in scan order.
///
/// Segments of two points or fewer (u-turns, single course reversals) are
/// dropped.
pub fn scan_segments(cleaned: &[Position]) -> Vec<Vec<usize>> {
    let mut found: Vec<Vec<usize>> = Vec::new();
    let mut current: Option<Vec<usize>> = None;
    let mut last_inversion: Option<usize> = None;
    let mut cursor = 0;

    while cursor < cleaned.len() {
        let anchor = &cleaned[cursor];
        let end = (cursor + POINTS_TO_TAKE).min(cleaned.len() - 1);

        let partner = (cursor + 1..=end).find(|&j| is_inversion_partner(anchor, &cleaned[j]));

        if let Some(j) = partner {
            match current.as_mut() {
                Some(segment) => segment.push(j),
                None => {
                    let buffer = INVERTED_HEADING_BUFFER * 2.0;
                    let run = cleaned[cursor..]
                        .iter()
                        .take_while(|p| is_same_direction(anchor.heading, p.heading, buffer))
                        .count();
                    let seed = cursor + run.saturating_sub(1);
                    current = Some(vec![seed, j]);
                }
            }
            last_inversion = Some(j);
        }

        // the last inversion point found no partner of its own
        if last_inversion == Some(cursor) {
            if let Some(segment) = current.take() {
                found.push(segment);
            }
            last_inversion = None;
        }

        match last_inversion {
            Some(li) if li > cursor => cursor = li,
            _ => cursor += 1,
        }
    }

    found.retain(|segment| segment.len() > 2);
    found
}

/// Merge consecutive segments whose last points lie within
/// [`MERGE_DISTANCE_NM`] of each other.
pub fn merge_segments(cleaned: &[Position], segments: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    let before = segments.len();
    let mut merged: Vec<Vec<usize>> = Vec::with_capacity(before);

    for segment in segments {
        let close = match (merged.last().and_then(|m| m.last()), segment.last()) {
            (Some(&a), Some(&b)) => is_close_enough(&cleaned[a], &cleaned[b], MERGE_DISTANCE_NM),
            _ => false,
        };
        match merged.last_mut() {
            Some(last) if close => last.extend(segment),
            _ => merged.push(segment),
        }
    }

    if merged.len() != before {
        tracing::debug!(from = before, to = merged.len(), "merged holding segments");
    }
    merged
}

/// Segment with the most points; the first one found wins ties.
pub fn select_segment(segments: &[Vec<usize>]) -> Option<&[usize]> {
    let mut best: Option<&Vec<usize>> = None;
    for segment in segments {
        match best {
            Some(b) if b.len() >= segment.len() => {}
            _ => best = Some(segment),
        }
    }
    best.map(Vec::as_slice)
}

/// True if every pair of points in `segment` is within
/// [`MAX_HOLDING_RADIUS_NM`].
pub fn is_coherent(cleaned: &[Position], segment: &[usize]) -> bool {
    segment.iter().enumerate().all(|(n, &i)| {
        segment[n + 1..]
            .iter()
            .all(|&j| is_close_enough(&cleaned[i], &cleaned[j], MAX_HOLDING_RADIUS_NM))
    })
}

/// Scan a cleaned trajectory for a holding pattern.
pub fn check_for_pattern(cleaned: &[Position], catalog: Option<&dyn NavCatalog>) -> HoldingResult {
    let segments = scan_segments(cleaned);
    if segments.is_empty() {
        return HoldingResult::not_holding();
    }

    let segments = if segments.len() > 1 {
        merge_segments(cleaned, segments)
    } else {
        segments
    };

    for segment in &segments {
        let first = &cleaned[segment[0]];
        tracing::debug!(
            points = segment.len(),
            start = first.timestamp,
            lat = first.lat,
            lon = first.lon,
            "holding segment"
        );
    }

    let segment = match select_segment(&segments) {
        Some(s) => s,
        None => return HoldingResult::not_holding(),
    };

    if !is_coherent(cleaned, segment) {
        tracing::debug!(points = segment.len(), "segment too spread out for a holding");
        return HoldingResult::not_holding();
    }

    let first_idx = segment[0];
    let first = &cleaned[first_idx];
    let direction = direction_after(cleaned, first_idx).unwrap_or_default();
    let fix_point = find_fix_point(cleaned, segment, catalog)
        .unwrap_or_else(|| Waypoint::placeholder(first.lat, first.lon));

    HoldingResult::holding(direction, first.altitude_ft, segment.len(), fix_point)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{lap, pos, pos_nm, ALT, HOLD_START};
    use crate::types::Direction;

    /// `n` back-to-back laps with no transit.
    fn laps(n: usize, turn_heading: f64) -> Vec<Position> {
        (0..n)
            .flat_map(|k| lap(0.0, HOLD_START + k as i64 * 300, turn_heading))
            .collect()
    }

    #[test]
    fn test_pair_predicates() {
        let a = pos(50.0, 8.0, 90.0, 8000, 0);
        assert!(is_same_altitude(&a, &pos(50.0, 8.0, 0.0, 8499, 0)));
        assert!(!is_same_altitude(&a, &pos(50.0, 8.0, 0.0, 8500, 0)));
        assert!(!is_same_altitude(&a, &pos(50.0, 8.0, 0.0, 7500, 0)));

        assert!(is_recent_enough(&a, &pos(50.0, 8.0, 0.0, 0, 91)));
        assert!(!is_recent_enough(&a, &pos(50.0, 8.0, 0.0, 0, 90)));
        assert!(!is_recent_enough(&a, &pos(50.0, 8.0, 0.0, 0, 350)));
        assert!(!is_recent_enough(&a, &pos(50.0, 8.0, 0.0, 0, -200)));

        let b = pos(50.1, 8.0, 0.0, 0, 0); // ~6 NM north
        assert!(is_distant_enough(&a, &b, 2.5));
        assert!(is_close_enough(&a, &b, 20.0));
        assert!(!is_close_enough(&a, &b, 5.0));
    }

    #[test]
    fn test_scan_three_laps() {
        let cleaned = laps(3, 180.0);
        let segments = scan_segments(&cleaned);
        assert_eq!(segments, vec![vec![3, 5, 10, 15, 20, 25]]);
    }

    #[test]
    fn test_scan_empty_and_single() {
        assert!(scan_segments(&[]).is_empty());
        assert!(scan_segments(&[pos_nm(0.0, 0.0, 90.0, 0)]).is_empty());
    }

    #[test]
    fn test_uturn_is_dropped() {
        let mut cleaned = Vec::new();
        for (i, x) in [0.0, 2.0, 4.0, 6.0].into_iter().enumerate() {
            cleaned.push(pos_nm(x, 0.0, 90.0, 1000 + 30 * i as i64));
        }
        cleaned.push(pos_nm(7.0, -0.5, 180.0, 1120));
        for i in 0..8 {
            cleaned.push(pos_nm(6.0 - 2.0 * i as f64, -1.0, 270.0, 1150 + 30 * i as i64));
        }
        assert!(scan_segments(&cleaned).is_empty());
        assert!(!check_for_pattern(&cleaned, None).is_holding);
    }

    #[test]
    fn test_merge_close_segments() {
        let mut cleaned = Vec::new();
        for t0 in [1000, 1300, 2200, 2500] {
            cleaned.extend(lap(0.0, t0, 180.0));
        }
        let segments = scan_segments(&cleaned);
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.len() == 4));

        let merged = merge_segments(&cleaned, segments);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].len(), 8);
        assert_eq!(check_for_pattern(&cleaned, None).laps, 4);
    }

    #[test]
    fn test_merge_keeps_distant_segments_apart() {
        let cleaned = vec![
            pos_nm(0.0, 0.0, 90.0, 0),
            pos_nm(5.0, 0.0, 90.0, 0),
            pos_nm(30.0, 0.0, 90.0, 0),
        ];
        let merged = merge_segments(&cleaned, vec![vec![0], vec![1], vec![2]]);
        assert_eq!(merged, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_select_longest_first_on_tie() {
        let segments = vec![vec![1, 2, 3], vec![4, 5, 6, 7], vec![8, 9, 10, 11]];
        assert_eq!(select_segment(&segments), Some(&[4, 5, 6, 7][..]));
        assert_eq!(select_segment(&[]), None);
    }

    #[test]
    fn test_coherence() {
        let cleaned = vec![
            pos_nm(0.0, 0.0, 90.0, 0),
            pos_nm(10.0, 0.0, 90.0, 0),
            pos_nm(19.0, 0.0, 90.0, 0),
            pos_nm(25.0, 0.0, 90.0, 0),
        ];
        assert!(is_coherent(&cleaned, &[0, 1, 2]));
        assert!(!is_coherent(&cleaned, &[0, 1, 3]));
        assert!(is_coherent(&cleaned, &[]));
    }

    #[test]
    fn test_spread_out_chain_is_not_holding() {
        let mut cleaned = Vec::new();
        for k in 0..5 {
            cleaned.extend(lap(8.0 * k as f64, HOLD_START + k as i64 * 300, 180.0));
        }
        let segments = scan_segments(&cleaned);
        assert_eq!(segments, vec![vec![3, 5, 11, 15, 21, 25, 31, 35, 41, 45]]);
        assert!(!check_for_pattern(&cleaned, None).is_holding);
    }

    #[test]
    fn test_pattern_right_hand() {
        let cleaned = laps(3, 180.0);
        let result = check_for_pattern(&cleaned, None);
        assert!(result.is_holding);
        assert_eq!(result.laps, 3);
        assert_eq!(result.direction, Direction::Right);
        assert_eq!(result.altitude_ft, ALT);

        let fix = result.fix_point.unwrap();
        assert!(fix.is_placeholder());
        assert_eq!(fix.latitude, cleaned[3].lat);
        assert_eq!(fix.longitude, cleaned[3].lon);
    }

    #[test]
    fn test_pattern_left_hand() {
        let result = check_for_pattern(&laps(3, 0.0), None);
        assert!(result.is_holding);
        assert_eq!(result.direction, Direction::Left);
    }

    #[test]
    fn test_constant_heading_is_not_holding() {
        let cleaned: Vec<Position> = (0..40)
            .map(|i| pos_nm(i as f64, 0.0, 90.0, 30 * i as i64))
            .collect();
        assert_eq!(check_for_pattern(&cleaned, None), HoldingResult::not_holding());
    }
}
