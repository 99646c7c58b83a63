//! Heading comparisons modulo 360 and turn direction.
//!
//! The same-direction window is asymmetric: a heading up to `buffer` degrees
//! clockwise of the reference (inclusive) matches, one counter-clockwise must
//! be strictly inside the buffer. Both sides wrap across 0/360.

use crate::types::{Direction, Position};

/// Tolerance (degrees) for two headings to count as the same direction.
pub const HEADING_BUFFER: f64 = 5.0;

/// Headings further apart than this are treated as crossing north.
const SEAM_DIFF: f64 = 270.0;

/// True if `check` points the same way as `actual` within `buffer` degrees.
pub fn is_same_direction(actual: f64, check: f64, buffer: f64) -> bool {
    let actual = actual.rem_euclid(360.0);
    let check = check.rem_euclid(360.0);

    if actual == check {
        return true;
    }

    // clockwise side
    if actual + buffer > 360.0 {
        if check > actual {
            return true;
        }
        let wrapped = (actual + buffer) % 360.0;
        if check <= wrapped {
            return true;
        }
    } else if check >= actual && check <= actual + buffer {
        return true;
    }

    // counter-clockwise side
    if actual - buffer < 0.0 {
        if check < actual {
            return true;
        }
        let wrapped = 360.0 + (actual - buffer);
        if check >= wrapped {
            return true;
        }
    } else if check < actual && check > actual - buffer {
        return true;
    }

    false
}

/// True if `b` flies roughly the reciprocal of `a`.
pub fn is_inverted_heading(a: &Position, b: &Position) -> bool {
    is_same_direction(a.heading, b.heading + 180.0, HEADING_BUFFER)
}

/// Turn direction implied by going from heading `first` to heading `after`.
///
/// Increasing heading is a right turn, decreasing a left turn; when the two
/// are more than 270° apart the pair straddles north and the comparison
/// flips.
pub fn turn_direction(first: f64, after: f64) -> Direction {
    let diff = (first - after).abs();
    if diff > SEAM_DIFF {
        if first < after {
            Direction::Left
        } else {
            Direction::Right
        }
    } else if first - after <= 0.0 {
        Direction::Right
    } else {
        Direction::Left
    }
}

/// Direction of the turn out of the inversion point at `first_idx`.
///
/// Skips forward past every point still flying the inversion point's heading
/// and compares against the first one that is not. `None` if the trajectory
/// ends first.
pub fn direction_after(cleaned: &[Position], first_idx: usize) -> Option<Direction> {
    let first = cleaned.get(first_idx)?;
    let after = cleaned[first_idx..]
        .iter()
        .find(|p| !is_same_direction(first.heading, p.heading, HEADING_BUFFER))?;
    Some(turn_direction(first.heading, after.heading))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
