//! Point cleaning: keep only the high, nearby part of a trajectory.
//!
//! Holdings are flown close to the end of the flight and well above the
//! destination, so everything outside a square window around the last
//! position, or below destination elevation + 5000 ft, is dropped before
//! scanning.

use crate::geodesic::{vincenty_nm, DEFAULT_PRECISION};
use crate::navdb::NavCatalog;
use crate::trajectory::BoundingBox;
use crate::types::{Airport, Position};

/// Minimum height above the reference airport for a point to be kept.
pub const MIN_HEIGHT_ABOVE_AIRPORT_FT: f64 = 5000.0;

/// Half-size (degrees) of the box an airport must share with the last
/// position to be used when the destination code does not resolve.
pub const AIRPORT_SEARCH_BUFFER: f64 = 0.125;

/// Airport whose elevation sets the altitude floor.
///
/// Tries the declared destination of the last position first, then the
/// nearest airport within [`AIRPORT_SEARCH_BUFFER`] of it.
pub fn reference_airport<'a>(
    positions: &[Position],
    catalog: &'a dyn NavCatalog,
) -> Option<&'a Airport> {
    let last = positions.last()?;

    if !last.destination.is_empty() {
        if let Some(airport) = catalog.airport_by_icao(&last.destination) {
            return Some(airport);
        }
    }

    let bbox = BoundingBox::around(last.lat, last.lon, AIRPORT_SEARCH_BUFFER);
    let mut nearest: Option<(&Airport, f64)> = None;
    for airport in catalog.airports_within(&bbox) {
        let dist = vincenty_nm(last.lat, last.lon, airport.latitude, airport.longitude, DEFAULT_PRECISION);
        match nearest {
            Some((_, best)) if best <= dist => {}
            _ => nearest = Some((airport, dist)),
        }
    }
    nearest.map(|(airport, _)| airport)
}

/// Keep the positions within `check_distance` degrees (per axis, exclusive)
/// of the last position and more than 5000 ft above the reference airport.
///
/// Returns a new vector; the input is left untouched.
pub fn remove_unnecessary_points(
    positions: &[Position],
    check_distance: f64,
    catalog: Option<&dyn NavCatalog>,
) -> Vec<Position> {
    let last = match positions.last() {
        Some(p) => p,
        None => return Vec::new(),
    };

    let elevation = match catalog.and_then(|c| reference_airport(positions, c)) {
        Some(airport) => {
            tracing::debug!(
                icao = %airport.icao,
                elevation_ft = airport.elevation_ft,
                "reference airport for cleaning"
            );
            airport.elevation_ft
        }
        None => 0.0,
    };
    let floor = elevation + MIN_HEIGHT_ABOVE_AIRPORT_FT;

    let within =
        |value: f64, center: f64| value > center - check_distance && value < center + check_distance;

    positions
        .iter()
        .filter(|p| within(p.lat, last.lat) && within(p.lon, last.lon))
        .filter(|p| p.altitude_ft as f64 > floor)
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
