//! Synthetic trajectories and catalog entries for unit tests.
//!
//! Holdings are built in a local frame of nautical-mile offsets around
//! (`ORIGIN_LAT`, `ORIGIN_LON`): `x` east, `y` north.

use crate::types::{Airport, Position, Waypoint};

pub const ORIGIN_LAT: f64 = 50.0;
pub const ORIGIN_LON: f64 = 8.0;

/// Cruise altitude of every synthetic sample.
pub const ALT: i32 = 8000;

/// Seconds between samples inside a hold.
pub const STEP_SEC: i64 = 30;

/// Samples per racetrack lap.
pub const LAP_LEN: usize = 10;

/// Time of the first hold sample in [`holding_flight`].
pub const HOLD_START: i64 = 1000;

/// Number of samples in [`transit`].
pub const TRANSIT_LEN: usize = 10;

pub fn pos(lat: f64, lon: f64, heading: f64, altitude_ft: i32, timestamp: i64) -> Position {
    Position {
        flight_id: 1,
        aircraft_id: "3C6586".into(),
        lat,
        lon,
        heading,
        altitude_ft,
        timestamp,
        origin: "EGLL".into(),
        destination: String::new(),
        aircraft_type: "A320".into(),
    }
}

pub fn lat_at(y: f64) -> f64 {
    ORIGIN_LAT + y / 60.0
}

pub fn lon_at(x: f64) -> f64 {
    ORIGIN_LON + x / (60.0 * ORIGIN_LAT.to_radians().cos())
}

/// Sample `x` NM east and `y` NM north of the origin.
pub fn pos_nm(x: f64, y: f64, heading: f64, timestamp: i64) -> Position {
    pos(lat_at(y), lon_at(x), heading, ALT, timestamp)
}

/// One racetrack lap: four eastbound samples, a turn sample flown on
/// `turn_heading`, four westbound samples 1 NM to the side, and the turn back.
///
/// `turn_heading` 180 gives a right-hand hold, 0 a left-hand one.
pub fn lap(dx: f64, t0: i64, turn_heading: f64) -> Vec<Position> {
    let side = if turn_heading == 180.0 { -1.0 } else { 1.0 };
    let turn_back = (turn_heading + 180.0) % 360.0;
    let t = |i: i64| t0 + i * STEP_SEC;

    let mut v = Vec::with_capacity(LAP_LEN);
    for (i, x) in [0.0, 2.0, 4.0, 6.0].into_iter().enumerate() {
        v.push(pos_nm(dx + x, 0.0, 90.0, t(i as i64)));
    }
    v.push(pos_nm(dx + 7.0, side * 0.5, turn_heading, t(4)));
    for (i, x) in [6.0, 4.0, 2.0, 0.0].into_iter().enumerate() {
        v.push(pos_nm(dx + x, side, 270.0, t(5 + i as i64)));
    }
    v.push(pos_nm(dx - 1.0, side * 0.5, turn_back, t(9)));
    v
}

/// Approach from two degrees south-west on a constant heading, ending just
/// before [`HOLD_START`]. Gives the flight a footprint large enough to pass
/// the short-flight filter.
pub fn transit() -> Vec<Position> {
    (0..TRANSIT_LEN)
        .map(|k| {
            let step = k as f64 * 0.2;
            pos(
                ORIGIN_LAT - 2.0 + step,
                ORIGIN_LON - 2.0 + step,
                45.0,
                ALT,
                400 + k as i64 * 60,
            )
        })
        .collect()
}

/// Transit followed by `laps` identical laps.
pub fn holding_flight(laps: usize, turn_heading: f64) -> Vec<Position> {
    let mut v = transit();
    for k in 0..laps {
        v.extend(lap(0.0, HOLD_START + (k * LAP_LEN) as i64 * STEP_SEC, turn_heading));
    }
    v
}

pub fn waypoint(id: i64, identifier: &str, latitude: f64, longitude: f64) -> Waypoint {
    Waypoint {
        id,
        identifier: identifier.into(),
        name: identifier.into(),
        latitude,
        longitude,
    }
}

pub fn airport(id: i64, icao: &str, latitude: f64, longitude: f64, elevation_ft: f64) -> Airport {
    Airport {
        id,
        identifier: icao.into(),
        icao: icao.into(),
        name: icao.into(),
        latitude,
        longitude,
        elevation_ft,
    }
}
