//! Shared types, error enum, trajectory samples, navigation points and the
//! detection result for holding-core.

use std::hash::{Hash, Hasher};
use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// All errors produced by holding-core.
///
/// The detection algorithms themselves never fail; these come from loading
/// trajectories, catalogs and configuration.
#[derive(Debug, Error)]
pub enum HoldingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error("unknown flight filter: {0}")]
    UnknownFilter(String),
}

pub type Result<T> = std::result::Result<T, HoldingError>;

// ---------------------------------------------------------------------------
// Trajectory samples
// ---------------------------------------------------------------------------

/// One position report of a flight, in the shape the upstream traffic
/// service delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "id", default)]
    pub flight_id: i64,
    #[serde(rename = "aircraftId", default)]
    pub aircraft_id: String,
    pub lat: f64,
    pub lon: f64,
    /// Degrees, [0, 360).
    pub heading: f64,
    #[serde(rename = "alt")]
    pub altitude_ft: i32,
    /// Unix seconds.
    #[serde(rename = "clock")]
    pub timestamp: i64,
    #[serde(rename = "orig", default)]
    pub origin: String,
    #[serde(rename = "dest", default)]
    pub destination: String,
    #[serde(rename = "aircraftType", default)]
    pub aircraft_type: String,
}

// ---------------------------------------------------------------------------
// Navigation points
// ---------------------------------------------------------------------------

/// Identity and location shared by every navigation catalog entry.
pub trait NavPoint {
    fn id(&self) -> i64;
    fn identifier(&self) -> &str;
    fn name(&self) -> &str;
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;

    /// True if this point lies within `buffer` degrees of (`lat`, `lon`) on
    /// both axes (inclusive).
    fn within(&self, lat: f64, lon: f64, buffer: f64) -> bool {
        self.longitude() >= lon - buffer
            && self.longitude() <= lon + buffer
            && self.latitude() >= lat - buffer
            && self.latitude() <= lat + buffer
    }
}

/// A named navigational fix. Identity is the catalog id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: i64,
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Catalog id of the synthesized fix point.
pub const PLACEHOLDER_FIX_ID: i64 = -1;

impl Waypoint {
    /// Stand-in fix used when no catalog waypoint matches a holding.
    pub fn placeholder(latitude: f64, longitude: f64) -> Self {
        Waypoint {
            id: PLACEHOLDER_FIX_ID,
            identifier: "FIX".into(),
            name: "FIXPOINT".into(),
            latitude,
            longitude,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_FIX_ID
    }
}

impl PartialEq for Waypoint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Waypoint {}

impl Hash for Waypoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl NavPoint for Waypoint {
    fn id(&self) -> i64 {
        self.id
    }
    fn identifier(&self) -> &str {
        &self.identifier
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn latitude(&self) -> f64 {
        self.latitude
    }
    fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// An airport from the navigation catalog. Identity is the catalog id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airport {
    pub id: i64,
    pub identifier: String,
    pub icao: String,
    #[serde(default)]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "elevation", default)]
    pub elevation_ft: f64,
}

impl PartialEq for Airport {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Airport {}

impl Hash for Airport {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl NavPoint for Airport {
    fn id(&self) -> i64 {
        self.id
    }
    fn identifier(&self) -> &str {
        &self.identifier
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn latitude(&self) -> f64 {
        self.latitude
    }
    fn longitude(&self) -> f64 {
        self.longitude
    }
}

// ---------------------------------------------------------------------------
// Detection result
// ---------------------------------------------------------------------------

/// Turn direction of a holding pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// Outcome of analysing one flight.
///
/// A non-holding result carries default direction, altitude, laps and no fix
/// point. `laps` is derived from the number of inversion points in
/// [`HoldingResult::holding`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingResult {
    pub is_holding: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub detection_time: Duration,
    pub direction: Direction,
    #[serde(rename = "altitude")]
    pub altitude_ft: i32,
    pub laps: u32,
    pub fix_point: Option<Waypoint>,
}

impl HoldingResult {
    /// Result for a flight that did not hold.
    pub fn not_holding() -> Self {
        HoldingResult::default()
    }

    /// Result for a holding built from `inversion_points` inversion points.
    pub fn holding(
        direction: Direction,
        altitude_ft: i32,
        inversion_points: usize,
        fix_point: Waypoint,
    ) -> Self {
        HoldingResult {
            is_holding: true,
            detection_time: Duration::ZERO,
            direction,
            altitude_ft,
            laps: inversion_points.div_ceil(2) as u32,
            fix_point: Some(fix_point),
        }
    }

    /// Stamp the wall-clock cost of the analysis.
    pub fn with_detection_time(mut self, elapsed: Duration) -> Self {
        self.detection_time = elapsed;
        self
    }
}

fn serialize_millis<S: Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
