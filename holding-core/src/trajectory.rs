//! Trajectory loading and coordinate bounding boxes.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::types::{Position, Result};

/// Axis-aligned lat/lon box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box extending `buffer` degrees on each side of (`lat`, `lon`).
    pub fn around(lat: f64, lon: f64, buffer: f64) -> Self {
        BoundingBox {
            min_lat: lat - buffer,
            max_lat: lat + buffer,
            min_lon: lon - buffer,
            max_lon: lon + buffer,
        }
    }

    /// Smallest box covering every position. `None` for an empty slice.
    pub fn of(positions: &[Position]) -> Option<Self> {
        let first = positions.first()?;
        let mut bbox = BoundingBox {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        for p in &positions[1..] {
            bbox.min_lat = bbox.min_lat.min(p.lat);
            bbox.max_lat = bbox.max_lat.max(p.lat);
            bbox.min_lon = bbox.min_lon.min(p.lon);
            bbox.max_lon = bbox.max_lon.max(p.lon);
        }
        Some(bbox)
    }

    /// Flat-earth area in square degrees.
    pub fn area(&self) -> f64 {
        (self.max_lat - self.min_lat).abs() * (self.max_lon - self.min_lon).abs()
    }

    /// Inclusive containment test.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// Read a JSON array of positions.
///
/// Positions are kept in the order given. Out-of-order timestamps are logged
/// but not corrected.
pub fn read_trajectory<R: Read>(reader: R) -> Result<Vec<Position>> {
    let positions: Vec<Position> = serde_json::from_reader(reader)?;
    if let Some(i) = positions
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        tracing::warn!(index = i + 1, "trajectory timestamps are not ascending");
    }
    Ok(positions)
}

/// Load a JSON trajectory file.
pub fn load_trajectory<P: AsRef<Path>>(path: P) -> Result<Vec<Position>> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading trajectory");
    let file = File::open(path)?;
    read_trajectory(BufReader::new(file))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
