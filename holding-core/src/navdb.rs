//! Read-only navigation catalog: airports and waypoints.
//!
//! The engine only ever queries the catalog. [`NavDb`] is an in-memory
//! implementation built once (from vectors or a JSON document) and shared
//! behind an `Arc` afterwards.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::trajectory::BoundingBox;
use crate::types::{Airport, Result, Waypoint};

/// Lookups the detection engine needs from a navigation database.
pub trait NavCatalog: Send + Sync {
    /// Airport with exactly this ICAO code (case-insensitive).
    fn airport_by_icao(&self, icao: &str) -> Option<&Airport>;

    /// Airports inside `bbox`, in catalog order.
    fn airports_within(&self, bbox: &BoundingBox) -> Vec<&Airport>;

    /// Waypoints inside `bbox`, in catalog order.
    fn waypoints_within(&self, bbox: &BoundingBox) -> Vec<&Waypoint>;
}

/// JSON document shape: `{ "airports": [...], "waypoints": [...] }`.
#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    airports: Vec<Airport>,
    #[serde(default)]
    waypoints: Vec<Waypoint>,
}

/// In-memory navigation catalog.
#[derive(Debug, Default)]
pub struct NavDb {
    airports: Vec<Airport>,
    waypoints: Vec<Waypoint>,
    icao_index: HashMap<String, usize>,
}

impl NavDb {
    /// Build a catalog. For duplicate ICAO codes the first airport wins.
    pub fn new(airports: Vec<Airport>, waypoints: Vec<Waypoint>) -> Self {
        let mut icao_index = HashMap::new();
        for (i, airport) in airports.iter().enumerate() {
            if airport.icao.is_empty() {
                continue;
            }
            icao_index.entry(airport.icao.to_uppercase()).or_insert(i);
        }
        NavDb {
            airports,
            waypoints,
            icao_index,
        }
    }

    /// Build a catalog from a JSON document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let doc: CatalogDocument = serde_json::from_reader(reader)?;
        let db = NavDb::new(doc.airports, doc.waypoints);
        tracing::info!(
            airports = db.airports.len(),
            waypoints = db.waypoints.len(),
            "loaded navigation catalog"
        );
        Ok(db)
    }

    /// Load a JSON catalog file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading navigation catalog");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn airports(&self) -> &[Airport] {
        &self.airports
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty() && self.waypoints.is_empty()
    }
}

impl NavCatalog for NavDb {
    fn airport_by_icao(&self, icao: &str) -> Option<&Airport> {
        self.icao_index
            .get(&icao.to_uppercase())
            .map(|&i| &self.airports[i])
    }

    fn airports_within(&self, bbox: &BoundingBox) -> Vec<&Airport> {
        self.airports
            .iter()
            .filter(|a| bbox.contains(a.latitude, a.longitude))
            .collect()
    }

    fn waypoints_within(&self, bbox: &BoundingBox) -> Vec<&Waypoint> {
        self.waypoints
            .iter()
            .filter(|w| bbox.contains(w.latitude, w.longitude))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{airport, waypoint};
    use std::io::Write;

    #[test]
    fn test_empty_catalog() {
        let db = NavDb::default();
        assert!(db.is_empty());
        assert!(db.airport_by_icao("EKCH").is_none());
        assert!(db
            .waypoints_within(&BoundingBox::around(0.0, 0.0, 90.0))
            .is_empty());
    }

    #[test]
    fn test_icao_lookup_case_insensitive() {
        let db = NavDb::new(vec![airport(1, "EKCH", 55.62, 12.65, 17.0)], vec![]);
        assert_eq!(db.airport_by_icao("EKCH").map(|a| a.id), Some(1));
        assert_eq!(db.airport_by_icao("ekch").map(|a| a.id), Some(1));
        assert!(db.airport_by_icao("EGLL").is_none());
    }

    #[test]
    fn test_empty_icao_never_indexed() {
        let db = NavDb::new(vec![airport(1, "", 55.62, 12.65, 17.0)], vec![]);
        assert!(db.airport_by_icao("").is_none());
    }

    #[test]
    fn test_duplicate_icao_first_wins() {
        let db = NavDb::new(
            vec![
                airport(1, "EKCH", 55.62, 12.65, 17.0),
                airport(2, "EKCH", 0.0, 0.0, 0.0),
            ],
            vec![],
        );
        assert_eq!(db.airport_by_icao("EKCH").map(|a| a.id), Some(1));
    }

    #[test]
    fn test_waypoints_within_keep_catalog_order() {
        let db = NavDb::new(
            vec![],
            vec![
                waypoint(3, "CCC", 50.1, 8.1),
                waypoint(1, "AAA", 50.0, 8.0),
                waypoint(2, "BBB", 52.0, 8.0),
            ],
        );
        let ids: Vec<i64> = db
            .waypoints_within(&BoundingBox::around(50.0, 8.0, 0.25))
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_from_reader() {
        let json = r#"{
            "airports": [{"id": 1, "identifier": "EDDF", "icao": "EDDF", "name": "Frankfurt",
                          "latitude": 50.03, "longitude": 8.57, "elevation": 364}],
            "waypoints": [{"id": 10, "identifier": "ROLIS", "latitude": 50.2, "longitude": 8.0}]
        }"#;
        let db = NavDb::from_reader(json.as_bytes()).unwrap();
        assert_eq!(db.airports().len(), 1);
        assert_eq!(db.waypoints().len(), 1);
        assert_eq!(db.airport_by_icao("EDDF").unwrap().elevation_ft, 364.0);
        assert_eq!(db.waypoints()[0].identifier, "ROLIS");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"waypoints": []}}"#).unwrap();
        let db = NavDb::from_file(file.path()).unwrap();
        assert!(db.is_empty());
        assert!(NavDb::from_file("/nonexistent/navdb.json").is_err());
    }
}
