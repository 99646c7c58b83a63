//! Detection engine: filter, clean, scan.
//!
//! One [`DetectionEngine`] holds immutable settings and an optional shared
//! catalog, so a single instance can serve many flights from many threads.

use std::sync::Arc;
use std::time::Instant;

use crate::clean;
use crate::config::EngineConfig;
use crate::filter::{first_match, FlightFilter, TrajectoryFilter};
use crate::navdb::NavCatalog;
use crate::scanner;
use crate::types::{HoldingResult, Position, Result};

/// A detection result with the size of the cleaned trajectory it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightAnalysis {
    pub result: HoldingResult,
    pub cleaned_points: usize,
}

pub struct DetectionEngine {
    check_distance: f64,
    filters: Vec<FlightFilter>,
    catalog: Option<Arc<dyn NavCatalog>>,
}

impl DetectionEngine {
    /// Engine with the default filters and no catalog.
    pub fn new(check_distance: f64) -> Self {
        DetectionEngine {
            check_distance,
            filters: FlightFilter::defaults(),
            catalog: None,
        }
    }

    /// Build an engine from configuration. Fails on unknown filter names.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(DetectionEngine::new(config.check_distance).with_filters(config.filter_list()?))
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn NavCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_filters(mut self, filters: Vec<FlightFilter>) -> Self {
        self.filters = filters;
        self
    }

    pub fn check_distance(&self) -> f64 {
        self.check_distance
    }

    pub fn filters(&self) -> &[FlightFilter] {
        &self.filters
    }

    pub fn catalog(&self) -> Option<&dyn NavCatalog> {
        self.catalog.as_deref()
    }

    /// Analyse one flight.
    ///
    /// An empty trajectory is not holding and reports zero detection time;
    /// every other outcome carries the wall-clock time spent.
    pub fn analyse_flight(&self, trajectory: &[Position]) -> HoldingResult {
        self.analyse(trajectory).result
    }

    /// Like [`analyse_flight`](Self::analyse_flight), also reporting how many
    /// points survived cleaning (0 for empty or filtered flights).
    pub fn analyse(&self, trajectory: &[Position]) -> FlightAnalysis {
        if trajectory.is_empty() {
            return FlightAnalysis::default();
        }

        let start = Instant::now();
        if self.is_filtered(trajectory) {
            return FlightAnalysis {
                result: HoldingResult::not_holding().with_detection_time(start.elapsed()),
                cleaned_points: 0,
            };
        }

        let cleaned = self.remove_unnecessary_points(trajectory);
        let result = self.check_for_pattern(&cleaned).with_detection_time(start.elapsed());

        tracing::debug!(
            flight = trajectory[0].flight_id,
            points = trajectory.len(),
            cleaned = cleaned.len(),
            holding = result.is_holding,
            laps = result.laps,
            elapsed_us = result.detection_time.as_micros() as u64,
            "analysed flight"
        );
        FlightAnalysis {
            result,
            cleaned_points: cleaned.len(),
        }
    }

    /// True if any configured filter excludes the flight.
    pub fn is_filtered(&self, trajectory: &[Position]) -> bool {
        match first_match(&self.filters, trajectory) {
            Some(filter) => {
                tracing::debug!(
                    flight = trajectory.first().map(|p| p.flight_id),
                    filter = filter.name(),
                    "flight filtered"
                );
                true
            }
            None => false,
        }
    }

    pub fn remove_unnecessary_points(&self, trajectory: &[Position]) -> Vec<Position> {
        clean::remove_unnecessary_points(trajectory, self.check_distance, self.catalog())
    }

    pub fn check_for_pattern(&self, cleaned: &[Position]) -> HoldingResult {
        scanner::check_for_pattern(cleaned, self.catalog())
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        DetectionEngine::new(crate::config::DEFAULT_CHECK_DISTANCE)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
