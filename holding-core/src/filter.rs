//! Flight eligibility filters: aircraft type, short flight, glider.
//!
//! Each filter looks at a whole trajectory and answers one question: should
//! this flight be excluded from pattern analysis? The engine runs its list in
//! order and stops at the first filter that says yes.

use crate::trajectory::BoundingBox;
use crate::types::{HoldingError, Position, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Type codes that never fly holdings: unknown, ground vehicles, gliders.
const EXCLUDED_AIRCRAFT_TYPES: &[&str] = &["", "GRND", "GLID", "AS30"];

/// AS30 is a glider type.
const GLIDER_TYPES: &[&str] = &["GLID", "AS30"];

/// Footprint (deg²) at or below which a flight cannot contain a hold plus its
/// transit legs.
const SHORT_FLIGHT_AREA_CUTOFF: f64 = 0.6;

// ---------------------------------------------------------------------------
// Filter trait
// ---------------------------------------------------------------------------

/// A whole-trajectory eligibility predicate.
pub trait TrajectoryFilter {
    /// Stable name, used in configuration and logs.
    fn name(&self) -> &'static str;

    /// `true` excludes the flight from analysis.
    fn should_filter(&self, positions: &[Position]) -> bool;
}

/// Excludes a flight if any position carries an excluded type code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AircraftTypeFilter;

impl TrajectoryFilter for AircraftTypeFilter {
    fn name(&self) -> &'static str {
        "aircraft_type"
    }

    fn should_filter(&self, positions: &[Position]) -> bool {
        positions
            .iter()
            .any(|p| EXCLUDED_AIRCRAFT_TYPES.contains(&p.aircraft_type.as_str()))
    }
}

/// Excludes flights whose lat/lon footprint is too small.
///
/// The area is a flat-earth Δlat × Δlon; it only has to be a cheap pre-filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortFlightFilter;

impl TrajectoryFilter for ShortFlightFilter {
    fn name(&self) -> &'static str {
        "short_flight"
    }

    fn should_filter(&self, positions: &[Position]) -> bool {
        match BoundingBox::of(positions) {
            Some(bbox) => bbox.area() <= SHORT_FLIGHT_AREA_CUTOFF,
            None => true,
        }
    }
}

/// Excludes gliders only. Narrower than [`AircraftTypeFilter`]; useful when
/// the upstream feed leaves many type codes empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GliderFilter;

impl TrajectoryFilter for GliderFilter {
    fn name(&self) -> &'static str {
        "glider"
    }

    fn should_filter(&self, positions: &[Position]) -> bool {
        positions
            .iter()
            .any(|p| GLIDER_TYPES.contains(&p.aircraft_type.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Closed filter set
// ---------------------------------------------------------------------------

/// The filters an engine can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightFilter {
    AircraftType(AircraftTypeFilter),
    ShortFlight(ShortFlightFilter),
    Glider(GliderFilter),
}

impl FlightFilter {
    /// Filters applied when nothing else is configured.
    pub fn defaults() -> Vec<FlightFilter> {
        vec![
            FlightFilter::AircraftType(AircraftTypeFilter),
            FlightFilter::ShortFlight(ShortFlightFilter),
        ]
    }

    /// Parse a filter by its configuration name.
    pub fn from_name(name: &str) -> Result<FlightFilter> {
        match name.trim() {
            "aircraft_type" => Ok(FlightFilter::AircraftType(AircraftTypeFilter)),
            "short_flight" => Ok(FlightFilter::ShortFlight(ShortFlightFilter)),
            "glider" => Ok(FlightFilter::Glider(GliderFilter)),
            other => Err(HoldingError::UnknownFilter(other.to_string())),
        }
    }

    /// Parse a comma-separated list, e.g. `"aircraft_type,short_flight"`.
    pub fn parse_list(list: &str) -> Result<Vec<FlightFilter>> {
        list.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(FlightFilter::from_name)
            .collect()
    }
}

impl TrajectoryFilter for FlightFilter {
    fn name(&self) -> &'static str {
        match self {
            FlightFilter::AircraftType(f) => f.name(),
            FlightFilter::ShortFlight(f) => f.name(),
            FlightFilter::Glider(f) => f.name(),
        }
    }

    fn should_filter(&self, positions: &[Position]) -> bool {
        match self {
            FlightFilter::AircraftType(f) => f.should_filter(positions),
            FlightFilter::ShortFlight(f) => f.should_filter(positions),
            FlightFilter::Glider(f) => f.should_filter(positions),
        }
    }
}

/// First filter in `filters` that excludes the flight, in list order.
pub fn first_match<'a>(filters: &'a [FlightFilter], positions: &[Position]) -> Option<&'a FlightFilter> {
    for filter in filters {
        if filter.should_filter(positions) {
            return Some(filter);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
