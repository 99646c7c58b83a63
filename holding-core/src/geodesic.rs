//! Ellipsoidal distance on WGS-84 (Vincenty inverse solution).
//!
//! Key constants:
//! - a = 6378137.0 m (semi-major axis)
//! - f = 1 / 298.257223563 (flattening)
//! - 1 NM = 1852 m

use std::f64::consts::PI;

use crate::types::Position;

/// WGS-84 semi-major axis (metres).
const WGS84_A: f64 = 6378137.0;

/// WGS-84 flattening.
const WGS84_F: f64 = 1.0 / 298.257223563;

/// WGS-84 semi-minor axis (metres).
const WGS84_B: f64 = WGS84_A * (1.0 - WGS84_F);

const METRES_PER_NM: f64 = 1852.0;

/// Default convergence threshold on λ (radians).
pub const DEFAULT_PRECISION: f64 = 1e-8;

const MAX_ITERATIONS: u32 = 100;

/// Geodesic distance in nautical miles between two positions.
pub fn distance_nm(a: &Position, b: &Position) -> f64 {
    vincenty_nm(a.lat, a.lon, b.lat, b.lon, DEFAULT_PRECISION)
}

/// Longitude in radians, with -180° pinned to +π so both sides of the
/// antimeridian land on the same value.
fn lon_radians(lon: f64) -> f64 {
    if lon == -180.0 {
        PI
    } else {
        lon.to_radians()
    }
}

/// Vincenty inverse distance in nautical miles.
///
/// Iterates until successive λ estimates differ by at most `precision` or the
/// iteration budget runs out; in the latter case the last estimate is used.
/// Coincident points return 0.
pub fn vincenty_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64, precision: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let l = lon_radians(lon2) - lon_radians(lon1);

    let tan_u1 = (1.0 - WGS84_F) * phi1.tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;
    let tan_u2 = (1.0 - WGS84_F) * phi2.tan();
    let cos_u2 = 1.0 / (1.0 + tan_u2 * tan_u2).sqrt();
    let sin_u2 = tan_u2 * cos_u2;

    let mut cos_sq_alpha: f64;
    let mut cos_2sigma_m: f64;
    let mut sin_sigma: f64;
    let mut cos_sigma: f64;
    let mut sigma: f64;

    let mut lambda = l;
    let mut iterations = 0;
    loop {
        iterations += 1;
        let sin_lambda = lambda.sin();
        let cos_lambda = lambda.cos();
        let a1 = cos_u2 * sin_lambda;
        let b1 = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        let sin_sq_sigma = a1 * a1 + b1 * b1;
        if sin_sq_sigma == 0.0 {
            // co-incident points
            return 0.0;
        }

        sin_sigma = sin_sq_sigma.sqrt();
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // equatorial line: cos²α = 0
        cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() <= precision {
            break;
        }
        if iterations >= MAX_ITERATIONS {
            tracing::debug!(lat1, lon1, lat2, lon2, "vincenty did not converge, using last estimate");
            break;
        }
    }

    let cos_sq_2sigma_m = cos_2sigma_m * cos_2sigma_m;
    let u_sq = cos_sq_alpha * (WGS84_A * WGS84_A - WGS84_B * WGS84_B) / (WGS84_B * WGS84_B);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_sq_2sigma_m)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_sq_2sigma_m)));

    WGS84_B * big_a * (sigma - delta_sigma) / METRES_PER_NM
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
