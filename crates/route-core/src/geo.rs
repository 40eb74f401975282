//! Spherical geometry for route and runway rendering.
//!
//! All functions take positions in (latitude, longitude) order through
//! [`GeoPosition`] so screen-space (x = lon, y = lat) pairs can never be
//! fed in swapped.

use crate::models::GeoPosition;
use std::f64::consts::PI;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Upper bound on the number of segments `densify_great_circle` emits.
pub const MAX_DENSIFY_SEGMENTS: usize = 100_000;

/// Below this `sin` of the central angle two distinct points are treated
/// as antipodal and the path follows the initial bearing instead of slerp.
const ANTIPODAL_SIN_EPS: f64 = 1e-6;

/// Initial bearing (forward azimuth) from `a` to `b` in degrees, `[0, 360)`.
///
/// Returns `0` when `a == b`.
pub fn initial_bearing(a: GeoPosition, b: GeoPosition) -> f64 {
    let phi1 = a.latitude_deg().to_radians();
    let phi2 = b.latitude_deg().to_radians();
    let delta_lambda = (b.longitude_deg() - a.longitude_deg()).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Fold any angle in degrees into `[0, 360)`.
pub fn normalize_bearing(deg: f64) -> f64 {
    let folded = (deg + 360.0) % 360.0;
    let folded = if folded < 0.0 { folded + 360.0 } else { folded };
    // `-1e-15 + 360.0` rounds to exactly 360.0
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}

/// Central angle between two points in radians (haversine).
pub fn central_angle(a: GeoPosition, b: GeoPosition) -> f64 {
    let phi1 = a.latitude_deg().to_radians();
    let phi2 = b.latitude_deg().to_radians();
    let dphi = phi2 - phi1;
    let dlambda = (b.longitude_deg() - a.longitude_deg()).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt())
}

/// Great-circle distance in meters.
pub fn haversine_distance_m(a: GeoPosition, b: GeoPosition) -> f64 {
    EARTH_RADIUS_M * central_angle(a, b)
}

/// Point reached by travelling `distance_m` from `start` along a great
/// circle with initial bearing `bearing_deg`.
pub fn destination(start: GeoPosition, bearing_deg: f64, distance_m: f64) -> GeoPosition {
    if distance_m.abs() <= f64::EPSILON {
        return start;
    }

    let lat1 = start.latitude_deg().to_radians();
    let lon1 = start.longitude_deg().to_radians();
    let bearing = bearing_deg.to_radians();
    let angular_distance = distance_m / EARTH_RADIUS_M;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let lon2 = (lon1 + y.atan2(x) + PI).rem_euclid(2.0 * PI) - PI;

    GeoPosition::wrapped(lat2.to_degrees(), lon2.to_degrees())
}

/// Sample a great-circle arc from `a` to `b` so that consecutive points
/// are at most `max_segment_m` apart along the arc.
///
/// The result always starts at `a` and ends at `b`; `a == b` yields `[a]`.
/// Interpolation happens on the unit sphere, so arcs crossing the
/// antimeridian take the short way round. A non-positive or non-finite
/// spacing disables densification and returns just the endpoints.
///
/// At most [`MAX_DENSIFY_SEGMENTS`] segments are produced. A spacing
/// finer than `arc / MAX_DENSIFY_SEGMENTS` is coarsened to that.
pub fn densify_great_circle(
    a: GeoPosition,
    b: GeoPosition,
    max_segment_m: f64,
) -> Vec<GeoPosition> {
    let (ax, ay, az) = to_unit_vector(a);
    let (bx, by, bz) = to_unit_vector(b);

    // atan2(|a x b|, a . b) stays well conditioned near 0 and near pi,
    // where the haversine form loses precision.
    let (cx, cy, cz) = (ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx);
    let sin_d = (cx * cx + cy * cy + cz * cz).sqrt();
    let d = sin_d.atan2(ax * bx + ay * by + az * bz);

    if a == b || d <= f64::EPSILON {
        return vec![a];
    }
    if !max_segment_m.is_finite() || max_segment_m <= 0.0 {
        return vec![a, b];
    }

    let wanted = ((d * EARTH_RADIUS_M) / max_segment_m).ceil();
    let segments = if wanted.is_finite() && wanted < MAX_DENSIFY_SEGMENTS as f64 {
        (wanted as usize).max(1)
    } else {
        MAX_DENSIFY_SEGMENTS
    };
    let mut path = Vec::with_capacity(segments + 1);
    path.push(a);

    if sin_d < ANTIPODAL_SIN_EPS && d > PI / 2.0 {
        // Near antipodes the slerp weights blow up; walk the great circle
        // leaving `a` on its initial bearing instead.
        let bearing = initial_bearing(a, b);
        let step_m = d * EARTH_RADIUS_M / segments as f64;
        for i in 1..segments {
            path.push(destination(a, bearing, step_m * i as f64));
        }
        path.push(b);
        return path;
    }

    for i in 1..segments {
        let f = i as f64 / segments as f64;
        let wa = ((1.0 - f) * d).sin() / sin_d;
        let wb = (f * d).sin() / sin_d;

        let x = wa * ax + wb * bx;
        let y = wa * ay + wb * by;
        let z = wa * az + wb * bz;

        let lat = z.atan2((x * x + y * y).sqrt());
        let lon = y.atan2(x);
        path.push(GeoPosition::wrapped(lat.to_degrees(), lon.to_degrees()));
    }

    path.push(b);
    path
}

fn to_unit_vector(pos: GeoPosition) -> (f64, f64, f64) {
    let lat = pos.latitude_deg().to_radians();
    let lon = pos.longitude_deg().to_radians();
    (lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Cut a path wherever it crosses the antimeridian.
///
/// Each crossing closes the current part at ±180 and opens the next part
/// on the opposite edge at the same interpolated latitude, so every part
/// can be drawn on a flat projection without a wrap-around stroke.
pub fn split_at_antimeridian(path: &[GeoPosition]) -> Vec<Vec<GeoPosition>> {
    let mut parts = Vec::new();
    let Some(first) = path.first() else {
        return parts;
    };

    let mut current = vec![*first];
    for pair in path.windows(2) {
        let (p, q) = (pair[0], pair[1]);
        let lon1 = p.longitude_deg();
        let lon2 = q.longitude_deg();

        if (lon2 - lon1).abs() > 180.0 {
            let edge = if lon1 > 0.0 { 180.0 } else { -180.0 };
            let lon2_unwrapped = if lon1 > 0.0 { lon2 + 360.0 } else { lon2 - 360.0 };
            let span = lon2_unwrapped - lon1;
            let t = if span.abs() > f64::EPSILON {
                ((edge - lon1) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let lat = p.latitude_deg() + (q.latitude_deg() - p.latitude_deg()) * t;

            current.push(GeoPosition::wrapped(lat, edge));
            parts.push(std::mem::take(&mut current));
            current.push(GeoPosition::wrapped(lat, -edge));
        }

        current.push(q);
    }

    parts.push(current);
    parts
}
