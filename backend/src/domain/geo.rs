//! Great-circle distance helpers for the radius search.

/// Earth radius in miles, matching the radius-search contract.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Haversine distance in miles between two `(latitude, longitude)` points.
#[must_use]
pub fn haversine_miles(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}
