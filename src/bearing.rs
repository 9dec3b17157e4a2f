//! Great-circle bearing and distance on a spherical Earth

use crate::math::normalize_degrees;
use crate::types::GeoCoordinate;
use nalgebra::Vector3;

/// The Kaaba in Mecca
pub const KAABA: GeoCoordinate = GeoCoordinate::from_degrees_unchecked(21.4225, 39.8262);

/// Mean Earth radius in kilometres (IUGG)
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0088;

/// Calculate the initial great-circle bearing from `observer` to `target`
///
/// Uses the spherical formula
/// `atan2(sin Δλ, cos φ₁·tan φ₂ − sin φ₁·cos Δλ)`, which is exact for a
/// sphere and close enough for pointing a compass indicator.
///
/// A coincident observer and target gives `atan2(0, 0) = 0`. The formula
/// relies on the target not being a pole; a polar target makes `tan φ₂`
/// blow up and the result unstable, but it still never panics.
///
/// # Returns
/// Bearing in degrees clockwise from true north, in [0, 360)
///
/// # Example
/// ```
/// use qibla_compass::{GeoCoordinate, KAABA, bearing};
///
/// let new_york = GeoCoordinate::new(40.7128, -74.0060).unwrap();
/// let heading = bearing(new_york, KAABA);
/// assert!((heading - 58.48).abs() < 0.01);
/// ```
pub fn bearing(observer: GeoCoordinate, target: GeoCoordinate) -> f64 {
    let observer_latitude = observer.latitude().to_radians();
    let target_latitude = target.latitude().to_radians();
    let delta_longitude = (target.longitude() - observer.longitude()).to_radians();

    let y = delta_longitude.sin();
    let x = observer_latitude.cos() * target_latitude.tan()
        - observer_latitude.sin() * delta_longitude.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Bearing from `observer` to the Kaaba
pub fn qibla_bearing(observer: GeoCoordinate) -> f64 {
    bearing(observer, KAABA)
}

/// Great-circle distance between two coordinates in kilometres
///
/// Computed from unit n-vectors as `atan2(|a × b|, a · b)`, which stays
/// well-conditioned for both coincident and antipodal points.
pub fn great_circle_distance(from: GeoCoordinate, to: GeoCoordinate) -> f64 {
    let a = n_vector(from);
    let b = n_vector(to);

    let central_angle = a.cross(&b).norm().atan2(a.dot(&b));

    central_angle * EARTH_MEAN_RADIUS_KM
}

/// Unit vector normal to the sphere at `coordinate`, Earth-centred
fn n_vector(coordinate: GeoCoordinate) -> Vector3<f64> {
    let latitude = coordinate.latitude().to_radians();
    let longitude = coordinate.longitude().to_radians();

    Vector3::new(
        latitude.cos() * longitude.cos(),
        latitude.cos() * longitude.sin(),
        latitude.sin(),
    )
}
