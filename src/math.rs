//! Angle utilities for the Qibla compass

/// Full turn in degrees
pub const FULL_TURN: f64 = 360.0;

/// Normalize an angle into [0, 360)
///
/// Negative inputs are wrapped by adding a full turn before the final
/// modulo, so `-90` becomes `270` and `720` becomes `0`. Values already in
/// range come back bit-for-bit unchanged.
///
/// ```
/// use qibla_compass::normalize_degrees;
///
/// assert_eq!(normalize_degrees(-90.0), 270.0);
/// assert_eq!(normalize_degrees(360.0), 0.0);
/// assert_eq!(normalize_degrees(0.1), 0.1);
/// ```
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees % FULL_TURN;
    if wrapped < 0.0 {
        (wrapped + FULL_TURN) % FULL_TURN
    } else {
        // folds -0.0 into +0.0
        wrapped + 0.0
    }
}

/// Round an angle to the nearest whole degree for presentation
///
/// The result stays in [0, 360), so 359.6 rounds to 0 rather than 360.
pub fn round_degrees(degrees: f64) -> u16 {
    (degrees.round() as i64).rem_euclid(360) as u16
}

/// Clockwise angle from `from` to `to`, in [0, 360)
pub fn clockwise_difference(from: f64, to: f64) -> f64 {
    normalize_degrees(to - from)
}
