//! Core types and settings for the Qibla compass

use crate::bearing::KAABA;
use crate::error::{CompassError, CompassResult};
use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees
///
/// Latitude is within [-90, 90] and longitude within [-180, 180]. Values are
/// validated on construction and never change afterwards.
///
/// # Example
/// ```
/// use qibla_compass::GeoCoordinate;
///
/// let new_york = GeoCoordinate::new(40.7128, -74.0060).unwrap();
/// assert_eq!(new_york.latitude(), 40.7128);
///
/// assert!(GeoCoordinate::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

/// Unvalidated wire form of [`GeoCoordinate`]
#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for GeoCoordinate {
    type Error = CompassError;

    fn try_from(raw: RawCoordinate) -> CompassResult<Self> {
        GeoCoordinate::new(raw.latitude, raw.longitude)
    }
}

impl GeoCoordinate {
    /// Create a validated coordinate
    pub fn new(latitude: f64, longitude: f64) -> CompassResult<Self> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(CompassError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Create a coordinate from trusted constants
    pub(crate) const fn from_degrees_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in decimal degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Whether both components are finite and within range
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// One orientation reading as delivered by the platform
///
/// All angles are in degrees. `alpha` follows the platform convention of
/// counter-clockwise rotation about the screen normal, while
/// `native_heading` (reported by some platforms) is already clockwise from
/// true north. `beta` and `gamma` are the tilt angles and are carried for
/// diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawOrientationSample {
    /// Rotation about the z axis, counter-clockwise
    pub alpha: Option<f64>,
    /// Front-back tilt
    pub beta: Option<f64>,
    /// Left-right tilt
    pub gamma: Option<f64>,
    /// Whether `alpha` is referenced to true north
    pub absolute: bool,
    /// Platform-provided compass heading, clockwise from true north
    pub native_heading: Option<f64>,
}

impl RawOrientationSample {
    /// Sample carrying only an alpha reading
    pub fn from_alpha(alpha: f64, absolute: bool) -> Self {
        Self {
            alpha: Some(alpha),
            absolute,
            ..Default::default()
        }
    }

    /// Sample carrying only a native compass heading
    pub fn from_native_heading(heading: f64) -> Self {
        Self {
            native_heading: Some(heading),
            absolute: true,
            ..Default::default()
        }
    }

    /// Attach a native compass heading to this sample
    pub fn with_native_heading(mut self, heading: f64) -> Self {
        self.native_heading = Some(heading);
        self
    }

    /// Attach front-back and left-right tilt
    pub fn with_tilt(mut self, beta: f64, gamma: f64) -> Self {
        self.beta = Some(beta);
        self.gamma = Some(gamma);
        self
    }
}

/// Current screen rotation as reported by the display subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenRotation {
    #[default]
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl ScreenRotation {
    /// Map a reported angle onto a rotation
    ///
    /// Any angle congruent to 0, 90, 180 or 270 modulo 360 is accepted, so
    /// `-90` maps to `Rotate270`. Other values return `None`.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(ScreenRotation::Rotate0),
            90 => Some(ScreenRotation::Rotate90),
            180 => Some(ScreenRotation::Rotate180),
            270 => Some(ScreenRotation::Rotate270),
            _ => None,
        }
    }

    /// Rotation angle in degrees
    pub fn degrees(&self) -> f64 {
        match self {
            ScreenRotation::Rotate0 => 0.0,
            ScreenRotation::Rotate90 => 90.0,
            ScreenRotation::Rotate180 => 180.0,
            ScreenRotation::Rotate270 => 270.0,
        }
    }
}

/// Orientation permission state for one activation session
///
/// ```text
/// Unrequested -> Requesting -> Granted
///                           -> Denied
///                           -> UnsupportedSoGranted
/// ```
///
/// The three right-hand states are terminal for the session. Re-activation
/// starts over from `Unrequested`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationState {
    #[default]
    Unrequested,
    Requesting,
    Granted,
    Denied,
    /// The platform has no consent model; treated as pre-authorized
    UnsupportedSoGranted,
}

impl ActivationState {
    /// Whether orientation samples are acted upon in this state
    pub fn accepts_samples(&self) -> bool {
        matches!(
            self,
            ActivationState::Granted | ActivationState::UnsupportedSoGranted
        )
    }

    /// Whether the state ends the activation session
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ActivationState::Granted | ActivationState::Denied | ActivationState::UnsupportedSoGranted
        )
    }
}

/// Orientation capabilities of the host platform
///
/// Resolved once per activation and never re-checked per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformCapabilities {
    /// Platform reports a compass heading alongside alpha
    pub has_native_heading: bool,
    /// Orientation access must be granted explicitly by the user
    pub requires_explicit_permission: bool,
}

/// How the display should rotate the Qibla indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorMode {
    /// Single pointer rotated by the precomputed relative angle
    #[default]
    Relative,
    /// Dial counter-rotated by the heading with the pointer nested at the bearing
    Layered,
}

/// How location fixes are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    /// One fix per activation
    #[default]
    OneShot,
    /// Continuous position watch until deactivation
    Watch,
}

/// Compass settings
///
/// # Example
/// ```
/// use qibla_compass::{CompassSettings, IndicatorMode, LocationMode};
///
/// let settings = CompassSettings {
///     indicator_mode: IndicatorMode::Layered,
///     location_mode: LocationMode::Watch,
///     ..Default::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompassSettings {
    /// Indicator rotation convention handed to the display
    pub indicator_mode: IndicatorMode,
    /// One-shot or continuous location
    pub location_mode: LocationMode,
    /// Animation hint for the display in milliseconds
    pub transition_ms: u32,
    /// Destination the indicator points toward
    pub target: GeoCoordinate,
}

impl Default for CompassSettings {
    fn default() -> Self {
        Self {
            indicator_mode: IndicatorMode::default(),
            location_mode: LocationMode::default(),
            transition_ms: 500,
            target: KAABA,
        }
    }
}

impl CompassSettings {
    /// Parse settings from JSON, filling omitted fields with defaults
    ///
    /// ```
    /// use qibla_compass::{CompassSettings, LocationMode};
    ///
    /// let settings = CompassSettings::from_json(r#"{ "location_mode": "watch" }"#).unwrap();
    /// assert_eq!(settings.location_mode, LocationMode::Watch);
    /// assert_eq!(settings.transition_ms, 500);
    /// ```
    pub fn from_json(json: &str) -> CompassResult<Self> {
        let settings: CompassSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that the target coordinate is in range
    pub fn validate(&self) -> CompassResult<()> {
        if self.target.is_valid() {
            Ok(())
        } else {
            Err(CompassError::InvalidSettings {
                reason: format!(
                    "target coordinate out of range: ({}, {})",
                    self.target.latitude(),
                    self.target.longitude()
                ),
            })
        }
    }
}
