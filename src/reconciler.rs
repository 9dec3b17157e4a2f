//! Heading and bearing reconciliation for the display

use crate::math::{clockwise_difference, normalize_degrees, round_degrees};
use crate::types::{CompassSettings, IndicatorMode};

/// Rotations the display applies to its indicator layers
///
/// Both variants produce the same net rotation of the pointer relative to
/// the device, see [`net`](IndicatorRotation::net).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorRotation {
    /// Rotate a single pointer clockwise by `pointer` degrees
    Relative { pointer: f64 },
    /// Rotate the dial by `dial`, then the pointer nested inside it by `pointer`
    ///
    /// The dial counter-rotates by the heading so its north mark stays on
    /// true north; the pointer sits at the bearing on that dial.
    Layered { dial: f64, pointer: f64 },
}

impl IndicatorRotation {
    /// Net clockwise rotation of the pointer relative to the device, in [0, 360)
    pub fn net(&self) -> f64 {
        match *self {
            IndicatorRotation::Relative { pointer } => pointer,
            IndicatorRotation::Layered { dial, pointer } => normalize_degrees(dial + pointer),
        }
    }
}

/// One snapshot for the display sink
///
/// Unknown inputs read as `0` so the display never has to special-case
/// missing values; the `*_known` flags let it show a placeholder instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFrame {
    /// Canonical device heading in degrees
    pub heading: f64,
    /// Bearing from the observer to the target in degrees
    pub bearing: f64,
    /// Clockwise angle from the device heading to the target
    pub relative: f64,
    pub heading_known: bool,
    pub bearing_known: bool,
    /// Great-circle distance to the target once a fix is known
    pub distance_km: Option<f64>,
    pub indicator: IndicatorRotation,
    /// Animation hint in milliseconds
    pub transition_ms: u32,
}

impl DisplayFrame {
    pub fn rounded_heading(&self) -> u16 {
        round_degrees(self.heading)
    }

    pub fn rounded_bearing(&self) -> u16 {
        round_degrees(self.bearing)
    }

    pub fn rounded_relative(&self) -> u16 {
        round_degrees(self.relative)
    }

    /// Heading text, `--` until a heading is known
    pub fn heading_label(&self) -> String {
        if self.heading_known {
            format!("{}°", self.rounded_heading())
        } else {
            "--°".to_string()
        }
    }

    /// Bearing text, `--` until a location fix is known
    pub fn bearing_label(&self) -> String {
        if self.bearing_known {
            format!("{}°", self.rounded_bearing())
        } else {
            "--°".to_string()
        }
    }
}

/// Combines the latest heading and bearing into indicator rotations
///
/// Latest value wins for both inputs, with no smoothing or debouncing.
#[derive(Debug, Clone)]
pub struct DirectionReconciler {
    mode: IndicatorMode,
    transition_ms: u32,
    heading: Option<f64>,
    bearing: Option<f64>,
    distance_km: Option<f64>,
}

impl DirectionReconciler {
    pub fn new(mode: IndicatorMode, transition_ms: u32) -> Self {
        Self {
            mode,
            transition_ms,
            heading: None,
            bearing: None,
            distance_km: None,
        }
    }

    pub fn from_settings(settings: &CompassSettings) -> Self {
        Self::new(settings.indicator_mode, settings.transition_ms)
    }

    /// Record a new canonical heading and recompute
    pub fn update_heading(&mut self, heading: f64) -> DisplayFrame {
        self.heading = Some(heading);
        self.frame()
    }

    /// Record a new bearing (and distance, when known) and recompute
    pub fn update_bearing(&mut self, bearing: f64, distance_km: Option<f64>) -> DisplayFrame {
        self.bearing = Some(bearing);
        self.distance_km = distance_km;
        self.frame()
    }

    /// `((b - h) + 360) % 360`, with unset inputs read as `0`
    pub fn relative(&self) -> f64 {
        clockwise_difference(self.heading.unwrap_or(0.0), self.bearing.unwrap_or(0.0))
    }

    /// Current display snapshot
    pub fn frame(&self) -> DisplayFrame {
        let heading = self.heading.unwrap_or(0.0);
        let bearing = self.bearing.unwrap_or(0.0);
        let relative = self.relative();

        let indicator = match self.mode {
            IndicatorMode::Relative => IndicatorRotation::Relative { pointer: relative },
            IndicatorMode::Layered => IndicatorRotation::Layered {
                dial: normalize_degrees(-heading),
                pointer: bearing,
            },
        };

        DisplayFrame {
            heading,
            bearing,
            relative,
            heading_known: self.heading.is_some(),
            bearing_known: self.bearing.is_some(),
            distance_km: self.distance_km,
            indicator,
            transition_ms: self.transition_ms,
        }
    }

    pub fn heading(&self) -> Option<f64> {
        self.heading
    }

    pub fn bearing(&self) -> Option<f64> {
        self.bearing
    }

    /// Forget both inputs
    pub fn reset(&mut self) {
        self.heading = None;
        self.bearing = None;
        self.distance_km = None;
    }
}

impl Default for DirectionReconciler {
    fn default() -> Self {
        Self::from_settings(&CompassSettings::default())
    }
}
