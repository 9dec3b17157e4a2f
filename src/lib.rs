//! Qibla Compass - great-circle bearing and heading normalization for compass indicators
//!
//! This library keeps an on-screen indicator pointed at the Kaaba in Mecca
//! no matter how the device is held. It combines two independent inputs:
//!
//! - the great-circle bearing from the user's location to the target, and
//! - the device heading, normalized from whatever orientation convention the
//!   platform reports into degrees clockwise from true north.
//!
//! The difference of the two is the rotation the display applies to its
//! indicator.
//!
//! # Features
//!
//! - Spherical initial-bearing and great-circle distance calculation
//! - Native compass headings take precedence over derived `alpha` readings
//! - Screen-rotation compensation for relative orientation readings
//! - Permission-gated activation with implicit grant on platforms without
//!   a consent model
//! - Session-tagged asynchronous completions, so nothing mutates state after
//!   teardown
//! - Channel-based event delivery for multi-threaded hosts
//!
//! # Quick Start
//!
//! ```rust
//! use qibla_compass::{
//!     DirectionReconciler, GeoCoordinate, RawOrientationSample, normalize_sample,
//!     qibla_bearing,
//! };
//!
//! let london = GeoCoordinate::new(51.5074, -0.1278).unwrap();
//! let bearing = qibla_bearing(london); // ~119°
//!
//! // Relative alpha reading, screen not rotated
//! let sample = RawOrientationSample::from_alpha(300.0, false);
//! let heading = normalize_sample(&sample, None).unwrap(); // 60°
//!
//! let mut reconciler = DirectionReconciler::default();
//! reconciler.update_bearing(bearing, None);
//! let frame = reconciler.update_heading(heading);
//!
//! // Rotate the indicator ~59° clockwise from the top edge of the device
//! assert_eq!(frame.rounded_relative(), 59);
//! ```
//!
//! For an event-driven session with permission handling and platform
//! sources, see [`QiblaCompass`].

mod activation;
pub mod bearing;
mod compass;
mod error;
pub mod events;
pub mod heading;
mod math;
pub mod platform;
mod reconciler;
mod types;

// Re-export all public types and functions
pub use activation::{Activation, PermissionResponse, PermissionResult};
pub use bearing::{EARTH_MEAN_RADIUS_KM, KAABA, bearing, great_circle_distance, qibla_bearing};
pub use compass::QiblaCompass;
pub use error::{CompassError, CompassResult};
pub use events::{CompassEvent, EventQueue, EventSender};
pub use heading::{HeadingNormalizer, normalize_sample};
pub use math::{clockwise_difference, normalize_degrees, round_degrees};
pub use platform::{
    DisplaySink, LocationResult, LocationSource, Notification, NotificationKind,
    NotificationSink, OrientationSource, SessionId, SubscriptionHandle, WatchHandle,
};
pub use reconciler::{DirectionReconciler, DisplayFrame, IndicatorRotation};
pub use types::*;
