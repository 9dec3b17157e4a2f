//! Cross-platform heading normalization
//!
//! Platforms report orientation in different conventions. Some deliver a
//! ready-made compass heading, others only the `alpha` rotation, which runs
//! counter-clockwise and may be relative to an arbitrary reference. This
//! module folds them all into one canonical heading: degrees clockwise from
//! true north, in [0, 360).

use crate::activation::{Activation, PermissionResult};
use crate::error::{CompassError, CompassResult};
use crate::math::{FULL_TURN, normalize_degrees};
use crate::types::{ActivationState, PlatformCapabilities, RawOrientationSample, ScreenRotation};
use log::{debug, trace};

/// Convert one raw sample into a canonical heading
///
/// Precedence:
/// 1. A native compass heading is adopted as-is.
/// 2. Otherwise `alpha` is inverted to `360 - alpha`.
/// 3. A relative (`absolute == false`) alpha reading is further offset by
///    the screen rotation, `0` when unavailable.
///
/// Non-finite values count as absent.
///
/// # Errors
/// [`CompassError::MalformedSample`] when neither a native heading nor alpha
/// is usable.
///
/// # Example
/// ```
/// use qibla_compass::{RawOrientationSample, ScreenRotation, normalize_sample};
///
/// let sample = RawOrientationSample::from_alpha(30.0, false);
/// let heading = normalize_sample(&sample, Some(ScreenRotation::Rotate90)).unwrap();
/// assert_eq!(heading, 60.0); // (360 - 30 + 90) % 360
/// ```
pub fn normalize_sample(
    sample: &RawOrientationSample,
    rotation: Option<ScreenRotation>,
) -> CompassResult<f64> {
    if let Some(native) = sample.native_heading.filter(|h| h.is_finite()) {
        return Ok(normalize_degrees(native));
    }

    let alpha = sample
        .alpha
        .filter(|a| a.is_finite())
        .ok_or(CompassError::MalformedSample)?;

    let mut heading = FULL_TURN - alpha;
    if !sample.absolute {
        heading += rotation.unwrap_or_default().degrees();
    }

    Ok(normalize_degrees(heading))
}

/// Stateful, permission-gated heading normalizer
///
/// Holds the latest canonical heading. Samples only take effect while the
/// activation state is `Granted` or `UnsupportedSoGranted`; a malformed
/// sample leaves the previous heading in place.
#[derive(Debug, Clone, Default)]
pub struct HeadingNormalizer {
    capabilities: PlatformCapabilities,
    activation: Activation,
    heading: Option<f64>,
}

impl HeadingNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin an activation with the platform's capabilities
    ///
    /// Clears the stored heading. Capabilities are fixed until the next
    /// activation.
    pub fn activate(&mut self, capabilities: PlatformCapabilities) -> ActivationState {
        self.capabilities = capabilities;
        self.heading = None;
        self.activation.begin(capabilities)
    }

    /// Apply the permission outcome; see [`Activation::resolve`]
    pub fn resolve_permission(&mut self, result: &PermissionResult) -> Option<ActivationState> {
        self.activation.resolve(result)
    }

    /// Stop acting on samples and return to `Unrequested`
    ///
    /// The last heading is kept so a frozen display can still show it.
    pub fn deactivate(&mut self) {
        self.activation.reset();
    }

    /// Process one sample, returning the new heading when accepted
    pub fn process(
        &mut self,
        sample: &RawOrientationSample,
        rotation: Option<ScreenRotation>,
    ) -> Option<f64> {
        if !self.activation.state().accepts_samples() {
            debug!("discarding sample in state {:?}", self.activation.state());
            return None;
        }

        trace!(
            "raw orientation: alpha={:?} beta={:?} gamma={:?} absolute={} native={:?}",
            sample.alpha, sample.beta, sample.gamma, sample.absolute, sample.native_heading
        );

        match normalize_sample(sample, rotation) {
            Ok(heading) => {
                self.heading = Some(heading);
                Some(heading)
            }
            Err(error) => {
                debug!("discarding sample: {}", error);
                None
            }
        }
    }

    /// Latest canonical heading, if any sample has been accepted
    pub fn heading(&self) -> Option<f64> {
        self.heading
    }

    pub fn state(&self) -> ActivationState {
        self.activation.state()
    }

    pub fn capabilities(&self) -> PlatformCapabilities {
        self.capabilities
    }
}
