//! Error taxonomy for the Qibla compass

use thiserror::Error;

/// Result type for compass operations
pub type CompassResult<T> = Result<T, CompassError>;

/// Errors surfaced by the compass core
///
/// None of the runtime errors are fatal. Permission and location failures end the
/// corresponding capability for the current session, and the rest of the
/// compass keeps running with the last known values. Settings errors are
/// raised before a compass exists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompassError {
    /// The user explicitly refused orientation access
    #[error("orientation permission denied")]
    PermissionDenied,

    /// The platform failed while acquiring orientation permission
    #[error("orientation permission request failed: {reason}")]
    PermissionRequestFailed { reason: String },

    /// No location capability is present on this platform
    #[error("location services are unavailable")]
    LocationUnavailable,

    /// The user denied location access or the platform failed to produce a fix
    #[error("location request failed: {reason}")]
    LocationRequestFailed { reason: String },

    /// Orientation sample carried neither a native heading nor alpha
    #[error("orientation sample carries no usable heading")]
    MalformedSample,

    /// Latitude or longitude outside the valid range
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Settings could not be parsed or failed validation
    #[error("invalid settings: {reason}")]
    InvalidSettings { reason: String },
}

impl CompassError {
    /// Check if the compass can keep operating after this error
    ///
    /// Every failure in this core degrades to a frozen or placeholder
    /// display; only settings errors prevent a compass from being built.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CompassError::InvalidSettings { .. })
    }
}

impl From<serde_json::Error> for CompassError {
    fn from(error: serde_json::Error) -> Self {
        CompassError::InvalidSettings {
            reason: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = CompassError::LocationRequestFailed {
            reason: "timeout".to_string(),
        };
        assert_eq!(error.to_string(), "location request failed: timeout");

        let error = CompassError::InvalidCoordinate {
            latitude: 91.0,
            longitude: 0.0,
        };
        assert_eq!(
            error.to_string(),
            "invalid coordinate: latitude 91, longitude 0"
        );
    }

    #[test]
    fn test_recoverability() {
        assert!(CompassError::PermissionDenied.is_recoverable());
        assert!(CompassError::MalformedSample.is_recoverable());
        assert!(CompassError::LocationUnavailable.is_recoverable());
        assert!(
            CompassError::LocationRequestFailed {
                reason: "timeout".to_string()
            }
            .is_recoverable()
        );
        assert!(
            CompassError::InvalidCoordinate {
                latitude: 91.0,
                longitude: 0.0
            }
            .is_recoverable()
        );
        assert!(
            !CompassError::InvalidSettings {
                reason: "bad".to_string()
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<u32>("not json").unwrap_err();
        let error: CompassError = json_error.into();
        assert!(matches!(error, CompassError::InvalidSettings { .. }));
    }
}
