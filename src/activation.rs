//! Permission-gated activation state machine

use crate::types::{ActivationState, PlatformCapabilities};
use log::{debug, info, warn};

/// Answer from the platform permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionResponse {
    Granted,
    /// Refused or dismissed by the user
    Denied,
}

/// Result of an asynchronous permission request
///
/// `Err` carries the platform's failure description.
pub type PermissionResult = Result<PermissionResponse, String>;

/// Activation state machine for one session
///
/// Transitions only move forward within a session. Calling
/// [`begin`](Activation::begin) again restarts from `Unrequested`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Activation {
    state: ActivationState,
}

impl Activation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> ActivationState {
        self.state
    }

    /// Start an activation
    ///
    /// Moves to `Requesting`, and when the platform has no consent model
    /// continues synchronously to `UnsupportedSoGranted` in the same call.
    /// Returns the state reached.
    pub fn begin(&mut self, capabilities: PlatformCapabilities) -> ActivationState {
        if self.state != ActivationState::Unrequested {
            debug!("restarting activation from {:?}", self.state);
            self.state = ActivationState::Unrequested;
        }

        self.transition(ActivationState::Requesting);

        if !capabilities.requires_explicit_permission {
            self.transition(ActivationState::UnsupportedSoGranted);
        }

        self.state
    }

    /// Apply the outcome of the permission request
    ///
    /// Only valid while `Requesting`; returns `None` and leaves the state
    /// untouched otherwise.
    pub fn resolve(&mut self, result: &PermissionResult) -> Option<ActivationState> {
        if self.state != ActivationState::Requesting {
            debug!("ignoring permission result in state {:?}", self.state);
            return None;
        }

        let next = match result {
            Ok(PermissionResponse::Granted) => ActivationState::Granted,
            Ok(PermissionResponse::Denied) => ActivationState::Denied,
            Err(reason) => {
                warn!("orientation permission request failed: {}", reason);
                ActivationState::Denied
            }
        };

        self.transition(next);
        Some(next)
    }

    /// Return to `Unrequested`
    pub fn reset(&mut self) {
        self.state = ActivationState::Unrequested;
    }

    fn transition(&mut self, next: ActivationState) {
        info!("activation {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPLICIT: PlatformCapabilities = PlatformCapabilities {
        has_native_heading: true,
        requires_explicit_permission: true,
    };

    const IMPLICIT: PlatformCapabilities = PlatformCapabilities {
        has_native_heading: false,
        requires_explicit_permission: false,
    };

    #[test]
    fn test_unsupported_is_synchronous() {
        let mut activation = Activation::new();
        assert_eq!(activation.state(), ActivationState::Unrequested);

        let state = activation.begin(IMPLICIT);
        assert_eq!(state, ActivationState::UnsupportedSoGranted);
        assert_eq!(activation.state(), ActivationState::UnsupportedSoGranted);
    }

    #[test]
    fn test_explicit_permission_flow() {
        let mut activation = Activation::new();
        assert_eq!(activation.begin(EXPLICIT), ActivationState::Requesting);

        let state = activation.resolve(&Ok(PermissionResponse::Granted));
        assert_eq!(state, Some(ActivationState::Granted));
    }

    #[test]
    fn test_denied_and_error_both_deny() {
        let mut activation = Activation::new();
        activation.begin(EXPLICIT);
        assert_eq!(
            activation.resolve(&Ok(PermissionResponse::Denied)),
            Some(ActivationState::Denied)
        );

        let mut activation = Activation::new();
        activation.begin(EXPLICIT);
        assert_eq!(
            activation.resolve(&Err("NotAllowedError".to_string())),
            Some(ActivationState::Denied)
        );
    }

    #[test]
    fn test_terminal_states_ignore_late_results() {
        let mut activation = Activation::new();
        activation.begin(EXPLICIT);
        activation.resolve(&Ok(PermissionResponse::Denied));

        assert_eq!(activation.resolve(&Ok(PermissionResponse::Granted)), None);
        assert_eq!(activation.state(), ActivationState::Denied);

        let mut unrequested = Activation::new();
        assert_eq!(unrequested.resolve(&Ok(PermissionResponse::Granted)), None);
        assert_eq!(unrequested.state(), ActivationState::Unrequested);
    }

    #[test]
    fn test_reactivation_restarts() {
        let mut activation = Activation::new();
        activation.begin(EXPLICIT);
        activation.resolve(&Ok(PermissionResponse::Denied));

        // User retries
        assert_eq!(activation.begin(EXPLICIT), ActivationState::Requesting);
        assert_eq!(
            activation.resolve(&Ok(PermissionResponse::Granted)),
            Some(ActivationState::Granted)
        );
    }
}
