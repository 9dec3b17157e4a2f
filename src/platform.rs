//! Interfaces to the host platform
//!
//! The compass core never talks to sensors or UI directly. Hosts implement
//! these traits and feed asynchronous completions back into
//! [`QiblaCompass`](crate::QiblaCompass), tagged with the [`SessionId`] the
//! request was issued for.

use crate::error::CompassError;
use crate::reconciler::DisplayFrame;
use crate::types::{GeoCoordinate, PlatformCapabilities, ScreenRotation};

/// Result of an asynchronous location request
///
/// `Err` carries the platform's failure description.
pub type LocationResult = Result<GeoCoordinate, String>;

/// Identifies one activation session
///
/// Completions carrying a stale id are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub(crate) fn new(id: u64) -> Self {
        SessionId(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Handle for an orientation subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub u32);

/// Handle for a continuous location watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchHandle(pub u32);

/// Source of orientation samples and permission
pub trait OrientationSource {
    /// Platform orientation capabilities, queried once per activation
    fn capabilities(&self) -> PlatformCapabilities;

    /// Ask the user for orientation access
    ///
    /// Must not block. The host later calls
    /// [`QiblaCompass::on_permission_result`](crate::QiblaCompass::on_permission_result)
    /// with the same session id.
    fn request_permission(&mut self, session: SessionId);

    /// Start delivering samples for `session`
    fn subscribe(&mut self, session: SessionId) -> SubscriptionHandle;

    /// Stop delivering samples
    fn unsubscribe(&mut self, handle: SubscriptionHandle);

    /// Current screen rotation, `None` when the display cannot tell
    fn screen_rotation(&self) -> Option<ScreenRotation>;
}

/// Source of location fixes
pub trait LocationSource {
    /// Whether any location capability is present
    fn is_available(&self) -> bool;

    /// Request a single fix
    ///
    /// Must not block. The host later calls
    /// [`QiblaCompass::on_location_result`](crate::QiblaCompass::on_location_result).
    fn request_position(&mut self, session: SessionId);

    /// Start a continuous position watch
    ///
    /// Sources without watch support fall back to a single fix and return
    /// `None`.
    fn watch_position(&mut self, session: SessionId) -> Option<WatchHandle> {
        self.request_position(session);
        None
    }

    /// Stop a position watch
    fn clear_watch(&mut self, _handle: WatchHandle) {}
}

/// Kind of user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    PermissionGranted,
    PermissionDenied,
    PermissionError,
    LocationFound,
    LocationError,
}

impl NotificationKind {
    /// Whether the notification reports a failure
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            NotificationKind::PermissionDenied
                | NotificationKind::PermissionError
                | NotificationKind::LocationError
        )
    }
}

/// Informational message for the notification sink
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: &'static str,
    pub description: &'static str,
    /// Underlying failure, for error kinds
    pub error: Option<CompassError>,
}

impl Notification {
    pub fn permission_granted() -> Self {
        Self::new(
            NotificationKind::PermissionGranted,
            "Permission granted",
            "Compass is now active",
            None,
        )
    }

    pub fn permission_denied() -> Self {
        Self::new(
            NotificationKind::PermissionDenied,
            "Permission denied",
            "Please allow compass access to use this feature",
            Some(CompassError::PermissionDenied),
        )
    }

    pub fn permission_error(reason: String) -> Self {
        Self::new(
            NotificationKind::PermissionError,
            "Error",
            "Could not access compass",
            Some(CompassError::PermissionRequestFailed { reason }),
        )
    }

    pub fn location_found() -> Self {
        Self::new(
            NotificationKind::LocationFound,
            "Location found",
            "Qibla direction calculated successfully",
            None,
        )
    }

    pub fn location_error(error: CompassError) -> Self {
        Self::new(
            NotificationKind::LocationError,
            "Location error",
            "Please enable location services to find Qibla direction",
            Some(error),
        )
    }

    fn new(
        kind: NotificationKind,
        title: &'static str,
        description: &'static str,
        error: Option<CompassError>,
    ) -> Self {
        Self {
            kind,
            title,
            description,
            error,
        }
    }
}

/// Receives notifications; return values are never consumed
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

/// Receives a display frame on every recomputation
pub trait DisplaySink {
    fn render(&mut self, frame: &DisplayFrame);
}

impl<F: FnMut(Notification)> NotificationSink for F {
    fn notify(&mut self, notification: Notification) {
        self(notification)
    }
}

impl<F: FnMut(&DisplayFrame)> DisplaySink for F {
    fn render(&mut self, frame: &DisplayFrame) {
        self(frame)
    }
}
