//! Qibla compass session driver
//!
//! Wires the platform sources to the heading normalizer, the bearing
//! calculator and the reconciler. All state lives in one owned
//! [`QiblaCompass`] and changes only through its event handlers, each of
//! which runs to completion before the next event is applied.

use crate::activation::PermissionResult;
use crate::bearing::{bearing, great_circle_distance};
use crate::error::{CompassError, CompassResult};
use crate::events::{CompassEvent, EventQueue};
use crate::heading::HeadingNormalizer;
use crate::platform::{
    DisplaySink, LocationResult, LocationSource, Notification, NotificationSink,
    OrientationSource, SessionId, SubscriptionHandle, WatchHandle,
};
use crate::reconciler::{DirectionReconciler, DisplayFrame};
use crate::types::{
    ActivationState, CompassSettings, LocationMode, PlatformCapabilities, RawOrientationSample,
};
use log::{debug, info, warn};

/// Qibla compass bound to one set of platform collaborators
///
/// # Example
/// ```
/// use qibla_compass::{
///     DisplayFrame, GeoCoordinate, LocationSource, Notification, OrientationSource,
///     PlatformCapabilities, QiblaCompass, RawOrientationSample, ScreenRotation, SessionId,
///     SubscriptionHandle,
/// };
///
/// struct Sensors;
/// impl OrientationSource for Sensors {
///     fn capabilities(&self) -> PlatformCapabilities { PlatformCapabilities::default() }
///     fn request_permission(&mut self, _: SessionId) {}
///     fn subscribe(&mut self, _: SessionId) -> SubscriptionHandle { SubscriptionHandle(1) }
///     fn unsubscribe(&mut self, _: SubscriptionHandle) {}
///     fn screen_rotation(&self) -> Option<ScreenRotation> { None }
/// }
///
/// struct Gps;
/// impl LocationSource for Gps {
///     fn is_available(&self) -> bool { true }
///     fn request_position(&mut self, _: SessionId) {}
/// }
///
/// let mut compass = QiblaCompass::new(Sensors, Gps, |_: Notification| {}, |_: &DisplayFrame| {});
/// let session = compass.activate();
///
/// let new_york = GeoCoordinate::new(40.7128, -74.0060).unwrap();
/// compass.on_location_result(session, Ok(new_york));
/// compass.on_orientation(session, RawOrientationSample::from_native_heading(90.0));
///
/// assert_eq!(compass.frame().rounded_relative(), 328); // 58.5° - 90°
/// ```
pub struct QiblaCompass<O, L, N, D>
where
    O: OrientationSource,
    L: LocationSource,
    N: NotificationSink,
    D: DisplaySink,
{
    orientation: O,
    location: L,
    notifications: N,
    display: D,
    settings: CompassSettings,
    normalizer: HeadingNormalizer,
    reconciler: DirectionReconciler,
    /// Active session, `None` before activation and after teardown
    session: Option<SessionId>,
    session_counter: u64,
    subscription: Option<SubscriptionHandle>,
    watch: Option<WatchHandle>,
    awaiting_location: bool,
}

impl<O, L, N, D> QiblaCompass<O, L, N, D>
where
    O: OrientationSource,
    L: LocationSource,
    N: NotificationSink,
    D: DisplaySink,
{
    /// Create a compass with default settings
    pub fn new(orientation: O, location: L, notifications: N, display: D) -> Self {
        Self::build(
            orientation,
            location,
            notifications,
            display,
            CompassSettings::default(),
        )
    }

    /// Create a compass with validated settings
    pub fn with_settings(
        orientation: O,
        location: L,
        notifications: N,
        display: D,
        settings: CompassSettings,
    ) -> CompassResult<Self> {
        settings.validate()?;
        Ok(Self::build(
            orientation,
            location,
            notifications,
            display,
            settings,
        ))
    }

    fn build(
        orientation: O,
        location: L,
        notifications: N,
        display: D,
        settings: CompassSettings,
    ) -> Self {
        Self {
            orientation,
            location,
            notifications,
            display,
            settings,
            normalizer: HeadingNormalizer::new(),
            reconciler: DirectionReconciler::from_settings(&settings),
            session: None,
            session_counter: 0,
            subscription: None,
            watch: None,
            awaiting_location: false,
        }
    }

    /// Start a new activation session
    ///
    /// Any previous session is torn down first and heading and bearing are
    /// cleared. On platforms without a consent model the sources are started
    /// before this returns; otherwise the permission request is issued and
    /// the compass waits in `Requesting`.
    pub fn activate(&mut self) -> SessionId {
        self.deactivate();

        self.session_counter += 1;
        let session = SessionId::new(self.session_counter);
        self.session = Some(session);
        self.reconciler.reset();

        let capabilities = self.orientation.capabilities();
        info!(
            "activating session {} (native heading: {}, explicit permission: {})",
            session.id(),
            capabilities.has_native_heading,
            capabilities.requires_explicit_permission
        );

        if self.normalizer.activate(capabilities).accepts_samples() {
            self.start_sources(session);
        } else {
            self.orientation.request_permission(session);
        }

        session
    }

    /// Apply the outcome of the permission request issued for `session`
    pub fn on_permission_result(&mut self, session: SessionId, result: PermissionResult) {
        if !self.is_current(session) {
            debug!("discarding permission result for stale session {}", session.id());
            return;
        }

        match self.normalizer.resolve_permission(&result) {
            Some(ActivationState::Granted) => {
                self.notifications.notify(Notification::permission_granted());
                self.start_sources(session);
            }
            Some(ActivationState::Denied) => {
                let notification = match result {
                    Err(reason) => Notification::permission_error(reason),
                    Ok(_) => {
                        warn!("orientation permission denied by user");
                        Notification::permission_denied()
                    }
                };
                self.notifications.notify(notification);
            }
            _ => {}
        }
    }

    /// Apply a location fix (or failure) for `session`
    ///
    /// A failure ends location for the session; the bearing stays at its
    /// last value.
    pub fn on_location_result(&mut self, session: SessionId, result: LocationResult) {
        if !self.is_current(session) || !self.awaiting_location {
            debug!("discarding location result for session {}", session.id());
            return;
        }

        match result {
            Ok(observer) => {
                if self.settings.location_mode == LocationMode::OneShot {
                    self.awaiting_location = false;
                }

                let target = self.settings.target;
                let direction = bearing(observer, target);
                let distance = great_circle_distance(observer, target);
                info!(
                    "location fix ({:.4}, {:.4}): bearing {:.2}°, distance {:.1} km",
                    observer.latitude(),
                    observer.longitude(),
                    direction,
                    distance
                );

                self.notifications.notify(Notification::location_found());
                let frame = self.reconciler.update_bearing(direction, Some(distance));
                self.display.render(&frame);
            }
            Err(reason) => {
                warn!("location request failed: {}", reason);
                self.stop_location();
                self.notifications.notify(Notification::location_error(
                    CompassError::LocationRequestFailed { reason },
                ));
            }
        }
    }

    /// Apply one orientation sample delivered for `session`
    ///
    /// Returns the new canonical heading, or `None` when the sample was
    /// gated, stale or malformed.
    pub fn on_orientation(&mut self, session: SessionId, sample: RawOrientationSample) -> Option<f64> {
        if !self.is_current(session) {
            debug!("discarding orientation sample for stale session {}", session.id());
            return None;
        }

        let rotation = self.orientation.screen_rotation();
        let heading = self.normalizer.process(&sample, rotation)?;

        let frame = self.reconciler.update_heading(heading);
        self.display.render(&frame);
        Some(heading)
    }

    /// Release every subscription and invalidate the session
    ///
    /// Safe to call repeatedly. Heading and bearing keep their last values.
    pub fn deactivate(&mut self) {
        if let Some(handle) = self.subscription.take() {
            self.orientation.unsubscribe(handle);
        }
        self.stop_location();
        self.normalizer.deactivate();

        if let Some(session) = self.session.take() {
            info!("deactivated session {}", session.id());
        }
    }

    /// Apply a channel-delivered event
    pub fn handle(&mut self, event: CompassEvent) {
        match event {
            CompassEvent::Activate => {
                self.activate();
            }
            CompassEvent::PermissionResolved { session, result } => {
                self.on_permission_result(session, result)
            }
            CompassEvent::LocationResolved { session, result } => {
                self.on_location_result(session, result)
            }
            CompassEvent::Orientation { session, sample } => {
                self.on_orientation(session, sample);
            }
            CompassEvent::Deactivate => self.deactivate(),
        }
    }

    /// Apply every event currently queued, in order
    ///
    /// Returns the number of events applied.
    pub fn pump(&mut self, queue: &EventQueue) -> usize {
        let mut applied = 0;
        while let Some(event) = queue.try_next() {
            self.handle(event);
            applied += 1;
        }
        applied
    }

    fn start_sources(&mut self, session: SessionId) {
        self.subscription = Some(self.orientation.subscribe(session));

        if !self.location.is_available() {
            warn!("no location capability present");
            self.notifications
                .notify(Notification::location_error(CompassError::LocationUnavailable));
            return;
        }

        self.awaiting_location = true;
        match self.settings.location_mode {
            LocationMode::OneShot => self.location.request_position(session),
            LocationMode::Watch => self.watch = self.location.watch_position(session),
        }
    }

    fn stop_location(&mut self) {
        self.awaiting_location = false;
        if let Some(handle) = self.watch.take() {
            self.location.clear_watch(handle);
        }
    }

    fn is_current(&self, session: SessionId) -> bool {
        self.session == Some(session)
    }

    /// Activation state of the current session
    pub fn state(&self) -> ActivationState {
        self.normalizer.state()
    }

    /// Current session, `None` when inactive
    pub fn session(&self) -> Option<SessionId> {
        self.session
    }

    /// Capabilities resolved at the last activation
    pub fn capabilities(&self) -> PlatformCapabilities {
        self.normalizer.capabilities()
    }

    /// Canonical heading as owned by the normalizer
    pub fn heading(&self) -> Option<f64> {
        self.normalizer.heading()
    }

    pub fn bearing(&self) -> Option<f64> {
        self.reconciler.bearing()
    }

    /// Latest display snapshot
    pub fn frame(&self) -> DisplayFrame {
        self.reconciler.frame()
    }

    pub fn settings(&self) -> &CompassSettings {
        &self.settings
    }

    pub fn orientation_source(&self) -> &O {
        &self.orientation
    }

    pub fn location_source(&self) -> &L {
        &self.location
    }

    pub fn notification_sink(&self) -> &N {
        &self.notifications
    }

    pub fn display_sink(&self) -> &D {
        &self.display
    }
}

impl<O, L, N, D> Drop for QiblaCompass<O, L, N, D>
where
    O: OrientationSource,
    L: LocationSource,
    N: NotificationSink,
    D: DisplaySink,
{
    fn drop(&mut self) {
        self.deactivate();
    }
}
