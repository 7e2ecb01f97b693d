//! The switch controller state machine
//!
//! A [`SwitchController`] consumes [`PointerEvent`]s, moves its knob,
//! and reports `(direction, angle, distance)` through [`ControllerSignal`]s.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use bevy::ecs::prelude::Component;
use bevy::log::{debug, trace};
use bevy::math::{UVec2, Vec2};
use bevy::reflect::Reflect;
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::config::{ActionTable, SwitchControllerConfig};
use crate::direction::SwitchDirection;
use crate::errors::{ConfigError, GeometryError};
use crate::geometry::{DisplaySizes, SwitchGeometry};
use crate::placement::pointer_angle;
use crate::pointer::{PointerEvent, PointerEventKind};
use crate::signal::{
    ControllerListener, ControllerSignal, ListenerSlot, SharedSignal, SignalSnapshot, Signals,
};

/// Identifies a controller, so that one listener can tell several controllers apart
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    Reflect,
    Serialize,
    Deserialize,
)]
pub struct ControllerId(u32);

impl ControllerId {
    /// Wraps a raw id
    ///
    /// Ids are normally handed out by a [`ControllerIdAllocator`]; this is mostly useful in tests.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Hands out monotonically increasing [`ControllerId`]s
///
/// [`SwitchController::new`] draws from [`ControllerIdAllocator::global`],
/// so every controller in the process gets a distinct id.
/// A separate allocator can be used to get reproducible ids, for example in tests.
#[derive(Debug, Default)]
pub struct ControllerIdAllocator {
    next: AtomicU32,
}

impl ControllerIdAllocator {
    /// Creates an allocator whose first id is 0
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU32::new(0),
        }
    }

    /// The process-wide allocator
    #[must_use]
    pub fn global() -> &'static ControllerIdAllocator {
        static GLOBAL: ControllerIdAllocator = ControllerIdAllocator::new();
        &GLOBAL
    }

    /// Returns the next unused id
    pub fn allocate(&self) -> ControllerId {
        ControllerId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// An on-screen joystick with a fixed background ring and a knob that follows the pointer
///
/// The controller is idle until a [`PointerEventKind::Down`] lands inside its live area.
/// While active, every move updates the knob, the angle and the distance, and reports them;
/// the coarse [`SwitchDirection`] is reported whenever it changes.
/// Releasing the pointer resets the knob and reports [`SwitchDirection::Center`].
///
/// Presses are ignored until both image sizes and the widget size are known.
///
/// # Example
/// ```rust
/// use bevy::math::UVec2;
/// use switch_controller::prelude::*;
///
/// let mut controller = SwitchController::new(SwitchControllerConfig {
///     width: 200,
///     height: 200,
///     ..Default::default()
/// });
/// controller.set_background_size(UVec2::splat(160));
/// controller.set_foreground_size(UVec2::splat(40));
///
/// controller.handle_pointer(PointerEvent::down(100.0, 100.0));
/// let signals = controller.handle_pointer(PointerEvent::moved(160.0, 100.0));
///
/// assert_eq!(signals.direction_change(), Some(SwitchDirection::Right));
/// assert_eq!(controller.distance(), 60.0);
/// ```
#[derive(Component, Debug)]
pub struct SwitchController {
    id: ControllerId,
    config: SwitchControllerConfig,
    background: Option<UVec2>,
    foreground: Option<UVec2>,
    display_sizes: Option<DisplaySizes>,
    geometry: Option<SwitchGeometry>,
    is_active: bool,
    direction: SwitchDirection,
    previous_direction: SwitchDirection,
    angle: f64,
    distance: f64,
    knob: Vec2,
    listener: ListenerSlot,
    shared: Arc<SharedSignal>,
}

impl SwitchController {
    /// Creates an idle controller, drawing its id from [`ControllerIdAllocator::global`]
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`SwitchControllerConfig::validate`].
    #[must_use]
    pub fn new(config: SwitchControllerConfig) -> Self {
        match Self::try_new(config) {
            Ok(controller) => controller,
            Err(error) => panic!("invalid switch controller config: {error}"),
        }
    }

    /// Creates an idle controller, drawing its id from [`ControllerIdAllocator::global`]
    pub fn try_new(config: SwitchControllerConfig) -> Result<Self, ConfigError> {
        Self::with_allocator(config, ControllerIdAllocator::global())
    }

    /// Creates an idle controller, drawing its id from `allocator`
    pub fn with_allocator(
        config: SwitchControllerConfig,
        allocator: &ControllerIdAllocator,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            id: allocator.allocate(),
            config,
            background: None,
            foreground: None,
            display_sizes: None,
            geometry: None,
            is_active: false,
            direction: SwitchDirection::Center,
            previous_direction: SwitchDirection::Center,
            angle: 0.0,
            distance: 0.0,
            knob: Vec2::ZERO,
            listener: ListenerSlot::default(),
            shared: Arc::new(SharedSignal::default()),
        })
    }

    /// Sets the background and foreground image sizes at once, rebuilding the geometry a single time
    #[must_use]
    pub fn with_image_sizes(mut self, background: UVec2, foreground: UVec2) -> Self {
        self.background = Some(background);
        self.foreground = Some(foreground);
        self.rebuild_geometry();
        self
    }

    /// The id of this controller
    #[inline]
    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// The settings this controller was created with
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SwitchControllerConfig {
        &self.config
    }

    /// Is a pointer currently driving this controller?
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// The current direction
    ///
    /// This is [`SwitchDirection::Center`] only while idle.
    #[inline]
    #[must_use]
    pub fn direction(&self) -> SwitchDirection {
        self.direction
    }

    /// The direction before the most recent transition
    #[inline]
    #[must_use]
    pub fn previous_direction(&self) -> SwitchDirection {
        self.previous_direction
    }

    /// The name of the current direction, such as `"DIRECTION_UP"`
    #[inline]
    #[must_use]
    pub fn direction_name(&self) -> &'static str {
        self.direction.name()
    }

    /// The most recent angle, in degrees counter-clockwise from east
    ///
    /// While idle, this keeps the value from the last gesture.
    #[inline]
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The most recent distance from the widget center to the pointer, in pixels
    #[inline]
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// The top-left corner of the knob, in widget-local pixels
    #[inline]
    #[must_use]
    pub fn knob_position(&self) -> Vec2 {
        self.knob
    }

    /// The opacity the widget should be drawn with
    #[inline]
    #[must_use]
    pub fn opacity(&self) -> f32 {
        if self.is_active {
            self.config.active_opacity
        } else {
            self.config.inactive_opacity
        }
    }

    /// The current layout constants, once both image sizes are known
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> Option<&SwitchGeometry> {
        self.geometry.as_ref()
    }

    /// The sizes the host should draw the background and foreground images at
    #[inline]
    #[must_use]
    pub fn display_sizes(&self) -> Option<DisplaySizes> {
        self.display_sizes
    }

    /// A consistent copy of the current output
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> SignalSnapshot {
        self.shared.load()
    }

    /// A handle to the output that can be sampled from other threads
    #[must_use]
    pub fn shared_signal(&self) -> Arc<SharedSignal> {
        Arc::clone(&self.shared)
    }

    /// Replaces the action codes reported with each direction change
    pub fn set_actions(&mut self, actions: Option<ActionTable>) {
        self.config.actions = actions;
    }

    /// Registers `listener`, replacing any previous one
    ///
    /// Only a weak reference is kept: the caller decides how long the listener lives.
    pub fn set_listener<L: ControllerListener + 'static>(&mut self, listener: &Arc<L>) {
        self.listener.set(listener);
    }

    /// Registers an already type-erased `listener`, replacing any previous one
    pub fn set_dyn_listener(&mut self, listener: &Arc<dyn ControllerListener>) {
        self.listener.set_dyn(listener);
    }

    /// Stops delivering signals to the current listener
    pub fn clear_listener(&mut self) {
        self.listener.clear();
    }

    /// Sets the intrinsic size of the background image, rebuilding the geometry if it changed
    pub fn set_background_size(&mut self, size: UVec2) {
        if self.background != Some(size) {
            self.background = Some(size);
            self.rebuild_geometry();
        }
    }

    /// Sets the intrinsic size of the foreground image, rebuilding the geometry if it changed
    pub fn set_foreground_size(&mut self, size: UVec2) {
        if self.foreground != Some(size) {
            self.foreground = Some(size);
            self.rebuild_geometry();
        }
    }

    /// Resizes the widget, rebuilding the geometry if the size changed
    pub fn set_widget_size(&mut self, size: UVec2) {
        if self.config.size() != size {
            self.config.width = size.x;
            self.config.height = size.y;
            self.rebuild_geometry();
        }
    }

    /// Recomputes the display sizes and layout constants from the current sizes
    ///
    /// An idle knob is moved back to the middle of the new layout.
    pub fn refresh_geometry(&mut self) -> Result<SwitchGeometry, GeometryError> {
        let (Some(background), Some(foreground)) = (self.background, self.foreground) else {
            return Err(GeometryError::MissingDrawable);
        };

        let widget_size = self.config.size();
        let display_sizes = DisplaySizes::reconcile(background, foreground, widget_size);
        let geometry = SwitchGeometry::from_display_sizes(display_sizes, widget_size);

        self.display_sizes = Some(display_sizes);
        self.geometry = Some(geometry);
        if !self.is_active {
            self.knob = geometry.middle;
        }

        debug!(
            "Controller {} laid out: background {}, foreground {}, widget {}",
            self.id, display_sizes.background, display_sizes.foreground, widget_size
        );
        Ok(geometry)
    }

    fn rebuild_geometry(&mut self) {
        if let Err(error) = self.refresh_geometry() {
            debug!("Controller {} skipped layout: {error}", self.id);
        }
    }

    /// Feeds one pointer event through the state machine
    ///
    /// The returned signals have already been delivered to the listener, in the same order.
    /// Events that do not apply to the current state (such as a move while idle) produce no signals.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Signals {
        let signals = match event.kind {
            PointerEventKind::Down if !self.is_active => self.press(event.position),
            PointerEventKind::Move if self.is_active => self.drag(event.position),
            PointerEventKind::Up | PointerEventKind::Cancel if self.is_active => self.release(),
            _ => {
                trace!(
                    "Controller {} ignored {:?} while active={}",
                    self.id,
                    event.kind,
                    self.is_active
                );
                return Signals::NONE;
            }
        };

        if !signals.is_empty() {
            self.shared.store(SignalSnapshot::new(
                self.is_active,
                self.direction,
                self.angle,
                self.distance,
            ));
            self.listener.deliver(&signals);
        }

        signals
    }

    fn press(&mut self, position: Vec2) -> Signals {
        let Some(geometry) = self.geometry else {
            return Signals::NONE;
        };

        if !geometry.live_area_contains(
            position,
            self.config.keep_inside,
            self.config.detect_transparency,
        ) {
            return Signals::NONE;
        }

        self.is_active = true;
        self.track(&geometry, position);
        debug!("Controller {} activated at {position}", self.id);

        let mut signals = Signals::NONE;
        signals.push(self.direction_signal());
        signals.push(self.move_signal());
        signals
    }

    fn drag(&mut self, position: Vec2) -> Signals {
        let Some(geometry) = self.geometry else {
            return Signals::NONE;
        };

        let changed = self.track(&geometry, position);
        trace!(
            "Controller {} moved to {position}: {} at {:.1} degrees",
            self.id,
            self.direction,
            self.angle
        );

        let mut signals = Signals::NONE;
        if changed {
            signals.push(self.direction_signal());
        }
        signals.push(self.move_signal());
        signals
    }

    fn release(&mut self) -> Signals {
        self.previous_direction = self.direction;
        self.direction = SwitchDirection::Center;
        self.is_active = false;
        if let Some(geometry) = self.geometry {
            self.knob = geometry.middle;
        }
        debug!("Controller {} released", self.id);

        let mut signals = Signals::NONE;
        signals.push(self.direction_signal());
        signals.push(self.move_signal());
        signals
    }

    /// Updates angle, distance, direction and knob for a pointer at `position`
    ///
    /// Returns whether the direction changed.
    fn track(&mut self, geometry: &SwitchGeometry, position: Vec2) -> bool {
        let delta = position.as_dvec2() - geometry.center.as_dvec2();
        self.distance = delta.length();
        self.angle = pointer_angle(delta);

        self.previous_direction = self.direction;
        if let Some(direction) = SwitchDirection::from_delta(delta.as_vec2()) {
            self.direction = direction;
        }

        self.knob = self.config.placement().place(geometry, position, self.direction);
        self.direction != self.previous_direction
    }

    fn direction_signal(&self) -> ControllerSignal {
        ControllerSignal::DirectionChange {
            id: self.id,
            direction: self.direction,
            action: self.config.action(self.direction),
        }
    }

    fn move_signal(&self) -> ControllerSignal {
        ControllerSignal::Move {
            id: self.id,
            angle: self.angle,
            distance: self.distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SwitchController {
        let allocator = ControllerIdAllocator::new();
        SwitchController::with_allocator(
            SwitchControllerConfig {
                width: 200,
                height: 200,
                ..Default::default()
            },
            &allocator,
        )
        .unwrap()
        .with_image_sizes(UVec2::splat(160), UVec2::splat(40))
    }

    #[test]
    fn allocator_is_monotonic() {
        let allocator = ControllerIdAllocator::new();
        let ids: Vec<u32> = (0..5).map(|_| allocator.allocate().raw()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);

        let first = SwitchController::new(SwitchControllerConfig::default());
        let second = SwitchController::new(SwitchControllerConfig::default());
        assert!(second.id() > first.id());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SwitchControllerConfig {
            inactive_opacity: 2.0,
            ..Default::default()
        };

        assert_eq!(
            SwitchController::try_new(config).unwrap_err(),
            ConfigError::InactiveOpacityOutOfRange { value: 2.0 }
        );
    }

    #[test]
    #[should_panic]
    fn new_panics_on_invalid_config() {
        let _ = SwitchController::new(SwitchControllerConfig {
            active_opacity: -1.0,
            ..Default::default()
        });
    }

    #[test]
    fn initial_state() {
        let controller = controller();

        assert!(!controller.is_active());
        assert_eq!(controller.direction(), SwitchDirection::Center);
        assert_eq!(controller.knob_position(), Vec2::new(80.0, 80.0));
        assert_eq!(controller.direction_name(), "DIRECTION_CENTER");
        assert_eq!(controller.snapshot(), SignalSnapshot::default());
    }

    #[test]
    fn missing_drawables_fail_closed() {
        let mut controller = SwitchController::new(SwitchControllerConfig {
            width: 200,
            height: 200,
            detect_transparency: true,
            ..Default::default()
        });
        assert_eq!(controller.refresh_geometry(), Err(GeometryError::MissingDrawable));

        controller.set_background_size(UVec2::splat(160));
        assert!(controller.geometry().is_none());
        assert!(controller.handle_pointer(PointerEvent::down(100.0, 100.0)).is_empty());
        assert!(!controller.is_active());

        controller.set_foreground_size(UVec2::splat(40));
        assert!(controller.geometry().is_some());
        assert_eq!(controller.handle_pointer(PointerEvent::down(100.0, 100.0)).len(), 2);
    }

    #[test]
    fn opacity_follows_activity() {
        let mut controller = SwitchController::with_allocator(
            SwitchControllerConfig {
                width: 200,
                height: 200,
                active_opacity: 0.9,
                inactive_opacity: 0.4,
                ..Default::default()
            },
            &ControllerIdAllocator::new(),
        )
        .unwrap()
        .with_image_sizes(UVec2::splat(160), UVec2::splat(40));

        assert_eq!(controller.opacity(), 0.4);
        controller.handle_pointer(PointerEvent::down(120.0, 100.0));
        assert_eq!(controller.opacity(), 0.9);
        controller.handle_pointer(PointerEvent::cancel(120.0, 100.0));
        assert_eq!(controller.opacity(), 0.4);
    }

    #[test]
    fn resizing_rebuilds_the_geometry() {
        let mut controller = controller();
        controller.set_widget_size(UVec2::splat(100));

        let geometry = controller.geometry().unwrap();
        assert_eq!(geometry.background_half, 40.0);
        assert_eq!(geometry.foreground_half, 10.0);
        assert_eq!(controller.knob_position(), Vec2::new(40.0, 40.0));
        assert_eq!(
            controller.display_sizes(),
            Some(DisplaySizes {
                background: UVec2::splat(80),
                foreground: UVec2::splat(20),
            })
        );
    }

    #[test]
    fn second_press_is_ignored() {
        let mut controller = controller();

        controller.handle_pointer(PointerEvent::down(150.0, 100.0));
        assert!(controller.handle_pointer(PointerEvent::down(100.0, 60.0)).is_empty());
        assert_eq!(controller.direction(), SwitchDirection::Right);
    }

    #[test]
    fn release_reports_the_last_tracked_position() {
        let mut controller = controller();

        controller.handle_pointer(PointerEvent::down(100.0, 140.0));
        let signals: Vec<ControllerSignal> = controller
            .handle_pointer(PointerEvent::up(10.0, 10.0))
            .into_iter()
            .collect();

        assert_eq!(
            signals[1],
            ControllerSignal::Move {
                id: controller.id(),
                angle: 270.0,
                distance: 40.0,
            }
        );
        assert_eq!(controller.previous_direction(), SwitchDirection::Down);
    }

    #[test]
    fn actions_are_reported() {
        let mut controller = controller();
        controller.set_actions(Some(ActionTable::new([100, 101, 102, 103, 104])));

        let signals = controller.handle_pointer(PointerEvent::down(100.0, 50.0));
        let first = signals.iter().next().copied();
        assert_eq!(
            first,
            Some(ControllerSignal::DirectionChange {
                id: controller.id(),
                direction: SwitchDirection::Up,
                action: 103,
            })
        );

        let signals = controller.handle_pointer(PointerEvent::up(100.0, 50.0));
        assert_eq!(
            signals.iter().next().copied(),
            Some(ControllerSignal::DirectionChange {
                id: controller.id(),
                direction: SwitchDirection::Center,
                action: 100,
            })
        );
    }

    #[test]
    fn snapshot_is_published() {
        let mut controller = controller();
        let shared = controller.shared_signal();

        controller.handle_pointer(PointerEvent::down(100.0, 60.0));
        let snapshot = shared.load();
        assert!(snapshot.active);
        assert_eq!(snapshot.direction, SwitchDirection::Up);
        assert_eq!(snapshot.angle(), 90.0);
        assert_eq!(snapshot.distance(), 40.0);

        controller.handle_pointer(PointerEvent::up(100.0, 60.0));
        let snapshot = shared.load();
        assert!(!snapshot.active);
        assert_eq!(snapshot.direction, SwitchDirection::Center);
    }
}
