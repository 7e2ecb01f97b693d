//! Contains the plugin that drives [`SwitchController`] components from Bevy's input events.

use bevy::app::{App, Plugin, PreUpdate};
use bevy::ecs::prelude::*;
use bevy::input::mouse::MouseButtonInput;
use bevy::input::touch::TouchInput;
use bevy::input::InputSystem;
use bevy::math::Vec2;
use bevy::reflect::Reflect;
use bevy::window::CursorMoved;

use crate::config::{ActionTable, SwitchControllerConfig};
use crate::controller::{ControllerId, SwitchController};
use crate::direction::SwitchDirection;
use crate::sector::Sector;
use crate::signal::ControllerSignal;
use crate::walker::WalkerConfig;

/// The pointer id used for the mouse, which Bevy does not number like touches
pub const MOUSE_POINTER_ID: u64 = u64::MAX;

/// A [`Plugin`] that feeds touches and the mouse to every [`SwitchController`] entity
///
/// Each controller entity needs a [`WidgetOrigin`] and a [`PointerCapture`] as well;
/// [`SwitchControllerBundle`] contains all three.
///
/// Every signal a controller produces is delivered to its listener, if any,
/// and is also sent as a [`SwitchSignal`] event, in the order it was produced.
///
/// ## Systems
///
/// **WARNING:** [`update_switch_controllers`](crate::systems::update_switch_controllers) runs during [`PreUpdate`],
/// after [`InputSystem`], in [`SwitchControllerSystem::Update`].
/// Systems that read [`SwitchSignal`]s during [`PreUpdate`] must be ordered after that set.
#[derive(Debug, Default)]
pub struct SwitchControllerPlugin;

impl Plugin for SwitchControllerPlugin {
    fn build(&self, app: &mut App) {
        use crate::systems::update_switch_controllers;

        app.add_event::<TouchInput>()
            .add_event::<MouseButtonInput>()
            .add_event::<CursorMoved>()
            .add_event::<SwitchSignal>();

        app.configure_sets(PreUpdate, SwitchControllerSystem::Update.after(InputSystem))
            .add_systems(
                PreUpdate,
                update_switch_controllers.in_set(SwitchControllerSystem::Update),
            );

        app.register_type::<SwitchControllerConfig>()
            .register_type::<ActionTable>()
            .register_type::<SwitchDirection>()
            .register_type::<ControllerId>()
            .register_type::<ControllerSignal>()
            .register_type::<Sector>()
            .register_type::<WalkerConfig>()
            .register_type::<WidgetOrigin>()
            .register_type::<PointerCapture>();
    }
}

/// [`SystemSet`]s for the systems added by [`SwitchControllerPlugin`]
#[derive(SystemSet, Clone, Copy, Hash, Debug, PartialEq, Eq)]
pub enum SwitchControllerSystem {
    /// Routes pointer events to controllers and sends [`SwitchSignal`]s
    Update,
}

/// A signal produced by the [`SwitchController`] on `entity`
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SwitchSignal {
    /// The entity holding the controller
    pub entity: Entity,
    /// What the controller reported
    pub signal: ControllerSignal,
}

/// The top-left corner of a controller widget, in window coordinates
///
/// Window coordinates have their origin at the top-left of the window, with `y` growing downwards,
/// so pointer positions are turned into widget-local ones by subtracting this.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct WidgetOrigin(pub Vec2);

/// The pointer that currently owns a controller
///
/// A press that activates the controller captures its pointer;
/// until that pointer is released, events from every other pointer are ignored by this controller.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub struct PointerCapture {
    pointer: Option<u64>,
}

impl PointerCapture {
    /// The captured pointer, if any
    #[inline]
    #[must_use]
    pub fn pointer(&self) -> Option<u64> {
        self.pointer
    }

    /// Is `pointer` the captured pointer?
    #[inline]
    #[must_use]
    pub fn is_captured_by(&self, pointer: u64) -> bool {
        self.pointer == Some(pointer)
    }

    pub(crate) fn capture(&mut self, pointer: u64) {
        self.pointer = Some(pointer);
    }

    pub(crate) fn release(&mut self) {
        self.pointer = None;
    }
}

/// Everything needed to drive a [`SwitchController`] with [`SwitchControllerPlugin`]
#[derive(Bundle, Debug)]
pub struct SwitchControllerBundle {
    /// The controller itself
    pub controller: SwitchController,
    /// Where the widget sits in its window
    pub origin: WidgetOrigin,
    /// Which pointer is driving the controller
    pub capture: PointerCapture,
}

impl SwitchControllerBundle {
    /// Places `controller` with its top-left corner at `origin`, in window coordinates
    #[must_use]
    pub fn new(controller: SwitchController, origin: Vec2) -> Self {
        Self {
            controller,
            origin: WidgetOrigin(origin),
            capture: PointerCapture::default(),
        }
    }
}
