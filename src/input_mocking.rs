//! Helpful utilities for testing switch controllers by sending mock pointer events

use bevy::app::App;
use bevy::ecs::entity::Entity;
use bevy::ecs::world::World;
use bevy::input::mouse::{MouseButton, MouseButtonInput};
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::input::ButtonState;
use bevy::math::Vec2;
use bevy::window::CursorMoved;

/// Send fake touch and mouse events for testing purposes
///
/// Positions are in window coordinates. Events are attributed to [`Entity::PLACEHOLDER`] rather than a real window,
/// and are processed the next time the [`SwitchControllerPlugin`](crate::plugin::SwitchControllerPlugin) systems run.
///
/// # Example
/// ```rust
/// use bevy::input::InputPlugin;
/// use bevy::math::Vec2;
/// use bevy::prelude::*;
/// use switch_controller::prelude::*;
///
/// let mut app = App::new();
/// app.add_plugins((MinimalPlugins, InputPlugin, SwitchControllerPlugin));
///
/// // Put one finger down and drag it to the right
/// app.press_touch(0, Vec2::new(100.0, 100.0));
/// app.move_touch(0, Vec2::new(150.0, 100.0));
/// app.update();
/// ```
pub trait MockPointer {
    /// Sends a [`TouchInput`] for finger `id`
    fn send_touch(&mut self, id: u64, phase: TouchPhase, position: Vec2);

    /// Sends a [`CursorMoved`] event
    fn send_cursor_moved(&mut self, position: Vec2);

    /// Sends a [`MouseButtonInput`] for the left mouse button
    fn send_left_button(&mut self, state: ButtonState);

    /// Puts finger `id` down at `position`
    fn press_touch(&mut self, id: u64, position: Vec2) {
        self.send_touch(id, TouchPhase::Started, position);
    }

    /// Drags finger `id` to `position`
    fn move_touch(&mut self, id: u64, position: Vec2) {
        self.send_touch(id, TouchPhase::Moved, position);
    }

    /// Lifts finger `id` at `position`
    fn release_touch(&mut self, id: u64, position: Vec2) {
        self.send_touch(id, TouchPhase::Ended, position);
    }

    /// Aborts the gesture of finger `id`
    fn cancel_touch(&mut self, id: u64, position: Vec2) {
        self.send_touch(id, TouchPhase::Canceled, position);
    }

    /// Moves the cursor to `position` and presses the left mouse button
    fn press_mouse(&mut self, position: Vec2) {
        self.send_cursor_moved(position);
        self.send_left_button(ButtonState::Pressed);
    }

    /// Releases the left mouse button wherever the cursor is
    fn release_mouse(&mut self) {
        self.send_left_button(ButtonState::Released);
    }
}

impl MockPointer for World {
    fn send_touch(&mut self, id: u64, phase: TouchPhase, position: Vec2) {
        self.send_event(TouchInput {
            phase,
            position,
            window: Entity::PLACEHOLDER,
            force: None,
            id,
        });
    }

    fn send_cursor_moved(&mut self, position: Vec2) {
        self.send_event(CursorMoved {
            window: Entity::PLACEHOLDER,
            position,
            delta: None,
        });
    }

    fn send_left_button(&mut self, state: ButtonState) {
        self.send_event(MouseButtonInput {
            button: MouseButton::Left,
            state,
            window: Entity::PLACEHOLDER,
        });
    }
}

impl MockPointer for App {
    fn send_touch(&mut self, id: u64, phase: TouchPhase, position: Vec2) {
        self.world_mut().send_touch(id, phase, position);
    }

    fn send_cursor_moved(&mut self, position: Vec2) {
        self.world_mut().send_cursor_moved(position);
    }

    fn send_left_button(&mut self, state: ButtonState) {
        self.world_mut().send_left_button(state);
    }
}
