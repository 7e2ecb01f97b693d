//! The systems that power the [`SwitchControllerPlugin`](crate::plugin::SwitchControllerPlugin).

use bevy::ecs::prelude::*;
use bevy::input::{
    mouse::{MouseButton, MouseButtonInput},
    touch::{TouchInput, TouchPhase},
    ButtonState,
};
use bevy::log::debug;
use bevy::math::Vec2;
use bevy::window::CursorMoved;

use crate::controller::SwitchController;
use crate::plugin::{PointerCapture, SwitchSignal, WidgetOrigin, MOUSE_POINTER_ID};
use crate::pointer::{PointerEvent, PointerEventKind};

type ControllerQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static mut SwitchController,
        &'static WidgetOrigin,
        &'static mut PointerCapture,
    ),
>;

/// A pointer event in window coordinates, tagged with the pointer that produced it
#[derive(Debug, Clone, Copy, PartialEq)]
struct WindowPointerEvent {
    pointer: u64,
    kind: PointerEventKind,
    position: Vec2,
}

impl From<&TouchInput> for WindowPointerEvent {
    fn from(touch: &TouchInput) -> Self {
        let kind = match touch.phase {
            TouchPhase::Started => PointerEventKind::Down,
            TouchPhase::Moved => PointerEventKind::Move,
            TouchPhase::Ended => PointerEventKind::Up,
            TouchPhase::Canceled => PointerEventKind::Cancel,
        };

        Self {
            pointer: touch.id,
            kind,
            position: touch.position,
        }
    }
}

/// Routes this frame's touch and mouse events to every [`SwitchController`], and sends the resulting [`SwitchSignal`]s
///
/// Touches are processed first, in the order they arrived.
/// The left mouse button acts as one more pointer, [`MOUSE_POINTER_ID`]:
/// cursor movements are processed before button presses and releases,
/// which happen wherever the cursor was last seen.
///
/// A press goes to the first idle controller it activates, which then captures that pointer.
pub fn update_switch_controllers(
    mut touches: EventReader<TouchInput>,
    mut mouse_buttons: EventReader<MouseButtonInput>,
    mut cursor_movements: EventReader<CursorMoved>,
    mut cursor_position: Local<Option<Vec2>>,
    mut controllers: ControllerQuery,
    mut signals: EventWriter<SwitchSignal>,
) {
    for touch in touches.read() {
        route(WindowPointerEvent::from(touch), &mut controllers, &mut signals);
    }

    for movement in cursor_movements.read() {
        *cursor_position = Some(movement.position);
        let event = WindowPointerEvent {
            pointer: MOUSE_POINTER_ID,
            kind: PointerEventKind::Move,
            position: movement.position,
        };
        route(event, &mut controllers, &mut signals);
    }

    for button in mouse_buttons.read() {
        if button.button != MouseButton::Left {
            continue;
        }

        let Some(position) = *cursor_position else {
            continue;
        };

        let kind = match button.state {
            ButtonState::Pressed => PointerEventKind::Down,
            ButtonState::Released => PointerEventKind::Up,
        };
        let event = WindowPointerEvent {
            pointer: MOUSE_POINTER_ID,
            kind,
            position,
        };
        route(event, &mut controllers, &mut signals);
    }
}

fn route(
    event: WindowPointerEvent,
    controllers: &mut ControllerQuery,
    writer: &mut EventWriter<SwitchSignal>,
) {
    for (entity, mut controller, origin, mut capture) in controllers.iter_mut() {
        let local = PointerEvent::new(event.kind, event.position - origin.0);

        if event.kind == PointerEventKind::Down {
            if capture.pointer().is_some() {
                continue;
            }

            let signals = controller.handle_pointer(local);
            if !controller.is_active() {
                continue;
            }

            capture.capture(event.pointer);
            debug!("Pointer {} captured by {entity:?}", event.pointer);
            writer.send_batch(signals.into_iter().map(|signal| SwitchSignal { entity, signal }));
            return;
        }

        if !capture.is_captured_by(event.pointer) {
            continue;
        }

        let signals = controller.handle_pointer(local);
        if event.kind.is_release() {
            capture.release();
            debug!("Pointer {} released {entity:?}", event.pointer);
        }
        writer.send_batch(signals.into_iter().map(|signal| SwitchSignal { entity, signal }));
    }
}
