//! Steers a walker around a 800x600 view with a scripted finger, without opening a window.
//!
//! Run with `cargo run --example headless_walk`.

use std::f32::consts::TAU;
use std::sync::Arc;

use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::input::InputPlugin;
use bevy::log::{info, LogPlugin};
use bevy::prelude::*;
use switch_controller::prelude::*;

const VIEW_SIZE: Vec2 = Vec2::new(800.0, 600.0);
const WIDGET_ORIGIN: Vec2 = Vec2::new(20.0, 380.0);
const WIDGET_SIZE: u32 = 200;
const FRAMES: u32 = 120;

/// The controller output, sampled once per frame
#[derive(Resource)]
struct Steering(Arc<SharedSignal>);

#[derive(Resource)]
struct Character(Walker);

fn main() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), InputPlugin, SwitchControllerPlugin))
        .add_systems(Update, (scripted_finger, walk).chain())
        .add_systems(Last, log_signals);

    let controller = SwitchController::new(SwitchControllerConfig {
        width: WIDGET_SIZE,
        height: WIDGET_SIZE,
        active_opacity: 1.0,
        inactive_opacity: 0.5,
        is_sticky: true,
        actions: Some(ActionTable::new([0, 1, 2, 3, 4])),
        ..Default::default()
    })
    .with_image_sizes(UVec2::splat(400), UVec2::splat(100));

    app.insert_resource(Steering(controller.shared_signal()))
        .insert_resource(Character(Walker::new(
            Vec2::new(400.0, 300.0),
            Vec2::new(54.0, 60.0),
            WalkerConfig::default(),
        )));
    app.world_mut()
        .spawn(SwitchControllerBundle::new(controller, WIDGET_ORIGIN));

    for _ in 0..FRAMES {
        app.update();
    }

    let character = &app.world().resource::<Character>().0;
    info!(
        "Finished at {} facing {} (frame {})",
        character.position(),
        character.facing(),
        character.frame()
    );
}

/// Presses the middle of the widget, circles the finger around the ring twice, then lets go
fn scripted_finger(mut frame: Local<u32>, mut touches: EventWriter<TouchInput>) {
    let center = WIDGET_ORIGIN + Vec2::splat(WIDGET_SIZE as f32 / 2.0);
    let phase_and_position = match *frame {
        0 => Some((TouchPhase::Started, center)),
        step @ 1..=80 => {
            let radians = step as f32 / 40.0 * TAU;
            let offset = Vec2::new(radians.cos(), -radians.sin()) * 90.0;
            Some((TouchPhase::Moved, center + offset))
        }
        81 => Some((TouchPhase::Ended, center)),
        _ => None,
    };
    *frame += 1;

    if let Some((phase, position)) = phase_and_position {
        touches.send(TouchInput {
            phase,
            position,
            window: Entity::PLACEHOLDER,
            force: None,
            id: 0,
        });
    }
}

fn walk(steering: Res<Steering>, time: Res<Time>, mut character: ResMut<Character>) {
    let snapshot = steering.0.load();
    let character = &mut character.0;

    character.update_position(snapshot, VIEW_SIZE);
    character.update_frame(time.delta());
}

fn log_signals(mut signals: EventReader<SwitchSignal>) {
    for SwitchSignal { signal, .. } in signals.read() {
        if let ControllerSignal::DirectionChange {
            direction, action, ..
        } = signal
        {
            info!("Steering {direction} (action {action})");
        }
    }
}
