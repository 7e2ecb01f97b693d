//! The output side of a switch controller
//!
//! Every processed pointer event produces at most two [`ControllerSignal`]s,
//! which are handed to the registered [`ControllerListener`] in order
//! and summarized into a [`SharedSignal`] that other threads can sample.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use bevy::log::trace;
use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

use crate::controller::ControllerId;
use crate::direction::SwitchDirection;
use crate::sector::Sector;

/// A single notification emitted by a switch controller
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub enum ControllerSignal {
    /// The controller's direction changed, or the controller was released
    DirectionChange {
        /// The controller that changed
        id: ControllerId,
        /// The new direction
        direction: SwitchDirection,
        /// The configured action code for `direction`, or -1
        action: i32,
    },
    /// The pointer moved, or the controller was released
    Move {
        /// The controller that moved
        id: ControllerId,
        /// Degrees counter-clockwise from east, within `[0, 360)`
        angle: f64,
        /// Pixels from the widget center to the pointer
        distance: f64,
    },
}

impl ControllerSignal {
    /// The controller that emitted this signal
    #[must_use]
    pub fn id(&self) -> ControllerId {
        match self {
            ControllerSignal::DirectionChange { id, .. } | ControllerSignal::Move { id, .. } => *id,
        }
    }

    /// Hands this signal to the matching method of `listener`
    pub fn deliver(&self, listener: &dyn ControllerListener) {
        match *self {
            ControllerSignal::DirectionChange {
                id,
                direction,
                action,
            } => listener.on_direction_change(id, direction, action),
            ControllerSignal::Move {
                id,
                angle,
                distance,
            } => listener.on_move(id, angle, distance),
        }
    }
}

/// The signals produced by a single pointer event, in delivery order
///
/// A direction change, when present, always precedes the move.
/// This is a fixed-size value: producing it never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Signals {
    slots: [Option<ControllerSignal>; 2],
    len: usize,
}

impl Signals {
    /// No signals at all
    pub const NONE: Signals = Signals {
        slots: [None, None],
        len: 0,
    };

    pub(crate) fn push(&mut self, signal: ControllerSignal) {
        debug_assert!(self.len < self.slots.len());
        self.slots[self.len] = Some(signal);
        self.len += 1;
    }

    /// The number of signals
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Were no signals produced?
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over the signals in delivery order
    pub fn iter(&self) -> impl Iterator<Item = &ControllerSignal> {
        self.slots.iter().flatten()
    }

    /// The direction change in this batch, if any
    #[must_use]
    pub fn direction_change(&self) -> Option<SwitchDirection> {
        self.iter().find_map(|signal| match signal {
            ControllerSignal::DirectionChange { direction, .. } => Some(*direction),
            ControllerSignal::Move { .. } => None,
        })
    }
}

impl IntoIterator for Signals {
    type Item = ControllerSignal;
    type IntoIter = std::iter::Flatten<std::array::IntoIter<Option<ControllerSignal>, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter().flatten()
    }
}

/// Receives the signals of one or more switch controllers
///
/// Callbacks run synchronously on the thread that feeds pointer events to the controller,
/// before the next event is processed. They must not feed events back into the controller that called them.
/// Methods take `&self` so that a listener can be shared with other threads; use interior mutability to record state.
pub trait ControllerListener: Send + Sync {
    /// Called when the direction of controller `id` changes, and when it is released
    fn on_direction_change(&self, id: ControllerId, direction: SwitchDirection, action: i32);

    /// Called on every processed pointer movement of controller `id`, and when it is released
    fn on_move(&self, id: ControllerId, angle: f64, distance: f64);
}

/// Holds the single listener of a controller, without keeping it alive
///
/// Setting a new listener silently replaces the previous one.
/// Once the listener is dropped elsewhere, signals are no longer delivered.
#[derive(Debug, Clone, Default)]
pub struct ListenerSlot {
    listener: Option<Weak<dyn ControllerListener>>,
}

impl ListenerSlot {
    /// Registers `listener`, replacing any previous listener
    pub fn set<L: ControllerListener + 'static>(&mut self, listener: &Arc<L>) {
        let listener: Weak<L> = Arc::downgrade(listener);
        self.listener = Some(listener);
    }

    /// Registers an already type-erased `listener`, replacing any previous listener
    pub fn set_dyn(&mut self, listener: &Arc<dyn ControllerListener>) {
        self.listener = Some(Arc::downgrade(listener));
    }

    /// Removes the listener
    pub fn clear(&mut self) {
        self.listener = None;
    }

    /// Is there a live listener to deliver to?
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.listener
            .as_ref()
            .is_some_and(|listener| listener.strong_count() > 0)
    }

    /// Delivers `signals` to the listener, in order
    pub fn deliver(&self, signals: &Signals) {
        if signals.is_empty() {
            return;
        }

        let Some(listener) = self.listener.as_ref() else {
            return;
        };

        match listener.upgrade() {
            Some(listener) => {
                for signal in signals.iter() {
                    signal.deliver(listener.as_ref());
                }
            }
            None => trace!("Listener was dropped; discarding {} signals", signals.len()),
        }
    }
}

/// A consistent view of a controller's output at one instant
///
/// The angle is stored in tenths of a degree so that the whole record fits in a single atomic word.
/// The [`Sector`] is binned from the exact angle before rounding, so it always agrees with the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub struct SignalSnapshot {
    /// Is the controller being touched?
    pub active: bool,
    /// The current direction
    pub direction: SwitchDirection,
    sector: Sector,
    angle_deci_degrees: u16,
    distance_bits: u32,
}

impl SignalSnapshot {
    const FULL_CIRCLE: u16 = 3600;

    /// Creates a snapshot, rounding `angle` to the nearest tenth of a degree
    #[must_use]
    pub fn new(active: bool, direction: SwitchDirection, angle: f64, distance: f64) -> Self {
        let deci_degrees = (angle.rem_euclid(360.0) * 10.0).round() as u16 % Self::FULL_CIRCLE;

        Self {
            active,
            direction,
            sector: Sector::from_signal(direction, angle),
            angle_deci_degrees: deci_degrees,
            distance_bits: (distance as f32).to_bits(),
        }
    }

    /// The angle, in degrees within `[0, 360)`, to the nearest tenth of a degree
    #[inline]
    #[must_use]
    pub fn angle(&self) -> f64 {
        f64::from(self.angle_deci_degrees) / 10.0
    }

    /// The distance from the widget center to the pointer
    #[inline]
    #[must_use]
    pub fn distance(&self) -> f32 {
        f32::from_bits(self.distance_bits)
    }

    /// The eight-way sector for this snapshot
    #[inline]
    #[must_use]
    pub fn sector(&self) -> Sector {
        self.sector
    }

    fn pack(self) -> u64 {
        u64::from(self.angle_deci_degrees)
            | u64::from(self.distance_bits) << 16
            | u64::from(self.direction as u8) << 48
            | u64::from(self.active) << 56
            | (self.sector.index() as u64) << 57
    }

    fn unpack(bits: u64) -> Self {
        let direction = SwitchDirection::try_from(((bits >> 48) & 0xff) as i32)
            .unwrap_or(SwitchDirection::Center);
        let sector = Sector::from_index(((bits >> 57) & 0xf) as usize).unwrap_or_default();

        Self {
            active: (bits >> 56) & 1 == 1,
            direction,
            sector,
            angle_deci_degrees: (bits & 0xffff) as u16,
            distance_bits: ((bits >> 16) & 0xffff_ffff) as u32,
        }
    }
}

/// The latest [`SignalSnapshot`] of a controller, readable from any thread
///
/// Writers replace the whole snapshot with one atomic store, so readers never observe a mix of two updates.
/// Readers that sample less often than the controller is updated simply see the most recent value.
#[derive(Debug, Default)]
pub struct SharedSignal(AtomicU64);

impl SharedSignal {
    /// Creates a [`SharedSignal`] holding `snapshot`
    #[must_use]
    pub fn new(snapshot: SignalSnapshot) -> Self {
        Self(AtomicU64::new(snapshot.pack()))
    }

    /// Replaces the current snapshot
    #[inline]
    pub fn store(&self, snapshot: SignalSnapshot) {
        self.0.store(snapshot.pack(), Ordering::Release);
    }

    /// Reads the current snapshot
    #[inline]
    #[must_use]
    pub fn load(&self) -> SignalSnapshot {
        SignalSnapshot::unpack(self.0.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<ControllerSignal>>);

    impl ControllerListener for Recorder {
        fn on_direction_change(&self, id: ControllerId, direction: SwitchDirection, action: i32) {
            self.0.lock().unwrap().push(ControllerSignal::DirectionChange {
                id,
                direction,
                action,
            });
        }

        fn on_move(&self, id: ControllerId, angle: f64, distance: f64) {
            self.0.lock().unwrap().push(ControllerSignal::Move {
                id,
                angle,
                distance,
            });
        }
    }

    fn batch() -> Signals {
        let id = ControllerId::from_raw(3);
        let mut signals = Signals::NONE;
        signals.push(ControllerSignal::DirectionChange {
            id,
            direction: SwitchDirection::Left,
            action: -1,
        });
        signals.push(ControllerSignal::Move {
            id,
            angle: 180.0,
            distance: 12.0,
        });
        signals
    }

    #[test]
    fn signals_keep_their_order() {
        let signals = batch();

        assert_eq!(signals.len(), 2);
        assert_eq!(signals.direction_change(), Some(SwitchDirection::Left));

        let collected: Vec<ControllerSignal> = signals.into_iter().collect();
        assert!(matches!(collected[0], ControllerSignal::DirectionChange { .. }));
        assert!(matches!(collected[1], ControllerSignal::Move { .. }));
        assert!(collected.iter().all(|signal| signal.id() == ControllerId::from_raw(3)));
    }

    #[test]
    fn listener_slot_delivers_in_order() {
        let recorder = Arc::new(Recorder::default());
        let mut slot = ListenerSlot::default();
        assert!(!slot.is_connected());

        slot.set(&recorder);
        assert!(slot.is_connected());
        slot.deliver(&batch());

        let received = recorder.0.lock().unwrap().clone();
        assert_eq!(received, batch().into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn replacing_the_listener_drops_the_old_one() {
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        let mut slot = ListenerSlot::default();

        slot.set(&first);
        slot.set(&second);
        slot.deliver(&batch());

        assert!(first.0.lock().unwrap().is_empty());
        assert_eq!(second.0.lock().unwrap().len(), 2);
    }

    #[test]
    fn dropped_listeners_are_not_kept_alive() {
        let recorder = Arc::new(Recorder::default());
        let mut slot = ListenerSlot::default();
        slot.set(&recorder);

        drop(recorder);
        assert!(!slot.is_connected());
        // Delivering to a dead listener is a no-op
        slot.deliver(&batch());

        slot.clear();
        assert!(!slot.is_connected());
    }

    #[test]
    fn snapshot_survives_the_atomic() {
        let shared = SharedSignal::default();
        assert_eq!(shared.load(), SignalSnapshot::default());

        let snapshot = SignalSnapshot::new(true, SwitchDirection::Up, 90.04, 100.0);
        shared.store(snapshot);

        let loaded = shared.load();
        assert_eq!(loaded, snapshot);
        assert!(loaded.active);
        assert_eq!(loaded.direction, SwitchDirection::Up);
        assert_eq!(loaded.angle(), 90.0);
        assert_eq!(loaded.distance(), 100.0);
        assert_eq!(loaded.sector(), Sector::North);
    }

    #[test]
    fn snapshot_angles_wrap() {
        assert_eq!(SignalSnapshot::new(true, SwitchDirection::Right, 359.97, 1.0).angle(), 0.0);
        assert_eq!(
            SignalSnapshot::new(true, SwitchDirection::Down, 247.5, 1.0).sector(),
            Sector::South
        );
        assert_eq!(
            SignalSnapshot::new(false, SwitchDirection::Center, 247.5, 0.0).sector(),
            Sector::Idle
        );
    }

    #[test]
    fn snapshot_sector_uses_the_exact_angle() {
        let shared = SharedSignal::default();

        for (angle, sector) in [
            (22.49, Sector::East),
            (247.46, Sector::SouthWest),
            (337.499, Sector::SouthEast),
            (359.97, Sector::East),
        ] {
            let snapshot = SignalSnapshot::new(true, SwitchDirection::Right, angle, 10.0);
            assert_eq!(snapshot.sector(), Sector::from_angle(angle));
            assert_eq!(snapshot.sector(), sector);

            // The rounded angle lands on the boundary, but the sector survives the atomic
            shared.store(snapshot);
            assert_eq!(shared.load().sector(), sector, "{angle}");
        }
    }
}
