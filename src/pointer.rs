//! The pointer events a switch controller consumes
//!
//! Hosts translate their native touch or mouse events into [`PointerEvent`]s,
//! in widget-local pixels with the origin at the top-left corner and `y` growing downwards.
//! The host is responsible for pointer capture: each gesture must be a `Down`,
//! any number of `Move`s, and then an `Up` or a `Cancel`.

use bevy::math::Vec2;
use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

/// The phase of a pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum PointerEventKind {
    /// First contact
    Down,
    /// The contact moved
    Move,
    /// The contact ended
    Up,
    /// The host aborted the gesture
    Cancel,
}

impl PointerEventKind {
    /// Does this event end a gesture?
    #[inline]
    #[must_use]
    pub fn is_release(self) -> bool {
        matches!(self, PointerEventKind::Up | PointerEventKind::Cancel)
    }
}

/// A single pointer event, in widget-local pixels
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct PointerEvent {
    /// The phase of the gesture
    pub kind: PointerEventKind,
    /// Where the pointer is
    pub position: Vec2,
}

impl PointerEvent {
    /// Creates a new [`PointerEvent`]
    #[inline]
    #[must_use]
    pub fn new(kind: PointerEventKind, position: Vec2) -> Self {
        Self { kind, position }
    }

    /// A [`PointerEventKind::Down`] event at `(x, y)`
    #[inline]
    #[must_use]
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down, Vec2::new(x, y))
    }

    /// A [`PointerEventKind::Move`] event at `(x, y)`
    #[inline]
    #[must_use]
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, Vec2::new(x, y))
    }

    /// A [`PointerEventKind::Up`] event at `(x, y)`
    #[inline]
    #[must_use]
    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Up, Vec2::new(x, y))
    }

    /// A [`PointerEventKind::Cancel`] event at `(x, y)`
    #[inline]
    #[must_use]
    pub fn cancel(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Cancel, Vec2::new(x, y))
    }
}
