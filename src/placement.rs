//! Where the knob is drawn for a given pointer position
//!
//! The knob follows the pointer freely inside the ring,
//! is clamped onto the ring once the pointer leaves it,
//! and, for sticky controllers, snaps to the nearest cardinal anchor once the pointer leaves the background.

use bevy::math::{DVec2, Vec2};
use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

use crate::direction::SwitchDirection;
use crate::geometry::SwitchGeometry;

/// The knob placement policy of a controller
///
/// ```rust
/// use bevy::math::Vec2;
/// use switch_controller::direction::SwitchDirection;
/// use switch_controller::geometry::SwitchGeometry;
/// use switch_controller::placement::KnobPlacement;
///
/// let geometry = SwitchGeometry::new(Vec2::splat(160.0), Vec2::splat(40.0), Vec2::splat(200.0));
/// let placement = KnobPlacement::default();
///
/// // Inside the ring, the knob is centered on the pointer
/// let origin = placement.place(&geometry, Vec2::new(160.0, 100.0), SwitchDirection::Right);
/// assert_eq!(origin, Vec2::new(140.0, 80.0));
///
/// // Outside of it, the knob stays on the ring
/// let origin = placement.place(&geometry, Vec2::new(100.0, 0.0), SwitchDirection::Up);
/// assert_eq!(origin, Vec2::new(80.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub struct KnobPlacement {
    /// Keep the whole knob inside the background, rather than letting it overhang by half its size
    pub keep_inside: bool,
    /// Snap the knob to a cardinal anchor while the pointer is outside of the background
    pub is_sticky: bool,
}

impl KnobPlacement {
    /// Returns the knob origin (its top-left corner) for a pointer at `pointer`
    ///
    /// `direction` is the controller direction already derived for this pointer position;
    /// it selects the anchor used by sticky placement.
    #[must_use]
    pub fn place(
        &self,
        geometry: &SwitchGeometry,
        pointer: Vec2,
        direction: SwitchDirection,
    ) -> Vec2 {
        let delta = pointer - geometry.center;
        let distance = delta.length();
        let max_distance = geometry.max_knob_distance(self.keep_inside).max(0.0);

        let knob_center = if distance <= max_distance {
            pointer
        } else {
            geometry.center + delta * (max_distance / distance)
        };

        if self.is_sticky
            && distance > geometry.background_half
            && direction != SwitchDirection::Center
        {
            return geometry.anchor(direction, self.keep_inside);
        }

        knob_center - geometry.foreground_half_size
    }
}

/// The angle of `delta`, in degrees within `[0, 360)`
///
/// `delta` is in screen space (positive `y` points down), while the returned angle is measured
/// counter-clockwise from the positive x-axis: 0 is east, 90 is north, 180 is west and 270 is south.
/// A zero `delta` has an angle of 0.
///
/// # Example
/// ```rust
/// use bevy::math::DVec2;
/// use switch_controller::placement::pointer_angle;
///
/// assert_eq!(pointer_angle(DVec2::new(1.0, 0.0)), 0.0);
/// assert_eq!(pointer_angle(DVec2::new(0.0, -1.0)), 90.0);
/// assert_eq!(pointer_angle(DVec2::new(-1.0, 0.0)), 180.0);
/// assert_eq!(pointer_angle(DVec2::new(0.0, 1.0)), 270.0);
/// ```
#[must_use]
pub fn pointer_angle(delta: DVec2) -> f64 {
    if delta == DVec2::ZERO {
        return 0.0;
    }

    let degrees = f64::atan2(-delta.y, delta.x).to_degrees();
    let degrees = if degrees < 0.0 { degrees + 360.0 } else { degrees };

    // A tiny negative angle rounds up to a full turn
    if degrees >= 360.0 {
        0.0
    } else {
        degrees
    }
}
