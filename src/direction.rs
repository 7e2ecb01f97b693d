//! The five discrete directions reported by a switch controller

use bevy::math::Vec2;
use bevy::reflect::Reflect;
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::errors::UnknownDirection;

/// The coarse direction of a switch controller
///
/// The discriminants are part of the public contract: they are the values
/// delivered to listeners and used to index an [`ActionTable`](crate::config::ActionTable).
///
/// # Example
/// ```rust
/// use switch_controller::direction::SwitchDirection;
///
/// assert_eq!(SwitchDirection::Up as i32, 3);
/// assert_eq!(SwitchDirection::try_from(2), Ok(SwitchDirection::Right));
/// assert_eq!(SwitchDirection::Left.name(), "DIRECTION_LEFT");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    Reflect,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
pub enum SwitchDirection {
    /// The controller is idle
    #[default]
    #[display(fmt = "DIRECTION_CENTER")]
    Center = 0,
    /// The pointer is mostly to the left of the center
    #[display(fmt = "DIRECTION_LEFT")]
    Left = 1,
    /// The pointer is mostly to the right of the center
    #[display(fmt = "DIRECTION_RIGHT")]
    Right = 2,
    /// The pointer is mostly above the center
    #[display(fmt = "DIRECTION_UP")]
    Up = 3,
    /// The pointer is mostly below the center
    #[display(fmt = "DIRECTION_DOWN")]
    Down = 4,
}

impl SwitchDirection {
    /// All directions, in discriminant order
    pub const ALL: [SwitchDirection; 5] = [
        SwitchDirection::Center,
        SwitchDirection::Left,
        SwitchDirection::Right,
        SwitchDirection::Up,
        SwitchDirection::Down,
    ];

    /// The numeric value of this direction
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The human-readable name of this direction, such as `"DIRECTION_UP"`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SwitchDirection::Center => "DIRECTION_CENTER",
            SwitchDirection::Left => "DIRECTION_LEFT",
            SwitchDirection::Right => "DIRECTION_RIGHT",
            SwitchDirection::Up => "DIRECTION_UP",
            SwitchDirection::Down => "DIRECTION_DOWN",
        }
    }

    /// Picks the cardinal direction that dominates `delta`
    ///
    /// `delta` is measured from the widget center in screen space, so positive `y` points down.
    /// Points lying exactly on a diagonal (including the center itself) are ambiguous,
    /// and return `None`: the caller should keep its previous direction.
    ///
    /// This never returns [`SwitchDirection::Center`].
    ///
    /// # Example
    /// ```rust
    /// use bevy::math::Vec2;
    /// use switch_controller::direction::SwitchDirection;
    ///
    /// assert_eq!(SwitchDirection::from_delta(Vec2::new(0.0, -5.0)), Some(SwitchDirection::Up));
    /// assert_eq!(SwitchDirection::from_delta(Vec2::new(3.0, 1.0)), Some(SwitchDirection::Right));
    /// assert_eq!(SwitchDirection::from_delta(Vec2::new(2.0, 2.0)), None);
    /// ```
    #[must_use]
    pub fn from_delta(delta: Vec2) -> Option<SwitchDirection> {
        let Vec2 { x, y } = delta;

        if -y > x.abs() {
            Some(SwitchDirection::Up)
        } else if y > x.abs() {
            Some(SwitchDirection::Down)
        } else if -x > y.abs() {
            Some(SwitchDirection::Left)
        } else if x > y.abs() {
            Some(SwitchDirection::Right)
        } else {
            None
        }
    }
}

impl From<SwitchDirection> for i32 {
    fn from(direction: SwitchDirection) -> i32 {
        direction as i32
    }
}

impl TryFrom<i32> for SwitchDirection {
    type Error = UnknownDirection;

    fn try_from(index: i32) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(SwitchDirection::Center),
            1 => Ok(SwitchDirection::Left),
            2 => Ok(SwitchDirection::Right),
            3 => Ok(SwitchDirection::Up),
            4 => Ok(SwitchDirection::Down),
            _ => Err(UnknownDirection { index }),
        }
    }
}

/// Converts a raw direction value into its name
///
/// Unknown values produce an empty string.
///
/// # Example
/// ```rust
/// use switch_controller::direction::direction_name;
///
/// assert_eq!(direction_name(0), "DIRECTION_CENTER");
/// assert_eq!(direction_name(4), "DIRECTION_DOWN");
/// assert_eq!(direction_name(17), "");
/// ```
#[must_use]
pub fn direction_name(direction: i32) -> &'static str {
    SwitchDirection::try_from(direction)
        .map(SwitchDirection::name)
        .unwrap_or("")
}
