//! Construction-time settings for a switch controller

use std::fmt::Display;

use bevy::math::UVec2;
use bevy::reflect::Reflect;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::direction::SwitchDirection;
use crate::errors::ConfigError;
use crate::placement::KnobPlacement;

/// Integer codes reported alongside each direction change
///
/// Indexed by [`SwitchDirection`]; these are passed through to listeners untouched.
///
/// ```rust
/// use switch_controller::config::ActionTable;
/// use switch_controller::direction::SwitchDirection;
///
/// let actions = ActionTable::new([0, 10, 20, 30, 40]);
/// assert_eq!(actions.get(SwitchDirection::Up), 30);
/// assert_eq!(actions.to_string(), "[0, 10, 20, 30, 40]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub struct ActionTable(pub [i32; 5]);

impl ActionTable {
    /// The action reported when no [`ActionTable`] is configured
    pub const NO_ACTION: i32 = -1;

    /// Creates a table from codes in [`SwitchDirection`] order: center, left, right, up, down
    #[must_use]
    pub const fn new(codes: [i32; 5]) -> Self {
        Self(codes)
    }

    /// The code attached to `direction`
    #[inline]
    #[must_use]
    pub fn get(&self, direction: SwitchDirection) -> i32 {
        self.0[direction.index()]
    }
}

impl Display for ActionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

/// Settings for a [`SwitchController`](crate::controller::SwitchController)
///
/// Missing fields take their [`Default`] values when deserializing.
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchControllerConfig {
    /// The opacity of the widget while it is being touched, within `[0, 1]`
    pub active_opacity: f32,
    /// The opacity of the widget while it is idle, within `[0, 1]`
    pub inactive_opacity: f32,
    /// Snap the knob to the nearest cardinal anchor while the pointer is outside of the background
    pub is_sticky: bool,
    /// Accept presses anywhere within the widget's rectangle, rather than only within the circular live area
    pub detect_transparency: bool,
    /// Keep the whole knob inside the background, rather than letting it overhang by half its size
    pub keep_inside: bool,
    /// The width of the widget, in pixels
    pub width: u32,
    /// The height of the widget, in pixels
    pub height: u32,
    /// Codes reported with each direction change
    ///
    /// When absent, [`ActionTable::NO_ACTION`] is reported.
    pub actions: Option<ActionTable>,
}

impl Default for SwitchControllerConfig {
    fn default() -> Self {
        Self {
            active_opacity: 1.0,
            inactive_opacity: 1.0,
            is_sticky: false,
            detect_transparency: false,
            keep_inside: false,
            width: 0,
            height: 0,
            actions: None,
        }
    }
}

impl SwitchControllerConfig {
    /// Checks that both opacities lie within `[0, 1]`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.active_opacity) {
            return Err(ConfigError::ActiveOpacityOutOfRange {
                value: self.active_opacity,
            });
        }

        if !(0.0..=1.0).contains(&self.inactive_opacity) {
            return Err(ConfigError::InactiveOpacityOutOfRange {
                value: self.inactive_opacity,
            });
        }

        Ok(())
    }

    /// The widget size
    #[inline]
    #[must_use]
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// The knob placement policy described by this config
    #[inline]
    #[must_use]
    pub fn placement(&self) -> KnobPlacement {
        KnobPlacement {
            keep_inside: self.keep_inside,
            is_sticky: self.is_sticky,
        }
    }

    /// The action code reported for `direction`
    #[inline]
    #[must_use]
    pub fn action(&self, direction: SwitchDirection) -> i32 {
        self.actions
            .map_or(ActionTable::NO_ACTION, |actions| actions.get(direction))
    }
}
