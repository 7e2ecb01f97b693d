//! Errors that may occur when configuring or laying out a switch controller

use derive_more::{Display, Error};

/// A [`SwitchControllerConfig`](crate::config::SwitchControllerConfig) held a value outside of its documented range
///
/// Opacities are alpha values, and so must lie within `[0, 1]`.
#[derive(Debug, Clone, Copy, Error, Display, PartialEq)]
pub enum ConfigError {
    /// `active_opacity` was not within `[0, 1]`
    #[display(fmt = "active opacity {} is outside of [0, 1]", value)]
    ActiveOpacityOutOfRange {
        /// The rejected value
        value: f32,
    },
    /// `inactive_opacity` was not within `[0, 1]`
    #[display(fmt = "inactive opacity {} is outside of [0, 1]", value)]
    InactiveOpacityOutOfRange {
        /// The rejected value
        value: f32,
    },
}

/// The geometry of a controller could not be rebuilt
///
/// This is never fatal: until the geometry exists, presses simply fail to activate the controller.
#[derive(Debug, Clone, Copy, Error, Display, PartialEq, Eq)]
pub enum GeometryError {
    /// The background or foreground image size has not been supplied yet
    #[display(fmt = "both the background and the foreground size must be set before layout")]
    MissingDrawable,
}

/// An integer did not correspond to any [`SwitchDirection`](crate::direction::SwitchDirection)
#[derive(Debug, Clone, Copy, Error, Display, PartialEq, Eq)]
#[display(fmt = "{} is not a switch direction", index)]
pub struct UnknownDirection {
    /// The rejected value
    pub index: i32,
}
