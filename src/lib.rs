#![forbid(missing_docs)]
#![forbid(unsafe_code)]
#![warn(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

pub mod config;
pub mod controller;
pub mod direction;
pub mod errors;
pub mod geometry;
mod input_mocking;
pub mod placement;
pub mod plugin;
pub mod pointer;
pub mod sector;
pub mod signal;
pub mod systems;
pub mod walker;

// Re-export this at the root level
pub use input_mocking::MockPointer;

/// Everything you need to get started
pub mod prelude {
    pub use crate::config::{ActionTable, SwitchControllerConfig};
    pub use crate::controller::{ControllerId, SwitchController};
    pub use crate::direction::{direction_name, SwitchDirection};
    pub use crate::pointer::{PointerEvent, PointerEventKind};
    pub use crate::sector::Sector;
    pub use crate::signal::{ControllerListener, ControllerSignal, SharedSignal, SignalSnapshot};
    pub use crate::walker::{Walker, WalkerConfig};

    pub use crate::plugin::{
        SwitchControllerBundle, SwitchControllerPlugin, SwitchControllerSystem, SwitchSignal,
    };
    pub use crate::MockPointer;
}
