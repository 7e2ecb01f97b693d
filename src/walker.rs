//! A character that walks around a view, steered by a switch controller
//!
//! The walker has one idle state and eight moving states, one per [`Sector`],
//! each animated by a short loop of frames.
//! It reads [`SignalSnapshot`]s, so it can be driven from a different thread than the controller.

use std::time::Duration;

use bevy::math::{DVec2, Vec2};
use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

use crate::sector::Sector;
use crate::signal::SignalSnapshot;

/// Tuning for a [`Walker`]
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Pixels moved per position update
    pub speed: f32,
    /// How long each animation frame is shown
    pub frame_interval: Duration,
    /// The length of each sector's animation loop
    pub frames_per_sector: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            speed: 8.0,
            // Roughly 24 frames per second
            frame_interval: Duration::from_millis(41),
            frames_per_sector: 8,
        }
    }
}

/// A sprite-less walking character
///
/// # Example
/// ```rust
/// use bevy::math::Vec2;
/// use switch_controller::prelude::*;
///
/// let mut walker = Walker::new(Vec2::new(100.0, 100.0), Vec2::new(20.0, 20.0), WalkerConfig::default());
///
/// // Push the stick straight up
/// let snapshot = SignalSnapshot::new(true, SwitchDirection::Up, 90.0, 50.0);
/// walker.update_position(snapshot, Vec2::new(400.0, 400.0));
///
/// assert_eq!(walker.sector(), Sector::North);
/// assert_eq!(walker.position(), Vec2::new(100.0, 92.0));
/// ```
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Walker {
    config: WalkerConfig,
    position: Vec2,
    size: Vec2,
    sector: Sector,
    facing: Sector,
    frame: usize,
    since_frame: Duration,
}

impl Walker {
    /// Creates a walker with its top-left corner at `position`, facing south
    #[must_use]
    pub fn new(position: Vec2, size: Vec2, config: WalkerConfig) -> Self {
        Self {
            config,
            position,
            size,
            sector: Sector::South,
            facing: Sector::South,
            frame: 0,
            since_frame: Duration::ZERO,
        }
    }

    /// The top-left corner of the walker
    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// The size of the walker
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// The current state: [`Sector::Idle`] or the sector being walked towards
    #[inline]
    #[must_use]
    pub fn sector(&self) -> Sector {
        self.sector
    }

    /// The sector the walker last moved towards
    #[inline]
    #[must_use]
    pub fn facing(&self) -> Sector {
        self.facing
    }

    /// The current animation frame
    ///
    /// While idle, this selects the idle pose matching [`Walker::facing`].
    #[inline]
    #[must_use]
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Moves the walker according to `snapshot`, keeping it inside a view of size `view_size`
    ///
    /// Each axis is only updated if the new coordinate stays strictly inside `(0, view_size - size)`,
    /// so the walker slides along the edges of the view instead of stopping dead.
    pub fn update_position(&mut self, snapshot: SignalSnapshot, view_size: Vec2) {
        let sector = snapshot.sector();

        if sector.is_idle() {
            self.set_sector(Sector::Idle);
            self.frame = self.facing.index() - 1;
            return;
        }

        let (sin, cos) = snapshot.angle().to_radians().sin_cos();
        let speed = f64::from(self.config.speed);
        let next = self.position.as_dvec2() + DVec2::new(cos * speed, -sin * speed);
        let limit = (view_size - self.size).as_dvec2();

        if next.x > 0.0 && next.x < limit.x {
            self.position.x = next.x as f32;
        }
        if next.y > 0.0 && next.y < limit.y {
            self.position.y = next.y as f32;
        }

        self.facing = sector;
        if sector != self.sector {
            self.set_sector(sector);
        }
    }

    /// Advances the animation by `delta`
    ///
    /// While moving, the frame steps forward once more than [`WalkerConfig::frame_interval`]
    /// has passed since the last step. Idle walkers do not animate.
    pub fn update_frame(&mut self, delta: Duration) {
        if self.sector.is_idle() {
            return;
        }

        self.since_frame += delta;
        if self.since_frame > self.config.frame_interval {
            self.since_frame = Duration::ZERO;
            self.frame = (self.frame + 1) % self.config.frames_per_sector.max(1);
        }
    }

    fn set_sector(&mut self, sector: Sector) {
        self.sector = sector;
        self.frame = 0;
        self.since_frame = Duration::ZERO;
    }
}
