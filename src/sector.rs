//! Quantizes a controller angle into one of eight compass sectors
//!
//! Five cardinal directions are too coarse for an eight-way sprite,
//! so consumers that need more granularity read the angle instead and bin it here.

use bevy::reflect::Reflect;
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::direction::SwitchDirection;

/// A 45 degree slice of the compass, or [`Sector::Idle`]
///
/// Each sector is half-open: it owns its lower bound and excludes its upper bound,
/// so an angle on a boundary belongs to the sector counter-clockwise of it.
/// [`Sector::East`] wraps around zero, covering `[337.5, 360)` and `[0, 22.5)`.
///
/// # Example
/// ```rust
/// use switch_controller::sector::Sector;
///
/// assert_eq!(Sector::from_angle(0.0), Sector::East);
/// assert_eq!(Sector::from_angle(22.5), Sector::NorthEast);
/// assert_eq!(Sector::from_angle(270.0), Sector::South);
/// assert_eq!(Sector::from_angle(359.9), Sector::East);
/// assert_eq!(Sector::South.index(), 1);
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
pub enum Sector {
    /// The controller is not being touched
    #[default]
    Idle = 0,
    /// Centered on 270 degrees
    South = 1,
    /// Centered on 225 degrees
    SouthWest = 2,
    /// Centered on 180 degrees
    West = 3,
    /// Centered on 135 degrees
    NorthWest = 4,
    /// Centered on 90 degrees
    North = 5,
    /// Centered on 45 degrees
    NorthEast = 6,
    /// Centered on 0 degrees
    East = 7,
    /// Centered on 315 degrees
    SouthEast = 8,
}

impl Sector {
    /// The eight moving sectors, in index order
    pub const MOVING: [Sector; 8] = [
        Sector::South,
        Sector::SouthWest,
        Sector::West,
        Sector::NorthWest,
        Sector::North,
        Sector::NorthEast,
        Sector::East,
        Sector::SouthEast,
    ];

    // Indexed by the number of 45 degree steps counter-clockwise from east
    const COUNTER_CLOCKWISE: [Sector; 8] = [
        Sector::East,
        Sector::NorthEast,
        Sector::North,
        Sector::NorthWest,
        Sector::West,
        Sector::SouthWest,
        Sector::South,
        Sector::SouthEast,
    ];

    /// The sector with the given [`Sector::index`], if any
    #[must_use]
    pub fn from_index(index: usize) -> Option<Sector> {
        match index {
            0 => Some(Sector::Idle),
            1..=8 => Some(Sector::MOVING[index - 1]),
            _ => None,
        }
    }

    /// Picks the moving sector containing `degrees`
    ///
    /// The angle is wrapped into `[0, 360)` first. This never returns [`Sector::Idle`].
    #[must_use]
    pub fn from_angle(degrees: f64) -> Sector {
        let degrees = degrees.rem_euclid(360.0);
        let step = ((degrees + 22.5) / 45.0).floor() as usize % 8;
        Sector::COUNTER_CLOCKWISE[step]
    }

    /// Picks the sector for a controller signal
    ///
    /// [`SwitchDirection::Center`] means the controller is idle, whatever its last angle was.
    #[must_use]
    pub fn from_signal(direction: SwitchDirection, degrees: f64) -> Sector {
        if direction == SwitchDirection::Center {
            Sector::Idle
        } else {
            Sector::from_angle(degrees)
        }
    }

    /// The numeric value of this sector, from 0 (idle) to 8
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Is this [`Sector::Idle`]?
    #[inline]
    #[must_use]
    pub fn is_idle(self) -> bool {
        self == Sector::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_land_on_the_upper_sector() {
        let boundaries = [
            (22.5, Sector::NorthEast),
            (67.5, Sector::North),
            (112.5, Sector::NorthWest),
            (157.5, Sector::West),
            (202.5, Sector::SouthWest),
            (247.5, Sector::South),
            (292.5, Sector::SouthEast),
            (337.5, Sector::East),
        ];

        for (angle, sector) in boundaries {
            assert_eq!(Sector::from_angle(angle), sector, "{angle}");
        }
    }

    #[test]
    fn sector_centers() {
        let centers = [
            (270.0, Sector::South),
            (225.0, Sector::SouthWest),
            (180.0, Sector::West),
            (135.0, Sector::NorthWest),
            (90.0, Sector::North),
            (45.0, Sector::NorthEast),
            (0.0, Sector::East),
            (315.0, Sector::SouthEast),
        ];

        for (angle, sector) in centers {
            assert_eq!(Sector::from_angle(angle), sector);
        }
    }

    #[test]
    fn every_angle_has_exactly_one_moving_sector() {
        for tenth in 0..3600 {
            let angle = tenth as f64 / 10.0;
            let sector = Sector::from_angle(angle);
            assert!(!sector.is_idle());

            // The sector's half-open range contains the angle
            let center = match sector {
                Sector::East => 0.0,
                Sector::NorthEast => 45.0,
                Sector::North => 90.0,
                Sector::NorthWest => 135.0,
                Sector::West => 180.0,
                Sector::SouthWest => 225.0,
                Sector::South => 270.0,
                Sector::SouthEast => 315.0,
                Sector::Idle => unreachable!(),
            };
            let offset = (angle - center + 180.0).rem_euclid(360.0) - 180.0;
            assert!((-22.5..22.5).contains(&offset), "{angle} in {sector:?}");
        }
    }

    #[test]
    fn just_below_a_boundary_stays_in_the_lower_sector() {
        assert_eq!(Sector::from_angle(22.499), Sector::East);
        assert_eq!(Sector::from_angle(337.499), Sector::SouthEast);
        assert_eq!(Sector::from_angle(247.499), Sector::SouthWest);
    }

    #[test]
    fn out_of_range_angles_wrap() {
        assert_eq!(Sector::from_angle(360.0), Sector::East);
        assert_eq!(Sector::from_angle(-90.0), Sector::South);
        assert_eq!(Sector::from_angle(450.0), Sector::North);
    }

    #[test]
    fn center_is_idle() {
        assert_eq!(Sector::from_signal(SwitchDirection::Center, 90.0), Sector::Idle);
        assert_eq!(Sector::from_signal(SwitchDirection::Up, 90.0), Sector::North);
        assert_eq!(Sector::Idle.index(), 0);

        for (index, sector) in Sector::MOVING.into_iter().enumerate() {
            assert_eq!(sector.index(), index + 1);
            assert_eq!(Sector::from_index(index + 1), Some(sector));
        }
        assert_eq!(Sector::from_index(0), Some(Sector::Idle));
        assert_eq!(Sector::from_index(9), None);
    }
}
