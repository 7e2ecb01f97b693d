//! Cached layout constants shared by every pointer event
//!
//! The values here only change when the widget is resized or one of its images is replaced,
//! so they are computed once and reused, rather than being rederived on each touch.

use bevy::math::{Rect, UVec2, Vec2};
use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

use crate::direction::SwitchDirection;

/// The on-screen sizes of the background and foreground images, in whole pixels
///
/// The foreground (the knob) keeps the same proportion to the background that the source images have,
/// and the background is shrunk so that a knob pushed all the way to one side still fits inside the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub struct DisplaySizes {
    /// The displayed size of the background ring
    pub background: UVec2,
    /// The displayed size of the knob
    pub foreground: UVec2,
}

impl DisplaySizes {
    /// Fits the intrinsic image sizes into a widget of size `widget`
    ///
    /// With `r = foreground / background` along an axis, the background is displayed at
    /// `widget / (1 + r)` and the foreground at `background * r`, both truncated to whole pixels.
    /// An axis on which the background has no extent collapses to zero.
    ///
    /// # Example
    /// ```rust
    /// use bevy::math::UVec2;
    /// use switch_controller::geometry::DisplaySizes;
    ///
    /// let sizes = DisplaySizes::reconcile(UVec2::splat(400), UVec2::splat(100), UVec2::splat(200));
    /// assert_eq!(sizes.background, UVec2::splat(160));
    /// assert_eq!(sizes.foreground, UVec2::splat(40));
    /// ```
    #[must_use]
    pub fn reconcile(background: UVec2, foreground: UVec2, widget: UVec2) -> DisplaySizes {
        let (background_x, foreground_x) = reconcile_axis(background.x, foreground.x, widget.x);
        let (background_y, foreground_y) = reconcile_axis(background.y, foreground.y, widget.y);

        DisplaySizes {
            background: UVec2::new(background_x, background_y),
            foreground: UVec2::new(foreground_x, foreground_y),
        }
    }
}

fn reconcile_axis(background: u32, foreground: u32, widget: u32) -> (u32, u32) {
    if background == 0 {
        return (0, 0);
    }

    let ratio = f64::from(foreground) / f64::from(background);
    let background = (f64::from(widget) / (1.0 + ratio)) as u32;
    let foreground = (f64::from(background) * ratio) as u32;
    (background, foreground)
}

/// Layout constants for a single switch controller
///
/// All positions are in widget-local pixels, with the origin at the top-left corner and `y` growing downwards.
/// Knob positions (`middle` and the four anchors) are the top-left corner of the knob, not its center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
pub struct SwitchGeometry {
    /// The size of the widget
    pub widget_size: Vec2,
    /// The center of the widget
    pub center: Vec2,
    /// Half of the displayed background size, per axis
    pub background_half_size: Vec2,
    /// Half of the displayed foreground size, per axis
    pub foreground_half_size: Vec2,
    /// The smaller of the two background half-extents: the radius of the ring
    pub background_half: f32,
    /// The smaller of the two foreground half-extents: the radius of the knob
    pub foreground_half: f32,
    /// The knob origin that centers the knob on [`Self::center`]
    pub middle: Vec2,
    /// The knob origin at the left extreme of the ring
    pub left: Vec2,
    /// The knob origin at the right extreme of the ring
    pub right: Vec2,
    /// The knob origin at the top of the ring
    pub up: Vec2,
    /// The knob origin at the bottom of the ring
    pub down: Vec2,
}

impl SwitchGeometry {
    /// Computes the layout constants from the displayed image sizes and the widget size
    #[must_use]
    pub fn new(background: Vec2, foreground: Vec2, widget_size: Vec2) -> SwitchGeometry {
        let center = widget_size / 2.0;
        let background_half_size = background / 2.0;
        let foreground_half_size = foreground / 2.0;
        let background_half = background_half_size.min_element();
        let foreground_half = foreground_half_size.min_element();

        let middle = center - foreground_half_size;
        let horizontal = Vec2::new(background_half, 0.0);
        let vertical = Vec2::new(0.0, background_half);

        SwitchGeometry {
            widget_size,
            center,
            background_half_size,
            foreground_half_size,
            background_half,
            foreground_half,
            middle,
            left: middle - horizontal,
            right: middle + horizontal,
            up: middle - vertical,
            down: middle + vertical,
        }
    }

    /// Computes the layout constants for a set of reconciled [`DisplaySizes`]
    #[must_use]
    pub fn from_display_sizes(sizes: DisplaySizes, widget_size: UVec2) -> SwitchGeometry {
        SwitchGeometry::new(
            sizes.background.as_vec2(),
            sizes.foreground.as_vec2(),
            widget_size.as_vec2(),
        )
    }

    /// Is any of the widget, background or foreground sizes zero?
    ///
    /// Degenerate geometry has no live area: no press can activate the controller.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.widget_size.min_element() <= 0.0
            || self.background_half_size.min_element() <= 0.0
            || self.foreground_half_size.min_element() <= 0.0
    }

    /// The rectangular bounds of the widget
    #[must_use]
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_corners(Vec2::ZERO, self.widget_size)
    }

    /// The radius of the circular live area
    ///
    /// When the knob may overhang the ring, presses up to one knob radius beyond the ring are accepted.
    #[must_use]
    #[inline]
    pub fn activation_radius(&self, keep_inside: bool) -> f32 {
        if keep_inside {
            self.background_half
        } else {
            self.background_half + self.foreground_half
        }
    }

    /// The largest distance from [`Self::center`] that the center of the knob may reach
    #[must_use]
    #[inline]
    pub fn max_knob_distance(&self, keep_inside: bool) -> f32 {
        if keep_inside {
            self.background_half - self.foreground_half
        } else {
            self.background_half
        }
    }

    /// Would a press at `point` activate the controller?
    ///
    /// With `detect_transparency`, any point within the widget bounds counts.
    /// Otherwise the point must lie strictly inside the circle of radius [`Self::activation_radius`].
    #[must_use]
    pub fn live_area_contains(
        &self,
        point: Vec2,
        keep_inside: bool,
        detect_transparency: bool,
    ) -> bool {
        if self.is_degenerate() {
            return false;
        }

        if detect_transparency {
            self.bounds().contains(point)
        } else {
            let radius = self.activation_radius(keep_inside);
            point.distance_squared(self.center) < radius * radius
        }
    }

    /// The knob origin used when the knob snaps to `direction`
    ///
    /// When `keep_inside` is set, the anchor is pulled inwards by one knob radius
    /// so that the knob stays entirely within the ring.
    /// [`SwitchDirection::Center`] snaps to [`Self::middle`].
    #[must_use]
    pub fn anchor(&self, direction: SwitchDirection, keep_inside: bool) -> Vec2 {
        let inset = if keep_inside { self.foreground_half } else { 0.0 };

        match direction {
            SwitchDirection::Center => self.middle,
            SwitchDirection::Up => Vec2::new(self.up.x, self.up.y + inset),
            SwitchDirection::Down => Vec2::new(self.down.x, self.down.y - inset),
            SwitchDirection::Left => Vec2::new(self.left.x + inset, self.left.y),
            SwitchDirection::Right => Vec2::new(self.right.x - inset, self.right.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_geometry() -> SwitchGeometry {
        SwitchGeometry::new(Vec2::splat(160.0), Vec2::splat(40.0), Vec2::splat(200.0))
    }

    #[test]
    fn derived_constants() {
        let geometry = reference_geometry();

        assert_eq!(geometry.center, Vec2::new(100.0, 100.0));
        assert_eq!(geometry.background_half, 80.0);
        assert_eq!(geometry.foreground_half, 20.0);
        assert_eq!(geometry.middle, Vec2::new(80.0, 80.0));
        assert_eq!(geometry.left, Vec2::new(0.0, 80.0));
        assert_eq!(geometry.right, Vec2::new(160.0, 80.0));
        assert_eq!(geometry.up, Vec2::new(80.0, 0.0));
        assert_eq!(geometry.down, Vec2::new(80.0, 160.0));
        assert!(geometry.background_half >= geometry.foreground_half);
        assert!(!geometry.is_degenerate());
    }

    #[test]
    fn half_extents_use_the_shorter_side() {
        let geometry = SwitchGeometry::new(
            Vec2::new(160.0, 120.0),
            Vec2::new(40.0, 30.0),
            Vec2::new(200.0, 150.0),
        );

        assert_eq!(geometry.background_half, 60.0);
        assert_eq!(geometry.foreground_half, 15.0);
        assert_eq!(geometry.middle, Vec2::new(80.0, 60.0));
        assert_eq!(geometry.up, Vec2::new(80.0, 0.0));
        assert_eq!(geometry.right, Vec2::new(140.0, 60.0));
    }

    #[test]
    fn reconciled_sizes_fill_the_widget() {
        let sizes = DisplaySizes::reconcile(
            UVec2::new(300, 200),
            UVec2::new(75, 50),
            UVec2::new(250, 120),
        );

        // r = 0.25 on both axes
        assert_eq!(sizes.background, UVec2::new(200, 96));
        assert_eq!(sizes.foreground, UVec2::new(50, 24));
        assert_eq!(sizes.background + sizes.foreground, UVec2::new(250, 120));
    }

    #[test]
    fn reconciliation_truncates() {
        let sizes = DisplaySizes::reconcile(UVec2::splat(8), UVec2::splat(2), UVec2::splat(101));

        // 101 / 1.25 = 80.8
        assert_eq!(sizes.background, UVec2::splat(80));
        assert_eq!(sizes.foreground, UVec2::splat(20));

        let sizes = DisplaySizes::reconcile(UVec2::splat(7), UVec2::splat(2), UVec2::splat(101));
        // 101 / (9 / 7) = 78.55.., 78 * 2 / 7 = 22.28..
        assert_eq!(sizes.background, UVec2::splat(78));
        assert_eq!(sizes.foreground, UVec2::splat(22));
    }

    #[test]
    fn degenerate_sizes_have_no_live_area() {
        let sizes = DisplaySizes::reconcile(UVec2::ZERO, UVec2::splat(40), UVec2::splat(200));
        assert_eq!(sizes, DisplaySizes::default());

        let geometry = SwitchGeometry::from_display_sizes(sizes, UVec2::splat(200));
        assert!(geometry.is_degenerate());
        assert!(!geometry.live_area_contains(Vec2::splat(100.0), false, false));
        assert!(!geometry.live_area_contains(Vec2::splat(100.0), false, true));

        let empty_widget = SwitchGeometry::new(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO);
        assert!(!empty_widget.live_area_contains(Vec2::ZERO, true, true));
    }

    #[test]
    fn circular_live_area_excludes_its_boundary() {
        let geometry = reference_geometry();

        // Overhanging knob: radius 100
        assert!(geometry.live_area_contains(Vec2::new(199.0, 100.0), false, false));
        assert!(!geometry.live_area_contains(Vec2::new(200.0, 100.0), false, false));
        assert!(!geometry.live_area_contains(Vec2::new(5.0, 5.0), false, false));

        // Knob kept inside: radius 80
        assert!(geometry.live_area_contains(Vec2::new(100.0, 21.0), true, false));
        assert!(!geometry.live_area_contains(Vec2::new(100.0, 20.0), true, false));
    }

    #[test]
    fn rectangular_live_area() {
        let geometry = reference_geometry();

        assert!(geometry.live_area_contains(Vec2::new(5.0, 5.0), false, true));
        assert!(geometry.live_area_contains(Vec2::new(200.0, 0.0), true, true));
        assert!(!geometry.live_area_contains(Vec2::new(-1.0, 5.0), false, true));
        assert!(!geometry.live_area_contains(Vec2::new(5.0, 201.0), false, true));
    }

    #[test]
    fn anchors_respect_keep_inside() {
        let geometry = reference_geometry();

        assert_eq!(geometry.anchor(SwitchDirection::Up, false), Vec2::new(80.0, 0.0));
        assert_eq!(geometry.anchor(SwitchDirection::Up, true), Vec2::new(80.0, 20.0));
        assert_eq!(geometry.anchor(SwitchDirection::Down, true), Vec2::new(80.0, 140.0));
        assert_eq!(geometry.anchor(SwitchDirection::Left, true), Vec2::new(20.0, 80.0));
        assert_eq!(geometry.anchor(SwitchDirection::Right, false), Vec2::new(160.0, 80.0));
        assert_eq!(geometry.anchor(SwitchDirection::Right, true), Vec2::new(140.0, 80.0));
        assert_eq!(geometry.anchor(SwitchDirection::Center, true), geometry.middle);
    }
}
