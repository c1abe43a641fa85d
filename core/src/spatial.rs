//! Distance and overlap math shared by generation, collision and steering.

use serde::{Deserialize, Serialize};

use crate::{Position, Size};

/// Axis-aligned rectangle in either world or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and extents.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds the footprint of an entity located at `position`.
    #[must_use]
    pub const fn from_footprint(position: Position, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    /// Centre point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Reports whether the interiors of two rectangles intersect.
    ///
    /// Rectangles that merely share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Point expressed in screen pixels, origin at the top-left of the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate.
    pub y: f32,
}

impl ScreenPoint {
    /// Creates a new screen point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Surface width in pixels.
    pub width: f32,
    /// Surface height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport description.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Centre of the surface; the player is always drawn here.
    #[must_use]
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Translation from world space to screen space that keeps the player centred.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    offset_x: f32,
    offset_y: f32,
}

impl Camera {
    /// Creates a camera that centres `target` inside `viewport`.
    #[must_use]
    pub fn follow(target: Rect, viewport: Viewport) -> Self {
        let focus = target.center();
        let screen_center = viewport.center();
        Self {
            offset_x: screen_center.x - focus.x,
            offset_y: screen_center.y - focus.y,
        }
    }

    /// Offset added to world coordinates to obtain screen coordinates.
    #[must_use]
    pub const fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    /// Maps a world position onto the screen.
    #[must_use]
    pub fn to_screen(&self, position: Position) -> ScreenPoint {
        ScreenPoint::new(position.x + self.offset_x, position.y + self.offset_y)
    }

    /// Maps a world rectangle onto the screen.
    #[must_use]
    pub fn project(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x + self.offset_x,
            rect.y + self.offset_y,
            rect.width,
            rect.height,
        )
    }
}

/// Angle in radians from `origin` towards `target`, as `atan2(dy, dx)`.
#[must_use]
pub fn heading_between(origin: ScreenPoint, target: ScreenPoint) -> f32 {
    (target.y - origin.y).atan2(target.x - origin.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn touching_rectangles_do_not_overlap() {
        let left = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!left.overlaps(&right));
        assert!(!right.overlaps(&left));
    }

    #[test]
    fn nested_rectangles_overlap() {
        let outer = Rect::new(0.0, 0.0, 50.0, 50.0);
        let inner = Rect::new(20.0, 20.0, 5.0, 5.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn camera_places_target_at_viewport_center() {
        let viewport = Viewport::new(800.0, 600.0);
        let player = Rect::new(985.0, 15.0, 30.0, 30.0);
        let camera = Camera::follow(player, viewport);
        let projected = camera.project(player);

        assert_relative_eq!(projected.center().x, 400.0);
        assert_relative_eq!(projected.center().y, 300.0);
    }

    #[test]
    fn heading_matches_atan2() {
        let angle = heading_between(ScreenPoint::new(400.0, 300.0), ScreenPoint::new(450.0, 320.0));
        assert_relative_eq!(angle, 20.0_f32.atan2(50.0));
    }
}
