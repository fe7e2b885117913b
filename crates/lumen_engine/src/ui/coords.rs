//! UI coordinate units and resolution

use crate::foundation::math::Vec2;
use crate::render::ScreenRect;

/// Measurement units for UI positions and sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateUnit {
    /// Raw pixels
    Pixels,
    /// Percent of the viewport (0..100)
    Percentage,
    /// Fraction of the viewport (0..1)
    ViewportUnits,
}

/// Viewport corner (or center) a UI rectangle is positioned relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Offset from the top-left corner
    TopLeft,
    /// Offset from the top-right corner
    TopRight,
    /// Offset from the bottom-left corner
    BottomLeft,
    /// Offset from the bottom-right corner
    BottomRight,
    /// Offset from the viewport center
    Center,
}

/// Converts declarative UI coordinates into screen pixels
///
/// Holds the current viewport size; the frame driver updates it on resize.
#[derive(Debug)]
pub struct UiCoordinateSystem {
    viewport: Vec2,
}

impl UiCoordinateSystem {
    /// Create a coordinate system for the given viewport size in pixels
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Vec2::new(width, height),
        }
    }

    /// Update the viewport size (called on window resize)
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        log::debug!("UI viewport resized to {}x{}", width, height);
    }

    /// Current viewport size in pixels
    pub fn viewport_size(&self) -> Vec2 {
        self.viewport
    }

    /// Convert a value in the given unit to screen pixels
    pub fn to_screen(&self, value: Vec2, unit: CoordinateUnit) -> Vec2 {
        match unit {
            CoordinateUnit::Pixels => value,
            CoordinateUnit::Percentage => Vec2::new(
                value.x * self.viewport.x / 100.0,
                value.y * self.viewport.y / 100.0,
            ),
            CoordinateUnit::ViewportUnits => {
                Vec2::new(value.x * self.viewport.x, value.y * self.viewport.y)
            }
        }
    }

    /// Convert screen pixels to normalized (0..1) coordinates
    pub fn to_normalized(&self, screen: Vec2) -> Vec2 {
        Vec2::new(screen.x / self.viewport.x, screen.y / self.viewport.y)
    }

    /// Resolve a logical position/size pair into an anchored screen rect
    pub fn resolve_rect(
        &self,
        position: Vec2,
        size: Vec2,
        position_unit: CoordinateUnit,
        size_unit: CoordinateUnit,
        anchor: Anchor,
    ) -> ScreenRect {
        let offset = self.to_screen(position, position_unit);
        let size = self.to_screen(size, size_unit);
        let (vw, vh) = (self.viewport.x, self.viewport.y);

        let (x, y) = match anchor {
            Anchor::TopLeft => (offset.x, offset.y),
            Anchor::TopRight => (vw - offset.x - size.x, offset.y),
            Anchor::BottomLeft => (offset.x, vh - offset.y - size.y),
            Anchor::BottomRight => (vw - offset.x - size.x, vh - offset.y - size.y),
            Anchor::Center => (
                (vw - size.x) / 2.0 + offset.x,
                (vh - size.y) / 2.0 + offset.y,
            ),
        };
        ScreenRect::new(x, y, size.x, size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords() -> UiCoordinateSystem {
        UiCoordinateSystem::new(800.0, 600.0)
    }

    #[test]
    fn pixels_pass_through() {
        let c = coords();
        assert_eq!(
            c.to_screen(Vec2::new(120.0, 45.0), CoordinateUnit::Pixels),
            Vec2::new(120.0, 45.0)
        );
    }

    #[test]
    fn percentage_scales_with_viewport() {
        let c = coords();
        assert_eq!(
            c.to_screen(Vec2::new(50.0, 25.0), CoordinateUnit::Percentage),
            Vec2::new(400.0, 150.0)
        );
    }

    #[test]
    fn viewport_units_are_fractions() {
        let c = coords();
        assert_eq!(
            c.to_screen(Vec2::new(0.5, 1.0), CoordinateUnit::ViewportUnits),
            Vec2::new(400.0, 600.0)
        );
    }

    #[test]
    fn normalized_is_inverse_of_viewport_units() {
        let c = coords();
        let screen = c.to_screen(Vec2::new(0.25, 0.75), CoordinateUnit::ViewportUnits);
        assert_eq!(c.to_normalized(screen), Vec2::new(0.25, 0.75));
    }

    #[test]
    fn anchors_resolve_against_viewport_edges() {
        let c = coords();
        let position = Vec2::new(10.0, 20.0);
        let size = Vec2::new(100.0, 50.0);
        let resolve = |anchor| {
            c.resolve_rect(
                position,
                size,
                CoordinateUnit::Pixels,
                CoordinateUnit::Pixels,
                anchor,
            )
        };

        assert_eq!(resolve(Anchor::TopLeft), ScreenRect::new(10.0, 20.0, 100.0, 50.0));
        assert_eq!(resolve(Anchor::TopRight), ScreenRect::new(690.0, 20.0, 100.0, 50.0));
        assert_eq!(resolve(Anchor::BottomLeft), ScreenRect::new(10.0, 530.0, 100.0, 50.0));
        assert_eq!(
            resolve(Anchor::BottomRight),
            ScreenRect::new(690.0, 530.0, 100.0, 50.0)
        );
        assert_eq!(resolve(Anchor::Center), ScreenRect::new(360.0, 295.0, 100.0, 50.0));
    }

    #[test]
    fn resize_changes_resolution() {
        let mut c = coords();
        c.set_viewport_size(1600.0, 1200.0);
        assert_eq!(
            c.to_screen(Vec2::new(50.0, 50.0), CoordinateUnit::Percentage),
            Vec2::new(800.0, 600.0)
        );
    }
}
