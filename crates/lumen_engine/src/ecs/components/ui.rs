//! UI placement component

use crate::ecs::Component;
use crate::foundation::math::Vec2;
use crate::ui::{Anchor, CoordinateUnit, UiElementId};
use std::any::Any;

/// Declarative placement of one retained UI element
///
/// The ECS stores where a widget goes (in logical units); the widget itself
/// lives in the [`UiTree`](crate::ui::UiTree). The UI sync system resolves
/// this component into screen pixels every frame and pushes the result into
/// the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiComponent {
    /// Element in the UI tree this placement applies to
    pub element: UiElementId,
    /// Logical position, in `position_unit` units
    pub position: Vec2,
    /// Logical size, in `size_unit` units
    pub size: Vec2,
    /// Unit for `position`
    pub position_unit: CoordinateUnit,
    /// Unit for `size`
    pub size_unit: CoordinateUnit,
    /// Viewport anchor the position is relative to
    pub anchor: Anchor,
    /// Whether the element should be shown
    pub visible: bool,
}

impl Component for UiComponent {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl UiComponent {
    /// Pixel-anchored placement from the top-left corner
    pub fn pixels(element: UiElementId, position: Vec2, size: Vec2) -> Self {
        Self {
            element,
            position,
            size,
            position_unit: CoordinateUnit::Pixels,
            size_unit: CoordinateUnit::Pixels,
            anchor: Anchor::TopLeft,
            visible: true,
        }
    }

    /// Builder: change the anchor
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Builder: change the units
    pub fn with_units(mut self, position_unit: CoordinateUnit, size_unit: CoordinateUnit) -> Self {
        self.position_unit = position_unit;
        self.size_unit = size_unit;
        self
    }
}
