//! Widget trait and the retained element tree

use super::UiState;
use crate::render::{RenderDevice, RenderResult, ScreenRect};

/// Identifier of an element inside a [`UiTree`]
///
/// This is what [`UiComponent`](crate::ecs::components::UiComponent) stores;
/// the ECS holds declarative placement while the tree holds widget behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UiElementId(u64);

/// Behavior shared by every retained widget
pub trait UiElement {
    /// Resolved screen-space bounds
    fn rect(&self) -> ScreenRect;

    /// Set resolved screen-space bounds (written by the UI sync system)
    fn set_rect(&mut self, rect: ScreenRect);

    /// Whether the widget is drawn
    fn is_visible(&self) -> bool;

    /// Show or hide the widget
    fn set_visible(&mut self, visible: bool);

    /// Whether the widget reacts to input
    fn is_enabled(&self) -> bool;

    /// Current interaction state
    fn state(&self) -> UiState;

    /// Draw order; higher values draw on top
    fn z_index(&self) -> i32 {
        0
    }

    /// Per-frame bookkeeping (layout of child widgets, animations)
    fn update(&mut self, _dt: f32) {}

    /// Cursor moved to the given screen position
    fn handle_cursor(&mut self, x: f32, y: f32);

    /// Primary mouse button changed state at the given screen position
    fn handle_mouse_button(&mut self, pressed: bool, x: f32, y: f32);

    /// Draw the widget through the device's overlay path
    fn draw(&self, device: &mut dyn RenderDevice) -> RenderResult<()>;
}

/// Retained widget storage, parallel to the ECS
///
/// Elements keep their insertion order; drawing sorts by z-index on the fly.
#[derive(Default)]
pub struct UiTree {
    elements: Vec<(UiElementId, Box<dyn UiElement>)>,
    next_id: u64,
}

impl UiTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element and return its id
    pub fn insert(&mut self, element: Box<dyn UiElement>) -> UiElementId {
        let id = UiElementId(self.next_id);
        self.next_id += 1;
        self.elements.push((id, element));
        id
    }

    /// Remove an element; returns it if present
    pub fn remove(&mut self, id: UiElementId) -> Option<Box<dyn UiElement>> {
        let index = self.elements.iter().position(|(eid, _)| *eid == id)?;
        Some(self.elements.remove(index).1)
    }

    /// Access an element by id
    pub fn element(&self, id: UiElementId) -> Option<&dyn UiElement> {
        self.elements
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, element)| &**element)
    }

    /// Mutable access to an element by id
    pub fn element_mut(&mut self, id: UiElementId) -> Option<&mut (dyn UiElement + 'static)> {
        self.elements
            .iter_mut()
            .find(|(eid, _)| *eid == id)
            .map(|(_, element)| &mut **element)
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the tree is empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Run a closure over every element
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut dyn UiElement)) {
        for (_, element) in &mut self.elements {
            f(&mut **element);
        }
    }

    /// Draw all visible elements in ascending z order
    pub fn draw(&self, device: &mut dyn RenderDevice) -> RenderResult<()> {
        let mut order: Vec<&dyn UiElement> = self
            .elements
            .iter()
            .map(|(_, element)| &**element)
            .filter(|element| element.is_visible())
            .collect();
        order.sort_by_key(|element| element.z_index());
        for element in order {
            element.draw(device)?;
        }
        Ok(())
    }
}
