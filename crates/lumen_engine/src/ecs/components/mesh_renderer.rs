//! Mesh renderer component

use crate::ecs::Component;
use crate::render::{Color, MeshHandle};
use std::any::Any;

/// Marks an entity as drawable: which uploaded mesh, in which color
///
/// The render system draws every entity carrying this component together
/// with a [`TransformComponent`](super::TransformComponent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshRendererComponent {
    /// Handle of the mesh uploaded to the render device
    pub mesh: MeshHandle,
    /// Flat surface color
    pub color: Color,
}

impl Component for MeshRendererComponent {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl MeshRendererComponent {
    /// Create a renderer for a mesh with an explicit color
    pub fn new(mesh: MeshHandle, color: Color) -> Self {
        Self { mesh, color }
    }

    /// Create a renderer with the default white color
    pub fn white(mesh: MeshHandle) -> Self {
        Self::new(mesh, Color::WHITE)
    }
}
