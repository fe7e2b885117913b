//! Camera component

use super::TransformComponent;
use crate::ecs::Component;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use std::any::Any;

/// Perspective projection parameters for a camera entity
///
/// An entity becomes a camera candidate by carrying both this component and
/// a [`TransformComponent`]; the first such entity in creation order is the
/// active camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraComponent {
    /// Vertical field of view in degrees
    pub fov_y_deg: f32,
    /// Viewport width divided by height
    pub aspect: f32,
    /// Near clip plane distance
    pub near: f32,
    /// Far clip plane distance
    pub far: f32,
}

impl Component for CameraComponent {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            fov_y_deg: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraComponent {
    /// Create a camera with explicit projection parameters
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_deg,
            aspect,
            near,
            far,
        }
    }

    /// Perspective projection matrix for the current parameters
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(
            utils::deg_to_rad(self.fov_y_deg),
            self.aspect,
            self.near,
            self.far,
        )
    }

    /// View matrix derived from the camera entity's transform
    ///
    /// Forward is the rotated -Z axis and up the rotated +Y axis, looking
    /// from the transform's position.
    pub fn view_matrix(&self, transform: &TransformComponent) -> Mat4 {
        let forward = transform.rotation * Vec3::new(0.0, 0.0, -1.0);
        let up = transform.rotation * Vec3::y();
        Mat4::look_at(transform.position, transform.position + forward, up)
    }
}
