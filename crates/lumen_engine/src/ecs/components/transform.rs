//! Transform component

use crate::ecs::Component;
use crate::foundation::math::{Mat4, Quat, Transform, Vec3};
use std::any::Any;

/// Spatial transformation component: position, rotation, scale
///
/// Pure data, fetched by value like every component: mutate a copy and
/// write it back with `add_component`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// World space position
    pub position: Vec3,
    /// World space rotation
    pub rotation: Quat,
    /// Per-axis scale factors
    pub scale: Vec3,
}

impl Component for TransformComponent {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl TransformComponent {
    /// Identity transform at the origin
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create from position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create from a full position/rotation/scale triple
    pub fn from_parts(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Builder: set a uniform scale factor
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Model matrix: scale, then rotate, then translate
    pub fn model_matrix(&self) -> Mat4 {
        self.to_math_transform().to_matrix()
    }

    /// Convert to the foundation math transform for calculations
    pub fn to_math_transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::foundation::math::Point3;

    #[test]
    fn identity_has_no_effect() {
        let transform = TransformComponent::identity();
        assert_relative_eq!(transform.model_matrix(), Mat4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn model_matrix_translates_points() {
        let transform = TransformComponent::from_position(Vec3::new(1.0, 2.0, 3.0));
        let moved = transform.model_matrix().transform_point(&Point3::origin());
        assert_relative_eq!(moved, Point3::new(1.0, 2.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn uniform_scale_builder() {
        let transform = TransformComponent::identity().with_uniform_scale(2.5);
        assert_eq!(transform.scale, Vec3::new(2.5, 2.5, 2.5));
    }
}
