//! Transform manipulation system

use crate::ecs::components::TransformComponent;
use crate::ecs::{EcsResult, Entity, EntityManager, System};
use crate::engine::EngineResult;
use crate::foundation::math::{Quat, Unit, Vec3};

/// Helpers for moving, rotating, and scaling entities
///
/// Holds no per-frame behavior of its own; callers use the helpers, each of
/// which follows the get-mutate-write-back contract for value components.
#[derive(Default)]
pub struct TransformSystem;

impl TransformSystem {
    /// Create the system
    pub fn new() -> Self {
        Self
    }

    /// Move an entity by a world-space delta
    pub fn translate(
        &self,
        entities: &mut EntityManager,
        entity: Entity,
        delta: Vec3,
    ) -> EcsResult<()> {
        let mut transform = entities.get_component::<TransformComponent>(entity)?;
        transform.position += delta;
        entities.add_component(entity, transform)
    }

    /// Rotate an entity by an angle (radians) around an axis, applied on
    /// top of its current rotation
    pub fn rotate(
        &self,
        entities: &mut EntityManager,
        entity: Entity,
        axis: Vec3,
        angle_rad: f32,
    ) -> EcsResult<()> {
        let mut transform = entities.get_component::<TransformComponent>(entity)?;
        let rotation = Quat::from_axis_angle(&Unit::new_normalize(axis), angle_rad);
        transform.rotation = rotation * transform.rotation;
        entities.add_component(entity, transform)
    }

    /// Multiply an entity's scale component-wise
    pub fn scale(
        &self,
        entities: &mut EntityManager,
        entity: Entity,
        factor: Vec3,
    ) -> EcsResult<()> {
        let mut transform = entities.get_component::<TransformComponent>(entity)?;
        transform.scale.component_mul_assign(&factor);
        entities.add_component(entity, transform)
    }
}

impl System for TransformSystem {
    fn name(&self) -> &'static str {
        "transform"
    }

    fn update(&mut self, _entities: &mut EntityManager, _dt: f32) -> EngineResult<()> {
        Ok(())
    }
}
