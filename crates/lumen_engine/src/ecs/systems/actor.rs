//! Behavior-hook dispatch system

use crate::ecs::components::TransformComponent;
use crate::ecs::{ActorContext, Entity, EntityManager, System};
use crate::engine::EngineResult;

/// Runs the [`Updatable`](crate::ecs::Updatable) hooks of every component
/// that exposes them
///
/// Scans all entities each frame and dispatches on the stored component
/// instances, so hook-internal state persists without write-backs. The
/// entity's transform is handed to hooks as a mutable clone and written
/// back afterwards (components are value-typed).
#[derive(Default)]
pub struct ActorSystem;

impl ActorSystem {
    /// Create the system
    pub fn new() -> Self {
        Self
    }

    fn dispatch(
        entities: &mut EntityManager,
        mut hook: impl FnMut(&mut dyn crate::ecs::Updatable, &mut ActorContext<'_>),
    ) -> EngineResult<()> {
        let all: Vec<Entity> = entities.entities().collect();
        for entity in all {
            let mut transform = entities.try_get_component::<TransformComponent>(entity);
            let mut ran_hook = false;
            for component in entities.components_mut(entity)? {
                if let Some(updatable) = component.as_updatable_mut() {
                    let mut ctx = ActorContext {
                        entity,
                        transform: transform.as_mut(),
                    };
                    hook(updatable, &mut ctx);
                    ran_hook = true;
                }
            }
            if ran_hook {
                if let Some(transform) = transform {
                    entities.add_component(entity, transform)?;
                }
            }
        }
        Ok(())
    }
}

impl System for ActorSystem {
    fn name(&self) -> &'static str {
        "actor"
    }

    fn initialize(&mut self, entities: &mut EntityManager) -> EngineResult<()> {
        Self::dispatch(entities, |updatable, ctx| updatable.on_initialize(ctx))
    }

    fn update(&mut self, entities: &mut EntityManager, dt: f32) -> EngineResult<()> {
        Self::dispatch(entities, |updatable, ctx| updatable.on_update(dt, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::SpinnerComponent;
    use crate::ecs::{Component, Updatable};
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;
    use std::any::Any;

    #[derive(Debug, Clone, Default)]
    struct Probe {
        initialized: u32,
        updates: u32,
        last_dt: f32,
    }

    impl Component for Probe {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn as_updatable_mut(&mut self) -> Option<&mut dyn Updatable> {
            Some(self)
        }
    }

    impl Updatable for Probe {
        fn on_initialize(&mut self, _ctx: &mut ActorContext<'_>) {
            self.initialized += 1;
        }
        fn on_update(&mut self, dt: f32, _ctx: &mut ActorContext<'_>) {
            self.updates += 1;
            self.last_dt = dt;
        }
    }

    #[test]
    fn hooks_run_on_stored_instances() {
        let mut entities = EntityManager::new();
        let entity = entities.create_entity();
        entities.add_component(entity, Probe::default()).unwrap();

        let mut system = ActorSystem::new();
        system.initialize(&mut entities).unwrap();
        system.update(&mut entities, 0.5).unwrap();
        system.update(&mut entities, 0.25).unwrap();

        // Hook state persisted across frames without any explicit write-back
        let probe: Probe = entities.get_component(entity).unwrap();
        assert_eq!(probe.initialized, 1);
        assert_eq!(probe.updates, 2);
        assert_eq!(probe.last_dt, 0.25);
    }

    #[test]
    fn entities_without_hooks_are_skipped() {
        let mut entities = EntityManager::new();
        let entity = entities.create_entity();
        entities
            .add_component(entity, TransformComponent::identity())
            .unwrap();

        let mut system = ActorSystem::new();
        // Nothing to dispatch, nothing to fail
        system.update(&mut entities, 0.016).unwrap();
    }

    #[test]
    fn spinner_rotates_its_entity_transform() {
        let mut entities = EntityManager::new();
        let entity = entities.create_entity();
        entities
            .add_component(entity, TransformComponent::identity())
            .unwrap();
        entities
            .add_component(entity, SpinnerComponent::fixed(Vec3::y(), 1.0))
            .unwrap();

        let mut system = ActorSystem::new();
        system.update(&mut entities, 0.5).unwrap();

        let transform: TransformComponent = entities.get_component(entity).unwrap();
        // Half a second at 1 rad/s around Y
        let angle = transform.rotation.angle();
        assert_relative_eq!(angle, 0.5, epsilon = 1e-4);
    }
}
