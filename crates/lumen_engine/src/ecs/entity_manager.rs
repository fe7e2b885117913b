//! Entity and component storage
//!
//! The entity manager owns every component instance in the world. Storage is
//! a per-entity map keyed by component type, plus an insertion-ordered active
//! list that fixes the iteration order of scans and queries.

use super::entity::EntityAllocator;
use super::{Component, EcsError, EcsResult, Entity};
use std::any::{type_name, TypeId};
use std::collections::HashMap;

type ComponentMap = HashMap<TypeId, Box<dyn Component>>;

/// Owner of all entities and their components
///
/// All "entity must exist" / "component must exist" preconditions fail fast
/// with an [`EcsError`]; nothing is silently ignored. Queries materialize
/// eagerly, so their results stay valid while storage is mutated during
/// consumption.
#[derive(Default)]
pub struct EntityManager {
    allocator: EntityAllocator,
    /// Active entities in creation order
    entities: Vec<Entity>,
    components: HashMap<Entity, ComponentMap>,
}

impl EntityManager {
    /// Create an empty entity manager
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            entities: Vec::new(),
            components: HashMap::new(),
        }
    }

    /// Create a new entity with an empty component map
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.entities.push(entity);
        self.components.insert(entity, ComponentMap::new());
        log::trace!("created {}", entity);
        entity
    }

    /// Destroy an entity, discarding all of its components in one step
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        if self.components.remove(&entity).is_none() {
            return Err(EcsError::EntityNotFound(entity));
        }
        self.entities.retain(|e| *e != entity);
        log::trace!("destroyed {}", entity);
        Ok(())
    }

    /// Attach a component to an entity, replacing any existing one of the
    /// same type (last write wins)
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> EcsResult<()> {
        let slots = self
            .components
            .get_mut(&entity)
            .ok_or(EcsError::EntityNotFound(entity))?;
        slots.insert(TypeId::of::<T>(), Box::new(component));
        Ok(())
    }

    /// Remove the `T` component from an entity
    ///
    /// Fails if the entity does not exist or does not carry a `T`.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> EcsResult<()> {
        let slots = self
            .components
            .get_mut(&entity)
            .ok_or(EcsError::EntityNotFound(entity))?;
        if slots.remove(&TypeId::of::<T>()).is_none() {
            return Err(EcsError::ComponentNotFound {
                entity,
                component: type_name::<T>(),
            });
        }
        Ok(())
    }

    /// Whether the entity exists and carries a `T` component
    ///
    /// Returns `false` (no error) for destroyed or unknown entities, so it
    /// doubles as a safe existence probe.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components
            .get(&entity)
            .is_some_and(|slots| slots.contains_key(&TypeId::of::<T>()))
    }

    /// Fetch a clone of the entity's `T` component
    ///
    /// The returned value is a copy: mutating it does not change stored
    /// state. Persist changes with `get_component` + mutate +
    /// [`add_component`](Self::add_component).
    pub fn get_component<T: Component + Clone>(&self, entity: Entity) -> EcsResult<T> {
        let slots = self
            .components
            .get(&entity)
            .ok_or(EcsError::EntityNotFound(entity))?;
        let component = slots
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.as_any().downcast_ref::<T>())
            .ok_or(EcsError::ComponentNotFound {
                entity,
                component: type_name::<T>(),
            })?;
        Ok(component.clone())
    }

    /// Non-erroring variant of [`get_component`](Self::get_component)
    pub fn try_get_component<T: Component + Clone>(&self, entity: Entity) -> Option<T> {
        self.components
            .get(&entity)?
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.as_any().downcast_ref::<T>())
            .cloned()
    }

    /// All active entities, in creation order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// Number of active entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Destroy every entity and component; the ID counter keeps advancing
    pub fn clear(&mut self) {
        self.entities.clear();
        self.components.clear();
    }

    /// Find every active entity carrying all of the given component types
    ///
    /// Intersection semantics; an empty type list matches every entity. The
    /// result is materialized eagerly in creation order, so callers may
    /// mutate storage while consuming it.
    pub fn query_entities(&self, component_types: &[TypeId]) -> Vec<Entity> {
        self.entities
            .iter()
            .copied()
            .filter(|entity| {
                self.components
                    .get(entity)
                    .is_some_and(|slots| component_types.iter().all(|ty| slots.contains_key(ty)))
            })
            .collect()
    }

    /// All components attached to an entity, regardless of type
    pub fn components(&self, entity: Entity) -> EcsResult<impl Iterator<Item = &dyn Component>> {
        let slots = self
            .components
            .get(&entity)
            .ok_or(EcsError::EntityNotFound(entity))?;
        Ok(slots.values().map(|boxed| &**boxed))
    }

    /// Mutable access to all components attached to an entity
    ///
    /// Used by the actor system for capability-based hook dispatch on the
    /// stored instances.
    pub fn components_mut(
        &mut self,
        entity: Entity,
    ) -> EcsResult<impl Iterator<Item = &mut dyn Component>> {
        let slots = self
            .components
            .get_mut(&entity)
            .ok_or(EcsError::EntityNotFound(entity))?;
        Ok(slots.values_mut().map(|boxed| &mut **boxed))
    }

    /// Clones of every stored `T`, across all entities in creation order
    ///
    /// No per-type index is maintained; this is linear in entity count.
    pub fn components_of_type<T: Component + Clone>(&self) -> Vec<T> {
        self.entities
            .iter()
            .filter_map(|entity| {
                self.components
                    .get(entity)
                    .and_then(|slots| slots.get(&TypeId::of::<T>()))
                    .and_then(|boxed| boxed.as_any().downcast_ref::<T>())
                    .cloned()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Component;
    use std::any::Any;

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Velocity {
        dx: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Tag;

    impl Component for Position {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    impl Component for Velocity {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    impl Component for Tag {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn ids(types: &[TypeId]) -> Vec<TypeId> {
        types.to_vec()
    }

    #[test]
    fn created_entities_are_unique() {
        let mut manager = EntityManager::new();
        let handles: Vec<Entity> = (0..100).map(|_| manager.create_entity()).collect();
        for (i, a) in handles.iter().enumerate() {
            for b in &handles[i + 1..] {
                assert_ne!(a.id(), b.id());
            }
        }
    }

    #[test]
    fn add_then_get_roundtrips() {
        let mut manager = EntityManager::new();
        let entity = manager.create_entity();
        manager
            .add_component(entity, Position { x: 1.0, y: 2.0 })
            .unwrap();
        let fetched: Position = manager.get_component(entity).unwrap();
        assert_eq!(fetched, Position { x: 1.0, y: 2.0 });
    }

    #[test]
    fn add_replaces_not_merges() {
        let mut manager = EntityManager::new();
        let entity = manager.create_entity();
        manager
            .add_component(entity, Position { x: 1.0, y: 1.0 })
            .unwrap();
        manager
            .add_component(entity, Position { x: 9.0, y: 9.0 })
            .unwrap();
        let fetched: Position = manager.get_component(entity).unwrap();
        assert_eq!(fetched, Position { x: 9.0, y: 9.0 });
    }

    #[test]
    fn get_without_writeback_never_mutates_storage() {
        let mut manager = EntityManager::new();
        let entity = manager.create_entity();
        manager
            .add_component(entity, Position { x: 1.0, y: 1.0 })
            .unwrap();

        let mut copy: Position = manager.get_component(entity).unwrap();
        copy.x = 42.0;

        let stored: Position = manager.get_component(entity).unwrap();
        assert_eq!(stored, Position { x: 1.0, y: 1.0 });
    }

    #[test]
    fn destroy_purges_all_components() {
        let mut manager = EntityManager::new();
        let entity = manager.create_entity();
        manager
            .add_component(entity, Position { x: 0.0, y: 0.0 })
            .unwrap();
        manager.add_component(entity, Velocity { dx: 1.0 }).unwrap();

        manager.destroy_entity(entity).unwrap();

        assert!(!manager.has_component::<Position>(entity));
        assert!(!manager.has_component::<Velocity>(entity));
        assert_eq!(
            manager.get_component::<Position>(entity),
            Err(EcsError::EntityNotFound(entity))
        );
        assert_eq!(
            manager.add_component(entity, Tag),
            Err(EcsError::EntityNotFound(entity))
        );
        assert_eq!(manager.entity_count(), 0);
    }

    #[test]
    fn destroy_unknown_entity_errors() {
        let mut manager = EntityManager::new();
        let entity = manager.create_entity();
        manager.destroy_entity(entity).unwrap();
        assert_eq!(
            manager.destroy_entity(entity),
            Err(EcsError::EntityNotFound(entity))
        );
    }

    #[test]
    fn remove_missing_component_errors_and_leaves_siblings() {
        let mut manager = EntityManager::new();
        let entity = manager.create_entity();
        manager
            .add_component(entity, Position { x: 3.0, y: 4.0 })
            .unwrap();

        let result = manager.remove_component::<Velocity>(entity);
        assert!(matches!(
            result,
            Err(EcsError::ComponentNotFound { entity: e, .. }) if e == entity
        ));
        // The failed removal must not disturb other components
        assert!(manager.has_component::<Position>(entity));
    }

    #[test]
    fn has_component_is_false_for_inactive_entity() {
        let mut manager = EntityManager::new();
        let entity = manager.create_entity();
        manager.add_component(entity, Tag).unwrap();
        manager.destroy_entity(entity).unwrap();
        assert!(!manager.has_component::<Tag>(entity));
    }

    #[test]
    fn try_get_returns_none_instead_of_error() {
        let mut manager = EntityManager::new();
        let entity = manager.create_entity();
        assert_eq!(manager.try_get_component::<Position>(entity), None);
        manager
            .add_component(entity, Position { x: 5.0, y: 6.0 })
            .unwrap();
        assert_eq!(
            manager.try_get_component::<Position>(entity),
            Some(Position { x: 5.0, y: 6.0 })
        );
    }

    #[test]
    fn query_is_intersection_of_per_type_sets() {
        let mut manager = EntityManager::new();
        let a = manager.create_entity();
        let b = manager.create_entity();
        let c = manager.create_entity();

        manager.add_component(a, Position { x: 0.0, y: 0.0 }).unwrap();
        manager.add_component(a, Velocity { dx: 0.0 }).unwrap();
        manager.add_component(b, Position { x: 0.0, y: 0.0 }).unwrap();
        manager.add_component(c, Velocity { dx: 0.0 }).unwrap();

        let both = manager.query_entities(&ids(&[TypeId::of::<Position>(), TypeId::of::<Velocity>()]));
        assert_eq!(both, vec![a]);

        // Detach and re-check: queries reflect storage at call time
        manager.remove_component::<Velocity>(a).unwrap();
        let both = manager.query_entities(&ids(&[TypeId::of::<Position>(), TypeId::of::<Velocity>()]));
        assert!(both.is_empty());

        manager.add_component(b, Velocity { dx: 1.0 }).unwrap();
        let both = manager.query_entities(&ids(&[TypeId::of::<Position>(), TypeId::of::<Velocity>()]));
        assert_eq!(both, vec![b]);
    }

    #[test]
    fn query_preserves_creation_order() {
        let mut manager = EntityManager::new();
        let entities: Vec<Entity> = (0..10).map(|_| manager.create_entity()).collect();
        for entity in &entities {
            manager.add_component(*entity, Tag).unwrap();
        }
        let found = manager.query_entities(&[TypeId::of::<Tag>()]);
        assert_eq!(found, entities);
    }

    #[test]
    fn empty_query_matches_all_active_entities() {
        let mut manager = EntityManager::new();
        let a = manager.create_entity();
        let b = manager.create_entity();
        assert_eq!(manager.query_entities(&[]), vec![a, b]);
    }

    #[test]
    fn components_of_type_scans_all_entities() {
        let mut manager = EntityManager::new();
        let a = manager.create_entity();
        let _gap = manager.create_entity();
        let b = manager.create_entity();
        manager.add_component(a, Velocity { dx: 1.0 }).unwrap();
        manager.add_component(b, Velocity { dx: 2.0 }).unwrap();

        let all = manager.components_of_type::<Velocity>();
        assert_eq!(all, vec![Velocity { dx: 1.0 }, Velocity { dx: 2.0 }]);
    }

    #[test]
    fn components_iterates_every_attached_component() {
        let mut manager = EntityManager::new();
        let entity = manager.create_entity();
        manager
            .add_component(entity, Position { x: 0.0, y: 0.0 })
            .unwrap();
        manager.add_component(entity, Velocity { dx: 0.0 }).unwrap();
        assert_eq!(manager.components(entity).unwrap().count(), 2);

        manager.destroy_entity(entity).unwrap();
        assert!(manager.components(entity).is_err());
    }
}
