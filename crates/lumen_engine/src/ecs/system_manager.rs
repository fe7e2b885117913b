//! System registration and ordered frame dispatch

use super::{EntityManager, System};
use crate::engine::EngineResult;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a registered system
///
/// Callers keep a clone to unregister later or to reach system-specific
/// methods (the frame driver does this for resize propagation).
pub type SystemHandle = Rc<RefCell<dyn System>>;

/// Ordered registry of systems
///
/// Registration order is execution order, for both the update and the
/// render pass. Systems run synchronously with no isolation: a system
/// observes component mutations made by earlier systems in the same pass,
/// and an error from any system aborts the pass immediately.
#[derive(Default)]
pub struct SystemManager {
    systems: Vec<SystemHandle>,
}

fn data_ptr(system: &SystemHandle) -> *const () {
    Rc::as_ptr(system).cast::<()>()
}

impl SystemManager {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Register a system at the end of the execution order
    ///
    /// Registering the same instance again (by reference identity) is a
    /// no-op, not an error.
    pub fn register_system(&mut self, system: SystemHandle) {
        if self.has_system(&system) {
            log::debug!(
                "system {} already registered, ignoring",
                system.borrow().name()
            );
            return;
        }
        log::info!("registered system {}", system.borrow().name());
        self.systems.push(system);
    }

    /// Remove a system; no-op if it was never registered
    pub fn unregister_system(&mut self, system: &SystemHandle) {
        let target = data_ptr(system);
        let before = self.systems.len();
        self.systems.retain(|s| data_ptr(s) != target);
        if self.systems.len() != before {
            log::info!("unregistered system {}", system.borrow().name());
        }
    }

    /// Whether the given instance is currently registered
    pub fn has_system(&self, system: &SystemHandle) -> bool {
        let target = data_ptr(system);
        self.systems.iter().any(|s| data_ptr(s) == target)
    }

    /// Number of registered systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Drop every registered system
    pub fn clear(&mut self) {
        self.systems.clear();
    }

    /// Run every system's one-time setup, in registration order
    pub fn initialize_all(&mut self, entities: &mut EntityManager) -> EngineResult<()> {
        for system in &self.systems {
            system.borrow_mut().initialize(entities)?;
        }
        Ok(())
    }

    /// Run the update pass, in registration order
    pub fn update_all(&mut self, entities: &mut EntityManager, dt: f32) -> EngineResult<()> {
        for system in &self.systems {
            system.borrow_mut().update(entities, dt)?;
        }
        Ok(())
    }

    /// Run the render pass, in registration order
    pub fn render_all(&mut self, entities: &mut EntityManager) -> EngineResult<()> {
        for system in &self.systems {
            system.borrow_mut().render(entities)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Component, EcsError};
    use std::any::Any;

    #[derive(Debug, Clone, PartialEq)]
    struct Marker(u32);

    impl Component for Marker {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    /// Appends its tag to a shared journal on every update
    struct JournalSystem {
        tag: &'static str,
        journal: Rc<RefCell<Vec<&'static str>>>,
    }

    impl System for JournalSystem {
        fn name(&self) -> &'static str {
            self.tag
        }
        fn update(&mut self, _entities: &mut EntityManager, _dt: f32) -> EngineResult<()> {
            self.journal.borrow_mut().push(self.tag);
            Ok(())
        }
    }

    /// Writes a Marker component onto a fixed entity
    struct WriterSystem {
        target: crate::ecs::Entity,
    }

    impl System for WriterSystem {
        fn name(&self) -> &'static str {
            "writer"
        }
        fn update(&mut self, entities: &mut EntityManager, _dt: f32) -> EngineResult<()> {
            entities.add_component(self.target, Marker(7))?;
            Ok(())
        }
    }

    /// Asserts it can observe the writer's component within the same pass
    struct ReaderSystem {
        target: crate::ecs::Entity,
        observed: Rc<RefCell<Option<Marker>>>,
    }

    impl System for ReaderSystem {
        fn name(&self) -> &'static str {
            "reader"
        }
        fn update(&mut self, entities: &mut EntityManager, _dt: f32) -> EngineResult<()> {
            *self.observed.borrow_mut() = entities.try_get_component::<Marker>(self.target);
            Ok(())
        }
    }

    struct FailingSystem;

    impl System for FailingSystem {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn update(&mut self, entities: &mut EntityManager, _dt: f32) -> EngineResult<()> {
            // Poke a nonexistent entity so the precondition error surfaces
            let ghost = {
                let e = entities.create_entity();
                entities.destroy_entity(e)?;
                e
            };
            entities.get_component::<Marker>(ghost)?;
            Ok(())
        }
    }

    fn journal_pair() -> (Rc<RefCell<Vec<&'static str>>>, EntityManager) {
        (Rc::new(RefCell::new(Vec::new())), EntityManager::new())
    }

    #[test]
    fn duplicate_registration_is_idempotent() {
        let (journal, mut entities) = journal_pair();
        let system = Rc::new(RefCell::new(JournalSystem {
            tag: "a",
            journal: journal.clone(),
        }));

        let mut manager = SystemManager::new();
        manager.register_system(system.clone());
        manager.register_system(system.clone());
        assert_eq!(manager.len(), 1);

        manager.update_all(&mut entities, 0.016).unwrap();
        assert_eq!(*journal.borrow(), vec!["a"]);
    }

    #[test]
    fn update_runs_in_registration_order() {
        let (journal, mut entities) = journal_pair();
        let mut manager = SystemManager::new();
        for tag in ["first", "second", "third"] {
            manager.register_system(Rc::new(RefCell::new(JournalSystem {
                tag,
                journal: journal.clone(),
            })));
        }

        manager.update_all(&mut entities, 0.016).unwrap();
        assert_eq!(*journal.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn later_system_observes_earlier_writes_in_same_pass() {
        let mut entities = EntityManager::new();
        let target = entities.create_entity();
        let observed = Rc::new(RefCell::new(None));

        let mut manager = SystemManager::new();
        manager.register_system(Rc::new(RefCell::new(WriterSystem { target })));
        manager.register_system(Rc::new(RefCell::new(ReaderSystem {
            target,
            observed: observed.clone(),
        })));

        manager.update_all(&mut entities, 0.016).unwrap();
        assert_eq!(*observed.borrow(), Some(Marker(7)));
    }

    #[test]
    fn unregister_stops_dispatch_and_is_noop_when_absent() {
        let (journal, mut entities) = journal_pair();
        let system: SystemHandle = Rc::new(RefCell::new(JournalSystem {
            tag: "a",
            journal: journal.clone(),
        }));

        let mut manager = SystemManager::new();
        manager.register_system(system.clone());
        manager.unregister_system(&system);
        manager.unregister_system(&system);
        assert!(manager.is_empty());

        manager.update_all(&mut entities, 0.016).unwrap();
        assert!(journal.borrow().is_empty());
    }

    #[test]
    fn system_error_aborts_the_pass() {
        let (journal, mut entities) = journal_pair();
        let mut manager = SystemManager::new();
        manager.register_system(Rc::new(RefCell::new(FailingSystem)));
        manager.register_system(Rc::new(RefCell::new(JournalSystem {
            tag: "after",
            journal: journal.clone(),
        })));

        let result = manager.update_all(&mut entities, 0.016);
        assert!(matches!(
            result,
            Err(crate::engine::EngineError::Ecs(EcsError::EntityNotFound(_)))
        ));
        // The system registered after the failing one never ran
        assert!(journal.borrow().is_empty());
    }
}
