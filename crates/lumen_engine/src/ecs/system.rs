//! System trait

use super::EntityManager;
use crate::engine::EngineResult;

/// Per-frame coordinator operating over components via queries
///
/// Systems are constructed once, optionally initialized once, then driven
/// by the [`SystemManager`](super::SystemManager) every frame for as long
/// as they stay registered. They never own entities or components; the
/// entity manager is passed into each call. Collaborator services (input,
/// render device, UI tree) are injected at construction time.
///
/// A returned error aborts the frame: the registry provides no isolation
/// between systems.
pub trait System {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// One-time setup, invoked before the first frame
    fn initialize(&mut self, _entities: &mut EntityManager) -> EngineResult<()> {
        Ok(())
    }

    /// Per-frame logic with the elapsed time in seconds
    fn update(&mut self, entities: &mut EntityManager, dt: f32) -> EngineResult<()>;

    /// Per-frame draw pass, invoked after every system has updated
    fn render(&mut self, _entities: &mut EntityManager) -> EngineResult<()> {
        Ok(())
    }
}
