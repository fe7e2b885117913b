//! Component trait and behavior capabilities

use super::Entity;
use crate::ecs::components::TransformComponent;
use std::any::Any;

/// Object-safe trait for all component types
///
/// Components are plain data records stored by the entity manager, keyed by
/// their concrete type. An entity holds at most one component per type;
/// adding a second one replaces the first.
///
/// Components are fetched by value (`get_component` clones), so mutating a
/// fetched component does not touch stored state until it is written back
/// with `add_component`.
pub trait Component: Any + Send + Sync {
    /// Downcast support for typed retrieval
    fn as_any(&self) -> &dyn Any;

    /// Downcast support for typed in-place access
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Opt-in probe for the behavior-hook capability
    ///
    /// Components with per-frame logic override this to expose their
    /// [`Updatable`] view; the actor system dispatches hooks through it
    /// without requiring a common behavioral base type.
    fn as_updatable_mut(&mut self) -> Option<&mut dyn Updatable> {
        None
    }
}

/// Mutable view of the owning entity handed to behavior hooks
///
/// The transform is a clone of the stored component; the actor system writes
/// it back after the hooks for the entity have run.
pub struct ActorContext<'a> {
    /// The entity the hook's component is attached to
    pub entity: Entity,
    /// The entity's transform, if it has one
    pub transform: Option<&'a mut TransformComponent>,
}

/// Per-frame behavior hook capability for components
///
/// The actor system calls `on_initialize` once when it initializes and
/// `on_update` every frame, for every stored component exposing this
/// capability.
pub trait Updatable: Send + Sync {
    /// Called once during the actor system's initialization pass
    fn on_initialize(&mut self, _ctx: &mut ActorContext<'_>) {}

    /// Called every frame with the elapsed time in seconds
    fn on_update(&mut self, dt: f32, ctx: &mut ActorContext<'_>);
}
