//! ECS error types

use super::Entity;
use thiserror::Error;

/// Errors raised by entity and component storage operations
///
/// These are programmer errors, not recoverable runtime conditions: callers
/// that expect absence should probe with `has_component`/`try_get_component`
/// instead of catching these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity is not in the active set
    #[error("{0} does not exist")]
    EntityNotFound(Entity),

    /// The entity exists but has no component of the requested type
    #[error("{entity} has no component of type {component}")]
    ComponentNotFound {
        /// Entity the lookup targeted
        entity: Entity,
        /// Type name of the missing component
        component: &'static str,
    },
}

/// Result type for ECS operations
pub type EcsResult<T> = Result<T, EcsError>;
