//! Retained-mode UI overlay
//!
//! A widget tree parallel to the ECS: the ECS stores declarative placement
//! ([`UiComponent`](crate::ecs::components::UiComponent)), this module
//! stores widget behavior. The [`UiSystem`] bridges the two every frame.

mod button;
mod coords;
mod element;
mod label;
mod style;
mod system;

pub use button::UiButton;
pub use coords::{Anchor, CoordinateUnit, UiCoordinateSystem};
pub use element::{UiElement, UiElementId, UiTree};
pub use label::UiLabel;
pub use style::{ResolvedStyle, UiState, UiStyle, UiStyleState};
pub use system::UiSystem;
