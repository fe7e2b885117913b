//! # lumen
//!
//! A small real-time 3D engine built around an Entity-Component-System
//! runtime, driving an OpenGL pipeline with a first-person camera
//! controller and a minimal retained-mode UI overlay.
//!
//! ## Architecture
//!
//! - **ECS runtime** ([`ecs`]): entity identity, per-entity component
//!   storage with intersection queries, and an ordered system registry
//!   dispatching the per-frame update and render passes.
//! - **Systems** ([`ecs::systems`]): scene bootstrap, behavior hooks,
//!   first-person camera control, transform helpers, and rendering.
//! - **Collaborators**: the render device abstraction ([`render`]), GLFW
//!   windowing ([`window`]), input state ([`input`]), and the retained UI
//!   tree ([`ui`]) sit behind narrow interfaces consumed by systems.
//! - **Frame driver** ([`Engine`]): one frame = input poll, update pass,
//!   clear, render pass, swap. The whole frame runs on one thread.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use lumen_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let config = EngineConfig::default();
//!     let mut engine = Engine::new(config)?;
//!     engine.run()
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod input;
pub mod render;
pub mod ui;
pub mod window;

mod engine;

pub use engine::{Engine, EngineError, EngineResult};

/// Common imports for engine users
pub mod prelude {
    pub use crate::config::{CameraConfig, EngineConfig, RendererConfig, WindowConfig};
    pub use crate::ecs::components::{
        CameraComponent, MeshRendererComponent, SpinnerComponent, TransformComponent, UiComponent,
    };
    pub use crate::ecs::systems::{
        ActorSystem, CameraControllerSystem, RenderSystem, SceneSystem, TransformSystem,
    };
    pub use crate::ecs::{
        ActorContext, Component, EcsError, Entity, EntityManager, System, SystemManager, Updatable,
    };
    pub use crate::foundation::{
        math::{Mat4, Quat, Transform, Vec2, Vec3},
        time::Timer,
    };
    pub use crate::input::{InputService, Key, MouseButton};
    pub use crate::render::{
        Color, GlDevice, HeadlessDevice, MeshData, MeshFactory, MeshHandle, RenderDevice,
    };
    pub use crate::ui::{UiButton, UiLabel, UiSystem, UiTree};
    pub use crate::{Engine, EngineError, EngineResult};
}
