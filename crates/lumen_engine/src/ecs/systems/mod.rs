//! Built-in systems

mod actor;
mod camera_controller;
mod render;
mod scene;
mod transform;

pub use actor::ActorSystem;
pub use camera_controller::CameraControllerSystem;
pub use render::RenderSystem;
pub use scene::SceneSystem;
pub use transform::TransformSystem;
