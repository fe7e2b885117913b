//! Built-in component types

mod camera;
mod mesh_renderer;
mod spinner;
mod transform;
mod ui;

pub use camera::CameraComponent;
pub use mesh_renderer::MeshRendererComponent;
pub use spinner::SpinnerComponent;
pub use transform::TransformComponent;
pub use ui::UiComponent;
