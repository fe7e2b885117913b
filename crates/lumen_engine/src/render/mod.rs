//! Rendering collaborator: device abstraction, mesh data, and backends

mod backend;
mod color;
mod gl;
mod headless;
mod mesh;

pub use backend::{
    MeshHandle, ProgramHandle, RenderDevice, RenderError, RenderResult, ScreenRect,
};
pub use color::Color;
pub use gl::GlDevice;
pub use headless::{HeadlessDevice, RenderCommand};
pub use mesh::{MeshData, MeshFactory, PrimitiveTopology, FLOATS_PER_VERTEX};
