//! Backend abstraction for the rendering collaborator
//!
//! The ECS core never talks to the graphics API directly; systems consume
//! this narrow trait. Two implementations exist: the OpenGL device
//! ([`GlDevice`](super::GlDevice)) and a recording device for tests and
//! headless runs ([`HeadlessDevice`](super::HeadlessDevice)).

use super::{Color, MeshData};
use crate::foundation::math::Mat4;
use thiserror::Error;

slotmap::new_key_type! {
    /// Opaque handle to a mesh uploaded to a render device
    pub struct MeshHandle;
}

/// Opaque handle to a compiled shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Shader source failed to compile
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    /// Compiled shaders failed to link into a program
    #[error("program link failed: {0}")]
    ProgramLink(String),

    /// The mesh handle does not name an uploaded mesh
    #[error("unknown mesh handle {0:?}")]
    MeshNotFound(MeshHandle),

    /// The program handle does not name a compiled program
    #[error("unknown program handle {0:?}")]
    ProgramNotFound(ProgramHandle),

    /// Reported OpenGL state error; logged and continued, never fatal
    #[error("graphics state error: {0}")]
    GlState(String),
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Axis-aligned screen-space rectangle, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    /// Left edge in pixels
    pub x: f32,
    /// Top edge in pixels
    pub y: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl ScreenRect {
    /// Create a rectangle from origin and extent
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point lies inside the rectangle
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    /// The same rectangle scaled around its center
    pub fn scaled(&self, factor: f32) -> Self {
        let width = self.width * factor;
        let height = self.height * factor;
        Self {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }
}

/// Narrow interface to the graphics backend
///
/// Covers mesh upload, program compilation with source-level caching,
/// uniforms, per-frame clear/draw, and a 2D quad path for the UI overlay.
/// No return data flows back into ECS state.
pub trait RenderDevice {
    /// Upload a mesh and return an opaque handle for drawing
    fn create_mesh(&mut self, mesh: &MeshData) -> RenderResult<MeshHandle>;

    /// Release an uploaded mesh
    fn destroy_mesh(&mut self, handle: MeshHandle) -> RenderResult<()>;

    /// Compile and link a program, or return the cached handle for
    /// previously seen sources
    fn get_or_create_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> RenderResult<ProgramHandle>;

    /// Bind a program for subsequent draws
    fn use_program(&mut self, program: ProgramHandle) -> RenderResult<()>;

    /// Set a 4x4 matrix uniform; a missing uniform name logs a warning and
    /// is otherwise ignored
    fn set_uniform_mat4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: &Mat4,
    ) -> RenderResult<()>;

    /// Set a vec4 uniform
    fn set_uniform_vec4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: [f32; 4],
    ) -> RenderResult<()>;

    /// Set a float uniform
    fn set_uniform_f32(&mut self, program: ProgramHandle, name: &str, value: f32)
        -> RenderResult<()>;

    /// Draw an uploaded mesh with the currently bound program and uniforms
    fn draw_mesh(&mut self, handle: MeshHandle) -> RenderResult<()>;

    /// Draw a flat 2D rectangle in screen space (UI overlay path)
    fn draw_rect(&mut self, rect: ScreenRect, color: Color) -> RenderResult<()>;

    /// Clear the color and depth buffers
    fn clear(&mut self, color: Color);

    /// Resize the drawable viewport
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Mark the start of a frame
    fn begin_frame(&mut self);

    /// Mark the end of a frame
    fn end_frame(&mut self);

    /// Total draw calls issued since creation
    fn draw_call_count(&self) -> u64;
}
