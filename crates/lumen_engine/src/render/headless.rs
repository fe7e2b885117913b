//! Recording render device for tests and headless runs
//!
//! Implements [`RenderDevice`] without touching a GPU: every call is
//! appended to a command journal that tests can assert on, and draw calls
//! are counted exactly like the real backend counts them.

use super::{Color, MeshData, MeshHandle, ProgramHandle, RenderDevice, RenderError, RenderResult, ScreenRect};
use crate::foundation::math::Mat4;
use slotmap::SlotMap;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Frame started
    BeginFrame,
    /// Frame ended
    EndFrame,
    /// Buffers cleared
    Clear(Color),
    /// Viewport resized
    SetViewport(u32, u32),
    /// Program bound
    UseProgram(ProgramHandle),
    /// Matrix uniform set
    SetUniformMat4 {
        /// Target program
        program: ProgramHandle,
        /// Uniform name
        name: String,
        /// Uploaded value
        value: Mat4,
    },
    /// Vec4 uniform set
    SetUniformVec4 {
        /// Target program
        program: ProgramHandle,
        /// Uniform name
        name: String,
        /// Uploaded value
        value: [f32; 4],
    },
    /// Float uniform set
    SetUniformF32 {
        /// Target program
        program: ProgramHandle,
        /// Uniform name
        name: String,
        /// Uploaded value
        value: f32,
    },
    /// Mesh drawn
    DrawMesh(MeshHandle),
    /// UI rectangle drawn
    DrawRect {
        /// Screen-space bounds
        rect: ScreenRect,
        /// Fill color
        color: Color,
    },
}

struct RecordedMesh {
    vertex_count: usize,
    index_count: usize,
}

/// GPU-free [`RenderDevice`] that journals every call
#[derive(Default)]
pub struct HeadlessDevice {
    meshes: SlotMap<MeshHandle, RecordedMesh>,
    program_cache: HashMap<u64, ProgramHandle>,
    next_program: u64,
    commands: Vec<RenderCommand>,
    draw_calls: u64,
    viewport: (u32, u32),
}

impl HeadlessDevice {
    /// Create an empty device with an 800x600 viewport
    pub fn new() -> Self {
        Self {
            viewport: (800, 600),
            ..Default::default()
        }
    }

    /// The recorded command journal, in call order
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Forget all recorded commands (draw counts are kept)
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of currently uploaded meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Last value uploaded for a matrix uniform, if any
    pub fn last_uniform_mat4(&self, uniform: &str) -> Option<Mat4> {
        self.commands.iter().rev().find_map(|command| match command {
            RenderCommand::SetUniformMat4 { name, value, .. } if name == uniform => Some(*value),
            _ => None,
        })
    }

    fn source_key(vertex_src: &str, fragment_src: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        vertex_src.hash(&mut hasher);
        fragment_src.hash(&mut hasher);
        hasher.finish()
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_mesh(&mut self, mesh: &MeshData) -> RenderResult<MeshHandle> {
        Ok(self.meshes.insert(RecordedMesh {
            vertex_count: mesh.vertex_count(),
            index_count: mesh.index_count(),
        }))
    }

    fn destroy_mesh(&mut self, handle: MeshHandle) -> RenderResult<()> {
        self.meshes
            .remove(handle)
            .map(|_| ())
            .ok_or(RenderError::MeshNotFound(handle))
    }

    fn get_or_create_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
    ) -> RenderResult<ProgramHandle> {
        let key = Self::source_key(vertex_src, fragment_src);
        if let Some(&handle) = self.program_cache.get(&key) {
            return Ok(handle);
        }
        let handle = ProgramHandle(self.next_program);
        self.next_program += 1;
        self.program_cache.insert(key, handle);
        Ok(handle)
    }

    fn use_program(&mut self, program: ProgramHandle) -> RenderResult<()> {
        self.commands.push(RenderCommand::UseProgram(program));
        Ok(())
    }

    fn set_uniform_mat4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: &Mat4,
    ) -> RenderResult<()> {
        self.commands.push(RenderCommand::SetUniformMat4 {
            program,
            name: name.to_owned(),
            value: *value,
        });
        Ok(())
    }

    fn set_uniform_vec4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: [f32; 4],
    ) -> RenderResult<()> {
        self.commands.push(RenderCommand::SetUniformVec4 {
            program,
            name: name.to_owned(),
            value,
        });
        Ok(())
    }

    fn set_uniform_f32(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: f32,
    ) -> RenderResult<()> {
        self.commands.push(RenderCommand::SetUniformF32 {
            program,
            name: name.to_owned(),
            value,
        });
        Ok(())
    }

    fn draw_mesh(&mut self, handle: MeshHandle) -> RenderResult<()> {
        let mesh = self
            .meshes
            .get(handle)
            .ok_or(RenderError::MeshNotFound(handle))?;
        log::trace!(
            "headless draw: {} vertices, {} indices",
            mesh.vertex_count,
            mesh.index_count
        );
        self.commands.push(RenderCommand::DrawMesh(handle));
        self.draw_calls += 1;
        Ok(())
    }

    fn draw_rect(&mut self, rect: ScreenRect, color: Color) -> RenderResult<()> {
        self.commands.push(RenderCommand::DrawRect { rect, color });
        self.draw_calls += 1;
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(RenderCommand::Clear(color));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.commands.push(RenderCommand::SetViewport(width, height));
    }

    fn begin_frame(&mut self) {
        self.commands.push(RenderCommand::BeginFrame);
    }

    fn end_frame(&mut self) {
        self.commands.push(RenderCommand::EndFrame);
    }

    fn draw_call_count(&self) -> u64 {
        self.draw_calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MeshFactory;

    #[test]
    fn program_cache_is_keyed_by_source() {
        let mut device = HeadlessDevice::new();
        let a = device.get_or_create_program("vert", "frag").unwrap();
        let b = device.get_or_create_program("vert", "frag").unwrap();
        let c = device.get_or_create_program("vert", "other frag").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn draw_requires_uploaded_mesh() {
        let mut device = HeadlessDevice::new();
        let handle = device.create_mesh(&MeshFactory::cube()).unwrap();
        device.draw_mesh(handle).unwrap();
        assert_eq!(device.draw_call_count(), 1);

        device.destroy_mesh(handle).unwrap();
        assert!(matches!(
            device.draw_mesh(handle),
            Err(RenderError::MeshNotFound(_))
        ));
    }

    #[test]
    fn journal_preserves_call_order() {
        let mut device = HeadlessDevice::new();
        device.begin_frame();
        device.clear(Color::BLACK);
        device.end_frame();
        assert_eq!(
            device.commands(),
            &[
                RenderCommand::BeginFrame,
                RenderCommand::Clear(Color::BLACK),
                RenderCommand::EndFrame,
            ]
        );
    }
}
