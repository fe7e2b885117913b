//! OpenGL render device backed by glow
//!
//! Owns every GPU-side object: vertex arrays, buffers, and the shader
//! program cache. Programs are cached by source text, so repeated
//! `get_or_create_program` calls with the same sources are free.
//!
//! OpenGL state errors are reported, logged, and continued from at frame
//! boundaries; they never abort a frame.

use super::{Color, MeshData, MeshHandle, PrimitiveTopology, ProgramHandle, RenderDevice, RenderError, RenderResult, ScreenRect};
use crate::foundation::math::{Mat4, Mat4Ext};
use glow::HasContext;
use slotmap::SlotMap;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

const UI_VERT_SRC: &str = include_str!("../../shaders/ui.vert");
const UI_FRAG_SRC: &str = include_str!("../../shaders/ui.frag");

struct GlMesh {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: Option<glow::Buffer>,
    vertex_count: i32,
    index_count: i32,
    mode: u32,
}

struct UiQuad {
    program: ProgramHandle,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
}

/// OpenGL implementation of [`RenderDevice`]
pub struct GlDevice {
    gl: glow::Context,
    meshes: SlotMap<MeshHandle, GlMesh>,
    programs: Vec<glow::Program>,
    program_cache: HashMap<u64, ProgramHandle>,
    ui_quad: Option<UiQuad>,
    viewport: (u32, u32),
    draw_calls: u64,
}

impl GlDevice {
    /// Wrap a loaded OpenGL context and set up the fixed pipeline state
    /// (depth testing, alpha blending, back-face culling)
    pub fn new(gl: glow::Context) -> Self {
        unsafe {
            log::info!("OpenGL version: {}", gl.get_parameter_string(glow::VERSION));
            log::info!("OpenGL renderer: {}", gl.get_parameter_string(glow::RENDERER));

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.enable(glow::CULL_FACE);
            gl.cull_face(glow::BACK);
            gl.front_face(glow::CCW);
        }

        Self {
            gl,
            meshes: SlotMap::with_key(),
            programs: Vec::new(),
            program_cache: HashMap::new(),
            ui_quad: None,
            viewport: (800, 600),
            draw_calls: 0,
        }
    }

    fn source_key(vertex_src: &str, fragment_src: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        vertex_src.hash(&mut hasher);
        fragment_src.hash(&mut hasher);
        hasher.finish()
    }

    fn program(&self, handle: ProgramHandle) -> RenderResult<glow::Program> {
        self.programs
            .get(handle.0 as usize)
            .copied()
            .ok_or(RenderError::ProgramNotFound(handle))
    }

    fn compile_shader(&self, shader_type: u32, source: &str) -> RenderResult<glow::Shader> {
        unsafe {
            let shader = self
                .gl
                .create_shader(shader_type)
                .map_err(RenderError::ShaderCompile)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let info = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(RenderError::ShaderCompile(info));
            }
            Ok(shader)
        }
    }

    fn link_program(&self, vertex_src: &str, fragment_src: &str) -> RenderResult<glow::Program> {
        let vertex = self.compile_shader(glow::VERTEX_SHADER, vertex_src)?;
        let fragment = self.compile_shader(glow::FRAGMENT_SHADER, fragment_src)?;
        unsafe {
            let program = self.gl.create_program().map_err(RenderError::ProgramLink)?;
            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            self.gl.link_program(program);

            // Shaders are no longer needed once the program links
            self.gl.detach_shader(program, vertex);
            self.gl.detach_shader(program, fragment);
            self.gl.delete_shader(vertex);
            self.gl.delete_shader(fragment);

            if !self.gl.get_program_link_status(program) {
                let info = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(RenderError::ProgramLink(info));
            }
            Ok(program)
        }
    }

    fn uniform_location(
        &self,
        program: ProgramHandle,
        name: &str,
    ) -> RenderResult<Option<glow::UniformLocation>> {
        let native = self.program(program)?;
        let location = unsafe { self.gl.get_uniform_location(native, name) };
        if location.is_none() {
            log::warn!("uniform '{}' not found in program {:?}", name, program);
        }
        Ok(location)
    }

    fn ensure_ui_quad(&mut self) -> RenderResult<(ProgramHandle, glow::VertexArray, glow::Buffer)> {
        if let Some(quad) = &self.ui_quad {
            return Ok((quad.program, quad.vao, quad.vbo));
        }
        let program = self.get_or_create_program(UI_VERT_SRC, UI_FRAG_SRC)?;
        unsafe {
            let vao = self.gl.create_vertex_array().map_err(RenderError::GlState)?;
            self.gl.bind_vertex_array(Some(vao));
            let vbo = self.gl.create_buffer().map_err(RenderError::GlState)?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            // Six 2D vertices, rewritten on every draw_rect call
            self.gl.buffer_data_size(
                glow::ARRAY_BUFFER,
                (6 * 2 * std::mem::size_of::<f32>()) as i32,
                glow::STREAM_DRAW,
            );
            self.gl
                .vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, 2 * 4, 0);
            self.gl.enable_vertex_attrib_array(0);
            self.gl.bind_vertex_array(None);
            self.ui_quad = Some(UiQuad { program, vao, vbo });
            Ok((program, vao, vbo))
        }
    }

    /// Poll the GL error flag and report without failing the frame
    fn check_gl_error(&self, context: &str) {
        let error = unsafe { self.gl.get_error() };
        if error != glow::NO_ERROR {
            let reported = RenderError::GlState(format!("0x{error:04x} after {context}"));
            log::warn!("{}", reported);
        }
    }
}

impl Drop for GlDevice {
    fn drop(&mut self) {
        unsafe {
            for (_, mesh) in self.meshes.drain() {
                self.gl.delete_buffer(mesh.vbo);
                if let Some(ebo) = mesh.ebo {
                    self.gl.delete_buffer(ebo);
                }
                self.gl.delete_vertex_array(mesh.vao);
            }
            for program in self.programs.drain(..) {
                self.gl.delete_program(program);
            }
            if let Some(quad) = self.ui_quad.take() {
                self.gl.delete_buffer(quad.vbo);
                self.gl.delete_vertex_array(quad.vao);
            }
        }
    }
}

impl RenderDevice for GlDevice {
    fn create_mesh(&mut self, mesh: &MeshData) -> RenderResult<MeshHandle> {
        unsafe {
            let vao = self.gl.create_vertex_array().map_err(RenderError::GlState)?;
            self.gl.bind_vertex_array(Some(vao));

            let vbo = self.gl.create_buffer().map_err(RenderError::GlState)?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&mesh.vertices),
                glow::STATIC_DRAW,
            );

            let ebo = match &mesh.indices {
                Some(indices) if !indices.is_empty() => {
                    let ebo = self.gl.create_buffer().map_err(RenderError::GlState)?;
                    self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                    self.gl.buffer_data_u8_slice(
                        glow::ELEMENT_ARRAY_BUFFER,
                        bytemuck::cast_slice(indices),
                        glow::STATIC_DRAW,
                    );
                    Some(ebo)
                }
                _ => None,
            };

            self.gl
                .vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, 3 * 4, 0);
            self.gl.enable_vertex_attrib_array(0);
            self.gl.bind_vertex_array(None);

            let mode = match mesh.topology {
                PrimitiveTopology::Triangles => glow::TRIANGLES,
                PrimitiveTopology::Lines => glow::LINES,
            };
            let handle = self.meshes.insert(GlMesh {
                vao,
                vbo,
                ebo,
                vertex_count: mesh.vertex_count() as i32,
                index_count: mesh.index_count() as i32,
                mode,
            });
            log::debug!(
                "uploaded mesh {:?}: {} vertices, {} indices",
                handle,
                mesh.vertex_count(),
                mesh.index_count()
            );
            Ok(handle)
        }
    }

    fn destroy_mesh(&mut self, handle: MeshHandle) -> RenderResult<()> {
        let mesh = self
            .meshes
            .remove(handle)
            .ok_or(RenderError::MeshNotFound(handle))?;
        unsafe {
            self.gl.delete_buffer(mesh.vbo);
            if let Some(ebo) = mesh.ebo {
                self.gl.delete_buffer(ebo);
            }
            self.gl.delete_vertex_array(mesh.vao);
        }
        Ok(())
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
        let program = self.link_program(vertex_src, fragment_src)?;
        let handle = ProgramHandle(self.programs.len() as u64);
        self.programs.push(program);
        self.program_cache.insert(key, handle);
        log::info!("compiled shader program {:?}", handle);
        Ok(handle)
    }

    fn use_program(&mut self, program: ProgramHandle) -> RenderResult<()> {
        let native = self.program(program)?;
        unsafe {
            self.gl.use_program(Some(native));
        }
        Ok(())
    }

    fn set_uniform_mat4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: &Mat4,
    ) -> RenderResult<()> {
        let native = self.program(program)?;
        if let Some(location) = self.uniform_location(program, name)? {
            unsafe {
                self.gl.use_program(Some(native));
                self.gl
                    .uniform_matrix_4_f32_slice(Some(&location), false, value.as_slice());
            }
        }
        Ok(())
    }

    fn set_uniform_vec4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: [f32; 4],
    ) -> RenderResult<()> {
        let native = self.program(program)?;
        if let Some(location) = self.uniform_location(program, name)? {
            unsafe {
                self.gl.use_program(Some(native));
                self.gl
                    .uniform_4_f32(Some(&location), value[0], value[1], value[2], value[3]);
            }
        }
        Ok(())
    }

    fn set_uniform_f32(
        &mut self,
        program: ProgramHandle,
        name: &str,
        value: f32,
    ) -> RenderResult<()> {
        let native = self.program(program)?;
        if let Some(location) = self.uniform_location(program, name)? {
            unsafe {
                self.gl.use_program(Some(native));
                self.gl.uniform_1_f32(Some(&location), value);
            }
        }
        Ok(())
    }

    fn draw_mesh(&mut self, handle: MeshHandle) -> RenderResult<()> {
        let mesh = self
            .meshes
            .get(handle)
            .ok_or(RenderError::MeshNotFound(handle))?;
        unsafe {
            self.gl.bind_vertex_array(Some(mesh.vao));
            if mesh.ebo.is_some() && mesh.index_count > 0 {
                self.gl
                    .draw_elements(mesh.mode, mesh.index_count, glow::UNSIGNED_INT, 0);
            } else {
                self.gl.draw_arrays(mesh.mode, 0, mesh.vertex_count);
            }
            self.gl.bind_vertex_array(None);
        }
        self.draw_calls += 1;
        Ok(())
    }

    fn draw_rect(&mut self, rect: ScreenRect, color: Color) -> RenderResult<()> {
        let (program, vao, vbo) = self.ensure_ui_quad()?;

        let (width, height) = self.viewport;
        let projection = Mat4::orthographic(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);
        self.set_uniform_mat4(program, "u_projection", &projection)?;
        self.set_uniform_vec4(program, "u_color", color.to_array())?;

        let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
        let vertices: [f32; 12] = [
            x, y, x + w, y, x + w, y + h, // upper triangle
            x, y, x + w, y + h, x, y + h, // lower triangle
        ];

        unsafe {
            // Overlay pass: no depth, no culling
            self.gl.disable(glow::DEPTH_TEST);
            self.gl.disable(glow::CULL_FACE);
            self.gl.bind_vertex_array(Some(vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&vertices),
                glow::STREAM_DRAW,
            );
            self.gl.draw_arrays(glow::TRIANGLES, 0, 6);
            self.gl.bind_vertex_array(None);
            self.gl.enable(glow::CULL_FACE);
            self.gl.enable(glow::DEPTH_TEST);
        }
        self.draw_calls += 1;
        Ok(())
    }

    fn clear(&mut self, color: Color) {
        unsafe {
            self.gl.clear_color(color.r, color.g, color.b, color.a);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }

    fn begin_frame(&mut self) {
        self.check_gl_error("previous frame");
    }

    fn end_frame(&mut self) {
        self.check_gl_error("frame submission");
    }

    fn draw_call_count(&self) -> u64 {
        self.draw_calls
    }
}
