//! Scene render system

use crate::ecs::components::{CameraComponent, MeshRendererComponent, TransformComponent};
use crate::ecs::{EntityManager, System};
use crate::engine::EngineResult;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use crate::render::{ProgramHandle, RenderDevice, RenderResult};
use std::any::TypeId;
use std::cell::RefCell;
use std::rc::Rc;

const SCENE_VERT_SRC: &str = include_str!("../../../shaders/scene.vert");
const SCENE_FRAG_SRC: &str = include_str!("../../../shaders/scene.frag");

/// Draws every `{Transform, MeshRenderer}` entity through the render device
///
/// Camera matrices come from the first `{Transform, Camera}` entity; with
/// no camera in the world a default view/projection is used so the scene
/// still renders. One draw call is issued per entity, in query order; no
/// depth or material sorting happens here.
pub struct RenderSystem {
    device: Rc<RefCell<dyn RenderDevice>>,
    program: Option<ProgramHandle>,
    viewport: (u32, u32),
}

impl RenderSystem {
    /// Create a render system drawing through the given device
    pub fn new(device: Rc<RefCell<dyn RenderDevice>>) -> Self {
        Self {
            device,
            program: None,
            viewport: (800, 600),
        }
    }

    /// Track viewport changes for the default-projection fallback
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn ensure_program(&mut self, device: &mut dyn RenderDevice) -> RenderResult<ProgramHandle> {
        if let Some(program) = self.program {
            return Ok(program);
        }
        let program = device.get_or_create_program(SCENE_VERT_SRC, SCENE_FRAG_SRC)?;
        self.program = Some(program);
        Ok(program)
    }

    /// Resolve the active camera's view/projection, or defaults without one
    fn camera_matrices(&self, entities: &EntityManager) -> (Mat4, Mat4) {
        let camera_entity = entities
            .query_entities(&[
                TypeId::of::<TransformComponent>(),
                TypeId::of::<CameraComponent>(),
            ])
            .first()
            .copied();

        if let Some(entity) = camera_entity {
            if let (Some(transform), Some(camera)) = (
                entities.try_get_component::<TransformComponent>(entity),
                entities.try_get_component::<CameraComponent>(entity),
            ) {
                return (camera.view_matrix(&transform), camera.projection_matrix());
            }
        }

        log::warn!("no camera entity found, using default view/projection");
        let (width, height) = self.viewport;
        let aspect = width as f32 / height.max(1) as f32;
        let projection = Mat4::perspective(utils::deg_to_rad(45.0), aspect, 0.1, 100.0);
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::zeros(), Vec3::y());
        (view, projection)
    }
}

impl System for RenderSystem {
    fn name(&self) -> &'static str {
        "render"
    }

    fn update(&mut self, entities: &mut EntityManager, _dt: f32) -> EngineResult<()> {
        // Camera matrices are uploaded during update so systems registered
        // later in the pass already see a consistent program state
        let device = Rc::clone(&self.device);
        let mut device = device.borrow_mut();
        let program = self.ensure_program(&mut *device)?;
        let (view, projection) = self.camera_matrices(entities);
        device.set_uniform_mat4(program, "u_view", &view)?;
        device.set_uniform_mat4(program, "u_projection", &projection)?;
        Ok(())
    }

    fn render(&mut self, entities: &mut EntityManager) -> EngineResult<()> {
        let device = Rc::clone(&self.device);
        let mut device = device.borrow_mut();
        let program = self.ensure_program(&mut *device)?;

        let (view, projection) = self.camera_matrices(entities);
        device.use_program(program)?;
        device.set_uniform_mat4(program, "u_view", &view)?;
        device.set_uniform_mat4(program, "u_projection", &projection)?;

        let drawables = entities.query_entities(&[
            TypeId::of::<TransformComponent>(),
            TypeId::of::<MeshRendererComponent>(),
        ]);
        for entity in drawables {
            let transform = entities.get_component::<TransformComponent>(entity)?;
            let renderer = entities.get_component::<MeshRendererComponent>(entity)?;

            device.set_uniform_mat4(program, "u_model", &transform.model_matrix())?;
            device.set_uniform_vec4(program, "u_color", renderer.color.to_array())?;
            device.draw_mesh(renderer.mesh)?;
        }
        Ok(())
    }
}
