//! Initial scene bootstrap system

use crate::ecs::components::{
    CameraComponent, MeshRendererComponent, SpinnerComponent, TransformComponent, UiComponent,
};
use crate::ecs::{EntityManager, System};
use crate::engine::EngineResult;
use crate::foundation::math::{Vec2, Vec3};
use crate::render::{Color, MeshData, MeshFactory, RenderDevice};
use crate::ui::{UiButton, UiState, UiTree};
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;

/// Populates the world once: three spinning primitives, a camera, and a
/// demo UI button
///
/// Runs entirely in `initialize`; the per-frame passes are no-ops. This is
/// where scene-global logic (spawning, scripted events) would live.
pub struct SceneSystem {
    device: Rc<RefCell<dyn RenderDevice>>,
    ui_tree: Rc<RefCell<UiTree>>,
    initialized: bool,
}

impl SceneSystem {
    /// Create the bootstrap system
    pub fn new(device: Rc<RefCell<dyn RenderDevice>>, ui_tree: Rc<RefCell<UiTree>>) -> Self {
        Self {
            device,
            ui_tree,
            initialized: false,
        }
    }

    fn random_color() -> Color {
        let mut rng = rand::thread_rng();
        Color::rgb(rng.gen(), rng.gen(), rng.gen())
    }

    fn spawn_primitive(
        &self,
        entities: &mut EntityManager,
        mesh: &MeshData,
        transform: TransformComponent,
    ) -> EngineResult<()> {
        let handle = {
            let device = Rc::clone(&self.device);
            let mut device = device.borrow_mut();
            device.create_mesh(mesh)?
        };
        let entity = entities.create_entity();
        entities.add_component(entity, MeshRendererComponent::new(handle, Self::random_color()))?;
        entities.add_component(entity, transform)?;
        entities.add_component(entity, SpinnerComponent::new())?;
        Ok(())
    }

    fn spawn_camera(&self, entities: &mut EntityManager) -> EngineResult<()> {
        let camera = entities.create_entity();
        entities.add_component(
            camera,
            TransformComponent::from_position(Vec3::new(0.0, 2.0, 5.0)),
        )?;
        entities.add_component(camera, CameraComponent::new(60.0, 800.0 / 600.0, 0.1, 100.0))?;
        Ok(())
    }

    fn spawn_demo_button(&self, entities: &mut EntityManager) -> EngineResult<()> {
        let mut button = UiButton::with_text("Hello, World!");

        let style = button.style_mut();
        let normal = style.state_mut(UiState::Normal);
        normal.background = Some(Color::rgb(0.0, 0.0, 0.55));
        normal.text_color = Some(Color::WHITE);
        let hover = style.state_mut(UiState::Hover);
        hover.background = Some(Color::BLUE);
        hover.text_color = Some(Color::WHITE);
        hover.scale = Some(1.05);
        let pressed = style.state_mut(UiState::Pressed);
        pressed.background = Some(Color::rgb(0.0, 0.0, 0.55));
        pressed.text_color = Some(Color::rgb(0.83, 0.83, 0.83));
        pressed.scale = Some(0.95);
        let disabled = style.state_mut(UiState::Disabled);
        disabled.background = Some(Color::rgb(0.5, 0.5, 0.5));
        disabled.opacity = Some(0.7);

        button.on_click(|| log::info!("demo button clicked"));

        let element = self.ui_tree.borrow_mut().insert(Box::new(button));
        let ui_entity = entities.create_entity();
        entities.add_component(
            ui_entity,
            UiComponent::pixels(element, Vec2::new(500.0, 500.0), Vec2::new(150.0, 50.0)),
        )?;
        Ok(())
    }
}

impl System for SceneSystem {
    fn name(&self) -> &'static str {
        "scene"
    }

    fn initialize(&mut self, entities: &mut EntityManager) -> EngineResult<()> {
        if self.initialized {
            return Ok(());
        }

        self.spawn_primitive(entities, &MeshFactory::pyramid(), TransformComponent::identity())?;
        self.spawn_primitive(
            entities,
            &MeshFactory::cylinder(24),
            TransformComponent::from_position(Vec3::new(1.0, 1.0, 1.0)).with_uniform_scale(1.1),
        )?;
        self.spawn_primitive(
            entities,
            &MeshFactory::cube(),
            TransformComponent::from_position(Vec3::new(-1.0, -1.0, -1.0)).with_uniform_scale(1.2),
        )?;
        self.spawn_camera(entities)?;
        self.spawn_demo_button(entities)?;

        self.initialized = true;
        log::info!("scene bootstrapped: {} entities", entities.entity_count());
        Ok(())
    }

    fn update(&mut self, _entities: &mut EntityManager, _dt: f32) -> EngineResult<()> {
        Ok(())
    }
}
