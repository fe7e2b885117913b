//! Frame driver
//!
//! Owns the window, input, render device, UI tree, and the ECS, and runs
//! the per-frame sequence: poll input, update pass, clear, render pass,
//! swap. Resize events are propagated into the device viewport, the UI
//! coordinate system, and camera aspect ratios.

use crate::config::{ConfigError, EngineConfig};
use crate::ecs::components::CameraComponent;
use crate::ecs::systems::{
    ActorSystem, CameraControllerSystem, RenderSystem, SceneSystem, TransformSystem,
};
use crate::ecs::{EcsError, EntityManager, SystemManager};
use crate::foundation::time::Timer;
use crate::input::InputService;
use crate::render::{Color, GlDevice, RenderDevice, RenderError};
use crate::ui::{UiSystem, UiTree};
use crate::window::{WindowError, WindowEvent, WindowService};
use std::any::TypeId;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Umbrella error for engine and system failures
#[derive(Error, Debug)]
pub enum EngineError {
    /// Entity/component precondition violation
    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),

    /// Rendering failure
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Windowing failure
    #[error("window error: {0}")]
    Window(#[from] WindowError),

    /// Configuration failure
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for engine and system operations
pub type EngineResult<T> = Result<T, EngineError>;

/// The engine: collaborator services plus the ECS runtime
///
/// A failing system aborts the frame and surfaces out of [`run`]
/// (Engine::run); nothing is caught on the way up.
pub struct Engine {
    config: EngineConfig,
    window: WindowService,
    device: Rc<RefCell<dyn RenderDevice>>,
    input: Rc<RefCell<InputService>>,
    entities: EntityManager,
    systems: SystemManager,
    camera_controller: Rc<RefCell<CameraControllerSystem>>,
    render_system: Rc<RefCell<RenderSystem>>,
    ui_system: Rc<RefCell<UiSystem>>,
    timer: Timer,
    cursor_captured: bool,
}

impl Engine {
    /// Create the engine, its window and GL context, and register the
    /// built-in systems
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        log::info!("initializing engine");

        let mut window = WindowService::new(&config.window)?;
        let gl = window.create_gl_context();
        let device: Rc<RefCell<dyn RenderDevice>> = Rc::new(RefCell::new(GlDevice::new(gl)));
        let (width, height) = window.framebuffer_size();
        device.borrow_mut().set_viewport(width, height);

        let input = Rc::new(RefCell::new(InputService::new()));
        let ui_tree = Rc::new(RefCell::new(UiTree::new()));

        let scene = Rc::new(RefCell::new(SceneSystem::new(
            device.clone(),
            ui_tree.clone(),
        )));
        let actors = Rc::new(RefCell::new(ActorSystem::new()));
        let camera_controller = Rc::new(RefCell::new(CameraControllerSystem::new(
            input.clone(),
            &config.camera,
        )));
        let transforms = Rc::new(RefCell::new(TransformSystem::new()));
        let ui_system = Rc::new(RefCell::new(UiSystem::new(
            ui_tree,
            input.clone(),
            device.clone(),
            width as f32,
            height as f32,
        )));
        let render_system = Rc::new(RefCell::new(RenderSystem::new(device.clone())));
        render_system.borrow_mut().set_viewport(width, height);

        // Registration order is execution order: the scene bootstrap must
        // run before anything that queries its entities, and rendering last
        let mut systems = SystemManager::new();
        systems.register_system(scene);
        systems.register_system(actors);
        systems.register_system(camera_controller.clone());
        systems.register_system(transforms);
        systems.register_system(ui_system.clone());
        systems.register_system(render_system.clone());

        Ok(Self {
            config,
            window,
            device,
            input,
            entities: EntityManager::new(),
            systems,
            camera_controller,
            render_system,
            ui_system,
            timer: Timer::new(),
            cursor_captured: false,
        })
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The entity manager (for applications composing their own scenes)
    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    /// The system registry
    pub fn systems_mut(&mut self) -> &mut SystemManager {
        &mut self.systems
    }

    /// Run the main loop until the window requests close or a system fails
    pub fn run(&mut self) -> EngineResult<()> {
        self.systems.initialize_all(&mut self.entities)?;
        log::info!("entering main loop");

        while !self.window.should_close() {
            self.pump_window_events();
            self.timer.update();
            let dt = self.timer.delta_time();

            self.frame(dt)?;
            self.window.swap_buffers();
        }

        log::info!(
            "main loop ended after {} frames ({:.1} fps average)",
            self.timer.frame_count(),
            self.timer.average_fps()
        );
        Ok(())
    }

    /// Execute one frame: update pass, clear, render pass
    pub fn frame(&mut self, dt: f32) -> EngineResult<()> {
        self.systems.update_all(&mut self.entities, dt)?;
        self.sync_cursor_capture();

        {
            let mut device = self.device.borrow_mut();
            device.begin_frame();
            device.clear(Color::from(self.config.renderer.clear_color));
        }
        self.systems.render_all(&mut self.entities)?;
        self.device.borrow_mut().end_frame();
        Ok(())
    }

    fn pump_window_events(&mut self) {
        for event in self.window.poll_events() {
            match event {
                WindowEvent::KeyPressed(key) => self.input.borrow_mut().press_key(key),
                WindowEvent::KeyReleased(key) => self.input.borrow_mut().release_key(key),
                WindowEvent::MouseButtonPressed(button) => {
                    self.input.borrow_mut().press_button(button);
                }
                WindowEvent::MouseButtonReleased(button) => {
                    self.input.borrow_mut().release_button(button);
                }
                WindowEvent::CursorMoved { x, y } => self.input.borrow_mut().move_cursor(x, y),
                WindowEvent::Resized { width, height } => self.handle_resize(width, height),
                WindowEvent::CloseRequested => self.window.request_close(),
            }
        }
    }

    /// Push a new framebuffer size into every consumer of the viewport
    fn handle_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            // Minimized; keep the previous viewport
            return;
        }
        log::info!("window resized to {}x{}", width, height);
        self.device.borrow_mut().set_viewport(width, height);
        self.render_system.borrow_mut().set_viewport(width, height);
        self.ui_system
            .borrow_mut()
            .set_viewport_size(width as f32, height as f32);

        let aspect = width as f32 / height as f32;
        for entity in self.entities.query_entities(&[TypeId::of::<CameraComponent>()]) {
            if let Some(mut camera) = self.entities.try_get_component::<CameraComponent>(entity) {
                camera.aspect = aspect;
                // Write-back: components are value-typed
                if let Err(error) = self.entities.add_component(entity, camera) {
                    log::warn!("failed to update camera aspect: {}", error);
                }
            }
        }
    }

    fn sync_cursor_capture(&mut self) {
        let mouse_look = self.camera_controller.borrow().mouse_look_active();
        if mouse_look != self.cursor_captured {
            self.cursor_captured = mouse_look;
            self.window.set_cursor_captured(mouse_look);
        }
    }
}
