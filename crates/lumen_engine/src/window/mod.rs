//! Window management using GLFW
//!
//! Creates the OpenGL 3.3 core context and translates GLFW events into
//! engine-level [`WindowEvent`]s the frame driver feeds into the input
//! service.

use crate::config::WindowConfig;
use crate::input::{Key, MouseButton};
use glfw::Context;
use thiserror::Error;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// GLFW failed to initialize
    #[error("GLFW initialization failed")]
    InitializationFailed,

    /// The window or GL context could not be created
    #[error("window creation failed")]
    CreationFailed,
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Engine-level window events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    /// A key went down
    KeyPressed(Key),
    /// A key went up
    KeyReleased(Key),
    /// A mouse button went down
    MouseButtonPressed(MouseButton),
    /// A mouse button went up
    MouseButtonReleased(MouseButton),
    /// The cursor moved, in window pixels
    CursorMoved {
        /// Cursor x position
        x: f32,
        /// Cursor y position
        y: f32,
    },
    /// The framebuffer was resized
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// The user asked to close the window
    CloseRequested,
}

/// GLFW window wrapper owning the event receiver and GL context
pub struct WindowService {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl WindowService {
    /// Create a window with an OpenGL 3.3 core profile context
    pub fn new(config: &WindowConfig) -> WindowResult<Self> {
        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|_| WindowError::InitializationFailed)?;

        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(
            glfw::OpenGlProfileHint::Core,
        ));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(
                config.width,
                config.height,
                &config.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or(WindowError::CreationFailed)?;

        window.make_current();
        glfw.set_swap_interval(if config.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        window.set_key_polling(true);
        window.set_mouse_button_polling(true);
        window.set_cursor_pos_polling(true);
        window.set_framebuffer_size_polling(true);
        window.set_close_polling(true);

        log::info!(
            "window created: {}x{} \"{}\" (vsync: {})",
            config.width,
            config.height,
            config.title,
            config.vsync
        );

        Ok(Self {
            glfw,
            window,
            events,
        })
    }

    /// Load the OpenGL function pointers for this window's context
    pub fn create_gl_context(&mut self) -> glow::Context {
        unsafe {
            glow::Context::from_loader_function(|name| {
                self.window.get_proc_address(name) as *const _
            })
        }
    }

    /// Whether a close was requested
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Ask the window to close at the end of the frame
    pub fn request_close(&mut self) {
        self.window.set_should_close(true);
    }

    /// Current framebuffer size in pixels
    pub fn framebuffer_size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width as u32, height as u32)
    }

    /// Present the rendered frame
    pub fn swap_buffers(&mut self) {
        self.window.swap_buffers();
    }

    /// Capture (hide and lock) or release the cursor for mouse-look
    pub fn set_cursor_captured(&mut self, captured: bool) {
        self.window.set_cursor_mode(if captured {
            glfw::CursorMode::Disabled
        } else {
            glfw::CursorMode::Normal
        });
    }

    /// Pump the OS event queue and translate this frame's events
    pub fn poll_events(&mut self) -> Vec<WindowEvent> {
        self.glfw.poll_events();
        let mut translated = Vec::new();
        for (_, event) in glfw::flush_messages(&self.events) {
            match event {
                glfw::WindowEvent::Key(key, _, action, _) => {
                    if let Some(key) = map_key(key) {
                        match action {
                            glfw::Action::Press => translated.push(WindowEvent::KeyPressed(key)),
                            glfw::Action::Release => translated.push(WindowEvent::KeyReleased(key)),
                            glfw::Action::Repeat => {}
                        }
                    }
                }
                glfw::WindowEvent::MouseButton(button, action, _) => {
                    if let Some(button) = map_mouse_button(button) {
                        match action {
                            glfw::Action::Press => {
                                translated.push(WindowEvent::MouseButtonPressed(button));
                            }
                            glfw::Action::Release => {
                                translated.push(WindowEvent::MouseButtonReleased(button));
                            }
                            glfw::Action::Repeat => {}
                        }
                    }
                }
                glfw::WindowEvent::CursorPos(x, y) => translated.push(WindowEvent::CursorMoved {
                    x: x as f32,
                    y: y as f32,
                }),
                glfw::WindowEvent::FramebufferSize(width, height) => {
                    translated.push(WindowEvent::Resized {
                        width: width.max(0) as u32,
                        height: height.max(0) as u32,
                    });
                }
                glfw::WindowEvent::Close => translated.push(WindowEvent::CloseRequested),
                _ => {}
            }
        }
        translated
    }

    /// Access the underlying GLFW window
    ///
    /// A proper accessor for backends that need the native handle; nothing
    /// should reach into this struct's fields.
    pub fn glfw_window(&self) -> &glfw::PWindow {
        &self.window
    }

    /// Mutable access to the underlying GLFW window
    pub fn glfw_window_mut(&mut self) -> &mut glfw::PWindow {
        &mut self.window
    }
}

fn map_key(key: glfw::Key) -> Option<Key> {
    match key {
        glfw::Key::W => Some(Key::W),
        glfw::Key::A => Some(Key::A),
        glfw::Key::S => Some(Key::S),
        glfw::Key::D => Some(Key::D),
        glfw::Key::Q => Some(Key::Q),
        glfw::Key::E => Some(Key::E),
        glfw::Key::Space => Some(Key::Space),
        glfw::Key::Escape => Some(Key::Escape),
        glfw::Key::Up => Some(Key::Up),
        glfw::Key::Down => Some(Key::Down),
        glfw::Key::Left => Some(Key::Left),
        glfw::Key::Right => Some(Key::Right),
        _ => None,
    }
}

fn map_mouse_button(button: glfw::MouseButton) -> Option<MouseButton> {
    match button {
        glfw::MouseButton::Button1 => Some(MouseButton::Left),
        glfw::MouseButton::Button2 => Some(MouseButton::Right),
        glfw::MouseButton::Button3 => Some(MouseButton::Middle),
        _ => None,
    }
}
