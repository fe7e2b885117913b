//! First-person camera controller system

use crate::config::CameraConfig;
use crate::ecs::components::{CameraComponent, TransformComponent};
use crate::ecs::{Entity, EntityManager, System};
use crate::engine::EngineResult;
use crate::foundation::math::{utils, Quat, Vec3};
use crate::input::{InputService, Key, MouseButton};
use std::any::TypeId;
use std::cell::RefCell;
use std::rc::Rc;

/// WASD/arrow movement and mouse-look for the active camera
///
/// The active camera is the first entity with both camera and transform
/// components, cached until it loses either. Mouse-look runs while the
/// right mouse button is held; the frame driver mirrors that state into
/// cursor capture.
///
/// Orientation is tracked as yaw/pitch in degrees. When a camera is
/// (re)acquired, the angles are re-derived from its stored quaternion with
/// a fixed Euler extraction that degrades near gimbal lock.
pub struct CameraControllerSystem {
    input: Rc<RefCell<InputService>>,
    move_speed: f32,
    mouse_sensitivity: f32,
    yaw_deg: f32,
    pitch_deg: f32,
    active_camera: Option<Entity>,
    mouse_look: bool,
}

impl CameraControllerSystem {
    /// Create a controller reading from the given input service
    pub fn new(input: Rc<RefCell<InputService>>, config: &CameraConfig) -> Self {
        Self {
            input,
            move_speed: config.move_speed,
            mouse_sensitivity: config.mouse_sensitivity,
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            active_camera: None,
            mouse_look: false,
        }
    }

    /// Movement speed in units per second
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Change the movement speed
    pub fn set_move_speed(&mut self, speed: f32) {
        self.move_speed = speed;
    }

    /// Whether mouse-look is currently engaged (right button held)
    ///
    /// The frame driver polls this to toggle cursor capture on the window.
    pub fn mouse_look_active(&self) -> bool {
        self.mouse_look
    }

    /// Extract yaw/pitch in degrees from a rotation quaternion
    ///
    /// Only valid for yaw-then-pitch compositions like the ones this
    /// controller writes; degrades near gimbal lock.
    fn extract_yaw_pitch(rotation: &Quat) -> (f32, f32) {
        let (w, x, y, z) = (rotation.w, rotation.i, rotation.j, rotation.k);
        let yaw = (2.0 * (w * y + x * z)).atan2(1.0 - 2.0 * (y * y + x * x));
        let pitch = (2.0 * (w * x - z * y)).clamp(-1.0, 1.0).asin();
        (utils::rad_to_deg(yaw), utils::rad_to_deg(pitch))
    }

    fn resolve_active_camera(&mut self, entities: &EntityManager) {
        let cached_valid = self.active_camera.is_some_and(|camera| {
            entities.has_component::<CameraComponent>(camera)
                && entities.has_component::<TransformComponent>(camera)
        });
        if cached_valid {
            return;
        }

        self.active_camera = entities
            .query_entities(&[
                TypeId::of::<CameraComponent>(),
                TypeId::of::<TransformComponent>(),
            ])
            .first()
            .copied();

        if let Some(camera) = self.active_camera {
            if let Some(transform) = entities.try_get_component::<TransformComponent>(camera) {
                let (yaw, pitch) = Self::extract_yaw_pitch(&transform.rotation);
                self.yaw_deg = yaw;
                self.pitch_deg = pitch;
                log::debug!(
                    "active camera is {} (yaw {:.1}, pitch {:.1})",
                    camera,
                    yaw,
                    pitch
                );
            }
        }
    }

    fn movement_input(input: &InputService) -> Vec3 {
        let mut movement = Vec3::zeros();
        if input.is_key_down(Key::W) || input.is_key_down(Key::Up) {
            movement += Vec3::new(0.0, 0.0, -1.0);
        }
        if input.is_key_down(Key::S) || input.is_key_down(Key::Down) {
            movement += Vec3::new(0.0, 0.0, 1.0);
        }
        if input.is_key_down(Key::A) || input.is_key_down(Key::Left) {
            movement += Vec3::new(1.0, 0.0, 0.0);
        }
        if input.is_key_down(Key::D) || input.is_key_down(Key::Right) {
            movement += Vec3::new(-1.0, 0.0, 0.0);
        }
        if input.is_key_down(Key::Q) {
            movement += Vec3::new(0.0, -1.0, 0.0);
        }
        if input.is_key_down(Key::E) {
            movement += Vec3::new(0.0, 1.0, 0.0);
        }
        movement
    }
}

impl System for CameraControllerSystem {
    fn name(&self) -> &'static str {
        "camera_controller"
    }

    fn update(&mut self, entities: &mut EntityManager, dt: f32) -> EngineResult<()> {
        let input = Rc::clone(&self.input);
        let mut input = input.borrow_mut();

        self.mouse_look = input.is_mouse_button_down(MouseButton::Right);

        self.resolve_active_camera(entities);
        let Some(camera) = self.active_camera else {
            log::warn!("no active camera to control");
            return Ok(());
        };

        let mut transform = entities.get_component::<TransformComponent>(camera)?;
        let movement = Self::movement_input(&input);

        if self.mouse_look {
            let (dx, dy) = input.take_mouse_delta();
            self.yaw_deg -= dx * self.mouse_sensitivity;
            self.pitch_deg = (self.pitch_deg - dy * self.mouse_sensitivity).clamp(-89.0, 89.0);
        }

        let yaw = utils::deg_to_rad(self.yaw_deg);
        let pitch = utils::deg_to_rad(self.pitch_deg);
        let forward = Vec3::new(
            pitch.cos() * yaw.sin(),
            pitch.sin(),
            pitch.cos() * yaw.cos(),
        );

        // Classic FPS basis: horizontal motion ignores pitch
        let mut forward_xz = Vec3::new(forward.x, 0.0, forward.z);
        if forward_xz.magnitude_squared() > 0.0 {
            forward_xz = forward_xz.normalize();
        }
        let up = Vec3::y();
        let right = forward_xz.cross(&up).normalize();

        let mut move_world = movement.z * forward_xz + movement.x * right + movement.y * up;
        if move_world.magnitude_squared() > 0.0 {
            move_world = move_world.normalize();
        }
        transform.position += move_world * self.move_speed * dt;

        // Pitch about X composed after yaw about Y
        let pitch_quat = Quat::from_axis_angle(&Vec3::x_axis(), pitch);
        let yaw_quat = Quat::from_axis_angle(&Vec3::y_axis(), yaw);
        transform.rotation = yaw_quat * pitch_quat;

        entities.add_component(camera, transform)?;
        Ok(())
    }
}
