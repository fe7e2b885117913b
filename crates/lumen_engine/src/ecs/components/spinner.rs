//! Tumbling-rotation behavior component

use crate::ecs::{ActorContext, Component, Updatable};
use crate::foundation::math::{Quat, Unit, Vec3};
use rand::Rng;
use std::any::Any;

/// Smoothly rotates its entity around a random axis, periodically
/// re-rolling axis and speed
///
/// Demonstrates the behavior-component pattern: logic rides on the
/// [`Updatable`] capability and the actor system dispatches it every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinnerComponent {
    axis: Vec3,
    /// Angular speed in radians per second
    speed: f32,
    time_to_change: f32,
}

impl Component for SpinnerComponent {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn as_updatable_mut(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Default for SpinnerComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinnerComponent {
    /// Create a spinner starting around the Y axis at 1 rad/s
    pub fn new() -> Self {
        Self {
            axis: Vec3::y(),
            speed: 1.0,
            time_to_change: 0.0,
        }
    }

    /// Create a spinner with a fixed axis and speed that never re-rolls
    ///
    /// Deterministic variant used by tests.
    pub fn fixed(axis: Vec3, speed: f32) -> Self {
        Self {
            axis,
            speed,
            time_to_change: f32::INFINITY,
        }
    }

    fn reroll(&mut self) {
        let mut rng = rand::thread_rng();
        let mut axis = Vec3::new(
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
            rng.gen::<f32>() - 0.5,
        );
        if axis.magnitude_squared() < 0.01 {
            axis = Vec3::y();
        }
        self.axis = axis.normalize();
        self.speed = rng.gen_range(0.5..3.0);
        self.time_to_change = rng.gen_range(1.5..4.0);
    }
}

impl Updatable for SpinnerComponent {
    fn on_update(&mut self, dt: f32, ctx: &mut ActorContext<'_>) {
        if let Some(transform) = ctx.transform.as_deref_mut() {
            let delta = Quat::from_axis_angle(&Unit::new_normalize(self.axis), self.speed * dt);
            transform.rotation = transform.rotation * delta;
        }

        self.time_to_change -= dt;
        if self.time_to_change <= 0.0 {
            self.reroll();
            log::trace!(
                "spinner re-rolled: axis {:?}, speed {:.2} rad/s",
                self.axis,
                self.speed
            );
        }
    }
}
