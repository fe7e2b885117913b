//! Input state service
//!
//! An explicitly constructed instance fed by the frame driver from window
//! events; systems receive a shared handle at construction time. There is
//! no global input state.

use std::collections::HashSet;

/// Keyboard keys the engine cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// Q key
    Q,
    /// E key
    E,
    /// Space key
    Space,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Keyboard and mouse state for one frame
///
/// Mouse motion accumulates into a delta that
/// [`take_mouse_delta`](InputService::take_mouse_delta) returns and clears.
/// Callers must poll it exactly once per frame or motion is lost to them.
#[derive(Debug)]
pub struct InputService {
    pressed_keys: HashSet<Key>,
    pressed_buttons: HashSet<MouseButton>,
    cursor: (f32, f32),
    mouse_delta: (f32, f32),
    first_mouse_move: bool,
}

impl Default for InputService {
    fn default() -> Self {
        Self::new()
    }
}

impl InputService {
    /// Create an input service with nothing pressed
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            pressed_buttons: HashSet::new(),
            cursor: (0.0, 0.0),
            mouse_delta: (0.0, 0.0),
            first_mouse_move: true,
        }
    }

    /// Whether the key is currently held down
    pub fn is_key_down(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Whether the mouse button is currently held down
    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Current cursor position in window pixels
    pub fn cursor_position(&self) -> (f32, f32) {
        self.cursor
    }

    /// Return the accumulated mouse delta and reset it to zero
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    // --- feeding side, driven by the window event pump (and by tests) ---

    /// Record a key press
    pub fn press_key(&mut self, key: Key) {
        self.pressed_keys.insert(key);
        log::trace!("key down: {:?}", key);
    }

    /// Record a key release
    pub fn release_key(&mut self, key: Key) {
        self.pressed_keys.remove(&key);
        log::trace!("key up: {:?}", key);
    }

    /// Record a mouse button press
    pub fn press_button(&mut self, button: MouseButton) {
        self.pressed_buttons.insert(button);
    }

    /// Record a mouse button release
    pub fn release_button(&mut self, button: MouseButton) {
        self.pressed_buttons.remove(&button);
    }

    /// Record cursor movement, accumulating the motion delta
    ///
    /// The first movement after creation only establishes the reference
    /// position, so window entry does not register as a huge jump.
    pub fn move_cursor(&mut self, x: f32, y: f32) {
        if self.first_mouse_move {
            self.first_mouse_move = false;
        } else {
            self.mouse_delta.0 += x - self.cursor.0;
            self.mouse_delta.1 += y - self.cursor.1;
        }
        self.cursor = (x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_state_tracks_press_and_release() {
        let mut input = InputService::new();
        assert!(!input.is_key_down(Key::W));
        input.press_key(Key::W);
        assert!(input.is_key_down(Key::W));
        input.release_key(Key::W);
        assert!(!input.is_key_down(Key::W));
    }

    #[test]
    fn first_cursor_move_does_not_produce_delta() {
        let mut input = InputService::new();
        input.move_cursor(400.0, 300.0);
        assert_eq!(input.take_mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn mouse_delta_accumulates_until_taken() {
        let mut input = InputService::new();
        input.move_cursor(100.0, 100.0);
        input.move_cursor(110.0, 95.0);
        input.move_cursor(115.0, 90.0);
        assert_eq!(input.take_mouse_delta(), (15.0, -10.0));
        // Taking the delta resets it
        assert_eq!(input.take_mouse_delta(), (0.0, 0.0));
        assert_eq!(input.cursor_position(), (115.0, 90.0));
    }
}
