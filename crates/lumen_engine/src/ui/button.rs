//! Interactive button widget

use super::{UiElement, UiLabel, UiState, UiStyle};
use crate::render::{RenderDevice, RenderResult, ScreenRect};

type ClickCallback = Box<dyn FnMut()>;

/// Clickable button with an optional centered text label
///
/// State transitions: hover follows the cursor, a press latches while the
/// primary button is held over the widget, and a release over the widget
/// fires the click callback.
pub struct UiButton {
    rect: ScreenRect,
    visible: bool,
    enabled: bool,
    hovered: bool,
    pressed: bool,
    style: UiStyle,
    label: Option<UiLabel>,
    z_index: i32,
    on_click: Option<ClickCallback>,
}

impl UiButton {
    /// Create an enabled button without a label
    pub fn new() -> Self {
        Self {
            rect: ScreenRect::default(),
            visible: true,
            enabled: true,
            hovered: false,
            pressed: false,
            style: UiStyle::default(),
            label: None,
            z_index: 0,
            on_click: None,
        }
    }

    /// Create a button with a centered text label
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut button = Self::new();
        let mut label = UiLabel::new(text);
        label.set_z_index(button.z_index + 1);
        button.label = Some(label);
        button
    }

    /// Register the click handler
    pub fn on_click(&mut self, callback: impl FnMut() + 'static) {
        self.on_click = Some(Box::new(callback));
    }

    /// Mutable access to the style
    pub fn style_mut(&mut self) -> &mut UiStyle {
        &mut self.style
    }

    /// The button's label, if it has one
    pub fn label(&self) -> Option<&UiLabel> {
        self.label.as_ref()
    }

    /// Enable or disable interaction
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.hovered = false;
            self.pressed = false;
        }
    }

    /// Set the draw order; the label stays one layer above
    pub fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
        if let Some(label) = &mut self.label {
            label.set_z_index(z_index + 1);
        }
    }
}

impl Default for UiButton {
    fn default() -> Self {
        Self::new()
    }
}

impl UiElement for UiButton {
    fn rect(&self) -> ScreenRect {
        self.rect
    }

    fn set_rect(&mut self, rect: ScreenRect) {
        self.rect = rect;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn state(&self) -> UiState {
        if !self.enabled {
            UiState::Disabled
        } else if self.pressed && self.hovered {
            UiState::Pressed
        } else if self.hovered {
            UiState::Hover
        } else {
            UiState::Normal
        }
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn update(&mut self, dt: f32) {
        if let Some(label) = &mut self.label {
            // Keep the label centered inside the button
            let inset = self.rect.scaled(0.6);
            label.set_rect(inset);
            label.update(dt);
        }
    }

    fn handle_cursor(&mut self, x: f32, y: f32) {
        if !self.enabled {
            return;
        }
        let hovered = self.rect.contains(x, y);
        if hovered != self.hovered {
            self.hovered = hovered;
            log::trace!("button hover: {}", hovered);
        }
    }

    fn handle_mouse_button(&mut self, pressed: bool, x: f32, y: f32) {
        if !self.enabled {
            return;
        }
        let inside = self.rect.contains(x, y);
        if pressed {
            self.pressed = inside;
        } else {
            let clicked = self.pressed && inside;
            self.pressed = false;
            if clicked {
                log::debug!("button clicked");
                if let Some(callback) = &mut self.on_click {
                    callback();
                }
            }
        }
    }

    fn draw(&self, device: &mut dyn RenderDevice) -> RenderResult<()> {
        let resolved = self.style.resolve(self.state());
        let bounds = self.rect.scaled(resolved.scale);
        device.draw_rect(bounds, resolved.background.with_opacity(resolved.opacity))?;
        if let Some(label) = &self.label {
            if label.is_visible() {
                label.draw(device)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn button_at_origin() -> UiButton {
        let mut button = UiButton::with_text("ok");
        button.set_rect(ScreenRect::new(0.0, 0.0, 100.0, 40.0));
        button
    }

    #[test]
    fn hover_follows_cursor() {
        let mut button = button_at_origin();
        assert_eq!(button.state(), UiState::Normal);

        button.handle_cursor(50.0, 20.0);
        assert_eq!(button.state(), UiState::Hover);

        button.handle_cursor(500.0, 20.0);
        assert_eq!(button.state(), UiState::Normal);
    }

    #[test]
    fn click_fires_on_release_inside() {
        let mut button = button_at_origin();
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        button.on_click(move || counter.set(counter.get() + 1));

        button.handle_cursor(50.0, 20.0);
        button.handle_mouse_button(true, 50.0, 20.0);
        assert_eq!(button.state(), UiState::Pressed);
        button.handle_mouse_button(false, 50.0, 20.0);

        assert_eq!(clicks.get(), 1);
        assert_eq!(button.state(), UiState::Hover);
    }

    #[test]
    fn release_outside_cancels_click() {
        let mut button = button_at_origin();
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        button.on_click(move || counter.set(counter.get() + 1));

        button.handle_mouse_button(true, 50.0, 20.0);
        button.handle_mouse_button(false, 500.0, 400.0);
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn disabled_button_ignores_input() {
        let mut button = button_at_origin();
        button.set_enabled(false);
        button.handle_cursor(50.0, 20.0);
        button.handle_mouse_button(true, 50.0, 20.0);
        assert_eq!(button.state(), UiState::Disabled);
    }
}
