//! Text label widget

use super::{UiElement, UiState, UiStyle};
use crate::render::{RenderDevice, RenderResult, ScreenRect};

/// Static text element
///
/// Glyph rasterization lives outside this engine, so the label draws a
/// placeholder quad in its text color and keeps the string as data for a
/// text-capable backend to pick up.
pub struct UiLabel {
    text: String,
    rect: ScreenRect,
    visible: bool,
    style: UiStyle,
    z_index: i32,
}

impl UiLabel {
    /// Create a label with the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rect: ScreenRect::default(),
            visible: true,
            style: UiStyle::default(),
            z_index: 0,
        }
    }

    /// The label's text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the label's text
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Mutable access to the style
    pub fn style_mut(&mut self) -> &mut UiStyle {
        &mut self.style
    }

    /// Set the draw order
    pub fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }
}

impl UiElement for UiLabel {
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
        false
    }

    fn state(&self) -> UiState {
        UiState::Normal
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn handle_cursor(&mut self, _x: f32, _y: f32) {}

    fn handle_mouse_button(&mut self, _pressed: bool, _x: f32, _y: f32) {}

    fn draw(&self, device: &mut dyn RenderDevice) -> RenderResult<()> {
        if self.text.is_empty() {
            return Ok(());
        }
        let resolved = self.style.resolve(UiState::Normal);
        device.draw_rect(
            self.rect,
            resolved.text_color.with_opacity(resolved.opacity * 0.35),
        )
    }
}
