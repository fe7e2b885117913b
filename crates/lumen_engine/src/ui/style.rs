//! Per-state widget styling

use crate::render::Color;
use std::collections::HashMap;

/// Interaction state of a widget, used as a style key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiState {
    /// Idle
    Normal,
    /// Cursor over the widget
    Hover,
    /// Cursor over the widget with the button held
    Pressed,
    /// Not interactive
    Disabled,
}

/// Style overrides for one widget state; unset fields fall back to the
/// resolved defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiStyleState {
    /// Background fill color
    pub background: Option<Color>,
    /// Text color
    pub text_color: Option<Color>,
    /// Overall opacity multiplier
    pub opacity: Option<f32>,
    /// Scale factor applied around the widget center
    pub scale: Option<f32>,
}

/// Complete widget style: one [`UiStyleState`] per interaction state
#[derive(Debug, Clone, PartialEq)]
pub struct UiStyle {
    states: HashMap<UiState, UiStyleState>,
}

/// Resolved appearance for drawing one widget state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    /// Background fill color
    pub background: Color,
    /// Text color
    pub text_color: Color,
    /// Overall opacity
    pub opacity: f32,
    /// Scale factor
    pub scale: f32,
}

impl Default for UiStyle {
    /// Gray widget palette matching the classic button fallback colors
    fn default() -> Self {
        let mut style = Self {
            states: HashMap::new(),
        };
        style.state_mut(UiState::Normal).background = Some(Color::rgb(0.83, 0.83, 0.83));
        style.state_mut(UiState::Hover).background = Some(Color::rgb(0.75, 0.75, 0.75));
        style.state_mut(UiState::Pressed).background = Some(Color::rgb(0.5, 0.5, 0.5));
        let disabled = style.state_mut(UiState::Disabled);
        disabled.background = Some(Color::rgb(0.66, 0.66, 0.66));
        disabled.opacity = Some(0.7);
        style
    }
}

impl UiStyle {
    /// Mutable access to the overrides for a state, creating them on demand
    pub fn state_mut(&mut self, state: UiState) -> &mut UiStyleState {
        self.states.entry(state).or_default()
    }

    /// Resolve the appearance for a state, falling back to the `Normal`
    /// state and then to built-in defaults for unset fields
    pub fn resolve(&self, state: UiState) -> ResolvedStyle {
        let specific = self.states.get(&state);
        let normal = self.states.get(&UiState::Normal);
        let pick = |field: fn(&UiStyleState) -> Option<Color>, fallback: Color| {
            specific
                .and_then(field)
                .or_else(|| normal.and_then(field))
                .unwrap_or(fallback)
        };

        ResolvedStyle {
            background: pick(|s| s.background, Color::rgb(0.83, 0.83, 0.83)),
            text_color: pick(|s| s.text_color, Color::BLACK),
            opacity: specific
                .and_then(|s| s.opacity)
                .or_else(|| normal.and_then(|s| s.opacity))
                .unwrap_or(1.0),
            scale: specific
                .and_then(|s| s.scale)
                .or_else(|| normal.and_then(|s| s.scale))
                .unwrap_or(1.0),
        }
    }
}
