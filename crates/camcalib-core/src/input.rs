//! Per-frame input snapshot, independent of the window system.
//!
//! The application feeds raw window events into an [`InputFrame`]; camera
//! controllers read it once per frame, after which [`InputFrame::end_frame`]
//! clears the accumulated deltas.

use std::collections::HashSet;

use glam::Vec2;

use crate::fly::FlyKey;

/// The two viewports the application renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportId {
    /// View through the keyboard-driven calibration camera.
    Calibration,
    /// Mouse-navigated view of the scene, showing the calibration camera gizmo.
    Scene,
}

impl ViewportId {
    /// Returns display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ViewportId::Calibration => "Calibration Camera",
            ViewportId::Scene => "Scene",
        }
    }
}

/// Physical mouse button state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseButtons {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl MouseButtons {
    /// Returns true if any button is held.
    #[must_use]
    pub fn any(self) -> bool {
        self.left || self.middle || self.right
    }
}

/// Modifier key state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Input gathered between two frames.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    /// Cursor position in window pixels, if known.
    pub mouse_pos: Option<Vec2>,
    /// Cursor movement accumulated since the last frame, in pixels.
    pub mouse_delta: Vec2,
    /// Wheel movement accumulated since the last frame, in notches (positive = away from user).
    pub wheel: f32,
    /// Held mouse buttons.
    pub buttons: MouseButtons,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Held fly-movement keys.
    pub keys: HashSet<FlyKey>,
    /// Viewport the pointer is currently over.
    pub hovered: Option<ViewportId>,
    /// Viewport in which the current drag started; drags keep steering it
    /// even when the pointer leaves the panel.
    pub drag_origin: Option<ViewportId>,
}

impl InputFrame {
    /// Creates an empty input frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cursor move to `pos`, accumulating the delta from the previous position.
    pub fn cursor_moved(&mut self, pos: Vec2) {
        if let Some(previous) = self.mouse_pos {
            self.mouse_delta += pos - previous;
        }
        self.mouse_pos = Some(pos);
    }

    /// Accumulates wheel movement.
    pub fn scrolled(&mut self, notches: f32) {
        if notches.is_finite() {
            self.wheel += notches;
        }
    }

    /// Updates a mouse button. A press with no other buttons held starts a
    /// drag in the hovered viewport; releasing the last button ends it.
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        let was_dragging = self.buttons.any();
        match button {
            MouseButton::Left => self.buttons.left = pressed,
            MouseButton::Middle => self.buttons.middle = pressed,
            MouseButton::Right => self.buttons.right = pressed,
        }
        if pressed && !was_dragging {
            self.drag_origin = self.hovered;
        } else if !self.buttons.any() {
            self.drag_origin = None;
        }
    }

    /// Claims the current drag for `viewport` when its panel reports that a
    /// drag started there. Covers presses that arrive before the hover state
    /// for that frame is known.
    pub fn drag_started_in(&mut self, viewport: ViewportId) {
        if self.buttons.any() {
            self.drag_origin = Some(viewport);
        }
    }

    /// Updates a fly-movement key.
    pub fn set_key(&mut self, key: FlyKey, pressed: bool) {
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    /// Releases every held button and key (e.g. on focus loss).
    pub fn release_all(&mut self) {
        self.buttons = MouseButtons::default();
        self.modifiers = Modifiers::default();
        self.keys.clear();
        self.drag_origin = None;
    }

    /// Returns true if mouse input this frame belongs to `viewport`.
    #[must_use]
    pub fn targets(&self, viewport: ViewportId) -> bool {
        match self.drag_origin {
            Some(origin) => origin == viewport,
            None => self.hovered == Some(viewport),
        }
    }

    /// Clears per-frame deltas while keeping held buttons and keys.
    pub fn end_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.wheel = 0.0;
    }
}

/// Mouse buttons tracked by [`InputFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_delta_accumulates() {
        let mut input = InputFrame::new();
        input.cursor_moved(Vec2::new(10.0, 10.0));
        assert_eq!(input.mouse_delta, Vec2::ZERO);

        input.cursor_moved(Vec2::new(13.0, 8.0));
        input.cursor_moved(Vec2::new(15.0, 9.0));
        assert_eq!(input.mouse_delta, Vec2::new(5.0, -1.0));

        input.end_frame();
        assert_eq!(input.mouse_delta, Vec2::ZERO);
        assert_eq!(input.mouse_pos, Some(Vec2::new(15.0, 9.0)));
    }

    #[test]
    fn test_wheel_ignores_non_finite() {
        let mut input = InputFrame::new();
        input.scrolled(1.0);
        input.scrolled(f32::NAN);
        input.scrolled(0.5);
        assert_eq!(input.wheel, 1.5);
    }

    #[test]
    fn test_drag_origin_sticks_until_release() {
        let mut input = InputFrame::new();
        input.hovered = Some(ViewportId::Scene);
        input.set_button(MouseButton::Middle, true);
        assert_eq!(input.drag_origin, Some(ViewportId::Scene));

        // Pointer leaves the panel mid-drag
        input.hovered = Some(ViewportId::Calibration);
        assert!(input.targets(ViewportId::Scene));
        assert!(!input.targets(ViewportId::Calibration));

        input.set_button(MouseButton::Middle, false);
        assert_eq!(input.drag_origin, None);
        assert!(input.targets(ViewportId::Calibration));
    }

    #[test]
    fn test_panel_drag_start_claims_drag() {
        let mut input = InputFrame::new();
        // Button went down before any panel was hovered
        input.set_button(MouseButton::Middle, true);
        assert_eq!(input.drag_origin, None);

        input.drag_started_in(ViewportId::Scene);
        assert!(input.targets(ViewportId::Scene));

        // Without a held button there is nothing to claim
        input.set_button(MouseButton::Middle, false);
        input.drag_started_in(ViewportId::Scene);
        assert_eq!(input.drag_origin, None);
    }

    #[test]
    fn test_end_frame_keeps_held_state() {
        let mut input = InputFrame::new();
        input.set_key(FlyKey::Forward, true);
        input.set_button(MouseButton::Right, true);
        input.scrolled(2.0);
        input.end_frame();
        assert!(input.keys.contains(&FlyKey::Forward));
        assert!(input.buttons.right);
        assert_eq!(input.wheel, 0.0);

        input.release_all();
        assert!(input.keys.is_empty());
        assert!(!input.buttons.any());
    }
}
