use std::sync::Arc;

use camcalib_core::input::MouseButton as InputButton;
use camcalib_core::{CamCalibError, FlyKey, Vec2, ViewportId};
use camcalib_render::RenderEngine;
use camcalib_ui::EguiIntegration;
use pollster::FutureExt;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use super::{App, ViewportSlot};

/// Pixels of trackpad scroll that count as one wheel notch.
const PIXELS_PER_NOTCH: f32 = 50.0;

/// Maps a physical key to a calibration camera movement.
pub(super) fn fly_key(code: KeyCode) -> Option<FlyKey> {
    let key = match code {
        KeyCode::KeyW => FlyKey::Forward,
        KeyCode::KeyS => FlyKey::Back,
        KeyCode::KeyA => FlyKey::Left,
        KeyCode::KeyD => FlyKey::Right,
        KeyCode::KeyE => FlyKey::Up,
        KeyCode::KeyQ => FlyKey::Down,
        KeyCode::ArrowLeft => FlyKey::YawLeft,
        KeyCode::ArrowRight => FlyKey::YawRight,
        KeyCode::ArrowUp => FlyKey::PitchUp,
        KeyCode::ArrowDown => FlyKey::PitchDown,
        KeyCode::Equal | KeyCode::NumpadAdd => FlyKey::ZoomIn,
        KeyCode::Minus | KeyCode::NumpadSubtract => FlyKey::ZoomOut,
        _ => return None,
    };
    Some(key)
}

fn input_button(button: MouseButton) -> Option<InputButton> {
    match button {
        MouseButton::Left => Some(InputButton::Left),
        MouseButton::Middle => Some(InputButton::Middle),
        MouseButton::Right => Some(InputButton::Right),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn cursor_position(position: winit::dpi::PhysicalPosition<f64>) -> Vec2 {
    Vec2::new(position.x as f32, position.y as f32)
}

#[allow(clippy::cast_possible_truncation)]
fn wheel_notches(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_NOTCH,
    }
}

impl App {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> camcalib_core::Result<()> {
        let options = &self.state.options;
        let [width, height] = options.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(options.window_title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(|e| CamCalibError::WindowError(e.to_string()))?,
        );

        let engine = RenderEngine::new_windowed(window.clone())
            .block_on()
            .map_err(|e| CamCalibError::RenderError(e.to_string()))?;

        let mut egui = EguiIntegration::new(&engine.device, engine.surface_format(), &window);

        let size = options.render_target_size;
        let calibration = ViewportSlot::new(&engine, &mut egui, ViewportId::Calibration, size);
        let scene = ViewportSlot::new(&engine, &mut egui, ViewportId::Scene, size);

        log::info!("window ready ({width}x{height}), viewports {}x{}", size[0], size[1]);

        self.calibration_slot = Some(calibration);
        self.scene_slot = Some(scene);
        self.window = Some(window);
        self.engine = Some(engine);
        self.egui = Some(egui);
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, state: ElementState, repeat: bool) {
        let pressed = state == ElementState::Pressed;
        if let Some(key) = fly_key(code) {
            self.input.set_key(key, pressed);
        }
        if !pressed || repeat {
            return;
        }
        match code {
            KeyCode::Escape => {
                self.close_requested = true;
            }
            KeyCode::Home => {
                self.frame_gizmo_pending = true;
            }
            KeyCode::F12 => {
                self.capture_pending = Some(ViewportId::Scene);
                log::info!("capture requested (F12)");
            }
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(error) = self.init_graphics(event_loop) {
            self.fail(error);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui see every event first
        if let (Some(egui), Some(window)) = (&mut self.egui, &self.window) {
            egui.handle_event(window, &event);
        }

        // Physical input state is tracked even when egui consumed the event,
        // so buttons and keys never get stuck. Which camera it reaches is
        // decided per frame from the hovered panel.
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.input.release_all();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.cursor_moved(cursor_position(position));
            }
            WindowEvent::CursorLeft { .. } => {
                self.input.mouse_pos = None;
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = input_button(button) {
                    self.input
                        .set_button(button, state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.scrolled(wheel_notches(delta));
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let state = modifiers.state();
                self.input.modifiers.shift = state.shift_key();
                self.input.modifiers.ctrl = state.control_key();
                self.input.modifiers.alt = state.alt_key();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.handle_key(code, event.state, event.repeat);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camcalib_core::Options;

    #[test]
    fn test_fly_key_map() {
        assert_eq!(fly_key(KeyCode::KeyW), Some(FlyKey::Forward));
        assert_eq!(fly_key(KeyCode::KeyQ), Some(FlyKey::Down));
        assert_eq!(fly_key(KeyCode::ArrowUp), Some(FlyKey::PitchUp));
        assert_eq!(fly_key(KeyCode::NumpadAdd), Some(FlyKey::ZoomIn));
        assert_eq!(fly_key(KeyCode::Minus), Some(FlyKey::ZoomOut));
        assert_eq!(fly_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn test_wheel_notches() {
        assert_eq!(wheel_notches(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
        let pixels = winit::dpi::PhysicalPosition::new(0.0, 100.0);
        assert_eq!(wheel_notches(MouseScrollDelta::PixelDelta(pixels)), 2.0);
    }

    #[test]
    fn test_special_keys() {
        let mut app = App::new(Options::default());
        app.handle_key(KeyCode::Home, ElementState::Pressed, false);
        assert!(app.frame_gizmo_pending);

        app.handle_key(KeyCode::F12, ElementState::Pressed, true);
        assert_eq!(app.capture_pending, None);
        app.handle_key(KeyCode::F12, ElementState::Pressed, false);
        assert_eq!(app.capture_pending, Some(ViewportId::Scene));

        app.handle_key(KeyCode::Escape, ElementState::Pressed, false);
        assert!(app.close_requested);
    }

    #[test]
    fn test_movement_keys_track_state() {
        let mut app = App::new(Options::default());
        app.handle_key(KeyCode::KeyD, ElementState::Pressed, false);
        assert!(app.input.keys.contains(&FlyKey::Right));
        app.handle_key(KeyCode::KeyD, ElementState::Released, false);
        assert!(app.input.keys.is_empty());
    }
}
