use std::time::Instant;

use camcalib_core::{fly, navigation, CamCalibError, ViewportId};
use camcalib_render::{save_png, RenderError};
use camcalib_ui::{
    build_inspector_window, build_menu_bar, build_viewport_window, InspectorAction,
    ViewportResponse,
};
use egui_wgpu::ScreenDescriptor;

use super::{App, ViewportSlot};

/// Smoothing factor for the FPS readout.
const FPS_SMOOTHING: f32 = 0.1;

impl App {
    /// Acquires the next surface texture, recovering from a lost or outdated surface.
    fn acquire_surface_texture(&mut self) -> Option<wgpu::SurfaceTexture> {
        let engine = self.engine.as_ref()?;
        match engine.acquire_frame() {
            Ok(frame) => Some(frame),
            Err(RenderError::SurfaceLost | RenderError::SurfaceOutdated) => {
                engine.reconfigure();
                None
            }
            Err(RenderError::OutOfMemory) => {
                self.fail(CamCalibError::RenderError("out of memory".to_string()));
                None
            }
            Err(error) => {
                log::warn!("skipping frame: {error}");
                None
            }
        }
    }

    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last_frame_time
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_frame_time = Some(now);
        if dt > 0.0 {
            let instant = 1.0 / dt;
            self.fps = if self.fps > 0.0 {
                self.fps + (instant - self.fps) * FPS_SMOOTHING
            } else {
                instant
            };
        }
        dt
    }

    /// Runs one frame: UI, camera updates, both viewports, composite, present.
    pub(super) fn render_frame(&mut self) {
        let dt = self.tick();
        let Some(surface_texture) = self.acquire_surface_texture() else {
            return;
        };

        let Self {
            window: Some(window),
            engine: Some(engine),
            egui: Some(egui),
            calibration_slot: Some(calibration_slot),
            scene_slot: Some(scene_slot),
            state,
            input,
            panels,
            close_requested,
            fps,
            frame_gizmo_pending,
            capture_pending,
            ..
        } = self
        else {
            return;
        };

        // UI
        egui.begin_frame(window);
        let ctx = egui.context.clone();
        if build_menu_bar(&ctx, panels, *fps) {
            *close_requested = true;
        }
        let calibration_response = build_viewport_window(
            &ctx,
            ViewportId::Calibration,
            calibration_slot.texture_id,
            calibration_slot.requested_size,
            &mut panels.calibration,
        );
        let scene_response = build_viewport_window(
            &ctx,
            ViewportId::Scene,
            scene_slot.texture_id,
            scene_slot.requested_size,
            &mut panels.scene,
        );
        let action = build_inspector_window(
            &ctx,
            &mut panels.inspector,
            &mut state.calibration,
            &mut state.scene,
            &mut state.options,
        );

        input.hovered = if scene_response.hovered {
            Some(ViewportId::Scene)
        } else if calibration_response.hovered {
            Some(ViewportId::Calibration)
        } else {
            None
        };
        for (id, response) in [
            (ViewportId::Calibration, &calibration_response),
            (ViewportId::Scene, &scene_response),
        ] {
            if response.drag_started {
                input.drag_started_in(id);
            }
        }
        if state.options.follow_panel_size {
            follow_panel(calibration_slot, &calibration_response);
            follow_panel(scene_slot, &scene_response);
        }

        match action {
            InspectorAction::ResetCalibration => state.reset_calibration(),
            InspectorAction::ResetScene => state.reset_scene(),
            InspectorAction::FrameGizmo => *frame_gizmo_pending = true,
            InspectorAction::Capture(id) => *capture_pending = Some(id),
            InspectorAction::None => {}
        }

        // Cameras
        if !egui.wants_keyboard_input() {
            fly(
                &mut state.calibration,
                &input.keys,
                input.modifiers.shift,
                dt,
                &state.options.fly,
            );
        }
        if input.targets(ViewportId::Scene) {
            navigation::apply(&mut state.scene, input, &state.options.navigation);
        }
        if std::mem::take(frame_gizmo_pending) {
            state.frame_gizmo(calibration_slot.viewport.target.aspect());
        }

        // Viewports
        calibration_slot.sync_size(engine, egui);
        scene_slot.sync_size(engine, egui);

        let mut encoder = engine
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("camcalib frame encoder"),
            });

        let (near, far) = (state.options.near, state.options.far);
        let clear = state.options.clear_color;
        let calibration_aspect = calibration_slot.viewport.target.aspect();

        state.build_calibration_view(&mut calibration_slot.draw_list);
        calibration_slot.viewport.render(
            engine,
            &mut encoder,
            &calibration_slot.draw_list,
            state.calibration.view_projection(calibration_aspect, near, far),
            clear,
        );

        state.build_scene_view(&mut scene_slot.draw_list, calibration_aspect);
        let scene_aspect = scene_slot.viewport.target.aspect();
        scene_slot.viewport.render(
            engine,
            &mut encoder,
            &scene_slot.draw_list,
            state.scene.view_projection(scene_aspect, near, far),
            clear,
        );

        // Composite
        let output = egui.end_frame(window);
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let screen_descriptor = ScreenDescriptor {
            size_in_pixels: [engine.surface_config.width, engine.surface_config.height],
            pixels_per_point: egui.context.pixels_per_point(),
        };
        egui.render(
            &engine.device,
            &engine.queue,
            &mut encoder,
            &view,
            &screen_descriptor,
            output,
            Some(state.options.background_color),
        );

        engine.queue.submit(std::iter::once(encoder.finish()));
        window.pre_present_notify();
        surface_texture.present();

        input.end_frame();

        if let Some(id) = self.capture_pending.take() {
            self.capture(id);
        }
    }

    /// Saves the current contents of a viewport to the next capture file.
    fn capture(&mut self, id: ViewportId) {
        let filename = self.next_capture_filename();
        let (Some(engine), Some(slot)) = (&self.engine, self.slot(id)) else {
            return;
        };
        let (width, height) = slot.viewport.target.size();
        let result = engine
            .read_target(&slot.viewport.target)
            .and_then(|pixels| save_png(&filename, &pixels, width, height));
        match result {
            Ok(()) => log::info!("captured {} view to {filename}", slot.id.name()),
            Err(error) => log::error!("failed to capture {} view: {error}", id.name()),
        }
    }

    fn slot(&self, id: ViewportId) -> Option<&ViewportSlot> {
        match id {
            ViewportId::Calibration => self.calibration_slot.as_ref(),
            ViewportId::Scene => self.scene_slot.as_ref(),
        }
    }
}

/// Adopts the panel's size for the next frame; closed panels report zero and are ignored.
fn follow_panel(slot: &mut ViewportSlot, response: &ViewportResponse) {
    if response.size[0] > 0 && response.size[1] > 0 {
        slot.requested_size = response.size;
    }
}
