//! Application window and event loop management.

mod frame;
mod input;

use std::sync::Arc;
use std::time::Instant;

use camcalib_core::{CamCalibError, InputFrame, Options, Result, ViewportId};
use camcalib_render::{DrawList, RenderEngine, Viewport};
use camcalib_ui::{EguiIntegration, PanelVisibility};
use winit::event_loop::EventLoop;
use winit::window::Window;

use crate::scene::SceneState;

/// A viewport plus what the UI knows about it.
pub(super) struct ViewportSlot {
    pub(super) id: ViewportId,
    pub(super) viewport: Viewport,
    pub(super) texture_id: egui::TextureId,
    /// Size the panel asked for last frame, in physical pixels.
    pub(super) requested_size: [u32; 2],
    pub(super) draw_list: DrawList,
}

impl ViewportSlot {
    fn new(engine: &RenderEngine, egui: &mut EguiIntegration, id: ViewportId, size: [u32; 2]) -> Self {
        let viewport = Viewport::new(engine, size[0], size[1], id.name());
        let texture_id = egui.register_target(&engine.device, viewport.target.view());
        Self {
            id,
            viewport,
            texture_id,
            requested_size: size,
            draw_list: DrawList::new(),
        }
    }

    /// Follows the panel size, re-pointing the UI texture when the target was recreated.
    fn sync_size(&mut self, engine: &RenderEngine, egui: &mut EguiIntegration) {
        let [width, height] = self.requested_size;
        if self.viewport.resize(engine, width, height) {
            egui.update_target(&engine.device, self.texture_id, self.viewport.target.view());
        }
    }
}

/// The camcalib application state.
pub struct App {
    pub(super) window: Option<Arc<Window>>,
    pub(super) engine: Option<RenderEngine>,
    pub(super) egui: Option<EguiIntegration>,
    pub(super) calibration_slot: Option<ViewportSlot>,
    pub(super) scene_slot: Option<ViewportSlot>,
    pub(super) state: SceneState,
    pub(super) input: InputFrame,
    pub(super) panels: PanelVisibility,
    pub(super) close_requested: bool,
    /// First fatal error; returned from [`run`] after the loop exits.
    pub(super) fatal_error: Option<CamCalibError>,
    // Frame timing
    pub(super) last_frame_time: Option<Instant>,
    pub(super) fps: f32,
    // Deferred requests from keys, handled in the next frame
    pub(super) frame_gizmo_pending: bool,
    pub(super) capture_pending: Option<ViewportId>,
    pub(super) capture_counter: u32,
}

impl App {
    /// Creates a new application.
    pub fn new(options: Options) -> Self {
        Self {
            window: None,
            engine: None,
            egui: None,
            calibration_slot: None,
            scene_slot: None,
            state: SceneState::new(options),
            input: InputFrame::new(),
            panels: PanelVisibility::default(),
            close_requested: false,
            fatal_error: None,
            last_frame_time: None,
            fps: 0.0,
            frame_gizmo_pending: false,
            capture_pending: None,
            capture_counter: 0,
        }
    }

    /// Records a fatal error and asks the loop to stop.
    pub(super) fn fail(&mut self, error: CamCalibError) {
        log::error!("{error}");
        self.fatal_error.get_or_insert(error);
        self.close_requested = true;
    }

    /// Next auto-generated capture filename.
    pub(super) fn next_capture_filename(&mut self) -> String {
        let filename = format!("camcalib_capture_{:04}.png", self.capture_counter);
        self.capture_counter += 1;
        filename
    }
}

/// Runs the application until its window closes.
pub fn run_app(options: Options) -> Result<()> {
    options.validate()?;

    let event_loop = EventLoop::new().map_err(|e| CamCalibError::WindowError(e.to_string()))?;
    let mut app = App::new(options);

    event_loop
        .run_app(&mut app)
        .map_err(|e| CamCalibError::WindowError(e.to_string()))?;

    match app.fatal_error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
