//! Headless rendering of both viewports.
//!
//! Renders the calibration and scene views into offscreen targets without
//! opening a window. Used by integration tests and for batch captures.

use camcalib_core::{CamCalibError, Options, Result, ViewportId};
use camcalib_render::{save_png, DrawList, RenderEngine, Viewport};
use pollster::FutureExt;

use crate::scene::SceneState;

/// RGBA pixels of both viewports, rows top to bottom, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportImages {
    pub width: u32,
    pub height: u32,
    pub calibration: Vec<u8>,
    pub scene: Vec<u8>,
}

impl ViewportImages {
    /// Pixels of one viewport.
    pub fn get(&self, id: ViewportId) -> &[u8] {
        match id {
            ViewportId::Calibration => &self.calibration,
            ViewportId::Scene => &self.scene,
        }
    }

    /// Writes one viewport to a PNG file.
    pub fn save(&self, id: ViewportId, path: impl AsRef<std::path::Path>) -> Result<()> {
        save_png(path, self.get(id), self.width, self.height).map_err(render_error)
    }
}

fn render_error(error: impl std::fmt::Display) -> CamCalibError {
    CamCalibError::RenderError(error.to_string())
}

/// Renders one frame of both viewports at `width` x `height` (each clamped to at least 1).
///
/// Both cameras start at the poses configured in `options`. Fails with
/// [`CamCalibError::RenderError`] when no GPU adapter is available.
///
/// # Example
/// ```no_run
/// use camcalib::{headless, Options, ViewportId};
///
/// let images = headless::render_viewports(&Options::default(), 320, 240).unwrap();
/// images.save(ViewportId::Scene, "scene.png").unwrap();
/// ```
pub fn render_viewports(options: &Options, width: u32, height: u32) -> Result<ViewportImages> {
    options.validate()?;
    let state = SceneState::new(options.clone());

    let engine = RenderEngine::new_headless()
        .block_on()
        .map_err(|e| CamCalibError::RenderError(format!("failed to create headless engine: {e}")))?;

    let mut calibration = Viewport::new(&engine, width, height, ViewportId::Calibration.name());
    let mut scene = Viewport::new(&engine, width, height, ViewportId::Scene.name());

    let mut calibration_list = DrawList::new();
    let mut scene_list = DrawList::new();
    let calibration_aspect = calibration.target.aspect();
    state.build_calibration_view(&mut calibration_list);
    state.build_scene_view(&mut scene_list, calibration_aspect);

    let (near, far) = (options.near, options.far);
    let mut encoder = engine
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("camcalib headless encoder"),
        });
    calibration.render(
        &engine,
        &mut encoder,
        &calibration_list,
        state.calibration.view_projection(calibration_aspect, near, far),
        options.clear_color,
    );
    scene.render(
        &engine,
        &mut encoder,
        &scene_list,
        state.scene.view_projection(scene.target.aspect(), near, far),
        options.clear_color,
    );
    engine.queue.submit(std::iter::once(encoder.finish()));

    let (width, height) = calibration.target.size();
    log::debug!("rendered headless viewports at {width}x{height}");

    Ok(ViewportImages {
        width,
        height,
        calibration: engine.read_target(&calibration.target).map_err(render_error)?,
        scene: engine.read_target(&scene.target).map_err(render_error)?,
    })
}
