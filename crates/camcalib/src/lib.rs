//! camcalib: an interactive camera gizmo viewer.
//!
//! Two offscreen viewports are shown side by side in floating panels:
//!
//! - **Calibration Camera**: what a keyboard-driven camera sees. WASD/QE move
//!   it, the arrow keys turn it and `+`/`-` change its field of view.
//! - **Scene**: a mouse-navigated camera looking at the world, including the
//!   calibration camera's gizmo. Middle drag orbits, Shift + middle drag
//!   pans, Ctrl + middle drag dollies and the wheel zooms.
//!
//! # Quick Start
//!
//! ```no_run
//! use camcalib::*;
//!
//! fn main() -> Result<()> {
//!     let mut options = Options::default();
//!     options.gizmo_scale = 0.5;
//!     run(options)
//! }
//! ```
//!
//! Both viewports can also be rendered without a window, see
//! [`headless::render_viewports`].

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod app;
pub mod headless;
mod scene;

pub use camcalib_core::{
    fly, navigation, Camera3D, CamCalibError, CameraGizmo, FlyKey, FlySettings, GizmoStyle,
    GridOptions, InputFrame, LookMarker, Mat4, MouseButton, NavigationSettings, Options,
    Projection, Quat, Result, TargetOptions, Vec2, Vec3, Vec4, ViewportId,
};
pub use camcalib_render::DrawList;
pub use scene::SceneState;

/// Default log filter when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Initializes logging. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
    )
    .try_init();
}

/// Opens the viewer with `options` and blocks until its window is closed.
pub fn run(options: Options) -> Result<()> {
    app::run_app(options)
}

/// Opens the viewer with default options.
///
/// This function blocks until the window is closed.
pub fn show() -> Result<()> {
    init_logging();
    run(Options::default())
}
