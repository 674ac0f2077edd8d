//! Rendering backend for camcalib.
//!
//! Each viewport renders an immediate-mode [`DrawList`] into its own
//! offscreen [`RenderTarget`] using two small wgpu pipelines (lines and
//! triangles). The UI layer then shows those targets as images.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod capture;
pub mod draw_list;
pub mod engine;
pub mod error;
pub mod pipelines;
pub mod render_target;
pub mod viewport;

pub use capture::{encode_png, save_png};
pub use draw_list::{DrawList, Vertex};
pub use engine::RenderEngine;
pub use error::{RenderError, RenderResult};
pub use pipelines::{LineTrianglePipelines, ViewportUniforms};
pub use render_target::RenderTarget;
pub use viewport::Viewport;
