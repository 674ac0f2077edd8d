//! Core abstractions for camcalib.
//!
//! This crate holds everything that does not touch the GPU or the window system:
//! - [`Camera3D`] state and its view/projection matrices
//! - camera gizmo geometry (the pyramid drawn for a camera pose)
//! - mouse navigation (orbit/pan/zoom) and keyboard fly movement
//! - the per-frame [`InputFrame`] snapshot both are driven by
//! - [`Options`] loaded from JSON

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]

pub mod camera;
pub mod error;
pub mod fly;
pub mod gizmo;
pub mod input;
pub mod navigation;
pub mod options;

pub use camera::{Camera3D, Projection};
pub use error::{CamCalibError, Result};
pub use fly::{fly, FlyKey, FlySettings};
pub use gizmo::{CameraGizmo, GizmoStyle, LookMarker};
pub use input::{InputFrame, Modifiers, MouseButton, MouseButtons, ViewportId};
pub use navigation::{NavAction, NavigationSettings};
pub use options::{GridOptions, Options, TargetOptions, MAX_GRID_HALF_LINES, MAX_TARGET_SQUARES};

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
