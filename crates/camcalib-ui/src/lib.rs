//! UI layer for camcalib using egui.

#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod integration;
pub mod panels;

pub use integration::EguiIntegration;
pub use panels::*;
