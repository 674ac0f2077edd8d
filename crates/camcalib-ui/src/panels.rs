//! UI panel builders.
//!
//! Every panel is a floating [`egui::Window`] that can be moved, resized and
//! collapsed. The two viewport panels show render targets as images; the
//! inspector edits cameras and display options.

use camcalib_core::{Camera3D, Options, Projection, ViewportId};
use egui::{CollapsingHeader, Context, DragValue, Sense, Slider, Ui};

/// What a viewport panel reports back after it was drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportResponse {
    /// The pointer is over the image.
    pub hovered: bool,
    /// A drag started on the image this frame.
    pub drag_started: bool,
    /// Space available for the image, in physical pixels.
    pub size: [u32; 2],
}

/// Requests the inspector hands back to the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InspectorAction {
    #[default]
    None,
    ResetCalibration,
    ResetScene,
    /// Frame the calibration camera gizmo in the scene view.
    FrameGizmo,
    Capture(ViewportId),
}

/// Which panels are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelVisibility {
    pub calibration: bool,
    pub scene: bool,
    pub inspector: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            calibration: true,
            scene: true,
            inspector: true,
        }
    }
}

/// Builds the top menu bar. Returns true if Quit was chosen.
pub fn build_menu_bar(ctx: &Context, panels: &mut PanelVisibility, fps: f32) -> bool {
    let mut quit = false;
    egui::TopBottomPanel::top("camcalib_menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Quit").clicked() {
                    quit = true;
                }
            });
            ui.menu_button("View", |ui| {
                ui.checkbox(&mut panels.calibration, ViewportId::Calibration.name());
                ui.checkbox(&mut panels.scene, ViewportId::Scene.name());
                ui.checkbox(&mut panels.inspector, "Inspector");
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{fps:.0} FPS"));
            });
        });
    });
    quit
}

/// Builds a viewport panel showing `texture` stretched over the available space.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn build_viewport_window(
    ctx: &Context,
    viewport: ViewportId,
    texture: egui::TextureId,
    default_size: [u32; 2],
    open: &mut bool,
) -> ViewportResponse {
    let mut result = ViewportResponse::default();
    let pixels_per_point = ctx.pixels_per_point();
    let default_size = egui::vec2(default_size[0] as f32, default_size[1] as f32) / pixels_per_point;

    egui::Window::new(viewport.name())
        .id(egui::Id::new(("camcalib_viewport", viewport.name())))
        .open(open)
        .default_size(default_size)
        .resizable(true)
        .collapsible(true)
        .show(ctx, |ui| {
            let available = ui.available_size().max(egui::vec2(1.0, 1.0));
            let image = egui::Image::new(egui::load::SizedTexture::new(texture, available))
                .sense(Sense::click_and_drag());
            let response = ui.add(image);

            result.hovered = response.contains_pointer();
            result.drag_started = response.drag_started();
            result.size = [
                (available.x * pixels_per_point).round().max(1.0) as u32,
                (available.y * pixels_per_point).round().max(1.0) as u32,
            ];
        });

    result
}

/// Builds the editable fields of one camera. Returns true if anything changed.
pub fn build_camera_section(ui: &mut Ui, title: &str, camera: &mut Camera3D) -> bool {
    let mut changed = false;

    CollapsingHeader::new(title)
        .default_open(true)
        .show(ui, |ui| {
            changed |= vec3_row(ui, "Position:", &mut camera.position);
            changed |= vec3_row(ui, "Target:", &mut camera.target);
            changed |= vec3_row(ui, "Up:", &mut camera.up);

            let mut projection = camera.projection;
            egui::ComboBox::from_id_salt((title, "projection"))
                .selected_text(projection.name())
                .show_ui(ui, |ui| {
                    for mode in [Projection::Perspective, Projection::Orthographic] {
                        ui.selectable_value(&mut projection, mode, mode.name());
                    }
                });
            if projection != camera.projection {
                camera.set_projection(projection);
                changed = true;
            }

            match camera.projection {
                Projection::Perspective => {
                    ui.horizontal(|ui| {
                        ui.label("FOV:");
                        if ui
                            .add(Slider::new(&mut camera.fovy, 10.0..=120.0).suffix("°"))
                            .changed()
                        {
                            changed = true;
                        }
                    });
                }
                Projection::Orthographic => {
                    ui.horizontal(|ui| {
                        ui.label("Height:");
                        if ui
                            .add(DragValue::new(&mut camera.fovy).speed(0.05).range(0.01..=1000.0))
                            .changed()
                        {
                            changed = true;
                        }
                    });
                }
            }

            ui.label(format!("Distance to target: {:.3}", camera.distance()));
        });

    changed
}

fn vec3_row(ui: &mut Ui, label: &str, value: &mut glam::Vec3) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        for component in [&mut value.x, &mut value.y, &mut value.z] {
            changed |= ui.add(DragValue::new(component).speed(0.01)).changed();
        }
    });
    changed
}

/// Builds the display toggles. Returns true if anything changed.
pub fn build_display_section(ui: &mut Ui, options: &mut Options) -> bool {
    let mut changed = false;

    CollapsingHeader::new("Display")
        .default_open(false)
        .show(ui, |ui| {
            changed |= ui.checkbox(&mut options.grid.enabled, "Grid").changed();
            changed |= ui.checkbox(&mut options.show_axes, "Axes").changed();
            changed |= ui
                .checkbox(&mut options.calibration_target.enabled, "Calibration target")
                .changed();
            changed |= ui
                .checkbox(&mut options.show_look_marker, "Look marker")
                .changed();
            changed |= ui
                .checkbox(&mut options.gizmo.up_marker, "Gizmo up marker")
                .changed();

            ui.horizontal(|ui| {
                ui.label("Gizmo scale:");
                changed |= ui
                    .add(DragValue::new(&mut options.gizmo_scale).speed(0.01).range(0.01..=100.0))
                    .changed();
            });

            ui.horizontal(|ui| {
                ui.label("Background:");
                let mut color = options.background_color.to_array();
                if ui.color_edit_button_rgb(&mut color).changed() {
                    options.background_color = color.into();
                    changed = true;
                }
            });

            ui.horizontal(|ui| {
                ui.label("Gizmo:");
                let mut color = options.gizmo.outline_color.to_array();
                if ui.color_edit_button_rgba_unmultiplied(&mut color).changed() {
                    options.gizmo.outline_color = color.into();
                    changed = true;
                }
            });
        });

    changed
}

/// Builds the navigation settings and key help.
pub fn build_navigation_section(ui: &mut Ui, options: &mut Options) -> bool {
    let mut changed = false;

    CollapsingHeader::new("Navigation")
        .default_open(false)
        .show(ui, |ui| {
            let nav = &mut options.navigation;
            ui.horizontal(|ui| {
                ui.label("Orbit speed:");
                changed |= ui
                    .add(DragValue::new(&mut nav.orbit_sensitivity).speed(0.001).range(0.001..=0.1))
                    .changed();
            });
            ui.horizontal(|ui| {
                ui.label("Zoom step:");
                changed |= ui
                    .add(DragValue::new(&mut nav.zoom_step).speed(0.01).range(0.01..=0.9))
                    .changed();
            });
            changed |= ui.checkbox(&mut nav.invert_y, "Invert vertical orbit").changed();

            let fly = &mut options.fly;
            ui.horizontal(|ui| {
                ui.label("Move speed:");
                changed |= ui
                    .add(DragValue::new(&mut fly.move_speed).speed(0.05).range(0.01..=100.0))
                    .changed();
            });
            ui.horizontal(|ui| {
                ui.label("Turn speed:");
                changed |= ui
                    .add(DragValue::new(&mut fly.turn_speed).speed(0.05).range(0.01..=10.0))
                    .changed();
            });

            ui.separator();
            ui.label("Scene view");
            ui.indent("scene_help", |ui| {
                ui.label("Middle drag: orbit");
                ui.label("Shift + middle drag / right drag: pan");
                ui.label("Ctrl + middle drag: dolly");
                ui.label("Alt + left drag: orbit");
                ui.label("Wheel: zoom");
                ui.label("Home: frame calibration camera");
            });
            ui.label("Calibration camera");
            ui.indent("calibration_help", |ui| {
                ui.label("W/S A/D: move, E/Q: up/down");
                ui.label("Arrows: turn, +/-: field of view");
                ui.label("Shift: move faster");
            });
            ui.label("F12: capture scene view, Esc: quit");
        });

    changed
}

/// Builds the inspector panel.
pub fn build_inspector_window(
    ctx: &Context,
    open: &mut bool,
    calibration: &mut Camera3D,
    scene: &mut Camera3D,
    options: &mut Options,
) -> InspectorAction {
    let mut action = InspectorAction::None;

    egui::Window::new("Inspector")
        .open(open)
        .default_width(300.0)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                build_camera_section(ui, ViewportId::Calibration.name(), calibration);
                ui.horizontal(|ui| {
                    if ui.button("Reset").clicked() {
                        action = InspectorAction::ResetCalibration;
                    }
                    if ui.button("Frame in scene").clicked() {
                        action = InspectorAction::FrameGizmo;
                    }
                    if ui.button("Capture").clicked() {
                        action = InspectorAction::Capture(ViewportId::Calibration);
                    }
                });

                ui.separator();

                build_camera_section(ui, "Scene Camera", scene);
                ui.horizontal(|ui| {
                    if ui.button("Reset").clicked() {
                        action = InspectorAction::ResetScene;
                    }
                    if ui.button("Capture").clicked() {
                        action = InspectorAction::Capture(ViewportId::Scene);
                    }
                });

                ui.separator();

                build_display_section(ui, options);
                build_navigation_section(ui, options);
            });
        });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frame(run_ui: impl FnMut(&Context)) {
        let ctx = Context::default();
        let _ = ctx.run(egui::RawInput::default(), run_ui);
    }

    #[test]
    fn test_viewport_window_reports_size() {
        let mut response = ViewportResponse::default();
        let mut open = true;
        run_frame(|ctx| {
            response = build_viewport_window(
                ctx,
                ViewportId::Scene,
                egui::TextureId::User(1),
                [256, 256],
                &mut open,
            );
        });
        assert!(response.size[0] >= 1);
        assert!(response.size[1] >= 1);
        assert!(!response.drag_started);
    }

    #[test]
    fn test_closed_viewport_reports_nothing() {
        let mut response = ViewportResponse {
            hovered: true,
            ..ViewportResponse::default()
        };
        let mut open = false;
        run_frame(|ctx| {
            response = build_viewport_window(
                ctx,
                ViewportId::Calibration,
                egui::TextureId::User(1),
                [256, 256],
                &mut open,
            );
        });
        assert_eq!(response, ViewportResponse::default());
    }

    #[test]
    fn test_inspector_without_clicks_is_idle() {
        let mut calibration = Camera3D::calibration_default();
        let mut scene = Camera3D::scene_default();
        let mut options = Options::default();
        let mut open = true;
        let mut action = InspectorAction::ResetScene;
        run_frame(|ctx| {
            action = build_inspector_window(ctx, &mut open, &mut calibration, &mut scene, &mut options);
        });
        assert_eq!(action, InspectorAction::None);
        assert_eq!(calibration, Camera3D::calibration_default());
        assert_eq!(options, Options::default());
    }

    #[test]
    fn test_menu_bar_idle() {
        let mut panels = PanelVisibility::default();
        let mut quit = true;
        run_frame(|ctx| {
            quit = build_menu_bar(ctx, &mut panels, 60.0);
        });
        assert!(!quit);
        assert_eq!(panels, PanelVisibility::default());
    }
}
