use crate::picking::Selection;
use crate::platform::DeviceProfile;
use crate::search::{apply_search, resolve_search};
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{EguiContext, EguiPlugin};
use egui::{Align2, Ui};
use egui_plot::PlotPoints;
use orbit_camera::events::TrackingCancelled;
use orbit_camera::{CameraController, CameraSystems, OrbitCameraSettings};
use solar_system::body::BodyRegistry;
use solar_system::orbit::DrawOrbits;
use solar_system::Catalog;

mod inspector;

const MARGIN: f32 = 10.0;
const INFO_PANEL_WIDTH: f32 = 300.0;
/// About one second of frames at 60 Hz.
const FPS_PLOT_SAMPLES: usize = 60;
const FPS_PLOT_HEIGHT: f32 = 40.0;

#[derive(Default)]
pub struct UiPlugin {
    pub with_inspector: bool,
}

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin);
        }
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin);
        }

        app.init_resource::<UiState>().add_systems(
            Update,
            (clear_search_on_cancel, ui)
                .chain()
                .after(CameraSystems::Input),
        );

        if self.with_inspector {
            app.add_plugins(inspector::Plugin);
        }
    }
}

#[derive(Debug, Default, Resource)]
struct UiState {
    search: String,
    fps_expanded: bool,
}

/// Tracking that ends by a drag or a lost target also empties the search field.
fn clear_search_on_cancel(
    mut evr_cancelled: EventReader<TrackingCancelled>,
    mut state: ResMut<UiState>,
) {
    if evr_cancelled.read().count() > 0 {
        state.search.clear();
    }
}

#[derive(SystemParam)]
struct UiSystems<'w, 's> {
    state: ResMut<'w, UiState>,
    catalog: Res<'w, Catalog>,
    registry: Res<'w, BodyRegistry>,
    selection: ResMut<'w, Selection>,
    profile: Res<'w, DeviceProfile>,
    diagnostics: Res<'w, DiagnosticsStore>,
    draw_orbits: ResMut<'w, DrawOrbits>,
    q_camera: Query<
        'w,
        's,
        (
            &'static OrbitCameraSettings,
            &'static mut CameraController,
        ),
    >,
}

fn ui(mut this: UiSystems, mut q_egui: Query<&mut EguiContext, With<PrimaryWindow>>) {
    let Ok(mut egui) = q_egui.get_single_mut() else {
        return;
    };

    let ctx = egui.get_mut();
    this.toplevel(ctx);
}

impl UiSystems<'_, '_> {
    fn toplevel(&mut self, ctx: &egui::Context) {
        self.controls(ctx);
        self.info_panel(ctx);
        self.instructions(ctx);
    }

    fn is_mobile(&self) -> bool {
        *self.profile == DeviceProfile::Mobile
    }

    fn controls(&mut self, ctx: &egui::Context) {
        egui::Window::new("Controls")
            .anchor(Align2::LEFT_TOP, egui::vec2(MARGIN, MARGIN))
            .resizable(false)
            .collapsible(self.is_mobile())
            .frame(default_frame())
            .show(ctx, |ui| {
                self.search_field(ui);
                ui.horizontal(|ui| {
                    self.zoom_buttons(ui);
                    self.exit_tracking_button(ui);
                });
                ui.separator();
                ui.horizontal(|ui| {
                    self.draw_orbit_toggle(ui);
                    ui.separator();
                    self.fps_label(ui);
                });
                if self.state.fps_expanded {
                    self.fps_plot(ui);
                }
            });
    }

    fn search_field(&mut self, ui: &mut Ui) {
        let response = ui.add(
            egui::TextEdit::singleline(&mut self.state.search).hint_text("Search planets..."),
        );
        if !response.changed() {
            return;
        }
        let Ok((settings, mut controller)) = self.q_camera.get_single_mut() else {
            return;
        };
        let outcome = resolve_search(&self.state.search, &self.catalog);
        debug!("Search {:?}: {outcome:?}", self.state.search);
        apply_search(outcome, &self.registry, settings, &mut controller);
    }

    fn zoom_buttons(&mut self, ui: &mut Ui) {
        let Ok((settings, mut controller)) = self.q_camera.get_single_mut() else {
            return;
        };
        if ui.button("-").on_hover_text("Zoom out").clicked() {
            controller.zoom_out(settings);
        }
        if ui.button("+").on_hover_text("Zoom in").clicked() {
            controller.zoom_in(settings);
        }
    }

    fn exit_tracking_button(&mut self, ui: &mut Ui) {
        let Some(name) = self.tracked_name() else {
            return;
        };
        ui.label(format!("Following {name}"));
        if ui.button("Exit tracking").clicked() {
            if let Ok((_, mut controller)) = self.q_camera.get_single_mut() {
                controller.release_tracking();
            }
            self.state.search.clear();
        }
    }

    fn tracked_name(&self) -> Option<String> {
        let (_, controller) = self.q_camera.get_single().ok()?;
        let target = controller.tracking?.target;
        let (kind, _) = self.registry.iter().find(|(_, e)| *e == target)?;
        self.catalog.body(kind).map(|body| body.name.clone())
    }

    fn draw_orbit_toggle(&mut self, ui: &mut Ui) {
        let mut draw = **self.draw_orbits;
        if ui.checkbox(&mut draw, "Draw orbits").changed() {
            **self.draw_orbits = draw;
        }
    }

    fn fps(&self) -> Option<&Diagnostic> {
        self.diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .filter(|fps| fps.is_enabled)
    }

    /// Clicking the readout toggles the frame-rate history below it.
    fn fps_label(&mut self, ui: &mut Ui) {
        let text = self
            .fps()
            .and_then(|fps| fps.smoothed())
            .map_or_else(|| String::from("FPS: -"), |v| format!("FPS: {v:.0}"));
        let response = ui
            .add(egui::Label::new(text).sense(egui::Sense::click()))
            .on_hover_text("Click for history");
        if response.clicked() {
            self.state.fps_expanded = !self.state.fps_expanded;
        }
    }

    fn fps_plot(&self, ui: &mut Ui) {
        let Some(fps) = self.fps() else {
            return;
        };
        let values = fps.values().copied().collect::<Vec<_>>();
        let recent = &values[values.len().saturating_sub(FPS_PLOT_SAMPLES)..];
        egui_plot::Plot::new("fps_history")
            .width(ui.available_width())
            .height(FPS_PLOT_HEIGHT)
            .show_axes([false, true])
            .show_grid(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .allow_scroll(false)
            .allow_drag(false)
            .allow_zoom(false)
            .include_x(0.0)
            .include_x(FPS_PLOT_SAMPLES as f64)
            .include_y(0.0)
            .show(ui, |plot| {
                plot.line(egui_plot::Line::new(
                    recent
                        .iter()
                        .enumerate()
                        .map(|(i, &v)| [i as f64, v])
                        .collect::<PlotPoints>(),
                ));
            });
    }

    fn info_panel(&mut self, ctx: &egui::Context) {
        let Some(body) = self
            .selection
            .get()
            .and_then(|kind| self.catalog.body(kind))
        else {
            return;
        };

        let (anchor, offset) = if self.is_mobile() {
            (Align2::CENTER_BOTTOM, egui::vec2(0.0, -MARGIN))
        } else {
            (Align2::RIGHT_TOP, egui::vec2(-MARGIN, MARGIN))
        };
        let mut open = true;
        egui::Window::new(body.name.as_str())
            .id(egui::Id::new("body_info"))
            .open(&mut open)
            .anchor(anchor, offset)
            .default_width(INFO_PANEL_WIDTH)
            .resizable(false)
            .collapsible(false)
            .frame(default_frame())
            .show(ctx, |ui| {
                ui.label(body.description.as_str());
            });
        if !open {
            self.selection.close();
        }
    }

    fn instructions(&mut self, ctx: &egui::Context) {
        let text = if self.is_mobile() {
            "Drag with one finger to rotate\nPinch to zoom\nTap a planet for details"
        } else {
            "Drag to rotate\nScroll to zoom\nClick a planet for details\nType a planet name to follow it\nEsc closes the info panel"
        };
        egui::Window::new("Instructions")
            .anchor(Align2::LEFT_BOTTOM, egui::vec2(MARGIN, -MARGIN))
            .resizable(false)
            .default_open(!self.is_mobile())
            .frame(default_frame())
            .show(ctx, |ui| {
                ui.label(text);
            });
    }
}

fn default_frame() -> egui::Frame {
    let default_frame = egui::Frame::window(&egui::Style::default());
    let [r, g, b, _] = default_frame.fill.to_array();
    default_frame
        .fill(egui::Color32::from_rgba_unmultiplied(r, g, b, 200))
        .inner_margin(egui::vec2(8.0, 6.0))
}
