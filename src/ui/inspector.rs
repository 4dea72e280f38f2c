use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContext;
use bevy_inspector_egui::{bevy_inspector, reflect_inspector, DefaultInspectorConfigPlugin};
use egui::containers;
use orbit_camera::{CameraController, OrbitCameraSettings};

pub struct Plugin;

impl bevy::prelude::Plugin for Plugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<DefaultInspectorConfigPlugin>() {
            app.add_plugins(DefaultInspectorConfigPlugin);
        }
        app.add_systems(Update, inspector_ui);
    }
}

fn inspector_ui(world: &mut World) {
    let Ok(mut ctx) = world
        .query_filtered::<&mut EguiContext, With<PrimaryWindow>>()
        .get_single_mut(world)
        .map(|ctx| ctx.clone())
    else {
        return;
    };

    containers::Window::new("Camera")
        .default_open(false)
        .frame(super::default_frame())
        .show(ctx.get_mut(), |ui| {
            component_ui::<CameraController>(world, ui);
            ui.separator();
            component_ui::<OrbitCameraSettings>(world, ui);
        });

    containers::Window::new("Inspector")
        .default_open(false)
        .frame(super::default_frame())
        .show(ctx.get_mut(), |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                bevy_inspector::ui_for_world_entities(world, ui);
            });
        });
}

/// Edits a copy of the first `C` in the world and writes it back when changed.
fn component_ui<C: Component + Reflect + TypePath + Clone>(world: &mut World, ui: &mut egui::Ui) {
    let Some((entity, mut component)) = world
        .query::<(Entity, &C)>()
        .iter(world)
        .map(|(e, c)| (e, c.clone()))
        .next()
    else {
        ui.disable();
        ui.label(format!("No {}", C::short_type_path()));
        return;
    };
    let changed = {
        let type_registry = world.resource::<AppTypeRegistry>();
        let type_registry = type_registry.read();
        reflect_inspector::ui_for_value(&mut component, ui, &type_registry)
    };

    if changed {
        world.entity_mut(entity).insert(component);
    }
}
