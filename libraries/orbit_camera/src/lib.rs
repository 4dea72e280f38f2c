use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod gesture;
mod systems;

pub use components::{CameraController, OrbitCameraSettings, Tracking};

pub struct OrbitCameraPlugin;

/// Camera work done every frame: input first, then the pose derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum CameraSystems {
    Input,
    Pose,
}

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::CameraController>()
            .register_type::<components::OrbitCameraSettings>()
            .register_type::<components::Tracking>()
            .init_resource::<gesture::ActiveGestures>()
            .add_event::<events::TrackingCancelled>()
            .add_event::<events::PointerTap>()
            .add_systems(
                Update,
                systems::get_blocked_inputs
                    .pipe(systems::orbit_camera_input)
                    .in_set(CameraSystems::Input)
                    .run_if(
                        any_with_component::<components::CameraController>
                            .and(resource_exists::<bevy_egui::EguiUserTextures>),
                    ),
            )
            .add_systems(
                PostUpdate,
                systems::update_camera_pose
                    .in_set(CameraSystems::Pose)
                    .before(TransformSystem::TransformPropagate),
            );
    }
}
