use crate::{picking, platform, ui};
use bevy::core_pipeline::bloom::Bloom;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use orbit_camera::{OrbitCameraPlugin, OrbitCameraSettings};
use solar_system::error::CatalogError;
use solar_system::scene::SceneSeed;
use solar_system::{Catalog, SolarSystemPlugin};
use starrynight::StarryNightPlugin;

const CAMERA_FOV_DEGREES: f32 = 75.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;

pub(crate) struct AppSettings {
    pub(crate) resolution: WindowResolution,
    pub(crate) with_inspector: bool,
    pub(crate) seed: u64,
    pub(crate) log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            resolution: default(),
            with_inspector: false,
            seed: 0,
            log_filter: "info,wgpu=error,naga=warn".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Cannot load the body catalog: {0}")]
    Catalog(#[from] CatalogError),
}

pub(crate) fn get_app(settings: AppSettings) -> Result<App, AppError> {
    let catalog = Catalog::builtin()?;

    let mut app = App::new();
    app.add_plugins((
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Solar System Explorer".to_string(),
                    resolution: settings.resolution,
                    fit_canvas_to_parent: true,
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                filter: settings.log_filter,
                ..default()
            }),
        OrbitCameraPlugin,
    ))
    .add_plugins((
        SolarSystemPlugin::new(catalog, settings.seed),
        StarryNightPlugin::new(settings.seed),
        platform::PlatformPlugin,
        picking::SelectionPlugin,
        ui::UiPlugin {
            with_inspector: settings.with_inspector,
        },
    ))
    .insert_resource(ClearColor(Color::BLACK))
    .add_systems(Startup, setup)
    .add_observer(debug_show_named_entities);
    Ok(app)
}

fn debug_show_named_entities(trigger: Trigger<OnAdd, Name>, q: Query<&Name>) {
    if let Ok(name) = q.get(trigger.entity()) {
        debug!("{entity}: {name}", entity = trigger.entity());
    }
}

fn setup(mut commands: Commands, seed: Res<SceneSeed>) {
    info!("Scene seed: {}", **seed);
    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Bloom {
            intensity: 0.15,
            ..default()
        },
        Transform::from_xyz(30.0, 30.0, 50.0).looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCameraSettings::default(),
    ));
}
