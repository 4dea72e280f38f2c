use crate::body::{self, BodyKind};
use crate::catalog::CelestialBody;
use bevy::color::Alpha;
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;

/// Opacity of the shell drawn around the sun.
const GLOW_ALPHA: f32 = 0.3;
const EMISSIVE_STRENGTH: f32 = 4.0;

pub struct SunPlugin;

impl Plugin for SunPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Sun>()
            .register_type::<Sunlight>()
            .insert_resource(AmbientLight {
                color: Color::srgb_u8(0x40, 0x40, 0x40),
                brightness: 300.0,
            });
    }
}

#[derive(Debug, Clone, Copy, Component, Reflect)]
#[reflect(Component)]
pub struct Sun;

#[derive(Debug, Clone, Copy, Component)]
pub struct SunGlow;

#[derive(Component, Reflect)]
#[reflect(Component)]
struct Sunlight;

pub fn sun_material(body: &CelestialBody) -> StandardMaterial {
    let base_color: LinearRgba = body.color.into();
    StandardMaterial {
        base_color: body.color.into(),
        emissive: base_color * EMISSIVE_STRENGTH,
        unlit: true,
        ..default()
    }
}

pub fn glow_material(body: &CelestialBody) -> StandardMaterial {
    StandardMaterial {
        base_color: body.color.with_alpha(GLOW_ALPHA).into(),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    }
}

/// Spawns the sun at the origin, its glow shell and the light it casts on the planets.
pub fn spawn(
    commands: &mut Commands,
    body: &CelestialBody,
    sphere: Handle<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let sun = body::spawn(
        commands,
        body,
        BodyKind::Sun,
        sphere.clone(),
        materials.add(sun_material(body)),
        Vec3::ZERO,
    );
    commands.entity(sun).insert((Sun, NotShadowCaster));

    if let Some(glow_radius) = body.glow_radius {
        commands.spawn((
            Name::new(format!("{} (Glow)", body.name)),
            SunGlow,
            NotShadowCaster,
            Mesh3d(sphere),
            MeshMaterial3d(materials.add(glow_material(body))),
            Transform::from_scale(Vec3::splat(glow_radius)),
        ));
    }

    commands.spawn((
        Name::new(format!("{} (Light)", body.name)),
        Sunlight,
        PointLight {
            color: Color::WHITE,
            intensity: 4.0e7,
            range: 500.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::default(),
    ));
    debug!("Spawned sun {sun}");
    sun
}
