use crate::body::{self, BodyKind, BodyRegistry, RotationSpeed};
use crate::catalog::Catalog;
use crate::orbit::{self, CircularOrbit, OrbitPath, OrbitalAngle, ORBIT_PATH_SEGMENTS};
use crate::sun;
use bevy::color::Alpha;
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts;

// #444444
const ORBIT_PATH_COLOR: Srgba = Srgba::rgb(0.267, 0.267, 0.267);
const ORBIT_PATH_ALPHA: f32 = 0.3;
const SPHERE_SECTORS: u32 = 32;
const SPHERE_STACKS: u32 = 32;
const PLANET_ROUGHNESS: f32 = 0.2;

pub struct PlanetScenePlugin {
    pub catalog: Catalog,
    pub seed: u64,
}

impl Plugin for PlanetScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.catalog.clone())
            .insert_resource(SceneSeed(self.seed))
            .init_resource::<BodyRegistry>()
            .add_systems(Startup, spawn_solar_system);
    }
}

/// Seed of the RNG placing the planets on their orbits.
#[derive(Debug, Copy, Clone, Resource, Deref)]
pub struct SceneSeed(pub u64);

/// One uniformly distributed starting angle per planet.
pub fn initial_angles(seed: u64, count: usize) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.random_range(0.0..consts::TAU)).collect()
}

fn spawn_solar_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut registry: ResMut<BodyRegistry>,
    catalog: Res<Catalog>,
    seed: Res<SceneSeed>,
) {
    let sphere = meshes.add(Sphere::new(1.0).mesh().uv(SPHERE_SECTORS, SPHERE_STACKS));
    let orbit_material = materials.add(StandardMaterial {
        base_color: ORBIT_PATH_COLOR.with_alpha(ORBIT_PATH_ALPHA).into(),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    let sun = sun::spawn(&mut commands, &catalog.sun, sphere.clone(), &mut materials);
    registry.insert(catalog.sun.id.clone(), BodyKind::Sun, sun);

    let angles = initial_angles(**seed, catalog.planets.len());
    for ((id, planet), angle) in catalog.planets().zip(angles) {
        let Some(orbit) = planet.orbit else {
            warn!("Planet {} has no orbit, skipping", planet.id);
            continue;
        };
        let material = materials.add(StandardMaterial {
            base_color: planet.color.into(),
            perceptual_roughness: PLANET_ROUGHNESS,
            ..default()
        });
        let entity = body::spawn(
            &mut commands,
            planet,
            BodyKind::Planet(id),
            sphere.clone(),
            material,
            orbit.position_at(angle),
        );
        commands
            .entity(entity)
            .insert((orbit, OrbitalAngle(angle), RotationSpeed::default()));
        spawn_orbit_path(&mut commands, &mut meshes, &orbit_material, &planet.name, orbit, entity);
        registry.insert(planet.id.clone(), BodyKind::Planet(id), entity);
        debug!("Spawned {} at angle {angle:.3} as {entity}", planet.name);
    }
    info!("Solar system ready with {} bodies", registry.len());
}

fn spawn_orbit_path(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: &Handle<StandardMaterial>,
    name: &str,
    orbit: CircularOrbit,
    body: Entity,
) {
    commands.spawn((
        Name::new(format!("{name} (Orbit)")),
        OrbitPath { body },
        NotShadowCaster,
        Mesh3d(meshes.add(orbit::orbit_path_mesh(&orbit, ORBIT_PATH_SEGMENTS))),
        MeshMaterial3d(material.clone()),
        Transform::default(),
    ));
}
