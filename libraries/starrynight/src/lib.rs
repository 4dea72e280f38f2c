use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Background of point stars scattered through a cube around the origin, slowly spinning.
pub struct StarryNightPlugin {
    pub settings: StarFieldSettings,
    pub seed: u64,
}

impl StarryNightPlugin {
    pub fn new(seed: u64) -> Self {
        Self {
            settings: StarFieldSettings::default(),
            seed,
        }
    }
}

impl Plugin for StarryNightPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<StarField>()
            .register_type::<StarFieldSettings>()
            .insert_resource(self.settings.clone())
            .insert_resource(StarFieldSeed(self.seed))
            .add_systems(Startup, spawn_star_field)
            .add_systems(Update, spin_star_field);
    }
}

#[derive(Debug, Clone, Resource, Reflect)]
#[reflect(Resource)]
pub struct StarFieldSettings {
    pub count: usize,
    /// Edge length of the cube the stars are scattered in.
    pub extent: f32,
    /// Radians per frame about the Y axis.
    pub spin: f32,
    pub color: Srgba,
}

impl Default for StarFieldSettings {
    fn default() -> Self {
        Self {
            count: 10_000,
            extent: 2000.0,
            spin: 0.0001,
            color: Srgba::new(1.0, 1.0, 1.0, 0.8),
        }
    }
}

#[derive(Debug, Clone, Copy, Resource)]
struct StarFieldSeed(u64);

#[derive(Debug, Clone, Copy, Component, Reflect)]
#[reflect(Component)]
pub struct StarField;

/// Uniformly distributed positions in `[-extent / 2, extent / 2)` on every axis.
pub fn generate_star_positions(seed: u64, count: usize, extent: f32) -> Vec<Vec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut coordinate = move || (rng.random::<f32>() - 0.5) * extent;
    (0..count)
        .map(|_| Vec3::new(coordinate(), coordinate(), coordinate()))
        .collect()
}

pub fn star_field_mesh(positions: &[Vec3]) -> Mesh {
    let positions = positions.iter().map(|p| p.to_array()).collect::<Vec<_>>();
    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

fn spawn_star_field(
    mut commands: Commands,
    settings: Res<StarFieldSettings>,
    seed: Res<StarFieldSeed>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let positions = generate_star_positions(seed.0, settings.count, settings.extent);
    debug!("Spawning {} stars", positions.len());
    commands.spawn((
        Name::new("Star field"),
        StarField,
        Mesh3d(meshes.add(star_field_mesh(&positions))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: settings.color.into(),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::default(),
    ));
}

fn spin_star_field(
    settings: Res<StarFieldSettings>,
    mut q: Query<&mut Transform, With<StarField>>,
) {
    for mut transform in &mut q {
        transform.rotate_y(settings.spin);
    }
}
